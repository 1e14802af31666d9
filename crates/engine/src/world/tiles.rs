use thiserror::Error;

use super::geom::{IntBox, PRECISION};

/// Per-room grid of tiles. Row 0 is the bottom of the room; y grows upward.
/// 0 is empty, anything else is solid.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TileField {
    width: u32,
    height: u32,
    tiles: Vec<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TileFieldError {
    #[error("tile count mismatch: expected {expected}, got {actual}")]
    TileCountMismatch { expected: usize, actual: usize },
    #[error("row {row} has width {actual}, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        actual: usize,
    },
    #[error("unknown tile character '{ch}' at row {row}, column {column}")]
    UnknownTile { ch: char, row: usize, column: usize },
}

impl TileField {
    pub fn new(width: u32, height: u32, tiles: Vec<i32>) -> Result<Self, TileFieldError> {
        let expected = width as usize * height as usize;
        let actual = tiles.len();
        if expected != actual {
            return Err(TileFieldError::TileCountMismatch { expected, actual });
        }
        Ok(Self {
            width,
            height,
            tiles,
        })
    }

    pub fn filled(width: u32, height: u32, tile: i32) -> Self {
        Self {
            width,
            height,
            tiles: vec![tile; width as usize * height as usize],
        }
    }

    /// Builds a field from text rows, top row first. `.` and space are empty,
    /// `#` is tile 1 and digits map to their value.
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Self, TileFieldError> {
        let height = rows.len();
        let width = rows.first().map(|row| row.as_ref().chars().count()).unwrap_or(0);
        let mut tiles = vec![0; width * height];
        for (row_index, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            let actual = row.chars().count();
            if actual != width {
                return Err(TileFieldError::RaggedRow {
                    row: row_index,
                    expected: width,
                    actual,
                });
            }
            let y = height - 1 - row_index;
            for (column, ch) in row.chars().enumerate() {
                let tile = match ch {
                    '.' | ' ' => 0,
                    '#' => 1,
                    digit if digit.is_ascii_digit() => digit as i32 - '0' as i32,
                    other => {
                        return Err(TileFieldError::UnknownTile {
                            ch: other,
                            row: row_index,
                            column,
                        })
                    }
                };
                tiles[y * width + column] = tile;
            }
        }
        Ok(Self {
            width: width as u32,
            height: height as u32,
            tiles,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_inside(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height
    }

    pub fn get(&self, x: i32, y: i32) -> Option<i32> {
        if !self.is_inside(x, y) {
            return None;
        }
        self.tiles
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    /// Out-of-field cells are never solid.
    pub fn is_solid_cell(&self, x: i32, y: i32) -> bool {
        self.get(x, y).is_some_and(|tile| tile != 0)
    }

    /// True when any tile sharing interior area with `area` is solid.
    pub fn is_box_solid(&self, area: IntBox) -> bool {
        if area.width <= 0 || area.height <= 0 {
            return false;
        }
        let col1 = area.x.div_euclid(PRECISION);
        let col2 = (area.right() - 1).div_euclid(PRECISION);
        let row1 = area.y.div_euclid(PRECISION);
        let row2 = (area.top() - 1).div_euclid(PRECISION);

        for row in row1..=row2 {
            for col in col1..=col2 {
                if self.is_solid_cell(col, row) {
                    return true;
                }
            }
        }
        false
    }

    pub fn scan(&self, mut on_cell: impl FnMut(i32, i32, i32)) {
        for y in 0..self.height as i32 {
            for x in 0..self.width as i32 {
                if let Some(tile) = self.get(x, y) {
                    on_cell(x, y, tile);
                }
            }
        }
    }
}
