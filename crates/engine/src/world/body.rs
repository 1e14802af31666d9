use super::collision::CollisionGroups;
use super::geom::{IntBox, Rect, Size, Vec2};

/// Physical footprint of an entity. `pos` is the bottom-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Body {
    pub pos: Vec2,
    pub size: Size,
    pub vel: Vec2,
    pub collision_group: CollisionGroups,
    pub collides_with: CollisionGroups,
    /// Blocks other bodies in slide moves and solidity queries.
    pub solid: bool,
}

impl Body {
    pub fn new(size: Size) -> Self {
        Self {
            size,
            ..Self::default()
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }

    pub fn int_box(&self) -> IntBox {
        IntBox::from_rect(self.rect())
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(
            self.pos.x + self.size.width * 0.5,
            self.pos.y + self.size.height * 0.5,
        )
    }

    pub fn reacts_to(&self, other: &Body) -> bool {
        self.collides_with.reacts_to(other.collision_group)
    }

    pub fn overlaps(&self, other: &Body) -> bool {
        self.int_box().touches(&other.int_box())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlideResult {
    pub moved_horizontally: bool,
    pub moved_vertically: bool,
}

impl SlideResult {
    pub fn unblocked(&self) -> bool {
        self.moved_horizontally && self.moved_vertically
    }
}
