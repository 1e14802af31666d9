use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

use serde::{Deserialize, Serialize};

/// Sub-tile units per world unit. One tile spans exactly one world unit.
pub const PRECISION: i32 = 1024;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl SubAssign for Vec2 {
    fn sub_assign(&mut self, rhs: Vec2) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;

    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

impl Neg for Vec2 {
    type Output = Vec2;

    fn neg(self) -> Vec2 {
        Vec2::new(-self.x, -self.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const UNIT: Size = Size {
        width: 1.0,
        height: 1.0,
    };

    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

impl Default for Size {
    fn default() -> Self {
        Self::UNIT
    }
}

/// Axis-aligned box in world units. `pos` is the bottom-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Size,
}

impl Rect {
    pub const fn new(pos: Vec2, size: Size) -> Self {
        Self { pos, size }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Axis-aligned box in sub-tile units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntBox {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl IntBox {
    pub fn from_rect(rect: Rect) -> Self {
        Self {
            x: to_units(rect.pos.x),
            y: to_units(rect.pos.y),
            width: to_units(rect.size.width),
            height: to_units(rect.size.height),
        }
    }

    pub fn shifted(self, axis: Axis, amount: i32) -> Self {
        match axis {
            Axis::Horizontal => Self {
                x: self.x + amount,
                ..self
            },
            Axis::Vertical => Self {
                y: self.y + amount,
                ..self
            },
        }
    }

    pub fn coordinate(&self, axis: Axis) -> i32 {
        match axis {
            Axis::Horizontal => self.x,
            Axis::Vertical => self.y,
        }
    }

    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn top(&self) -> i32 {
        self.y + self.height
    }

    /// Closed-interval test: boxes that only touch along an edge overlap.
    pub fn touches(&self, other: &IntBox) -> bool {
        segments_touch(self.x, self.right(), other.x, other.right())
            && segments_touch(self.y, self.top(), other.y, other.top())
    }

    /// Open-interval test: boxes must share interior area.
    pub fn intersects(&self, other: &IntBox) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.top()
            && other.y < self.top()
    }
}

fn segments_touch(a1: i32, a2: i32, b1: i32, b2: i32) -> bool {
    a1 <= b2 && b1 <= a2
}

pub fn to_units(value: f32) -> i32 {
    (value * PRECISION as f32).round() as i32
}

pub fn from_units(units: i32) -> f32 {
    units as f32 / PRECISION as f32
}
