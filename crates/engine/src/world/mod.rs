mod body;
mod collision;
mod geom;
mod tiles;

pub use body::{Body, SlideResult};
pub use collision::CollisionGroups;
pub use geom::{from_units, to_units, Axis, IntBox, Rect, Size, Vec2, PRECISION};
pub use tiles::{TileField, TileFieldError};
