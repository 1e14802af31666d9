use crate::world::{from_units, to_units, Axis, Body, IntBox, SlideResult, Vec2, PRECISION};

/// Longest single scan step. Obstacles thinner than this could be skipped.
const MAX_SCAN_STEP: i32 = PRECISION / 2;

pub trait SolidityQuery {
    fn is_solid(&self, area: IntBox) -> bool;
}

impl<F: Fn(IntBox) -> bool> SolidityQuery for F {
    fn is_solid(&self, area: IntBox) -> bool {
        self(area)
    }
}

/// Moves `body` by `delta`, horizontal component first, then vertical from
/// the updated position. Each moved axis lands on the sub-tile position that
/// was checked, so steps smaller than half a unit leave it in place. A
/// blocked axis stops at the last free sub-tile position before the first
/// solid boundary and reports `false`.
pub fn slide_move(body: &mut Body, delta: Vec2, solid: &dyn SolidityQuery) -> SlideResult {
    let moved_horizontally = move_axis(body, Axis::Horizontal, delta.x, solid);
    let moved_vertically = move_axis(body, Axis::Vertical, delta.y, solid);
    SlideResult {
        moved_horizontally,
        moved_vertically,
    }
}

fn move_axis(body: &mut Body, axis: Axis, amount: f32, solid: &dyn SolidityQuery) -> bool {
    let start = body.int_box();
    let total = to_units(amount);
    let direction = total.signum();
    let distance = total.abs();

    match first_blocked_offset(start, axis, direction, distance, solid) {
        None => {
            let landed = start.coordinate(axis) + direction * distance;
            *axis_coordinate(body, axis) = from_units(landed);
            true
        }
        Some(free_offset) => {
            if free_offset > 0 {
                let snapped = start.coordinate(axis) + direction * free_offset;
                *axis_coordinate(body, axis) = from_units(snapped);
            }
            false
        }
    }
}

/// Walks from `start` in steps of at most half a tile. Returns the largest
/// free offset before the first blocking step, or `None` when the whole
/// distance is free.
fn first_blocked_offset(
    start: IntBox,
    axis: Axis,
    direction: i32,
    distance: i32,
    solid: &dyn SolidityQuery,
) -> Option<i32> {
    if distance == 0 {
        return solid.is_solid(start).then_some(0);
    }

    let solid_at = |offset: i32| solid.is_solid(start.shifted(axis, direction * offset));
    let mut travelled = 0;
    while travelled < distance {
        let step = (distance - travelled).min(MAX_SCAN_STEP);
        if solid_at(travelled + step) {
            let (mut free, mut blocked) = (travelled, travelled + step);
            while blocked - free > 1 {
                let mid = free + (blocked - free) / 2;
                if solid_at(mid) {
                    blocked = mid;
                } else {
                    free = mid;
                }
            }
            return Some(free);
        }
        travelled += step;
    }
    None
}

fn axis_coordinate(body: &mut Body, axis: Axis) -> &mut f32 {
    match axis {
        Axis::Horizontal => &mut body.pos.x,
        Axis::Vertical => &mut body.pos.y,
    }
}
