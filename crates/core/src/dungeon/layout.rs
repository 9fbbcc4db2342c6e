//! Pure placement geometry: center-collision tests, room sizing, and
//! teleporter endpoint computation.

use std::collections::BTreeSet;

use crate::rng::RunRng;
use crate::types::{Extent, Pos};

/// Rooms are spaced on a fixed step grid, so an exact center match is a
/// sufficient disjointness test; no bounding-box check is needed.
pub(super) fn center_collides(candidate: Pos, occupied: &BTreeSet<Pos>) -> bool {
    occupied.contains(&candidate)
}

/// Each dimension drawn uniformly from `[min, max)`, then rounded up to the
/// nearest even integer so corridor carving stays symmetric about the center.
pub(super) fn random_even_size(rng: &mut RunRng, min: i32, max: i32) -> Extent {
    let mut width = rng.range_i32(min, max);
    let mut height = rng.range_i32(min, max);
    if width % 2 != 0 {
        width += 1;
    }
    if height % 2 != 0 {
        height += 1;
    }
    Extent { width, height }
}

/// Teleporter positions for a corridor between two rooms: each endpoint is
/// the room's center pushed toward the other room, clamped to the room's
/// half extent per axis, so it lands on the boundary nearest the partner
/// and never outside the room.
pub(super) fn corridor_endpoints(
    from_center: Pos,
    from_size: Extent,
    to_center: Pos,
    to_size: Extent,
) -> (Pos, Pos) {
    let near = Pos {
        y: from_center.y
            + (to_center.y - from_center.y).clamp(-from_size.height / 2, from_size.height / 2),
        x: from_center.x
            + (to_center.x - from_center.x).clamp(-from_size.width / 2, from_size.width / 2),
    };
    let far = Pos {
        y: to_center.y
            + (from_center.y - to_center.y).clamp(-to_size.height / 2, to_size.height / 2),
        x: to_center.x + (from_center.x - to_center.x).clamp(-to_size.width / 2, to_size.width / 2),
    };
    (near, far)
}
