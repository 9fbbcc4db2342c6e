//! Enemy and cover placement inside a main room under spacing constraints.

use crate::rng::RunRng;
use crate::types::{Extent, Pos};

use super::model::CoverSpot;

/// Squared-distance floors between placed entities.
const ENEMY_ENEMY_SPACING_SQ: i32 = 9;
const ENEMY_COVER_SPACING_SQ: i32 = 3;
const COVER_COVER_SPACING_SQ: i32 = 12;

pub(super) struct RoomPopulation {
    pub(super) enemy_positions: Vec<Pos>,
    pub(super) cover_spots: Vec<CoverSpot>,
}

/// Greedy first-fit placement over a shuffled candidate grid. Candidates come
/// from the inner half extent of the room (a quarter extent each side of the
/// center) to keep spawns away from walls. When no remaining candidate
/// satisfies a constraint the slot is skipped, so tight rooms may yield fewer
/// placements than requested; the caller reports that, it is not an error.
pub(super) fn populate_room(
    rng: &mut RunRng,
    center: Pos,
    size: Extent,
    enemy_target: usize,
    cover_target: usize,
) -> RoomPopulation {
    let mut candidates = Vec::new();
    for x in (center.x - size.width / 4)..=(center.x + size.width / 4) {
        for y in (center.y - size.height / 4)..=(center.y + size.height / 4) {
            candidates.push(Pos { y, x });
        }
    }
    rng.shuffle(&mut candidates);

    let mut enemy_positions: Vec<Pos> = Vec::new();
    for _ in 0..enemy_target {
        let found = candidates.iter().position(|candidate| {
            enemy_positions
                .iter()
                .all(|enemy| enemy.squared_distance(*candidate) >= ENEMY_ENEMY_SPACING_SQ)
        });
        let Some(index) = found else { break };
        enemy_positions.push(candidates.remove(index));
    }

    let mut cover_spots: Vec<CoverSpot> = Vec::new();
    let mut rotated = false;
    for _ in 0..cover_target {
        let found = candidates.iter().position(|candidate| {
            enemy_positions
                .iter()
                .all(|enemy| enemy.squared_distance(*candidate) >= ENEMY_COVER_SPACING_SQ)
                && cover_spots
                    .iter()
                    .all(|spot| spot.pos.squared_distance(*candidate) >= COVER_COVER_SPACING_SQ)
        });
        let Some(index) = found else { break };
        cover_spots.push(CoverSpot { pos: candidates.remove(index), rotated });
        rotated = !rotated;
    }

    RoomPopulation { enemy_positions, cover_spots }
}
