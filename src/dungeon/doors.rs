//! Door placement pass
//!
//! Runs after all carving. Candidacy is judged against a snapshot of the
//! tile array taken before the pass, so a conversion early in the scan
//! cannot create or destroy candidates later in it.

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::core::types::Tile;
use crate::dungeon::grid::Dungeon;

/// Chance that a validated entrance becomes a door
const DOOR_CHANCE: f32 = 0.5;

/// Convert qualifying wall tiles into closed wooden doors
///
/// A candidate is a wall tile with at least one orthogonal floor neighbor
/// inside some room interior and at least one orthogonal floor neighbor
/// outside every interior, and whose flanking tiles form a straight
/// passage. Each candidate converts with probability 0.5; locked doors
/// are never produced here. Returns the number of doors placed.
pub fn place_doors(d: &mut Dungeon, rng: &mut ChaCha8Rng) -> usize {
    let snapshot = d.tiles_snapshot();
    let height = d.height;
    let tile_in = |x: i32, y: i32| -> Tile {
        if x < 0 || x >= d.width || y < 0 || y >= height {
            Tile::Wall
        } else {
            snapshot[(x * height + y) as usize]
        }
    };

    let mut candidates = Vec::new();
    for x in 0..d.width {
        for y in 0..d.height {
            if tile_in(x, y) != Tile::Wall {
                continue;
            }
            let mut interior_floor = false;
            let mut outside_floor = false;
            for (nx, ny) in [(x - 1, y), (x + 1, y), (x, y - 1), (x, y + 1)] {
                if tile_in(nx, ny) != Tile::Floor {
                    continue;
                }
                if d.in_any_room_interior(nx, ny) {
                    interior_floor = true;
                } else {
                    outside_floor = true;
                }
            }
            if !(interior_floor && outside_floor) {
                continue;
            }
            if !d.door_passage_at(x, y) {
                continue;
            }
            candidates.push((x, y));
        }
    }

    let mut placed = 0;
    for (x, y) in candidates {
        if rng.gen::<f32>() < DOOR_CHANCE && d.add_door(x, y) {
            placed += 1;
        }
    }
    placed
}
