//! Generation pipeline
//!
//! Rooms are placed and joined as they appear, extra links and doors run
//! over the finished carving, and the throne room is crowned last. The
//! whole pipeline is a pure function of the parameters: the same seed
//! yields the same dungeon bit for bit.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::core::config::GenParams;
use crate::dungeon::corridors::CorridorRouter;
use crate::dungeon::grid::Dungeon;
use crate::dungeon::{doors, rooms};

/// Build a complete dungeon from sanitized parameters
pub fn generate(params: &GenParams) -> Dungeon {
    let params = params.sanitize();
    let mut rng = ChaCha8Rng::seed_from_u64(params.seed);
    let mut dungeon = Dungeon::new(params.width, params.height);
    let router = CorridorRouter::new(params.segment_cap());

    let summary = rooms::place_rooms(&mut dungeon, &params, &router, &mut rng);
    router.add_complexity_links(&mut dungeon, &params, &mut rng);
    let door_count = doors::place_doors(&mut dungeon, &mut rng);
    rooms::crown_throne(&mut dungeon);

    if (summary.main_rooms as u32) < params.room_count {
        tracing::warn!(
            requested = params.room_count,
            placed = summary.main_rooms,
            "fewer rooms than requested"
        );
    }
    tracing::info!(
        seed = params.seed,
        main_rooms = summary.main_rooms,
        side_rooms = summary.side_rooms,
        doors = door_count,
        "dungeon generated"
    );
    dungeon
}
