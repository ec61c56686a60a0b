pub mod corridors;
pub mod doors;
pub mod generator;
pub mod grid;
pub mod prefab;
pub mod rooms;

pub use generator::generate;
pub use grid::Dungeon;
pub use prefab::{load_prefabs, LegendEntry, Prefab};
