//! Tile arena and low-level carve primitives
//!
//! The grid treats everything outside its bounds as solid brick wall, so
//! neither carving nor visibility ever needs a bounds precondition.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::types::{DoorState, Material, Rect, Tile};
use crate::dungeon::prefab::LegendEntry;

/// Dense tile/material/door arena plus the room list
///
/// Storage is three flat arrays indexed `x * height + y`; every hot path
/// (carving, shadow-casting, neighbor checks) is a point query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dungeon {
    pub width: i32,
    pub height: i32,
    tiles: Vec<Tile>,
    materials: Vec<Material>,
    doors: Vec<Option<DoorState>>,
    /// Placement order; immutable once generation completes
    pub rooms: Vec<Rect>,
    pub start_room: Option<usize>,
    pub throne_room: Option<usize>,
}

impl Dungeon {
    /// Solid wall/brick arena with no rooms
    pub fn new(width: i32, height: i32) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        let cells = (width * height) as usize;
        Self {
            width,
            height,
            tiles: vec![Tile::Wall; cells],
            materials: vec![Material::Brick; cells],
            doors: vec![None; cells],
            rooms: Vec::new(),
            start_room: None,
            throne_room: None,
        }
    }

    #[inline]
    fn idx(&self, x: i32, y: i32) -> usize {
        (x * self.height + y) as usize
    }

    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width && y >= 0 && y < self.height
    }

    /// Tile kind at `(x, y)`; out-of-bounds reads as Wall
    #[inline]
    pub fn tile_at(&self, x: i32, y: i32) -> Tile {
        if self.in_bounds(x, y) {
            self.tiles[self.idx(x, y)]
        } else {
            Tile::Wall
        }
    }

    /// Surface at `(x, y)`; out-of-bounds reads as Brick
    #[inline]
    pub fn material_at(&self, x: i32, y: i32) -> Material {
        if self.in_bounds(x, y) {
            self.materials[self.idx(x, y)]
        } else {
            Material::Brick
        }
    }

    #[inline]
    pub fn door_at(&self, x: i32, y: i32) -> Option<DoorState> {
        if self.in_bounds(x, y) {
            self.doors[self.idx(x, y)]
        } else {
            None
        }
    }

    #[inline]
    pub fn is_wall(&self, x: i32, y: i32) -> bool {
        self.tile_at(x, y) == Tile::Wall
    }

    /// Floors and doors carry movement; walls do not
    #[inline]
    pub fn is_passable(&self, x: i32, y: i32) -> bool {
        matches!(self.tile_at(x, y), Tile::Floor | Tile::Door)
    }

    /// Write one cell, keeping the door map consistent with the tile kind
    pub(crate) fn set_cell(&mut self, x: i32, y: i32, tile: Tile, material: Material) {
        if !self.in_bounds(x, y) {
            return;
        }
        let i = self.idx(x, y);
        self.tiles[i] = tile;
        self.materials[i] = material;
        self.doors[i] = if tile == Tile::Door {
            Some(DoorState::Closed)
        } else {
            None
        };
    }

    pub(crate) fn set_material(&mut self, x: i32, y: i32, material: Material) {
        if self.in_bounds(x, y) {
            let i = self.idx(x, y);
            self.materials[i] = material;
        }
    }

    /// Carve the interior of `room` to cobble floor; the outer ring stays wall
    pub fn carve_room(&mut self, room: &Rect) {
        for x in room.x1 + 1..room.x2 - 1 {
            for y in room.y1 + 1..room.y2 - 1 {
                self.set_cell(x, y, Tile::Floor, Material::Cobble);
            }
        }
    }

    /// Carve a horizontal run of floor between `x1` and `x2` inclusive
    pub fn carve_h_tunnel(&mut self, x1: i32, x2: i32, y: i32) {
        for x in x1.min(x2)..=x1.max(x2) {
            self.set_cell(x, y, Tile::Floor, Material::Cobble);
        }
    }

    /// Carve a vertical run of floor between `y1` and `y2` inclusive
    pub fn carve_v_tunnel(&mut self, y1: i32, y2: i32, x: i32) {
        for y in y1.min(y2)..=y1.max(y2) {
            self.set_cell(x, y, Tile::Floor, Material::Cobble);
        }
    }

    /// Convert `(x, y)` into a closed wooden door if it sits on a passage
    ///
    /// Requires floor on both sides of exactly one axis and wall on both
    /// sides of the other; anything else is refused.
    pub fn add_door(&mut self, x: i32, y: i32) -> bool {
        if !self.in_bounds(x, y) || !self.door_passage_at(x, y) {
            return false;
        }
        self.set_cell(x, y, Tile::Door, Material::Wood);
        true
    }

    /// Passage pattern behind [`Dungeon::add_door`]
    pub(crate) fn door_passage_at(&self, x: i32, y: i32) -> bool {
        let horizontal = self.tile_at(x - 1, y) == Tile::Floor
            && self.tile_at(x + 1, y) == Tile::Floor
            && self.tile_at(x, y - 1) == Tile::Wall
            && self.tile_at(x, y + 1) == Tile::Wall;
        let vertical = self.tile_at(x, y - 1) == Tile::Floor
            && self.tile_at(x, y + 1) == Tile::Floor
            && self.tile_at(x - 1, y) == Tile::Wall
            && self.tile_at(x + 1, y) == Tile::Wall;
        horizontal || vertical
    }

    /// Host-facing door toggle; false on anything that is not a door
    pub fn set_door_state(&mut self, x: i32, y: i32, state: DoorState) -> bool {
        if self.tile_at(x, y) != Tile::Door {
            return false;
        }
        let i = self.idx(x, y);
        self.doors[i] = Some(state);
        true
    }

    /// Copy of the tile array, used to freeze a pre-pass view of the grid
    pub(crate) fn tiles_snapshot(&self) -> Vec<Tile> {
        self.tiles.clone()
    }

    pub fn in_any_room_interior(&self, x: i32, y: i32) -> bool {
        self.rooms.iter().any(|r| r.interior_contains(x, y))
    }

    pub fn is_start(&self, index: usize) -> bool {
        self.start_room == Some(index)
    }

    pub fn is_throne(&self, index: usize) -> bool {
        self.throne_room == Some(index)
    }

    /// Overlay an ASCII block pattern at `(px, py)`
    ///
    /// Each character maps through `legend`; void entries and unknown
    /// symbols leave the underlying tiles untouched, so a prefab can punch
    /// an irregular footprint. Out-of-range cells are clipped.
    pub fn stamp_prefab(
        &mut self,
        px: i32,
        py: i32,
        cells: &[String],
        legend: &AHashMap<char, LegendEntry>,
    ) {
        for (row, line) in cells.iter().enumerate() {
            for (col, symbol) in line.chars().enumerate() {
                let x = px + col as i32;
                let y = py + row as i32;
                match legend.get(&symbol) {
                    Some(entry) => {
                        if let Some(tile) = entry.tile {
                            let material =
                                entry.material.unwrap_or_else(|| Material::default_for(tile));
                            self.set_cell(x, y, tile, material);
                        }
                    }
                    None => {
                        tracing::debug!(symbol = %symbol, "prefab symbol missing from legend, skipped");
                    }
                }
            }
        }
    }

    pub fn glyph_at(&self, x: i32, y: i32) -> char {
        match self.tile_at(x, y) {
            Tile::Wall => '#',
            Tile::Floor => '.',
            Tile::Door => '+',
        }
    }

    /// Row-major ASCII dump, one line per row
    pub fn render_ascii(&self) -> String {
        let mut out = String::with_capacity(((self.width + 1) * self.height) as usize);
        for y in 0..self.height {
            for x in 0..self.width {
                out.push(self.glyph_at(x, y));
            }
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_grid_is_solid_brick() {
        let d = Dungeon::new(6, 4);
        for x in 0..6 {
            for y in 0..4 {
                assert_eq!(d.tile_at(x, y), Tile::Wall);
                assert_eq!(d.material_at(x, y), Material::Brick);
                assert_eq!(d.door_at(x, y), None);
            }
        }
    }

    #[test]
    fn test_out_of_bounds_reads_are_safe() {
        let d = Dungeon::new(6, 4);
        assert!(d.is_wall(-1, 0));
        assert!(d.is_wall(6, 0));
        assert!(d.is_wall(0, 99));
        assert_eq!(d.material_at(-3, -3), Material::Brick);
        assert_eq!(d.door_at(100, 100), None);
    }

    #[test]
    fn test_carve_room_leaves_border() {
        let mut d = Dungeon::new(10, 10);
        let room = Rect::new(2, 2, 5, 5);
        d.carve_room(&room);
        assert_eq!(d.tile_at(3, 3), Tile::Floor);
        assert_eq!(d.material_at(3, 3), Material::Cobble);
        assert_eq!(d.tile_at(2, 3), Tile::Wall);
        assert_eq!(d.tile_at(6, 3), Tile::Wall);
    }

    #[test]
    fn test_tunnels_clip_out_of_range() {
        let mut d = Dungeon::new(8, 8);
        d.carve_h_tunnel(-5, 20, 3);
        for x in 0..8 {
            assert_eq!(d.tile_at(x, 3), Tile::Floor);
        }
        d.carve_v_tunnel(-2, 2, 5);
        assert_eq!(d.tile_at(5, 0), Tile::Floor);
        assert_eq!(d.tile_at(5, 2), Tile::Floor);
    }

    #[test]
    fn test_add_door_requires_passage() {
        let mut d = Dungeon::new(7, 7);
        // horizontal passage through (3, 3)
        d.carve_h_tunnel(2, 4, 3);
        assert!(!d.add_door(3, 2)); // no flanking floors
        // restore the middle tile to wall so the pattern applies
        d.set_cell(3, 3, Tile::Wall, Material::Brick);
        assert!(d.add_door(3, 3));
        assert_eq!(d.tile_at(3, 3), Tile::Door);
        assert_eq!(d.door_at(3, 3), Some(DoorState::Closed));
        assert_eq!(d.material_at(3, 3), Material::Wood);
    }

    #[test]
    fn test_door_state_toggles_only_on_doors() {
        let mut d = Dungeon::new(7, 7);
        d.carve_h_tunnel(2, 4, 3);
        d.set_cell(3, 3, Tile::Wall, Material::Brick);
        assert!(d.add_door(3, 3));
        assert!(d.set_door_state(3, 3, DoorState::Open));
        assert_eq!(d.door_at(3, 3), Some(DoorState::Open));
        assert!(!d.set_door_state(2, 3, DoorState::Locked));
    }

    #[test]
    fn test_door_map_matches_door_tiles() {
        let mut d = Dungeon::new(9, 9);
        d.carve_room(&Rect::new(1, 1, 5, 5));
        d.carve_h_tunnel(5, 7, 3);
        for x in 0..9 {
            for y in 0..9 {
                assert_eq!(d.door_at(x, y).is_some(), d.tile_at(x, y) == Tile::Door);
            }
        }
    }

    #[test]
    fn test_stamp_prefab_skips_void() {
        let mut d = Dungeon::new(8, 8);
        d.carve_room(&Rect::new(0, 0, 8, 8));
        let cells = vec!["#.".to_string(), " +".to_string()];
        let mut legend = AHashMap::new();
        legend.insert(
            '#',
            LegendEntry {
                tile: Some(Tile::Wall),
                material: Some(Material::Obsidian),
            },
        );
        legend.insert(
            '.',
            LegendEntry {
                tile: Some(Tile::Floor),
                material: None,
            },
        );
        legend.insert(
            ' ',
            LegendEntry {
                tile: None,
                material: None,
            },
        );
        legend.insert(
            '+',
            LegendEntry {
                tile: Some(Tile::Door),
                material: None,
            },
        );
        d.stamp_prefab(2, 2, &cells, &legend);
        assert_eq!(d.tile_at(2, 2), Tile::Wall);
        assert_eq!(d.material_at(2, 2), Material::Obsidian);
        assert_eq!(d.tile_at(3, 2), Tile::Floor);
        assert_eq!(d.material_at(3, 2), Material::Cobble);
        assert_eq!(d.tile_at(2, 3), Tile::Floor); // void, untouched
        assert_eq!(d.tile_at(3, 3), Tile::Door);
        assert_eq!(d.door_at(3, 3), Some(DoorState::Closed));
    }

    #[test]
    fn test_render_ascii_shape() {
        let mut d = Dungeon::new(4, 3);
        d.carve_h_tunnel(1, 2, 1);
        let art = d.render_ascii();
        assert_eq!(art, "####\n#..#\n####\n");
    }
}
