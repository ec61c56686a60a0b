//! Shared tile, material, and geometry types

use serde::{Deserialize, Serialize};

/// Passability class of a single grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tile {
    Floor,
    Wall,
    Door,
}

impl Default for Tile {
    fn default() -> Self {
        Self::Wall
    }
}

/// Cosmetic surface kind, independent of passability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Material {
    Brick,
    Cobble,
    Marble,
    Iron,
    Wood,
    Moss,
    Slate,
    Granite,
    Sand,
    Gravel,
    Obsidian,
    Bone,
}

impl Default for Material {
    fn default() -> Self {
        Self::Brick
    }
}

impl Material {
    /// Usual surface for a freshly written tile of the given kind
    pub fn default_for(tile: Tile) -> Self {
        match tile {
            Tile::Wall => Self::Brick,
            Tile::Floor => Self::Cobble,
            Tile::Door => Self::Wood,
        }
    }
}

/// State of a door tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DoorState {
    Closed,
    Open,
    Locked,
}

/// Axis-aligned room rectangle
///
/// Occupies tile columns `x1..=x2-1` and rows `y1..=y2-1`; the outermost
/// ring is the room's wall border and the interior starts one tile in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self {
            x1: x,
            y1: y,
            x2: x + w,
            y2: y + h,
        }
    }

    pub fn width(&self) -> i32 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> i32 {
        self.y2 - self.y1
    }

    /// Integer midpoint; inside the interior for any side length >= 3
    pub fn center(&self) -> (i32, i32) {
        ((self.x1 + self.x2) / 2, (self.y1 + self.y2) / 2)
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.x1 < other.x2 && self.x2 > other.x1 && self.y1 < other.y2 && self.y2 > other.y1
    }

    /// Rectangle grown by `margin` tiles on every side
    pub fn expand(&self, margin: i32) -> Rect {
        Rect {
            x1: self.x1 - margin,
            y1: self.y1 - margin,
            x2: self.x2 + margin,
            y2: self.y2 + margin,
        }
    }

    /// True when `(x, y)` lies strictly inside the wall border
    pub fn interior_contains(&self, x: i32, y: i32) -> bool {
        x > self.x1 && x < self.x2 - 1 && y > self.y1 && y < self.y2 - 1
    }

    pub fn is_large(&self, min_w: i32, min_h: i32) -> bool {
        self.width() >= min_w && self.height() >= min_h
    }
}
