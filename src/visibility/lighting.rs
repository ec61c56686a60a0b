//! Light sources and multi-source composition
//!
//! Each source contributes brightness inside its own radius; geometry
//! occlusion is shared by casting every source against the largest radius
//! in play. The composed field keeps, per tile, the strongest contribution
//! and which source produced it, which is exactly what a renderer needs
//! for directional wall shading.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::dungeon::grid::Dungeon;
use crate::visibility::shadowcast::field_of_view;

/// Distance under which a source always delivers its full intensity
const FULL_INTENSITY_RANGE: f32 = 0.5;

/// Brightness falloff shape over distance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Falloff {
    Quadratic,
    Linear,
}

/// One light: an origin, a reach, and a falloff curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LightSource {
    pub x: i32,
    pub y: i32,
    pub radius: i32,
    /// Peak brightness in (0, 1]
    pub intensity: f32,
    pub falloff: Falloff,
}

impl LightSource {
    /// Brightness this source alone delivers at `(x, y)`, ignoring walls
    pub fn brightness_at(&self, x: i32, y: i32) -> f32 {
        let dx = (x - self.x) as f32;
        let dy = (y - self.y) as f32;
        let distance = (dx * dx + dy * dy).sqrt();
        if distance <= FULL_INTENSITY_RANGE {
            return self.intensity;
        }
        if self.radius <= 0 {
            return 0.0;
        }
        let reach = self.radius as f32;
        let fade = match self.falloff {
            Falloff::Quadratic => (1.0 - (distance / reach) * (distance / reach)).max(0.0),
            Falloff::Linear => (1.0 - distance / reach).max(0.0),
        };
        self.intensity * fade
    }
}

/// Strongest contribution at one tile
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LitTile {
    pub brightness: f32,
    /// Index into the source slice passed to [`illuminate`]
    pub source: usize,
}

/// Composed result of all active sources
#[derive(Debug, Clone, Default)]
pub struct LightField {
    lit: AHashMap<(i32, i32), LitTile>,
}

impl LightField {
    /// A tile is visible when some source reaches it with nonzero
    /// brightness through open geometry
    pub fn is_visible(&self, x: i32, y: i32) -> bool {
        self.lit.contains_key(&(x, y))
    }

    pub fn brightness_at(&self, x: i32, y: i32) -> f32 {
        self.lit.get(&(x, y)).map_or(0.0, |t| t.brightness)
    }

    /// Which source dominates the tile, if any reaches it
    pub fn dominant_source(&self, x: i32, y: i32) -> Option<usize> {
        self.lit.get(&(x, y)).map(|t| t.source)
    }

    pub fn visible_tiles(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.lit.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.lit.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lit.is_empty()
    }
}

/// Compose every source's shadow-cast and falloff into one field
pub fn illuminate(grid: &Dungeon, sources: &[LightSource]) -> LightField {
    let mut lit: AHashMap<(i32, i32), LitTile> = AHashMap::new();
    // occlusion is cast once per source against the longest reach in play
    let extended_radius = sources.iter().map(|s| s.radius).max().unwrap_or(0);

    for (index, source) in sources.iter().enumerate() {
        let seen = field_of_view(grid, (source.x, source.y), extended_radius);
        let radius_sq = source.radius.max(0).pow(2);
        for &(x, y) in &seen {
            let dx = x - source.x;
            let dy = y - source.y;
            if dx * dx + dy * dy > radius_sq {
                continue;
            }
            let brightness = source.brightness_at(x, y);
            if brightness <= 0.0 {
                continue;
            }
            let tile = LitTile { brightness, source: index };
            lit.entry((x, y))
                .and_modify(|cur| {
                    if brightness > cur.brightness {
                        *cur = tile;
                    }
                })
                .or_insert(tile);
        }
    }
    LightField { lit }
}
