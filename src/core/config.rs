//! Generation parameters with documented constants
//!
//! All tuning knobs are collected here with notes on their ranges and how
//! they interact. Nonsensical inputs are clamped, never rejected: a bad
//! parameter set produces a plainer dungeon, not an error.

use serde::{Deserialize, Serialize};

/// Inputs to the dungeon generator
///
/// Every numeric field is validated by [`GenParams::sanitize`] before use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenParams {
    /// Grid width in tiles; floors at 8 so a single room plus border fits
    pub width: i32,

    /// Grid height in tiles; same floor as `width`
    pub height: i32,

    /// Number of main-chain rooms to attempt
    ///
    /// Placement exhaustion can leave fewer rooms than requested; the
    /// generator logs the shortfall rather than failing.
    pub room_count: u32,

    /// Inclusive lower bound on room side length (floored at 3, the
    /// smallest rectangle with a one-tile interior)
    pub room_min: i32,

    /// Inclusive upper bound on room side length
    ///
    /// Capped at `min(width, height) - 2` so a maximal room still fits
    /// inside the outer wall ring. Raised to `room_min` when inverted.
    pub room_max: i32,

    /// 0.0 scattered .. 1.0 single straight progression
    ///
    /// >= 0.8 places rooms along the longer axis at even spacing;
    /// 0.4..0.8 biases toward a straight-line progress position;
    /// < 0.4 places rooms anywhere (falling back to the biased regime
    /// when `entropy` is zero).
    pub linearity: f32,

    /// 0.0 no branching .. 1.0 many side rooms off the main chain
    pub entropy: f32,

    /// 0.0 tree-shaped corridors .. 1.0 extra links between nearby rooms
    ///
    /// Only applied when `linearity <= 0.5`; a deliberately straight
    /// layout is left uncontaminated.
    pub complexity: f32,

    /// Seed for the placement RNG; the same seed always reproduces the
    /// same dungeon bit for bit
    pub seed: u64,

    /// Width threshold for the large-room quota
    pub large_room_width: i32,

    /// Height threshold for the large-room quota
    pub large_room_height: i32,

    /// Longest straight advance a single corridor carve may make
    ///
    /// `None` derives `max(width, height)` clamped to 6..=18, which keeps
    /// corridor cost tied to room count rather than grid area.
    pub max_hallway_segment: Option<i32>,
}

impl Default for GenParams {
    fn default() -> Self {
        Self {
            width: 60,
            height: 36,
            room_count: 12,
            room_min: 4,
            room_max: 9,
            linearity: 0.5,
            entropy: 0.5,
            complexity: 0.5,
            seed: 12345,
            large_room_width: 6,
            large_room_height: 4,
            max_hallway_segment: None,
        }
    }
}

impl GenParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clamp every field into its valid range
    ///
    /// Returns the corrected copy; the original is untouched so callers
    /// can still report what they asked for.
    pub fn sanitize(&self) -> GenParams {
        let mut p = self.clone();

        p.width = p.width.max(8);
        p.height = p.height.max(8);
        p.room_count = p.room_count.max(1);
        p.room_min = p.room_min.max(3);

        let size_cap = (p.width.min(p.height) - 2).max(3);
        p.room_max = p.room_max.max(p.room_min).min(size_cap);
        p.room_min = p.room_min.min(p.room_max);

        for v in [&mut p.linearity, &mut p.entropy, &mut p.complexity] {
            if !v.is_finite() {
                *v = 0.0;
            }
            *v = v.clamp(0.0, 1.0);
        }

        p.large_room_width = p.large_room_width.max(1);
        p.large_room_height = p.large_room_height.max(1);
        if let Some(seg) = p.max_hallway_segment {
            p.max_hallway_segment = Some(seg.max(2));
        }

        if p != *self {
            tracing::debug!(?self, "generation parameters clamped");
        }
        p
    }

    /// Effective corridor segment cap, derived unless overridden
    pub fn segment_cap(&self) -> i32 {
        self.max_hallway_segment
            .unwrap_or_else(|| self.width.max(self.height).clamp(6, 18))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_survive_sanitize() {
        let p = GenParams::default();
        assert_eq!(p.sanitize(), p);
    }

    #[test]
    fn test_inverted_size_bounds_are_clamped() {
        let p = GenParams {
            room_min: 9,
            room_max: 4,
            ..GenParams::default()
        };
        let s = p.sanitize();
        assert!(s.room_min <= s.room_max);
        assert_eq!(s.room_min, 9);
    }

    #[test]
    fn test_ratios_clamp_to_unit_interval() {
        let p = GenParams {
            linearity: 3.0,
            entropy: -1.0,
            complexity: f32::NAN,
            ..GenParams::default()
        };
        let s = p.sanitize();
        assert_eq!(s.linearity, 1.0);
        assert_eq!(s.entropy, 0.0);
        assert_eq!(s.complexity, 0.0);
    }

    #[test]
    fn test_tiny_grid_is_raised_to_floor() {
        let p = GenParams {
            width: -5,
            height: 0,
            room_count: 0,
            ..GenParams::default()
        };
        let s = p.sanitize();
        assert_eq!(s.width, 8);
        assert_eq!(s.height, 8);
        assert_eq!(s.room_count, 1);
        assert!(s.room_max <= s.width.min(s.height) - 2);
    }

    #[test]
    fn test_segment_cap_derivation() {
        let p = GenParams {
            width: 40,
            height: 20,
            ..GenParams::default()
        };
        assert_eq!(p.segment_cap(), 18);

        let small = GenParams {
            width: 10,
            height: 8,
            ..GenParams::default()
        };
        assert_eq!(small.segment_cap(), 10);

        let narrow = GenParams {
            width: 8,
            height: 8,
            max_hallway_segment: Some(4),
            ..GenParams::default()
        };
        assert_eq!(narrow.segment_cap(), 4);
    }
}
