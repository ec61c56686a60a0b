//! Corridor routing between room centers
//!
//! Paths are carved as axis-aligned runs. A run never advances more than
//! the configured segment cap in one carve, which bounds corridor sprawl
//! and keeps carving cost linear in room count.

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::core::config::GenParams;
use crate::dungeon::grid::Dungeon;

/// Attempts at picking a nearby room pair for one extra link
const LINK_PICK_ATTEMPTS: usize = 10;

#[derive(Debug, Clone, Copy)]
pub struct CorridorRouter {
    pub max_segment: i32,
}

impl CorridorRouter {
    pub fn new(max_segment: i32) -> Self {
        Self {
            max_segment: max_segment.max(2),
        }
    }

    /// Carve a path joining two room centers
    ///
    /// Near-axis-aligned pairs get a single dominant-axis run (plus the
    /// short residual), otherwise an L whose first leg follows the axis
    /// with the larger displacement; ties go horizontal-first.
    pub fn connect(&self, d: &mut Dungeon, a: (i32, i32), b: (i32, i32)) {
        let dx = (b.0 - a.0).abs();
        let dy = (b.1 - a.1).abs();
        let h_first = if dy <= 3 && dx > 2 * dy {
            true
        } else if dx <= 3 && dy > 2 * dx {
            false
        } else {
            dx >= dy
        };
        if h_first {
            self.run_h(d, a.0, b.0, a.1);
            self.run_v(d, a.1, b.1, b.0);
        } else {
            self.run_v(d, a.1, b.1, a.0);
            self.run_h(d, a.0, b.0, b.1);
        }
    }

    /// Horizontal run from `x1` to `x2`, split into capped carves
    fn run_h(&self, d: &mut Dungeon, x1: i32, x2: i32, y: i32) {
        for (from, to) in spans(x1, x2, self.max_segment) {
            d.carve_h_tunnel(from, to, y);
        }
    }

    /// Vertical run from `y1` to `y2`, split into capped carves
    fn run_v(&self, d: &mut Dungeon, y1: i32, y2: i32, x: i32) {
        for (from, to) in spans(y1, y2, self.max_segment) {
            d.carve_v_tunnel(from, to, x);
        }
    }

    /// Extra links between nearby room pairs, controlled by `complexity`
    ///
    /// Skipped entirely for straight layouts (`linearity > 0.5`). Pair
    /// picking is bounded; a link with no nearby pair is dropped.
    pub fn add_complexity_links(
        &self,
        d: &mut Dungeon,
        params: &GenParams,
        rng: &mut ChaCha8Rng,
    ) {
        if params.linearity > 0.5 || d.rooms.len() < 2 {
            return;
        }
        let links = (params.complexity * (d.rooms.len() - 1) as f32).round() as i32;
        let mut carved = 0;
        for _ in 0..links {
            for _ in 0..LINK_PICK_ATTEMPTS {
                let i = rng.gen_range(0..d.rooms.len());
                let j = rng.gen_range(0..d.rooms.len());
                if i == j {
                    continue;
                }
                let a = d.rooms[i].center();
                let b = d.rooms[j].center();
                if (a.0 - b.0).abs() + (a.1 - b.1).abs() > self.max_segment {
                    continue;
                }
                self.connect(d, a, b);
                carved += 1;
                break;
            }
        }
        if links > 0 {
            tracing::debug!(requested = links, carved, "complexity links");
        }
    }
}

/// Sub-runs covering `from..=to`, none advancing more than `cap`
fn spans(from: i32, to: i32, cap: i32) -> Vec<(i32, i32)> {
    let step = if to >= from { 1 } else { -1 };
    let mut out = Vec::new();
    let mut cur = from;
    while cur != to {
        let advance = (to - cur).abs().min(cap);
        out.push((cur, cur + step * advance));
        cur += step * advance;
    }
    out
}
