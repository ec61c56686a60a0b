//! Recursive symmetric shadow-casting
//!
//! The plane around the origin splits into eight octants, each scanned
//! row by row outward. Wall tiles open a shadow whose near and far slopes
//! are tracked per row; the lit wedge before a wall recurses on its own.

use ahash::AHashSet;

use crate::dungeon::grid::Dungeon;

/// Octant transforms `(xx, xy, yx, yy)` mapping scan-local coordinates
/// into world offsets
const OCTANTS: [(i32, i32, i32, i32); 8] = [
    (1, 0, 0, 1),
    (0, 1, 1, 0),
    (0, -1, 1, 0),
    (-1, 0, 0, 1),
    (-1, 0, 0, -1),
    (0, -1, -1, 0),
    (0, 1, -1, 0),
    (1, 0, 0, -1),
];

/// Tiles with an unobstructed line to `origin` within `radius`
///
/// The origin itself is always included. An out-of-range origin sees
/// nothing and a non-positive radius sees only the origin; neither is an
/// error, there is simply nothing else to see.
pub fn field_of_view(grid: &Dungeon, origin: (i32, i32), radius: i32) -> AHashSet<(i32, i32)> {
    let mut visible = AHashSet::new();
    if !grid.in_bounds(origin.0, origin.1) {
        return visible;
    }
    visible.insert(origin);
    if radius <= 0 {
        return visible;
    }
    for &transform in &OCTANTS {
        cast_octant(grid, origin, 1, 1.0, 0.0, radius, transform, &mut visible);
    }
    visible
}

#[allow(clippy::too_many_arguments)]
fn cast_octant(
    grid: &Dungeon,
    origin: (i32, i32),
    row: i32,
    mut start: f32,
    end: f32,
    radius: i32,
    transform: (i32, i32, i32, i32),
    visible: &mut AHashSet<(i32, i32)>,
) {
    if start < end {
        return;
    }
    let (xx, xy, yx, yy) = transform;
    let radius_sq = radius * radius;
    let mut new_start = 0.0_f32;

    for dist in row..=radius {
        let dy = -dist;
        let mut blocked = false;
        for dx in -dist..=0 {
            let left_slope = (dx as f32 - 0.5) / (dy as f32 + 0.5);
            let right_slope = (dx as f32 + 0.5) / (dy as f32 - 0.5);
            if start < right_slope {
                continue;
            }
            if end > left_slope {
                break;
            }

            let x = origin.0 + dx * xx + dy * xy;
            let y = origin.1 + dx * yx + dy * yy;
            if dx * dx + dy * dy <= radius_sq && grid.in_bounds(x, y) {
                visible.insert((x, y));
            }

            if blocked {
                if grid.is_wall(x, y) {
                    new_start = right_slope;
                } else {
                    blocked = false;
                    start = new_start;
                }
            } else if grid.is_wall(x, y) && dist < radius {
                // shadow begins: finish the lit wedge before it, then
                // carry the shadow's far edge through this row
                blocked = true;
                cast_octant(
                    grid, origin, dist + 1, start, left_slope, radius, transform, visible,
                );
                new_start = right_slope;
            }
        }
        if blocked {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Rect;

    fn open_arena(side: i32) -> Dungeon {
        let mut d = Dungeon::new(side, side);
        d.carve_room(&Rect::new(0, 0, side, side));
        d
    }

    #[test]
    fn test_origin_is_always_visible() {
        let d = open_arena(21);
        let seen = field_of_view(&d, (10, 10), 5);
        assert!(seen.contains(&(10, 10)));
    }

    #[test]
    fn test_out_of_range_origin_sees_nothing() {
        let d = open_arena(11);
        assert!(field_of_view(&d, (-1, 5), 5).is_empty());
        assert!(field_of_view(&d, (5, 99), 5).is_empty());
    }

    #[test]
    fn test_non_positive_radius_sees_only_origin() {
        let d = open_arena(11);
        let seen = field_of_view(&d, (5, 5), 0);
        assert_eq!(seen.len(), 1);
        assert!(seen.contains(&(5, 5)));
        assert_eq!(field_of_view(&d, (5, 5), -3).len(), 1);
    }

    #[test]
    fn test_open_ground_is_a_euclidean_disc() {
        let d = open_arena(31);
        let (ox, oy, r) = (15, 15, 6);
        let seen = field_of_view(&d, (ox, oy), r);
        for x in 0..31 {
            for y in 0..31 {
                let inside = (x - ox).pow(2) + (y - oy).pow(2) <= r * r;
                assert_eq!(seen.contains(&(x, y)), inside, "tile ({x}, {y})");
            }
        }
    }

    #[test]
    fn test_pillar_blocks_tiles_behind_it() {
        use crate::core::types::{Material, Tile};
        let mut d = open_arena(21);
        // single pillar two tiles east of the origin
        let (ox, oy) = (10, 10);
        d.set_cell(ox + 2, oy, Tile::Wall, Material::Brick);
        let seen = field_of_view(&d, (ox, oy), 6);
        assert!(seen.contains(&(ox + 2, oy))); // the wall itself is lit
        assert!(!seen.contains(&(ox + 3, oy)));
        assert!(!seen.contains(&(ox + 4, oy)));
        // tiles beside the shadow stay visible
        assert!(seen.contains(&(ox + 3, oy + 2)));
        assert!(seen.contains(&(ox + 3, oy - 2)));
    }

    #[test]
    fn test_same_inputs_same_result() {
        let d = open_arena(25);
        let a = field_of_view(&d, (12, 12), 7);
        let b = field_of_view(&d, (12, 12), 7);
        assert_eq!(a, b);
    }
}
