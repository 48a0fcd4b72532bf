//! Brick grid generation
//!
//! A level is a pure function of the world size: same size, same grid.

use glam::Vec2;

use super::rect::Rect;
use super::state::{Brick, World};
use crate::tuning::LayoutTuning;

/// Hit points for a row, counted from the top. Upper rows are tougher.
pub fn row_hit_points(row: u32, rows: u32) -> u32 {
    let from_bottom = rows.saturating_sub(1).saturating_sub(row);
    (1 + from_bottom / 2).max(1)
}

/// Brick width that fits `cols` bricks between the side margins
pub fn brick_width(world_width: f32, layout: &LayoutTuning) -> f32 {
    let cols = layout.cols.max(1) as f32;
    let usable = world_width - 2.0 * layout.side_margin - layout.spacing * (cols - 1.0);
    (usable / cols).max(layout.min_brick_width)
}

/// Generate a full grid, row-major from the top-left brick
pub fn generate_bricks(world: World, layout: &LayoutTuning) -> Vec<Brick> {
    let width = brick_width(world.width, layout);
    let height = layout.brick_height;
    let mut bricks = Vec::with_capacity(layout.brick_count());

    for row in 0..layout.rows {
        let hit_points = row_hit_points(row, layout.rows);
        let y = layout.top_margin + row as f32 * (height + layout.spacing);
        for col in 0..layout.cols {
            let x = layout.side_margin + col as f32 * (width + layout.spacing);
            let min = Vec2::new(x, y);
            bricks.push(Brick {
                rect: Rect::new(min, min + Vec2::new(width, height)),
                hit_points,
                score_value: layout.score_per_hit_point * hit_points as u64,
            });
        }
    }

    log::debug!(
        "Generated {}x{} grid, brick {:.1}x{:.1} for world {}x{}",
        layout.rows,
        layout.cols,
        width,
        height,
        world.width,
        world.height
    );
    bricks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_size() {
        let bricks = generate_bricks(World::new(400.0, 800.0), &LayoutTuning::default());
        assert_eq!(bricks.len(), 48);
        assert!(bricks.iter().all(Brick::is_alive));
    }

    #[test]
    fn test_row_hit_points() {
        let hp: Vec<u32> = (0..6).map(|r| row_hit_points(r, 6)).collect();
        assert_eq!(hp, vec![3, 3, 2, 2, 1, 1]);
    }

    #[test]
    fn test_score_follows_hit_points() {
        let bricks = generate_bricks(World::new(400.0, 800.0), &LayoutTuning::default());
        assert_eq!(bricks[0].score_value, 150);
        assert_eq!(bricks[47].hit_points, 1);
        assert_eq!(bricks[47].score_value, 50);
    }

    #[test]
    fn test_brick_geometry() {
        let layout = LayoutTuning::default();
        let bricks = generate_bricks(World::new(400.0, 800.0), &layout);
        // (400 - 32 - 42) / 8 = 40.75
        let w = bricks[0].rect.width();
        assert!((w - 40.75).abs() < 1e-4);
        assert_eq!(bricks[0].rect.min, Vec2::new(16.0, 90.0));
        // Second column starts one width plus spacing later
        assert!((bricks[1].rect.min.x - (16.0 + 40.75 + 6.0)).abs() < 1e-4);
        // Second row starts one height plus spacing lower
        assert!((bricks[8].rect.min.y - (90.0 + 22.0 + 6.0)).abs() < 1e-4);
    }

    #[test]
    fn test_narrow_world_uses_min_width() {
        let bricks = generate_bricks(World::new(200.0, 400.0), &LayoutTuning::default());
        assert!((bricks[0].rect.width() - 40.0).abs() < 1e-4);
    }

    #[test]
    fn test_layout_is_deterministic() {
        let layout = LayoutTuning::default();
        let a = generate_bricks(World::new(375.0, 667.0), &layout);
        let b = generate_bricks(World::new(375.0, 667.0), &layout);
        assert_eq!(a, b);
    }
}
