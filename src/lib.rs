//! Brick Breaker - deterministic simulation core for a paddle-and-ball game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, game state)
//! - `game`: Frame driver (fixed-step accumulator, commands, deferred relaunch)
//! - `tuning`: Data-driven game balance

pub mod game;
pub mod sim;
pub mod tuning;

pub use game::{Command, FrameClock, Game, Snapshot};
pub use tuning::{LayoutTuning, Tuning};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    use std::f32::consts::PI;

    /// Fixed simulation timestep (240 Hz)
    pub const SIM_DT: f32 = 1.0 / 240.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame delta accepted from the platform (seconds)
    pub const MAX_FRAME_DELTA: f32 = 0.5;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 10.0;
    /// Floor for the world-derived ball speed
    pub const BALL_MIN_SPEED: f32 = 140.0;
    /// Ball speed as a fraction of world height
    pub const BALL_SPEED_HEIGHT_FACTOR: f32 = 0.6;
    /// Extra gap between ball edge and the world walls
    pub const WALL_PADDING: f32 = 2.0;

    /// Paddle defaults
    pub const PADDLE_WIDTH_FRACTION: f32 = 0.35;
    pub const PADDLE_MIN_WIDTH: f32 = 90.0;
    pub const PADDLE_MAX_WIDTH: f32 = 160.0;
    pub const PADDLE_HEIGHT: f32 = 14.0;
    /// Distance from the world bottom to the paddle center
    pub const PADDLE_BOTTOM_OFFSET: f32 = 56.0;
    /// Lateral velocity added per unit of off-center paddle hit
    pub const PADDLE_TANGENT_BOOST: f32 = 0.35;

    /// Push-out padding applied on top of the ball radius
    pub const PUSH_OUT_PADDING: f32 = 0.5;
    /// Extra separation so the next tick starts clear of the surface
    pub const SEPARATION: f32 = 0.75;

    /// Direction bounds, measured from the +x axis
    pub const MIN_ANGLE: f32 = 0.08 * PI;
    pub const MAX_ANGLE: f32 = 0.92 * PI;

    /// Serve direction (fractions of π)
    pub const SERVE_BASE_ANGLE: f32 = 1.2 * PI;
    pub const SERVE_SPREAD: f32 = 0.15 * PI;
    /// Delay before a parked ball relaunches after a lost life (seconds)
    pub const RELAUNCH_DELAY: f32 = 0.7;
    pub const STARTING_LIVES: u8 = 3;

    /// Brick grid defaults
    pub const BRICK_ROWS: u32 = 6;
    pub const BRICK_COLS: u32 = 8;
    /// Upper bound on rows and columns accepted from tuning files
    pub const BRICK_MAX_GRID: u32 = 64;
    pub const BRICK_SIDE_MARGIN: f32 = 16.0;
    pub const BRICK_TOP_MARGIN: f32 = 90.0;
    pub const BRICK_SPACING: f32 = 6.0;
    pub const BRICK_MIN_WIDTH: f32 = 40.0;
    pub const BRICK_HEIGHT: f32 = 22.0;
    pub const SCORE_PER_HIT_POINT: u64 = 50;
}

/// Smallest magnitude used as a divisor when normalizing
const MIN_MAGNITUDE: f32 = 1e-6;

/// Unit vector in the direction of `v`
///
/// Near-zero vectors divide by `1e-6` instead of their length, so the result
/// shrinks toward zero rather than turning into NaN.
#[inline]
pub fn normalize(v: Vec2) -> Vec2 {
    v / v.length().max(MIN_MAGNITUDE)
}

/// `v` rescaled to length `magnitude`
#[inline]
pub fn set_magnitude(v: Vec2, magnitude: f32) -> Vec2 {
    normalize(v) * magnitude
}

/// Fold an angle into [0, π] (mirroring across π), then clamp it into
/// [MIN_ANGLE, MAX_ANGLE]. Used for serve directions.
pub fn clamp_angle(angle: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    let mut a = angle.rem_euclid(TAU);
    if a > PI {
        a = TAU - a;
    }
    a.clamp(consts::MIN_ANGLE, consts::MAX_ANGLE)
}

/// Keep `v`'s length but bend its direction so the absolute angle from +x
/// lies in [MIN_ANGLE, MAX_ANGLE]. The vertical sign is preserved.
pub fn clamp_direction(v: Vec2) -> Vec2 {
    let magnitude = v.length();
    if magnitude < MIN_MAGNITUDE {
        return v;
    }
    let angle = v.y.atan2(v.x);
    let sign = if angle < 0.0 { -1.0 } else { 1.0 };
    let clamped = angle.abs().clamp(consts::MIN_ANGLE, consts::MAX_ANGLE) * sign;
    Vec2::new(clamped.cos(), clamped.sin()) * magnitude
}

/// Unit direction for an angle in screen space (y grows downward)
///
/// Angles from `clamp_angle` live in [0, π], so the result always points up.
#[inline]
pub fn upward_direction(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), -angle.sin())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_normalize_unit_length() {
        let n = normalize(Vec2::new(3.0, 4.0));
        assert!((n.length() - 1.0).abs() < 1e-6);
        assert!((n.x - 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_normalize_zero_vector_is_finite() {
        let n = normalize(Vec2::ZERO);
        assert!(n.x.is_finite() && n.y.is_finite());
        assert_eq!(n, Vec2::ZERO);
    }

    #[test]
    fn test_set_magnitude() {
        let v = set_magnitude(Vec2::new(-2.0, 0.5), 300.0);
        assert!((v.length() - 300.0).abs() < 1e-3);
        assert!(v.x < 0.0 && v.y > 0.0);
    }

    #[test]
    fn test_clamp_angle_folds_and_clamps() {
        // 1.2π mirrors to 0.8π
        assert!((clamp_angle(1.2 * PI) - 0.8 * PI).abs() < 1e-5);
        // Near-horizontal gets pushed to the bounds
        assert!((clamp_angle(0.01) - consts::MIN_ANGLE).abs() < 1e-6);
        assert!((clamp_angle(PI) - consts::MAX_ANGLE).abs() < 1e-6);
        // Negative angles fold too
        assert!((clamp_angle(-0.5 * PI) - 0.5 * PI).abs() < 1e-5);
    }

    #[test]
    fn test_clamp_direction_preserves_length_and_sign() {
        let v = Vec2::new(500.0, -1.0); // nearly horizontal, moving up
        let c = clamp_direction(v);
        assert!((c.length() - v.length()).abs() < 1e-2);
        assert!(c.y < 0.0);
        let angle = c.y.atan2(c.x).abs();
        assert!((angle - consts::MIN_ANGLE).abs() < 1e-4);
    }

    #[test]
    fn test_clamp_direction_leaves_valid_vectors_alone() {
        let v = Vec2::new(100.0, 200.0);
        let c = clamp_direction(v);
        assert!((c - v).length() < 1e-3);
    }

    #[test]
    fn test_clamp_direction_near_left_horizontal() {
        let c = clamp_direction(Vec2::new(-400.0, 0.5));
        let angle = c.y.atan2(c.x);
        assert!(angle > 0.0);
        assert!((angle - consts::MAX_ANGLE).abs() < 1e-4);
    }

    #[test]
    fn test_upward_direction() {
        let d = upward_direction(0.5 * PI);
        assert!(d.x.abs() < 1e-6);
        assert!((d.y + 1.0).abs() < 1e-6);
    }
}
