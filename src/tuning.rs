//! Data-driven game balance
//!
//! Every number the simulation consults lives here so a level designer can
//! override it from JSON. Defaults mirror `crate::consts`.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Brick grid parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutTuning {
    pub rows: u32,
    pub cols: u32,
    pub side_margin: f32,
    pub top_margin: f32,
    pub spacing: f32,
    pub min_brick_width: f32,
    pub brick_height: f32,
    /// Score awarded per starting hit point when a brick dies
    pub score_per_hit_point: u64,
}

impl Default for LayoutTuning {
    fn default() -> Self {
        Self {
            rows: BRICK_ROWS,
            cols: BRICK_COLS,
            side_margin: BRICK_SIDE_MARGIN,
            top_margin: BRICK_TOP_MARGIN,
            spacing: BRICK_SPACING,
            min_brick_width: BRICK_MIN_WIDTH,
            brick_height: BRICK_HEIGHT,
            score_per_hit_point: SCORE_PER_HIT_POINT,
        }
    }
}

impl LayoutTuning {
    /// Total bricks in a freshly generated level
    pub fn brick_count(&self) -> usize {
        (self.rows as usize).saturating_mul(self.cols as usize)
    }
}

/// Game balance parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Timing ===
    /// Fixed physics timestep (seconds)
    pub physics_dt: f32,
    /// Cap on catch-up ticks per rendered frame
    pub max_ticks_per_frame: u32,
    /// Frame deltas above this are clamped (seconds)
    pub max_frame_delta: f32,

    // === Ball ===
    pub ball_radius: f32,
    pub min_ball_speed: f32,
    pub speed_height_factor: f32,
    pub wall_padding: f32,

    // === Paddle ===
    pub paddle_width_fraction: f32,
    pub paddle_min_width: f32,
    pub paddle_max_width: f32,
    pub paddle_height: f32,
    pub paddle_bottom_offset: f32,
    pub tangent_boost: f32,

    // === Collision response ===
    pub push_out_padding: f32,
    pub separation: f32,

    // === Rules ===
    /// Serve angle before spread and clamping (radians)
    pub serve_base_angle: f32,
    /// Half-width of the random serve spread (radians)
    pub serve_spread: f32,
    /// Delay before auto-relaunch after a lost life (seconds)
    pub relaunch_delay: f32,
    pub starting_lives: u8,

    pub layout: LayoutTuning,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            physics_dt: SIM_DT,
            max_ticks_per_frame: MAX_SUBSTEPS,
            max_frame_delta: MAX_FRAME_DELTA,

            ball_radius: BALL_RADIUS,
            min_ball_speed: BALL_MIN_SPEED,
            speed_height_factor: BALL_SPEED_HEIGHT_FACTOR,
            wall_padding: WALL_PADDING,

            paddle_width_fraction: PADDLE_WIDTH_FRACTION,
            paddle_min_width: PADDLE_MIN_WIDTH,
            paddle_max_width: PADDLE_MAX_WIDTH,
            paddle_height: PADDLE_HEIGHT,
            paddle_bottom_offset: PADDLE_BOTTOM_OFFSET,
            tangent_boost: PADDLE_TANGENT_BOOST,

            push_out_padding: PUSH_OUT_PADDING,
            separation: SEPARATION,

            serve_base_angle: SERVE_BASE_ANGLE,
            serve_spread: SERVE_SPREAD,
            relaunch_delay: RELAUNCH_DELAY,
            starting_lives: STARTING_LIVES,

            layout: LayoutTuning::default(),
        }
    }
}

impl Tuning {
    /// Ball speed for a world of the given height
    pub fn constant_speed(&self, world_height: f32) -> f32 {
        self.min_ball_speed.max(world_height * self.speed_height_factor)
    }

    /// Paddle width for a world of the given width
    pub fn paddle_width(&self, world_width: f32) -> f32 {
        (world_width * self.paddle_width_fraction).clamp(self.paddle_min_width, self.paddle_max_width)
    }

    /// Distance from a wall at which the ball center is stopped
    pub fn wall_margin(&self) -> f32 {
        self.ball_radius + self.wall_padding
    }

    /// Parse tuning from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Self>(json).map(Self::sanitized)
    }

    /// Serialize tuning to pretty JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load tuning from a JSON file, falling back to defaults on any failure
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(tuning) => {
                    log::info!("Loaded tuning from {}", path.display());
                    tuning
                }
                Err(e) => {
                    log::warn!("Invalid tuning in {}: {} - using defaults", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Could not read {}: {} - using defaults", path.display(), e);
                Self::default()
            }
        }
    }

    /// Replace values the simulation cannot run with
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();

        if !(self.physics_dt.is_finite() && self.physics_dt > 0.0) {
            log::warn!("physics_dt {} rejected, using {}", self.physics_dt, defaults.physics_dt);
            self.physics_dt = defaults.physics_dt;
        }
        if self.max_ticks_per_frame == 0 {
            log::warn!("max_ticks_per_frame must be at least 1");
            self.max_ticks_per_frame = 1;
        }
        if !(self.max_frame_delta.is_finite() && self.max_frame_delta >= self.physics_dt) {
            log::warn!("max_frame_delta {} rejected", self.max_frame_delta);
            self.max_frame_delta = defaults.max_frame_delta.max(self.physics_dt);
        }
        if !(self.ball_radius.is_finite() && self.ball_radius > 0.0) {
            log::warn!("ball_radius {} rejected", self.ball_radius);
            self.ball_radius = defaults.ball_radius;
        }
        if !(self.min_ball_speed.is_finite() && self.min_ball_speed > 0.0) {
            log::warn!("min_ball_speed {} rejected", self.min_ball_speed);
            self.min_ball_speed = defaults.min_ball_speed;
        }
        if self.paddle_min_width > self.paddle_max_width {
            log::warn!(
                "paddle_min_width {} exceeds paddle_max_width {}, swapping",
                self.paddle_min_width,
                self.paddle_max_width
            );
            std::mem::swap(&mut self.paddle_min_width, &mut self.paddle_max_width);
        }
        if self.starting_lives == 0 {
            log::warn!("starting_lives must be at least 1");
            self.starting_lives = 1;
        }
        if self.layout.rows == 0 || self.layout.cols == 0 {
            log::warn!(
                "Brick grid {}x{} is empty, using {}x{}",
                self.layout.rows,
                self.layout.cols,
                defaults.layout.rows,
                defaults.layout.cols
            );
            self.layout.rows = defaults.layout.rows;
            self.layout.cols = defaults.layout.cols;
        }
        if self.layout.rows > BRICK_MAX_GRID || self.layout.cols > BRICK_MAX_GRID {
            log::warn!(
                "Brick grid {}x{} too large, capping at {}",
                self.layout.rows,
                self.layout.cols,
                BRICK_MAX_GRID
            );
            self.layout.rows = self.layout.rows.min(BRICK_MAX_GRID);
            self.layout.cols = self.layout.cols.min(BRICK_MAX_GRID);
        }
        if !(self.paddle_height.is_finite() && self.paddle_height > 0.0) {
            log::warn!("paddle_height {} rejected", self.paddle_height);
            self.paddle_height = defaults.paddle_height;
        }
        if !(self.relaunch_delay.is_finite() && self.relaunch_delay >= 0.0) {
            log::warn!("relaunch_delay {} rejected, using 0", self.relaunch_delay);
            self.relaunch_delay = 0.0;
        }
        if !(self.push_out_padding.is_finite() && self.push_out_padding >= 0.0) {
            log::warn!("push_out_padding {} rejected, using 0", self.push_out_padding);
            self.push_out_padding = 0.0;
        }
        if !(self.separation.is_finite() && self.separation >= 0.0) {
            log::warn!("separation {} rejected, using 0", self.separation);
            self.separation = 0.0;
        }

        self
    }
}
