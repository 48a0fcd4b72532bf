//! Game state and core simulation types
//!
//! All state the simulation mutates lives in `GameState`. It is owned by a
//! single driver and changed only through its methods and `tick`.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::events::{EventSink, GameEvent};
use super::layout::generate_bricks;
use super::rect::Rect;
use crate::tuning::Tuning;
use crate::{clamp_angle, set_magnitude, upward_direction};

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    /// Ball parked on the paddle, waiting for launch
    Ready,
    /// Active gameplay
    Running,
    /// Game is paused
    Paused,
    /// All bricks destroyed
    Won,
    /// No lives left
    Lost,
}

/// Playfield bounds (origin top-left, y grows down)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct World {
    pub width: f32,
    pub height: f32,
}

impl World {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

/// The player's paddle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paddle {
    pub center: Vec2,
    pub width: f32,
    pub height: f32,
}

impl Paddle {
    /// Paddle centered horizontally, sized for the world
    pub fn for_world(world: World, tuning: &Tuning) -> Self {
        let mut paddle = Self {
            center: Vec2::new(world.width / 2.0, 0.0),
            width: 0.0,
            height: tuning.paddle_height,
        };
        paddle.fit_to_world(world, tuning);
        paddle
    }

    /// Recompute width and resting height for a (possibly new) world
    pub fn fit_to_world(&mut self, world: World, tuning: &Tuning) {
        self.width = tuning.paddle_width(world.width);
        self.height = tuning.paddle_height;
        self.center.y = world.height - tuning.paddle_bottom_offset;
        self.move_to(self.center.x, world);
    }

    /// Move horizontally, keeping the whole paddle inside the world
    pub fn move_to(&mut self, x: f32, world: World) {
        let half = self.width / 2.0;
        let x = if x.is_finite() {
            x
        } else if self.center.x.is_finite() {
            self.center.x
        } else {
            world.width / 2.0
        };
        // Worlds narrower than the paddle pin it to the middle
        self.center.x = if world.width <= self.width {
            world.width / 2.0
        } else {
            x.clamp(half, world.width - half)
        };
    }

    pub fn rect(&self) -> Rect {
        Rect::from_center(self.center, Vec2::new(self.width, self.height))
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.center.y - self.height / 2.0
    }
}

/// The ball
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub center: Vec2,
    pub velocity: Vec2,
    pub radius: f32,
}

impl Ball {
    pub fn new(radius: f32) -> Self {
        Self {
            center: Vec2::ZERO,
            velocity: Vec2::ZERO,
            radius,
        }
    }

    /// Rest the ball on top of the paddle, motionless
    pub fn park_on(&mut self, paddle: &Paddle) {
        self.center = Vec2::new(paddle.center.x, paddle.top() - self.radius - 1.0);
        self.velocity = Vec2::ZERO;
    }
}

/// A brick in the level grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Brick {
    pub rect: Rect,
    pub hit_points: u32,
    pub score_value: u64,
}

impl Brick {
    #[inline]
    pub fn is_alive(&self) -> bool {
        self.hit_points > 0
    }
}

/// A relaunch scheduled after a lost life
///
/// Only honored if no status change happened since it was scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PendingRelaunch {
    /// Game clock time at which it fires (seconds)
    pub due: f32,
    /// Status generation at scheduling time
    pub generation: u64,
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Serve RNG
    rng: Pcg32,
    pub tuning: Tuning,
    pub world: World,
    /// Ball speed while running, derived from world height
    pub constant_speed: f32,
    status: GameStatus,
    /// Bumped on every status change; invalidates pending relaunches
    generation: u64,
    pub score: u64,
    pub lives: u8,
    pub paddle: Paddle,
    pub ball: Ball,
    /// Fixed-size grid; dead bricks stay in place
    pub bricks: Vec<Brick>,
    /// Game clock (seconds), advanced while not paused
    pub clock: f32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub pending_relaunch: Option<PendingRelaunch>,
}

impl GameState {
    /// Create a new game in the ready state
    pub fn new(seed: u64, world: World, tuning: Tuning) -> Self {
        let paddle = Paddle::for_world(world, &tuning);
        let mut ball = Ball::new(tuning.ball_radius);
        ball.park_on(&paddle);
        let bricks = generate_bricks(world, &tuning.layout);
        log::info!(
            "New game: seed={}, world={}x{}, {} bricks",
            seed,
            world.width,
            world.height,
            bricks.len()
        );

        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            constant_speed: tuning.constant_speed(world.height),
            world,
            status: GameStatus::Ready,
            generation: 0,
            score: 0,
            lives: tuning.starting_lives,
            paddle,
            ball,
            bricks,
            clock: 0.0,
            time_ticks: 0,
            pending_relaunch: None,
            tuning,
        }
    }

    #[inline]
    pub fn status(&self) -> GameStatus {
        self.status
    }

    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Change status; every change invalidates pending relaunches
    pub fn set_status(&mut self, status: GameStatus) {
        if self.status != status {
            log::info!("Status {:?} -> {:?}", self.status, status);
        }
        self.status = status;
        self.generation += 1;
    }

    pub fn alive_bricks(&self) -> usize {
        self.bricks.iter().filter(|b| b.is_alive()).count()
    }

    /// Serve the parked ball. No-op unless ready.
    pub fn launch(&mut self, events: &mut impl EventSink) {
        if self.status != GameStatus::Ready {
            log::debug!("Launch ignored in {:?}", self.status);
            return;
        }
        let spread = self.tuning.serve_spread;
        let offset = if spread > 0.0 {
            self.rng.random_range(-spread..=spread)
        } else {
            0.0
        };
        let angle = clamp_angle(self.tuning.serve_base_angle + offset);
        self.ball.park_on(&self.paddle);
        self.ball.velocity = upward_direction(angle) * self.constant_speed;
        self.pending_relaunch = None;
        self.set_status(GameStatus::Running);
        events.emit(GameEvent::Launch);
    }

    /// Handle the ball crossing the bottom edge
    pub fn lose_life(&mut self, events: &mut impl EventSink) {
        self.lives = self.lives.saturating_sub(1);
        log::debug!("Life lost, {} remaining", self.lives);
        events.emit(GameEvent::LifeLost);

        self.ball.park_on(&self.paddle);
        if self.lives == 0 {
            self.set_status(GameStatus::Lost);
            self.pending_relaunch = None;
            events.emit(GameEvent::GameLost);
        } else {
            self.set_status(GameStatus::Ready);
            self.schedule_relaunch();
        }
    }

    /// Arrange for the ball to relaunch after `relaunch_delay`
    pub fn schedule_relaunch(&mut self) {
        let due = self.clock + self.tuning.relaunch_delay;
        log::debug!("Relaunch scheduled at t={:.3}", due);
        self.pending_relaunch = Some(PendingRelaunch {
            due,
            generation: self.generation,
        });
    }

    /// Fire a due relaunch if it is still valid. Returns true if it launched.
    pub fn poll_relaunch(&mut self, events: &mut impl EventSink) -> bool {
        let Some(pending) = self.pending_relaunch else {
            return false;
        };
        if self.clock < pending.due {
            return false;
        }
        self.pending_relaunch = None;
        if pending.generation != self.generation || self.status != GameStatus::Ready {
            log::debug!("Stale relaunch suppressed (status {:?})", self.status);
            return false;
        }
        self.launch(events);
        true
    }

    /// Reset to a fresh level. `keep_score` preserves the score; lives refill
    /// either way.
    pub fn reset(&mut self, keep_score: bool) {
        if !keep_score {
            self.score = 0;
        }
        self.lives = self.tuning.starting_lives;
        self.paddle = Paddle::for_world(self.world, &self.tuning);
        self.ball = Ball::new(self.tuning.ball_radius);
        self.ball.park_on(&self.paddle);
        self.bricks = generate_bricks(self.world, &self.tuning.layout);
        self.constant_speed = self.tuning.constant_speed(self.world.height);
        self.pending_relaunch = None;
        self.set_status(GameStatus::Ready);
        log::info!("Level reset (score {}, keep_score={})", self.score, keep_score);
    }

    /// Adopt a new world size without touching score or lives
    pub fn resize(&mut self, world: World) {
        if !(world.width > 0.0 && world.height > 0.0) {
            log::warn!("Ignoring resize to {}x{}", world.width, world.height);
            return;
        }
        let old = self.world;
        log::debug!(
            "Resize {}x{} -> {}x{}",
            old.width,
            old.height,
            world.width,
            world.height
        );
        self.world = world;
        self.constant_speed = self.tuning.constant_speed(world.height);

        self.paddle.center.x = rescale(self.paddle.center.x, old.width, world.width);
        self.paddle.fit_to_world(world, &self.tuning);

        // Re-lay the grid for the new size, carrying damage over
        let mut bricks = generate_bricks(world, &self.tuning.layout);
        for (fresh, old) in bricks.iter_mut().zip(&self.bricks) {
            fresh.hit_points = old.hit_points;
            fresh.score_value = old.score_value;
        }
        self.bricks = bricks;

        match self.status {
            GameStatus::Running | GameStatus::Paused => {
                let margin = self.tuning.wall_margin();
                let c = Vec2::new(
                    rescale(self.ball.center.x, old.width, world.width),
                    rescale(self.ball.center.y, old.height, world.height),
                );
                self.ball.center = Vec2::new(
                    c.x.clamp(margin, (world.width - margin).max(margin)),
                    c.y.clamp(margin, (world.height - margin).max(margin)),
                );
                self.ball.velocity = set_magnitude(self.ball.velocity, self.constant_speed);
            }
            GameStatus::Ready | GameStatus::Won | GameStatus::Lost => {
                self.ball.park_on(&self.paddle);
            }
        }
    }
}

/// Map a coordinate from an old extent to a new one. Positions in a world
/// that had no extent land in the middle.
fn rescale(value: f32, old: f32, new: f32) -> f32 {
    if old > 0.0 && value.is_finite() {
        value * (new / old)
    } else {
        new / 2.0
    }
}
