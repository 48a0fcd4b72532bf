//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (bricks never move or compact mid-level)
//! - No rendering or platform dependencies

pub mod collision;
pub mod events;
pub mod layout;
pub mod rect;
pub mod state;
pub mod tick;

pub use collision::{
    BrickHit, CollisionResult, ResponseParams, WallCollision, reflect_velocity, resolve_bricks,
    resolve_paddle, resolve_walls,
};
pub use events::{EventSink, GameEvent, LogSink, NullSink};
pub use layout::generate_bricks;
pub use rect::{Face, Rect, circle_intersects_rect};
pub use state::{Ball, Brick, GameState, GameStatus, Paddle, PendingRelaunch, World};
pub use tick::physics_step;
