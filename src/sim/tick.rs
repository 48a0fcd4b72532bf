//! Fixed timestep simulation tick
//!
//! Advances the ball by exactly one physics step. Order within a step:
//! renormalize, integrate, walls, first overlapping brick, walls again,
//! paddle, commit, win check.

use glam::Vec2;

use super::collision::{CollisionResult, ResponseParams, WallCollision, resolve_bricks, resolve_paddle, resolve_walls};
use super::events::{EventSink, GameEvent};
use super::state::{GameState, GameStatus};
use crate::set_magnitude;

/// Advance the game state by one fixed timestep. No-op unless running.
pub fn physics_step(state: &mut GameState, dt: f32, events: &mut impl EventSink) {
    if state.status() != GameStatus::Running {
        return;
    }
    state.time_ticks += 1;

    let params = ResponseParams::for_state(state);
    let radius = state.ball.radius;

    let mut velocity = set_magnitude(state.ball.velocity, params.speed);
    let mut next = state.ball.center + velocity * dt;

    // Walls (first pass)
    match resolve_walls(next, velocity, state.world, &params) {
        WallCollision::OutOfBounds => {
            state.lose_life(events);
            return;
        }
        WallCollision::Contained(result) => apply(result, &mut next, &mut velocity, events),
    }

    // Bricks: at most one per tick
    if let Some(hit) = resolve_bricks(next, velocity, radius, &mut state.bricks, &params) {
        if hit.destroyed {
            state.score += hit.score;
            log::trace!("Brick {} destroyed (+{}), score {}", hit.index, hit.score, state.score);
        }
        apply(hit.result, &mut next, &mut velocity, events);
    }

    // Walls (second pass) in case the brick push-out left the field
    match resolve_walls(next, velocity, state.world, &params) {
        WallCollision::OutOfBounds => {
            state.lose_life(events);
            return;
        }
        WallCollision::Contained(result) => apply(result, &mut next, &mut velocity, events),
    }

    let result = resolve_paddle(next, velocity, radius, &state.paddle, &params);
    apply(result, &mut next, &mut velocity, events);

    state.ball.center = next;
    state.ball.velocity = velocity;

    if state.bricks.iter().all(|b| !b.is_alive()) {
        log::info!("All bricks cleared, final score {}", state.score);
        state.ball.velocity = Vec2::ZERO;
        state.pending_relaunch = None;
        state.set_status(GameStatus::Won);
        events.emit(GameEvent::GameWon);
    }
}

/// Adopt a resolver's corrected position/velocity and forward its events
fn apply(result: CollisionResult, next: &mut Vec2, velocity: &mut Vec2, events: &mut impl EventSink) {
    *next = result.position;
    *velocity = result.velocity;
    for event in result.events {
        events.emit(event);
    }
}
