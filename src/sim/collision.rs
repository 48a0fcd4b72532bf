//! Collision detection and response for walls, bricks and paddle
//!
//! Each resolver takes the candidate ball position and velocity for this
//! tick and returns the corrected pair plus the events it produced. After any
//! reflection the velocity is pinned back to the constant speed and its
//! direction clamped, so a resolver never changes how fast the ball moves.

use glam::Vec2;

use super::events::GameEvent;
use super::rect::{Face, circle_intersects_rect};
use super::state::{Brick, GameState, Paddle, World};
use crate::{clamp_direction, set_magnitude};

/// Collision response parameters for one tick
#[derive(Debug, Clone, Copy)]
pub struct ResponseParams {
    /// Speed the ball is pinned to
    pub speed: f32,
    /// Wall stop distance for the ball center
    pub wall_margin: f32,
    pub push_out_padding: f32,
    pub separation: f32,
    pub tangent_boost: f32,
}

impl ResponseParams {
    pub fn for_state(state: &GameState) -> Self {
        Self {
            speed: state.constant_speed,
            wall_margin: state.tuning.wall_margin(),
            push_out_padding: state.tuning.push_out_padding,
            separation: state.tuning.separation,
            tangent_boost: state.tuning.tangent_boost,
        }
    }

    /// How far from a surface the ball center ends up after a push-out
    #[inline]
    fn push_distance(&self, radius: f32) -> f32 {
        radius + self.push_out_padding + self.separation
    }
}

/// Result of a collision check
#[derive(Debug, Clone, PartialEq)]
pub struct CollisionResult {
    /// Whether anything was hit
    pub hit: bool,
    /// Corrected ball center
    pub position: Vec2,
    /// Corrected ball velocity
    pub velocity: Vec2,
    pub events: Vec<GameEvent>,
}

impl CollisionResult {
    pub fn miss(position: Vec2, velocity: Vec2) -> Self {
        Self {
            hit: false,
            position,
            velocity,
            events: Vec::new(),
        }
    }
}

/// Outcome of the wall pass
#[derive(Debug, Clone, PartialEq)]
pub enum WallCollision {
    /// Ball is inside the playfield (possibly after bouncing)
    Contained(CollisionResult),
    /// Ball crossed the bottom edge
    OutOfBounds,
}

/// A resolved brick hit
#[derive(Debug, Clone, PartialEq)]
pub struct BrickHit {
    pub result: CollisionResult,
    pub index: usize,
    pub destroyed: bool,
    /// Score earned by this hit (non-zero only when destroyed)
    pub score: u64,
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Mirror `velocity` so it points away from a surface with outward `normal`.
/// A ball already leaving the surface is left alone.
#[inline]
pub fn reflect_away(velocity: Vec2, normal: Vec2) -> Vec2 {
    if velocity.dot(normal) < 0.0 {
        reflect_velocity(velocity, normal)
    } else {
        velocity
    }
}

/// Pin speed and clamp direction after a bounce
#[inline]
fn settle(velocity: Vec2, speed: f32) -> Vec2 {
    clamp_direction(set_magnitude(velocity, speed))
}

/// Bounce off the left, right and top walls; report a bottom crossing
pub fn resolve_walls(
    position: Vec2,
    velocity: Vec2,
    world: World,
    params: &ResponseParams,
) -> WallCollision {
    let m = params.wall_margin;
    let mut p = position;
    let mut v = velocity;
    let mut hit = false;

    if p.x < m {
        p.x = m;
        v.x = v.x.abs();
        hit = true;
    } else if p.x > world.width - m {
        p.x = world.width - m;
        v.x = -v.x.abs();
        hit = true;
    }

    if p.y < m {
        p.y = m;
        v.y = v.y.abs();
        hit = true;
    }

    if p.y > world.height - m {
        return WallCollision::OutOfBounds;
    }

    if !hit {
        return WallCollision::Contained(CollisionResult::miss(p, v));
    }

    WallCollision::Contained(CollisionResult {
        hit: true,
        position: p,
        velocity: settle(v, params.speed),
        events: vec![GameEvent::WallBounce],
    })
}

/// Resolve against the first live brick the ball overlaps.
///
/// Scans in storage order and stops at the first hit, so at most one brick
/// is damaged per tick.
pub fn resolve_bricks(
    position: Vec2,
    velocity: Vec2,
    radius: f32,
    bricks: &mut [Brick],
    params: &ResponseParams,
) -> Option<BrickHit> {
    let (index, brick) = bricks
        .iter_mut()
        .enumerate()
        .filter(|(_, b)| b.is_alive())
        .find(|(_, b)| circle_intersects_rect(position, radius, &b.rect))?;

    let face = brick.rect.min_overlap_face(position, radius);
    let p = brick
        .rect
        .push_out(position, face, params.push_distance(radius));
    let v = settle(reflect_away(velocity, face.normal()), params.speed);

    brick.hit_points -= 1;
    let destroyed = !brick.is_alive();
    let score = if destroyed { brick.score_value } else { 0 };

    Some(BrickHit {
        result: CollisionResult {
            hit: true,
            position: p,
            velocity: v,
            events: vec![GameEvent::BrickHit { index, destroyed }],
        },
        index,
        destroyed,
        score,
    })
}

/// Bounce off the paddle top, steering by hit offset.
///
/// Only a descending ball can hit the paddle.
pub fn resolve_paddle(
    position: Vec2,
    velocity: Vec2,
    radius: f32,
    paddle: &Paddle,
    params: &ResponseParams,
) -> CollisionResult {
    if velocity.y <= 0.0 || !circle_intersects_rect(position, radius, &paddle.rect()) {
        return CollisionResult::miss(position, velocity);
    }

    let p = Vec2::new(position.x, paddle.top() - params.push_distance(radius));
    let mut v = reflect_away(velocity, Face::Top.normal());

    // Off-center hits steer the ball toward that side
    let half = (paddle.width / 2.0).max(f32::EPSILON);
    let relative = ((position.x - paddle.center.x) / half).clamp(-1.0, 1.0);
    v.x += params.tangent_boost * relative * params.speed;

    CollisionResult {
        hit: true,
        position: p,
        velocity: settle(v, params.speed),
        events: vec![GameEvent::PaddleBounce],
    }
}
