//! Frame driver
//!
//! Owns the simulation state and turns variable-rate frames into fixed
//! physics ticks. The presentation layer calls in with resize, paddle drag,
//! commands and frame deltas, then reads a `Snapshot` and the events it
//! collected through its `EventSink`.

use glam::Vec2;
use serde::Serialize;

use crate::sim::{
    Brick, EventSink, GameState, GameStatus, Rect, World, physics_step,
};
use crate::tuning::Tuning;

/// Player/platform commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Serve the parked ball
    Start,
    /// Fresh level, score and lives reset. Accepted in every status,
    /// including mid-rally.
    Restart,
    /// Fresh level, score kept, lives refilled. Accepted in every status.
    RestartKeepScore,
    Pause,
    Resume,
}

/// Read-only view of everything a renderer needs
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot<'a> {
    pub status: GameStatus,
    pub score: u64,
    pub lives: u8,
    pub paddle_rect: Rect,
    pub ball_center: Vec2,
    pub ball_radius: f32,
    pub bricks: &'a [Brick],
}

/// Converts absolute frame timestamps into deltas
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last_frame_time: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seconds since the previous call; zero on the first frame or if time
    /// went backwards.
    pub fn delta(&mut self, now: f64) -> f32 {
        let delta = match self.last_frame_time {
            Some(last) if now > last => (now - last) as f32,
            _ => 0.0,
        };
        self.last_frame_time = Some(now);
        delta
    }

    /// Forget the previous timestamp so the next frame starts fresh
    pub fn reset(&mut self) {
        self.last_frame_time = None;
    }
}

/// Game instance holding all state
pub struct Game<S> {
    state: GameState,
    events: S,
    accumulator: f32,
}

impl<S: EventSink> Game<S> {
    pub fn new(seed: u64, world: World, tuning: Tuning, events: S) -> Self {
        Self {
            state: GameState::new(seed, world, tuning.sanitized()),
            events,
            accumulator: 0.0,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn status(&self) -> GameStatus {
        self.state.status()
    }

    pub fn events(&self) -> &S {
        &self.events
    }

    pub fn events_mut(&mut self) -> &mut S {
        &mut self.events
    }

    /// Time queued for the next physics ticks (seconds)
    pub fn accumulator(&self) -> f32 {
        self.accumulator
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            status: self.state.status(),
            score: self.state.score,
            lives: self.state.lives,
            paddle_rect: self.state.paddle.rect(),
            ball_center: self.state.ball.center,
            ball_radius: self.state.ball.radius,
            bricks: &self.state.bricks,
        }
    }

    pub fn on_resize(&mut self, width: f32, height: f32) {
        self.state.resize(World::new(width, height));
    }

    /// Move the paddle toward an absolute x (clamped to the world)
    pub fn on_paddle_drag_to(&mut self, x: f32) {
        match self.state.status() {
            GameStatus::Paused => {}
            status => {
                let world = self.state.world;
                self.state.paddle.move_to(x, world);
                if status != GameStatus::Running {
                    let paddle = self.state.paddle.clone();
                    self.state.ball.park_on(&paddle);
                }
            }
        }
    }

    pub fn on_command(&mut self, command: Command) {
        let status = self.state.status();
        match (command, status) {
            (Command::Start, GameStatus::Ready) => {
                self.accumulator = 0.0;
                self.state.launch(&mut self.events);
            }
            (Command::Pause, GameStatus::Running) => {
                self.accumulator = 0.0;
                self.state.set_status(GameStatus::Paused);
            }
            (Command::Resume, GameStatus::Paused) => {
                self.accumulator = 0.0;
                self.state.set_status(GameStatus::Running);
            }
            (Command::Restart | Command::RestartKeepScore, _) => {
                self.accumulator = 0.0;
                self.state.reset(command == Command::RestartKeepScore);
            }
            _ => log::debug!("{:?} ignored in {:?}", command, status),
        }
    }

    /// Feed one rendered frame's elapsed real time. Returns physics ticks run.
    pub fn advance(&mut self, elapsed: f32) -> u32 {
        let tuning = &self.state.tuning;
        let physics_dt = tuning.physics_dt;
        let max_ticks = tuning.max_ticks_per_frame;
        let dt = if elapsed.is_finite() && elapsed > 0.0 {
            elapsed.min(tuning.max_frame_delta)
        } else {
            0.0
        };

        match self.state.status() {
            // Time passes but is not owed to the simulation
            GameStatus::Paused => {
                self.accumulator = 0.0;
                0
            }
            GameStatus::Ready => {
                self.accumulator = 0.0;
                self.state.clock += dt;
                self.state.poll_relaunch(&mut self.events);
                0
            }
            GameStatus::Won | GameStatus::Lost => {
                self.accumulator = 0.0;
                self.state.clock += dt;
                0
            }
            GameStatus::Running => {
                self.state.clock += dt;
                self.accumulator += dt;

                let mut ticks = 0;
                while self.accumulator >= physics_dt && ticks < max_ticks {
                    physics_step(&mut self.state, physics_dt, &mut self.events);
                    self.accumulator -= physics_dt;
                    ticks += 1;

                    if self.state.status() != GameStatus::Running {
                        self.accumulator = 0.0;
                        break;
                    }
                }
                ticks
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{GameEvent, NullSink};

    fn new_game() -> Game<Vec<GameEvent>> {
        Game::new(42, World::new(400.0, 800.0), Tuning::default(), Vec::new())
    }

    fn dt() -> f32 {
        Tuning::default().physics_dt
    }

    #[test]
    fn test_tick_cap() {
        let mut game = new_game();
        game.on_command(Command::Start);
        let ticks = game.advance(100.0 * dt());
        assert_eq!(ticks, 8);
        // The rest stays queued
        assert!((game.accumulator() - 92.0 * dt()).abs() < 1e-4);
        assert_eq!(game.advance(0.0), 8);
        assert_eq!(game.state().time_ticks, 16);
    }

    #[test]
    fn test_partial_tick_stays_queued() {
        let mut game = new_game();
        game.on_command(Command::Start);
        assert_eq!(game.advance(dt() * 0.5), 0);
        assert_eq!(game.advance(dt() * 0.6), 1);
    }

    #[test]
    fn test_nothing_runs_before_start() {
        let mut game = new_game();
        let before = game.state().ball.center;
        assert_eq!(game.advance(0.1), 0);
        assert_eq!(game.state().ball.center, before);
        assert_eq!(game.status(), GameStatus::Ready);
    }

    #[test]
    fn test_pause_accrues_no_time_debt() {
        let mut game = new_game();
        game.on_command(Command::Start);
        game.advance(dt() * 3.5);
        game.on_command(Command::Pause);
        assert_eq!(game.status(), GameStatus::Paused);
        let frozen = game.state().ball.center;

        assert_eq!(game.advance(0.4), 0);
        assert_eq!(game.state().ball.center, frozen);

        game.on_command(Command::Resume);
        assert_eq!(game.status(), GameStatus::Running);
        // A normal frame after resume runs a normal number of ticks
        assert_eq!(game.advance(dt() * 2.0 + 1e-5), 2);
    }

    #[test]
    fn test_invalid_commands_are_noops() {
        let mut game = new_game();
        game.on_command(Command::Pause);
        game.on_command(Command::Resume);
        assert_eq!(game.status(), GameStatus::Ready);

        game.on_command(Command::Start);
        game.on_command(Command::Start);
        game.on_command(Command::Resume);
        assert_eq!(game.status(), GameStatus::Running);
        assert_eq!(game.events(), &vec![GameEvent::Launch]);
    }

    #[test]
    fn test_restart_mid_rally() {
        let mut game = new_game();
        game.on_command(Command::Start);
        game.advance(0.1);
        game.state.score = 120;
        game.on_command(Command::Restart);
        assert_eq!(game.status(), GameStatus::Ready);
        assert_eq!(game.state().score, 0);
        assert_eq!(game.state().ball.velocity, Vec2::ZERO);
        assert_eq!(game.accumulator(), 0.0);

        // Nothing moves until the next serve
        let parked = game.state().ball.center;
        assert_eq!(game.advance(0.2), 0);
        assert_eq!(game.state().ball.center, parked);
    }

    #[test]
    fn test_restart_is_idempotent_from_every_state() {
        let mut game = new_game();
        for setup in [
            GameStatus::Ready,
            GameStatus::Running,
            GameStatus::Paused,
            GameStatus::Won,
            GameStatus::Lost,
        ] {
            game.on_command(Command::Start);
            game.advance(0.2);
            game.state.score = 999;
            game.state.lives = 1;
            game.state.bricks[3].hit_points = 0;
            game.state.set_status(setup);

            game.on_command(Command::Restart);
            let s = game.state();
            assert_eq!(s.status(), GameStatus::Ready);
            assert_eq!(s.score, 0);
            assert_eq!(s.lives, 3);
            assert_eq!(s.bricks.len(), 48);
            assert!(s.bricks.iter().all(Brick::is_alive));
        }
    }

    #[test]
    fn test_restart_keep_score() {
        let mut game = new_game();
        game.state.score = 300;
        game.state.lives = 0;
        game.state.set_status(GameStatus::Lost);
        game.on_command(Command::RestartKeepScore);
        assert_eq!(game.status(), GameStatus::Ready);
        assert_eq!(game.state().score, 300);
        assert_eq!(game.state().lives, 3);
    }

    fn drop_ball(game: &mut Game<Vec<GameEvent>>) {
        game.on_command(Command::Start);
        let h = game.state.world.height;
        game.state.ball.center = Vec2::new(380.0, h - 12.5);
        game.state.ball.velocity = Vec2::new(0.0, 480.0);
        game.on_paddle_drag_to(0.0);
        game.advance(dt() * 1.5);
    }

    #[test]
    fn test_relaunch_after_delay() {
        let mut game = new_game();
        drop_ball(&mut game);
        assert_eq!(game.status(), GameStatus::Ready);
        assert_eq!(game.state().lives, 2);

        game.advance(0.5);
        assert_eq!(game.status(), GameStatus::Ready);
        game.advance(0.25);
        assert_eq!(game.status(), GameStatus::Running);
        assert_eq!(
            game.events().iter().filter(|e| **e == GameEvent::Launch).count(),
            2
        );
    }

    #[test]
    fn test_stale_relaunch_after_restart_is_suppressed() {
        let mut game = new_game();
        drop_ball(&mut game);
        assert_eq!(game.status(), GameStatus::Ready);
        game.on_command(Command::Restart);

        game.advance(0.5);
        game.advance(0.5);
        assert_eq!(game.status(), GameStatus::Ready);
    }

    #[test]
    fn test_paddle_drag_clamps_and_carries_parked_ball() {
        let mut game = new_game();
        game.on_paddle_drag_to(10_000.0);
        let s = game.state();
        assert!((s.paddle.center.x - (400.0 - s.paddle.width / 2.0)).abs() < 1e-4);
        assert_eq!(s.ball.center.x, s.paddle.center.x);
    }

    #[test]
    fn test_paddle_frozen_while_paused() {
        let mut game = new_game();
        game.on_command(Command::Start);
        game.on_command(Command::Pause);
        let x = game.state().paddle.center.x;
        game.on_paddle_drag_to(0.0);
        assert_eq!(game.state().paddle.center.x, x);
    }

    #[test]
    fn test_resize_mid_run_keeps_progress() {
        let mut game = new_game();
        game.on_command(Command::Start);
        game.state.score = 500;
        game.advance(0.1);
        game.on_resize(800.0, 600.0);
        let s = game.state();
        assert_eq!(s.score, 500);
        assert_eq!(s.lives, 3);
        assert_eq!(s.status(), GameStatus::Running);
        assert!((s.ball.velocity.length() - 360.0).abs() < 1e-2);
        assert_eq!(s.paddle.width, 160.0);
    }

    #[test]
    fn test_game_created_before_first_layout() {
        let mut game = Game::new(1, World::new(0.0, 0.0), Tuning::default(), NullSink);
        game.on_resize(400.0, 800.0);
        game.on_command(Command::Start);
        assert_eq!(game.status(), GameStatus::Running);

        let margin = game.state().tuning.wall_margin();
        for _ in 0..600 {
            let x = game.state().ball.center.x;
            game.on_paddle_drag_to(x);
            game.advance(1.0 / 60.0);

            let s = game.state();
            assert!(s.paddle.center.is_finite());
            assert!(s.ball.center.is_finite());
            assert!(s.ball.velocity.is_finite());
            let c = s.ball.center;
            assert!(c.x >= margin - 1e-3 && c.x <= 400.0 - margin + 1e-3);
            assert!(c.y >= margin - 1e-3 && c.y <= 800.0 - margin + 1e-3);
        }
    }

    #[test]
    fn test_resize_while_paused() {
        let mut game = new_game();
        game.on_command(Command::Start);
        game.advance(0.1);
        game.on_command(Command::Pause);
        let lives = game.state().lives;
        let score = game.state().score;

        game.on_resize(300.0, 500.0);
        let s = game.state();
        assert_eq!(s.status(), GameStatus::Paused);
        assert_eq!((s.lives, s.score), (lives, score));
        assert!((s.ball.velocity.length() - s.constant_speed).abs() < 1e-2);
        let margin = s.tuning.wall_margin();
        assert!(s.ball.center.x >= margin && s.ball.center.x <= 300.0 - margin);
        assert!(s.ball.center.y >= margin && s.ball.center.y <= 500.0 - margin);

        game.on_command(Command::Resume);
        assert!(game.advance(0.05) > 0);
    }

    #[test]
    fn test_snapshot_serializes() {
        let game = Game::new(1, World::new(400.0, 800.0), Tuning::default(), NullSink);
        let snap = game.snapshot();
        assert_eq!(snap.bricks.len(), 48);
        assert_eq!(snap.ball_radius, 10.0);
        let json = serde_json::to_string(&snap).expect("serializable");
        assert!(json.contains("\"status\":\"Ready\""));
    }

    #[test]
    fn test_frame_clock() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.delta(10.0), 0.0);
        assert!((clock.delta(10.25) - 0.25).abs() < 1e-6);
        assert_eq!(clock.delta(9.0), 0.0);
        clock.reset();
        assert_eq!(clock.delta(20.0), 0.0);
    }

    #[test]
    fn test_garbage_elapsed_is_ignored() {
        let mut game = new_game();
        game.on_command(Command::Start);
        assert_eq!(game.advance(f32::NAN), 0);
        assert_eq!(game.advance(-1.0), 0);
        assert_eq!(game.advance(f32::INFINITY), 0);
    }
}
