//! Brick Breaker headless runner
//!
//! Drives the simulation with an autopilot paddle at 60 frames per second,
//! logs what happens and prints the final snapshot as JSON.
//!
//! Usage: `brick-breaker [seed] [frames] [tuning.json]`

use brick_breaker::sim::{GameEvent, GameStatus, LogSink, World};
use brick_breaker::{Command, FrameClock, Game, Tuning};

fn main() {
    env_logger::init();
    log::info!("Brick Breaker (headless) starting...");

    let mut args = std::env::args().skip(1);
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(0x5EED);
    let frames: u32 = args.next().and_then(|s| s.parse().ok()).unwrap_or(60 * 120);
    let tuning = args.next().map(Tuning::load_or_default).unwrap_or_default();

    let mut game = Game::new(seed, World::new(390.0, 844.0), tuning, LogSink::new(Vec::<GameEvent>::new()));
    log::info!("Game initialized with seed: {}", seed);
    game.on_command(Command::Start);

    // Simulated display timestamps
    let mut clock = FrameClock::new();
    let frame_time = 1.0 / 60.0;
    let mut ticks = 0u64;

    for frame in 0..frames {
        // Track the ball with an oscillating offset to avoid perfect loops
        let state = game.state();
        let time_factor = frame as f32 * 0.02;
        let offset = (time_factor.sin() * 0.3 + (time_factor * 0.7).sin() * 0.15) * state.paddle.width;
        let ball_x = state.ball.center.x;
        game.on_paddle_drag_to(ball_x + offset);

        ticks += game.advance(clock.delta(frame as f64 * frame_time)) as u64;

        if matches!(game.status(), GameStatus::Won | GameStatus::Lost) {
            log::info!("Game over after {} frames: {:?}", frame, game.status());
            break;
        }
    }

    let events = game.events().inner();
    let count = |pred: fn(&GameEvent) -> bool| events.iter().filter(|e| pred(e)).count();
    log::info!(
        "{} ticks: {} wall, {} paddle, {} bricks destroyed, {} lives lost",
        ticks,
        count(|e| *e == GameEvent::WallBounce),
        count(|e| *e == GameEvent::PaddleBounce),
        count(|e| matches!(e, GameEvent::BrickHit { destroyed: true, .. })),
        count(|e| *e == GameEvent::LifeLost),
    );

    match serde_json::to_string_pretty(&game.snapshot()) {
        Ok(json) => println!("{}", json),
        Err(e) => log::error!("Could not serialize snapshot: {}", e),
    }
}
