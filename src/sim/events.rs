//! Discrete gameplay notifications
//!
//! The simulation never calls audio or haptics directly. It pushes events into
//! an `EventSink` supplied by the presentation layer, which decides what (if
//! anything) to play or show. Nothing in the simulation reads them back.

use serde::{Deserialize, Serialize};

/// Something noteworthy that happened during a tick or command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Ball bounced off the left, right or top wall
    WallBounce,
    /// Ball bounced off the paddle
    PaddleBounce,
    /// Ball hit a brick; `destroyed` when that hit took its last hit point
    BrickHit { index: usize, destroyed: bool },
    /// Ball crossed the bottom edge
    LifeLost,
    /// Last brick destroyed
    GameWon,
    /// Last life lost
    GameLost,
    /// Ball served from the paddle
    Launch,
}

/// Receiver for gameplay events
pub trait EventSink {
    fn emit(&mut self, event: GameEvent);
}

impl EventSink for Vec<GameEvent> {
    fn emit(&mut self, event: GameEvent) {
        self.push(event);
    }
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    fn emit(&mut self, event: GameEvent) {
        (**self).emit(event);
    }
}

/// Sink that drops everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _event: GameEvent) {}
}

/// Sink that logs every event at trace level before forwarding it
#[derive(Debug, Default)]
pub struct LogSink<S> {
    inner: S,
}

impl<S: EventSink> LogSink<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> S {
        self.inner
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

impl<S: EventSink> EventSink for LogSink<S> {
    fn emit(&mut self, event: GameEvent) {
        log::trace!("event: {:?}", event);
        self.inner.emit(event);
    }
}
