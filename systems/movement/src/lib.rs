#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Movement cadence system that decides when the snake advances.
//!
//! The system accumulates gameplay time reported by the world and requests a
//! single [`Command::AdvanceSnake`] once the accumulated time reaches the
//! current move delay. Frame rate therefore never changes snake speed, and a
//! slow frame never produces more than one advance.

use std::time::Duration;

use snake_arcade_core::{Command, Event};

/// Pure system that reacts to world events and emits advance commands.
#[derive(Clone, Debug, Default)]
pub struct Movement {
    elapsed: Duration,
    running: bool,
}

impl Movement {
    /// Creates an idle movement system; it starts once a round begins.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            elapsed: Duration::ZERO,
            running: false,
        }
    }

    /// Consumes world events and emits an advance once `move_delay` elapsed.
    pub fn handle(&mut self, events: &[Event], move_delay: Duration, out: &mut Vec<Command>) {
        for event in events {
            match event {
                Event::GameStarted => {
                    self.elapsed = Duration::ZERO;
                    self.running = true;
                }
                Event::SnakeDied { .. } => {
                    self.elapsed = Duration::ZERO;
                    self.running = false;
                }
                Event::TimeAdvanced { dt } if self.running => {
                    self.elapsed = self.elapsed.saturating_add(*dt);
                }
                _ => {}
            }
        }

        if self.running && self.elapsed >= move_delay {
            self.elapsed = Duration::ZERO;
            out.push(Command::AdvanceSnake);
        }
    }

    /// Restarts the current interval, e.g. when play resumes after a pause.
    pub fn reset_interval(&mut self) {
        self.elapsed = Duration::ZERO;
    }

    /// Gameplay time accumulated since the latest advance.
    #[must_use]
    pub const fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Fraction of the current move interval that has elapsed, clamped to
    /// `0.0..=1.0`. Used to interpolate rendered positions between cells.
    #[must_use]
    pub fn alpha(&self, move_delay: Duration) -> f32 {
        if move_delay.is_zero() {
            return 1.0;
        }
        (self.elapsed.as_secs_f32() / move_delay.as_secs_f32()).clamp(0.0, 1.0)
    }
}
