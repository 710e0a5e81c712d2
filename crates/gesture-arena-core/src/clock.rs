//! Millisecond clocks.
//!
//! The arena never reads wall time directly. Timers, fling simulation and
//! velocity sampling all go through a [`Clock`], so hosts can drive the arena
//! from their own frame clock and tests can step time by hand.

use std::cell::Cell;
use web_time::Instant;

pub trait Clock {
    /// Monotonic time in milliseconds. Only differences are meaningful.
    fn now_millis(&self) -> u64;
}

/// Clock backed by the platform monotonic timer.
#[derive(Clone, Copy, Debug)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_millis(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

/// Clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<u64>,
}

impl ManualClock {
    pub fn new(start_millis: u64) -> Self {
        Self {
            now: Cell::new(start_millis),
        }
    }

    pub fn set(&self, millis: u64) {
        self.now.set(millis);
    }

    pub fn advance(&self, millis: u64) {
        self.now.set(self.now.get().saturating_add(millis));
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> u64 {
        self.now.get()
    }
}
