//! Time-stepped 2D fling simulation.
//!
//! The scroller never schedules anything. The owner calls
//! [`FlingScroller::compute_scroll_offset`] once per frame with the frame
//! time and reads the new position; deltas are the owner's business.

use crate::decay::{FlingCalculator, FlingInfo};
use gesture_arena_core::Point;

/// Inclusive position limits for a fling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollBounds {
    pub min_x: f32,
    pub max_x: f32,
    pub min_y: f32,
    pub max_y: f32,
}

impl ScrollBounds {
    pub const UNBOUNDED: ScrollBounds = ScrollBounds {
        min_x: f32::MIN,
        max_x: f32::MAX,
        min_y: f32::MIN,
        max_y: f32::MAX,
    };

    pub fn new(min_x: f32, max_x: f32, min_y: f32, max_y: f32) -> Self {
        Self {
            min_x,
            max_x,
            min_y,
            max_y,
        }
    }
}

impl Default for ScrollBounds {
    fn default() -> Self {
        Self::UNBOUNDED
    }
}

#[derive(Debug, Clone, Copy)]
struct AxisFling {
    start: f32,
    current: f32,
    min: f32,
    max: f32,
    info: FlingInfo,
    finished: bool,
}

impl AxisFling {
    fn idle(position: f32) -> Self {
        Self {
            start: position,
            current: position,
            min: f32::MIN,
            max: f32::MAX,
            info: FlingInfo {
                initial_velocity: 0.0,
                distance: 0.0,
                duration_millis: 0,
            },
            finished: true,
        }
    }

    fn start(calculator: &FlingCalculator, start: f32, velocity: f32, min: f32, max: f32) -> Self {
        let info = calculator.fling_info(velocity);
        Self {
            start,
            current: start,
            min,
            max,
            info,
            finished: info.duration_millis == 0 || info.distance == 0.0,
        }
    }

    fn step(&mut self, elapsed_millis: u64) {
        if self.finished {
            return;
        }
        if self.info.is_finished(elapsed_millis) {
            self.current = (self.start + self.info.offset(self.info.duration_millis))
                .clamp(self.min, self.max);
            self.finished = true;
            return;
        }
        let position = self.start + self.info.offset(elapsed_millis);
        self.current = position.clamp(self.min, self.max);
        if self.current != position {
            self.finished = true;
        }
    }

    fn final_position(&self) -> f32 {
        (self.start + self.info.offset(self.info.duration_millis)).clamp(self.min, self.max)
    }
}

/// Android `OverScroller`-style fling, one independent spline per axis.
#[derive(Debug, Clone)]
pub struct FlingScroller {
    calculator: FlingCalculator,
    x: AxisFling,
    y: AxisFling,
    start_time_millis: u64,
    finished: bool,
}

impl FlingScroller {
    pub fn new(friction: f32, density: f32) -> Self {
        Self {
            calculator: FlingCalculator::new(friction, density),
            x: AxisFling::idle(0.0),
            y: AxisFling::idle(0.0),
            start_time_millis: 0,
            finished: true,
        }
    }

    pub fn with_density(density: f32) -> Self {
        Self::new(FlingCalculator::DEFAULT_FRICTION, density)
    }

    /// Starts a fling from `start` with `velocity` (px/s), replacing any
    /// fling in flight.
    pub fn fling(&mut self, start: Point, velocity: Point, bounds: ScrollBounds, now_millis: u64) {
        self.x = AxisFling::start(
            &self.calculator,
            start.x,
            velocity.x,
            bounds.min_x,
            bounds.max_x,
        );
        self.y = AxisFling::start(
            &self.calculator,
            start.y,
            velocity.y,
            bounds.min_y,
            bounds.max_y,
        );
        self.start_time_millis = now_millis;
        self.finished = self.x.finished && self.y.finished;
        log::debug!(
            "fling start at ({}, {}) velocity ({}, {}) for {} ms",
            start.x,
            start.y,
            velocity.x,
            velocity.y,
            self.duration_millis()
        );
    }

    /// Advances the simulation to `now_millis`.
    ///
    /// Returns false when the fling had already finished before this call,
    /// true otherwise (including the call that finishes it).
    pub fn compute_scroll_offset(&mut self, now_millis: u64) -> bool {
        if self.finished {
            return false;
        }
        let elapsed = now_millis.saturating_sub(self.start_time_millis);
        self.x.step(elapsed);
        self.y.step(elapsed);
        self.finished = self.x.finished && self.y.finished;
        true
    }

    /// Stops the fling where it currently is.
    pub fn abort_animation(&mut self) {
        self.x.finished = true;
        self.y.finished = true;
        self.finished = true;
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn curr_x(&self) -> f32 {
        self.x.current
    }

    pub fn curr_y(&self) -> f32 {
        self.y.current
    }

    pub fn current(&self) -> Point {
        Point::new(self.x.current, self.y.current)
    }

    pub fn final_position(&self) -> Point {
        Point::new(self.x.final_position(), self.y.final_position())
    }

    pub fn duration_millis(&self) -> u64 {
        self.x
            .info
            .duration_millis
            .max(self.y.info.duration_millis)
    }
}

#[cfg(test)]
#[path = "tests/scroller_tests.rs"]
mod tests;
