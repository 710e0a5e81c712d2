use gesture_arena_animation::{FlingCalculator, ScrollBounds};

use crate::gesture_constants::{FLING_SPEED_THRESHOLD, MAX_FLING_VELOCITY};

/// Per-arena tuning.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArenaConfig {
    /// Pixels per dp.
    pub density: f32,
    /// Release speed (dp/s, either axis) that starts a fling.
    pub fling_speed_threshold: f32,
    /// Cap on the tracked release speed, dp/s.
    pub max_fling_velocity: f32,
    pub fling_friction: f32,
    /// Scroll limits the fling simulation is clamped to, px.
    pub fling_bounds: ScrollBounds,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            density: 1.0,
            fling_speed_threshold: FLING_SPEED_THRESHOLD,
            max_fling_velocity: MAX_FLING_VELOCITY,
            fling_friction: FlingCalculator::DEFAULT_FRICTION,
            fling_bounds: ScrollBounds::UNBOUNDED,
        }
    }
}

impl ArenaConfig {
    pub fn with_density(mut self, density: f32) -> Self {
        if density > 0.0 && density.is_finite() {
            self.density = density;
        } else {
            log::warn!("ignoring invalid density {density}");
        }
        self
    }

    pub fn with_fling_speed_threshold(mut self, threshold: f32) -> Self {
        self.fling_speed_threshold = threshold;
        self
    }

    pub fn with_max_fling_velocity(mut self, max_velocity: f32) -> Self {
        self.max_fling_velocity = max_velocity;
        self
    }

    pub fn with_fling_friction(mut self, friction: f32) -> Self {
        self.fling_friction = friction;
        self
    }

    pub fn with_fling_bounds(mut self, bounds: ScrollBounds) -> Self {
        self.fling_bounds = bounds;
        self
    }
}
