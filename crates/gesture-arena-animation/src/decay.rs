//! Spline-based fling deceleration.
//!
//! Same physical model as `android.widget.OverScroller`: a fling covers a
//! distance and lasts a duration that both derive from the release velocity,
//! friction and screen density, and progress along that distance follows a
//! fixed ease-out spline.

use std::sync::LazyLock;

const INFLECTION: f32 = 0.35;
const START_TENSION: f32 = 0.5;
const END_TENSION: f32 = 1.0;
const P1: f32 = START_TENSION * INFLECTION;
const P2: f32 = 1.0 - END_TENSION * (1.0 - INFLECTION);

const NB_SAMPLES: usize = 100;

/// Bisection tolerance used while building the table.
const SOLVE_EPSILON: f32 = 1e-5;

/// Spline distance coefficients sampled at `i / NB_SAMPLES`.
static SPLINE_POSITIONS: LazyLock<[f32; NB_SAMPLES + 1]> = LazyLock::new(|| {
    let mut positions = [0.0f32; NB_SAMPLES + 1];
    let mut x_min = 0.0f32;

    for (i, slot) in positions.iter_mut().take(NB_SAMPLES).enumerate() {
        let alpha = i as f32 / NB_SAMPLES as f32;
        let mut x_max = 1.0f32;
        let (x, coef) = loop {
            let x = x_min + (x_max - x_min) / 2.0;
            let coef = 3.0 * x * (1.0 - x);
            let tx = coef * ((1.0 - x) * P1 + x * P2) + x * x * x;
            if (tx - alpha).abs() < SOLVE_EPSILON {
                break (x, coef);
            }
            if tx > alpha {
                x_max = x;
            } else {
                x_min = x;
            }
        };
        *slot = coef * ((1.0 - x) * START_TENSION + x) + x * x * x;
    }

    positions[NB_SAMPLES] = 1.0;
    positions
});

/// One lookup on the fling spline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplineSample {
    /// Fraction of the total distance covered, 0.0 to 1.0.
    pub distance: f32,
    /// Slope of the distance curve at this point.
    pub velocity: f32,
}

pub struct FlingSpline;

impl FlingSpline {
    /// Samples the spline at normalized time `t` (clamped to 0.0..=1.0).
    pub fn sample(t: f32) -> SplineSample {
        let t = t.clamp(0.0, 1.0);
        let index = (NB_SAMPLES as f32 * t) as usize;
        if index >= NB_SAMPLES {
            return SplineSample {
                distance: 1.0,
                velocity: 0.0,
            };
        }

        let t_inf = index as f32 / NB_SAMPLES as f32;
        let t_sup = (index + 1) as f32 / NB_SAMPLES as f32;
        let d_inf = SPLINE_POSITIONS[index];
        let d_sup = SPLINE_POSITIONS[index + 1];
        let velocity = (d_sup - d_inf) / (t_sup - t_inf);
        SplineSample {
            distance: d_inf + (t - t_inf) * velocity,
            velocity,
        }
    }
}

const GRAVITY_EARTH: f32 = 9.80665;
const INCHES_PER_METER: f32 = 39.37;
/// `ln(0.78) / ln(0.9)`
const DECELERATION_RATE: f64 = 2.358_201_6;

fn physical_coefficient(density: f32) -> f32 {
    GRAVITY_EARTH * INCHES_PER_METER * density * 160.0 * 0.84
}

/// Distance and duration of a fling released at a given velocity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlingInfo {
    /// Signed release velocity in px/s.
    pub initial_velocity: f32,
    /// Unsigned distance in px.
    pub distance: f32,
    pub duration_millis: u64,
}

impl FlingInfo {
    fn progress(&self, elapsed_millis: u64) -> f32 {
        if self.duration_millis == 0 {
            1.0
        } else {
            elapsed_millis as f32 / self.duration_millis as f32
        }
    }

    /// Signed offset from the start position after `elapsed_millis`.
    pub fn offset(&self, elapsed_millis: u64) -> f32 {
        self.distance
            * self.initial_velocity.signum()
            * FlingSpline::sample(self.progress(elapsed_millis)).distance
    }

    /// Signed velocity in px/s after `elapsed_millis`.
    pub fn velocity(&self, elapsed_millis: u64) -> f32 {
        if self.duration_millis == 0 {
            return 0.0;
        }
        FlingSpline::sample(self.progress(elapsed_millis)).velocity
            * self.initial_velocity.signum()
            * self.distance
            / self.duration_millis as f32
            * 1000.0
    }

    pub fn is_finished(&self, elapsed_millis: u64) -> bool {
        elapsed_millis >= self.duration_millis
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FlingCalculator {
    friction: f32,
    physical_coefficient: f32,
}

impl FlingCalculator {
    /// `ViewConfiguration.getScrollFriction()`
    pub const DEFAULT_FRICTION: f32 = 0.015;

    pub fn new(friction: f32, density: f32) -> Self {
        Self {
            friction,
            physical_coefficient: physical_coefficient(density),
        }
    }

    pub fn with_density(density: f32) -> Self {
        Self::new(Self::DEFAULT_FRICTION, density)
    }

    fn spline_deceleration(&self, velocity: f32) -> f64 {
        (INFLECTION as f64 * velocity.abs() as f64
            / (self.friction * self.physical_coefficient) as f64)
            .ln()
    }

    pub fn duration_millis(&self, velocity: f32) -> u64 {
        if velocity == 0.0 || !velocity.is_finite() {
            return 0;
        }
        let l = self.spline_deceleration(velocity);
        (1000.0 * (l / (DECELERATION_RATE - 1.0)).exp()).max(0.0) as u64
    }

    pub fn distance(&self, velocity: f32) -> f32 {
        if velocity == 0.0 || !velocity.is_finite() {
            return 0.0;
        }
        let l = self.spline_deceleration(velocity);
        let scale = (DECELERATION_RATE / (DECELERATION_RATE - 1.0) * l).exp() as f32;
        self.friction * self.physical_coefficient * scale
    }

    pub fn fling_info(&self, velocity: f32) -> FlingInfo {
        FlingInfo {
            initial_velocity: velocity,
            distance: self.distance(velocity),
            duration_millis: self.duration_millis(velocity),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spline_starts_at_zero_and_ends_at_one() {
        assert!(FlingSpline::sample(0.0).distance.abs() < 0.01);
        assert!((FlingSpline::sample(1.0).distance - 1.0).abs() < 0.01);
        assert_eq!(FlingSpline::sample(1.5).velocity, 0.0);
    }

    #[test]
    fn spline_distance_never_decreases() {
        let mut previous = 0.0;
        for i in 0..=200 {
            let sample = FlingSpline::sample(i as f32 / 200.0);
            assert!(sample.distance >= previous);
            previous = sample.distance;
        }
    }

    #[test]
    fn faster_release_flies_longer() {
        let calc = FlingCalculator::with_density(2.0);
        let slow = calc.fling_info(2_000.0);
        let fast = calc.fling_info(6_000.0);
        assert!(slow.duration_millis > 0);
        assert!(slow.distance > 0.0);
        assert!(fast.duration_millis > slow.duration_millis);
        assert!(fast.distance > slow.distance);
    }

    #[test]
    fn offset_follows_velocity_sign() {
        let info = FlingCalculator::with_density(1.0).fling_info(-3_000.0);
        let halfway = info.offset(info.duration_millis / 2);
        assert!(halfway < 0.0);
        assert!(info.velocity(0) < 0.0);
        let end = info.offset(info.duration_millis);
        assert!((end + info.distance).abs() < 1.0);
    }

    #[test]
    fn zero_velocity_is_an_empty_fling() {
        let info = FlingCalculator::with_density(1.0).fling_info(0.0);
        assert_eq!(info.duration_millis, 0);
        assert_eq!(info.distance, 0.0);
        assert!(info.is_finished(0));
    }
}
