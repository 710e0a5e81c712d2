//! Fling physics for the gesture arena.
//!
//! [`decay`] holds the Android-feel spline deceleration model; [`scroller`]
//! turns it into a 2D simulation that is advanced one frame at a time by
//! whoever owns the frame pump.

pub mod decay;
pub mod scroller;

pub use decay::{FlingCalculator, FlingInfo, FlingSpline, SplineSample};
pub use scroller::{FlingScroller, ScrollBounds};
