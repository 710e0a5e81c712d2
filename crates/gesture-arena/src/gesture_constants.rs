//! Shared gesture constants: callback names, detector config keys and the
//! defaults recognizers fall back to.
//!
//! Distances are density-independent (dp) and are converted to pixels with
//! the arena density before they are compared against pointer positions.

/// Observation callbacks, fanned out to the whole bubble chain.
pub const ON_TOUCHES_DOWN: &str = "onTouchesDown";
pub const ON_TOUCHES_MOVE: &str = "onTouchesMove";
pub const ON_TOUCHES_UP: &str = "onTouchesUp";
pub const ON_TOUCHES_CANCEL: &str = "onTouchesCancel";

/// Lifecycle callbacks, emitted by the recognizer that takes part in the race.
pub const ON_BEGIN: &str = "onBegin";
pub const ON_UPDATE: &str = "onUpdate";
pub const ON_START: &str = "onStart";
pub const ON_END: &str = "onEnd";

/// Detector config keys.
pub const MIN_DURATION: &str = "minDuration";
pub const MAX_DURATION: &str = "maxDuration";
pub const MIN_DISTANCE: &str = "minDistance";
pub const MAX_DISTANCE: &str = "maxDistance";

/// Relation keys of a detector description.
pub const RELATION_SIMULTANEOUS: &str = "simultaneous";
pub const RELATION_WAIT_FOR: &str = "waitFor";
pub const RELATION_CONTINUE_WITH: &str = "continueWith";

/// Long-press hold time before activation.
pub const DEFAULT_MIN_DURATION_MS: u64 = 500;

/// Longest press that still counts as a tap.
pub const DEFAULT_MAX_DURATION_MS: u64 = 500;

/// Pan slop. Zero activates on the first move.
pub const DEFAULT_MIN_DISTANCE_DP: f32 = 0.0;

/// Travel that disqualifies a tap or a long press.
pub const DEFAULT_MAX_DISTANCE_DP: f32 = 10.0;

/// Release speed, in dp per second on either axis, above which lifting the
/// finger continues the gesture as a fling.
pub const FLING_SPEED_THRESHOLD: f32 = 300.0;

/// Maximum fling velocity in dp per second.
///
/// Matches Android's default maximum fling velocity (ViewConfiguration) on a
/// baseline density.
pub const MAX_FLING_VELOCITY: f32 = 8_000.0;
