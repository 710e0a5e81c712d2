//! Gesture arena.
//!
//! Several recognizers attached to nested UI elements race for one pointer
//! interaction. The arena arbitrates: it feeds pointer phases to the current
//! winner, re-runs the competition after every delivery, hands the event to
//! the next candidate when the winner drops out, and continues a released
//! drag as a decelerating fling driven by frame ticks.
//!
//! Everything here is single-threaded; see [`trigger`] for the pump points.

pub mod arena;
pub mod config;
pub mod detector;
pub mod event;
pub mod gesture_constants;
pub mod handler;
pub mod input;
pub mod member;
pub mod trigger;
pub mod velocity_tracker;

pub use arena::GestureArenaManager;
pub use config::ArenaConfig;
pub use detector::{
    decode_gesture_detectors, DetectorDecodeError, GestureCallback, GestureCallbacks,
    GestureConfig, GestureDetector, GestureDetectorManager, GestureId, GestureKind,
    GestureRelations, RawGestureDetector, SimultaneousResolver, SimultaneousWinners,
};
pub use event::{
    GestureEvent, GestureEventEmitter, GestureEventParams, GestureState, NoopEmitter, ParamValue,
    TouchParams,
};
pub use gesture_arena_animation::ScrollBounds;
pub use gesture_arena_core::{Clock, ManualClock, Point, SystemClock};
pub use handler::{GestureHandler, GestureStatus, HandlerContext, TimerTarget};
pub use input::{MotionInput, PointerEvent, PointerEventKind, PointerSample, TouchPayload};
pub use member::{
    same_member, GestureArenaMember, GestureDetectorMap, GestureHandlerSet, MemberId, MemberRef,
    MemberRegistry,
};
pub use trigger::GestureHandlerTrigger;
pub use velocity_tracker::{VelocityTracker, VelocityTracker1D};

pub mod prelude {
    pub use crate::arena::GestureArenaManager;
    pub use crate::config::ArenaConfig;
    pub use crate::detector::{GestureCallback, GestureDetector, GestureKind};
    pub use crate::event::{GestureEvent, GestureEventEmitter, GestureState};
    pub use crate::handler::GestureStatus;
    pub use crate::input::{PointerEvent, PointerEventKind, TouchPayload};
    pub use crate::member::{GestureArenaMember, MemberId, MemberRef};
    pub use gesture_arena_core::Point;
}

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;
