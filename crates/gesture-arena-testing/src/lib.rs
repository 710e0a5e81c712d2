//! Testing utilities for the gesture arena.

pub mod emitter;
pub mod harness;
pub mod member;

pub use emitter::RecordingEmitter;
pub use harness::ArenaHarness;
pub use member::{member_refs, FakeMember};

pub mod prelude {
    pub use crate::emitter::RecordingEmitter;
    pub use crate::harness::ArenaHarness;
    pub use crate::member::{member_refs, FakeMember};
    pub use gesture_arena::prelude::*;
}
