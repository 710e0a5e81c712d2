//! Core runtime pieces shared by the gesture arena crates: a pluggable
//! millisecond clock, a single-threaded queue of cancellable delayed tasks,
//! and the small geometry types pointer input is expressed in.

pub mod clock;
pub mod delayed_tasks;
pub mod geometry;

pub use clock::{Clock, ManualClock, SystemClock};
pub use delayed_tasks::{DelayedTaskQueue, DueTask, TimerToken};
pub use geometry::Point;

pub mod prelude {
    pub use crate::clock::{Clock, ManualClock, SystemClock};
    pub use crate::delayed_tasks::{DelayedTaskQueue, DueTask, TimerToken};
    pub use crate::geometry::Point;
}
