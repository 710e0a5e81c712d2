//! Recognizer for views that bring their own platform scrolling physics.
//!
//! Recognition is the pan algorithm; only the detector kind differs, so
//! hosts can tell the two apart when they route events.

use super::pan::{self, PanState};
use super::{GestureHandler, HandlerContext};
use crate::input::MotionInput;

pub(super) fn on_handle(
    handler: &mut GestureHandler,
    state: &mut PanState,
    input: &MotionInput,
    ctx: &HandlerContext<'_>,
) {
    pan::on_handle(handler, state, input, ctx);
}
