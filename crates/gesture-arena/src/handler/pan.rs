//! Continuous drag recognition.

use gesture_arena_core::Point;

use super::{GestureHandler, GestureStatus, HandlerContext};
use crate::input::{MotionInput, PointerEventKind};

#[derive(Clone, Copy, Debug, Default)]
pub(super) struct PanState {
    start: Point,
    last: Point,
}

/// Begins on down, activates once travel from the down point exceeds
/// `minDistance` on either axis, then reports every move as an update.
/// Lifting the finger fails the pan; a following fling is a separate
/// recognizer's business.
pub(super) fn on_handle(
    handler: &mut GestureHandler,
    pan: &mut PanState,
    input: &MotionInput,
    ctx: &HandlerContext<'_>,
) {
    let MotionInput::Pointer(sample) = input else {
        handler.ignore();
        return;
    };
    if handler.status() >= GestureStatus::Fail {
        return;
    }

    match sample.kind {
        PointerEventKind::Down => {
            pan.start = sample.position;
            pan.last = sample.position;
            handler.begin();
            handler.on_begin(Point::ZERO, ctx);
        }
        PointerEventKind::Move => {
            if handler.status() == GestureStatus::Init {
                // Promoted mid-gesture: measure from the real down point.
                pan.start = sample.down_position;
                pan.last = sample.down_position;
                handler.begin();
                handler.on_begin(Point::ZERO, ctx);
            }
            let previous = pan.last;
            pan.last = sample.position;

            let slop = ctx.dp_to_px(handler.config().min_distance_dp());
            if handler.status() == GestureStatus::Begin
                && pan.start.max_axis_distance(pan.last) > slop
            {
                handler.on_start(Point::ZERO, ctx);
                handler.activate();
            }

            if handler.status() == GestureStatus::Active {
                handler.on_update(pan.last - previous, ctx);
            } else if handler.status().is_terminal() {
                handler.on_end(Point::ZERO, ctx);
            }
        }
        PointerEventKind::Up | PointerEventKind::Cancel => handler.fail(ctx),
    }
}
