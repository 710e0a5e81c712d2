use gesture_arena_core::Point;

use super::{GestureHandler, GestureStatus, HandlerContext};
use crate::input::{MotionInput, PointerEventKind, PointerSample};

#[derive(Clone, Copy, Debug, Default)]
pub(super) struct LongPressState {
    start: Point,
}

/// Activates once when the `minDuration` timer fires while the finger is
/// still within `maxDistance` of the down point. Lifting ends an active
/// long press and fails one still waiting.
pub(super) fn on_handle(
    handler: &mut GestureHandler,
    press: &mut LongPressState,
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
            press.start = sample.position;
            begin_press(handler, sample, ctx);
        }
        PointerEventKind::Move => {
            if handler.status() == GestureStatus::Init {
                press.start = sample.down_position;
                begin_press(handler, sample, ctx);
            }
            let limit = ctx.dp_to_px(handler.config().max_distance_dp());
            if handler.status() == GestureStatus::Begin
                && press.start.max_axis_distance(sample.position) > limit
            {
                handler.fail(ctx);
            }
        }
        PointerEventKind::Up | PointerEventKind::Cancel => {
            handler.disarm_timer(ctx);
            if handler.status() == GestureStatus::Active && sample.kind == PointerEventKind::Up {
                handler.end(ctx);
            } else {
                handler.fail(ctx);
            }
        }
    }
}

pub(super) fn on_timeout(handler: &mut GestureHandler, ctx: &HandlerContext<'_>) {
    if handler.status() == GestureStatus::Begin {
        handler.on_start(Point::ZERO, ctx);
        handler.activate();
    }
}

fn begin_press(handler: &mut GestureHandler, sample: &PointerSample, ctx: &HandlerContext<'_>) {
    handler.begin();
    handler.on_begin(Point::ZERO, ctx);
    if handler.status() == GestureStatus::Begin {
        let remaining = handler
            .config()
            .min_duration_millis()
            .saturating_sub(sample.elapsed_since_down());
        handler.arm_timer(remaining, ctx);
    }
}
