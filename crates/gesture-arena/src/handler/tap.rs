//! Single tap recognition.

use gesture_arena_core::Point;

use super::{GestureHandler, GestureStatus, HandlerContext};
use crate::input::{MotionInput, PointerEventKind, PointerSample};

#[derive(Clone, Copy, Debug, Default)]
pub(super) struct TapState {
    start: Point,
}

/// A tap is a press released within `maxDuration` that never strays more
/// than `maxDistance` from where it went down. The duration limit is a
/// timer armed at down, so a held press fails without waiting for the lift.
/// A lift at exactly `maxDuration` still counts, so the timer fires one
/// millisecond past the window.
pub(super) fn on_handle(
    handler: &mut GestureHandler,
    tap: &mut TapState,
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
            tap.start = sample.position;
            begin_press(handler, sample, ctx);
        }
        PointerEventKind::Move => {
            if handler.status() == GestureStatus::Init {
                tap.start = sample.down_position;
                begin_press(handler, sample, ctx);
            }
            if handler.status() == GestureStatus::Begin
                && moved_too_far(handler, tap, sample, ctx)
            {
                handler.fail(ctx);
            }
        }
        PointerEventKind::Up => {
            handler.disarm_timer(ctx);
            if handler.status() != GestureStatus::Begin {
                return;
            }
            let in_time = sample.elapsed_since_down() <= handler.config().max_duration_millis();
            if in_time && !moved_too_far(handler, tap, sample, ctx) {
                handler.on_start(Point::ZERO, ctx);
                handler.activate();
                handler.end(ctx);
            } else {
                handler.fail(ctx);
            }
        }
        PointerEventKind::Cancel => handler.fail(ctx),
    }
}

pub(super) fn on_timeout(handler: &mut GestureHandler, ctx: &HandlerContext<'_>) {
    if handler.status() == GestureStatus::Begin {
        handler.fail(ctx);
    }
}

fn begin_press(handler: &mut GestureHandler, sample: &PointerSample, ctx: &HandlerContext<'_>) {
    handler.begin();
    handler.on_begin(Point::ZERO, ctx);
    if handler.status() == GestureStatus::Begin {
        let remaining = handler
            .config()
            .max_duration_millis()
            .saturating_add(1)
            .saturating_sub(sample.elapsed_since_down());
        handler.arm_timer(remaining, ctx);
    }
}

fn moved_too_far(
    handler: &GestureHandler,
    tap: &TapState,
    sample: &PointerSample,
    ctx: &HandlerContext<'_>,
) -> bool {
    tap.start.max_axis_distance(sample.position) > ctx.dp_to_px(handler.config().max_distance_dp())
}
