//! The scroll recognizer of native-feeling scroll containers.

use gesture_arena_core::Point;

use super::{GestureHandler, GestureStatus, HandlerContext};
use crate::input::{MotionInput, PointerEventKind};

#[derive(Clone, Copy, Debug, Default)]
pub(super) struct DefaultState {
    last: Point,
}

/// Pan and fling in one: drags and fling frames both scroll the member
/// directly, for as long as it can absorb the delta. Deltas are in scroll
/// direction, the opposite of finger travel.
pub(super) fn on_handle(
    handler: &mut GestureHandler,
    state: &mut DefaultState,
    input: &MotionInput,
    ctx: &HandlerContext<'_>,
) {
    if handler.status() >= GestureStatus::Fail {
        handler.on_end(Point::ZERO, ctx);
        return;
    }

    match *input {
        MotionInput::Pointer(sample) => match sample.kind {
            PointerEventKind::Down => {
                state.last = sample.position;
                handler.begin();
                handler.on_begin(Point::ZERO, ctx);
            }
            PointerEventKind::Move => {
                if handler.status() == GestureStatus::Init {
                    state.last = sample.down_position;
                    handler.begin();
                    handler.on_begin(Point::ZERO, ctx);
                }
                let delta = state.last - sample.position;
                state.last = sample.position;
                scroll(handler, delta, ctx);
            }
            PointerEventKind::Up => {}
            PointerEventKind::Cancel => handler.fail(ctx),
        },
        MotionInput::Fling { delta_x, delta_y } => {
            ctx.member.on_invalidate();
            if handler.status() == GestureStatus::Init {
                handler.begin();
                handler.on_begin(Point::ZERO, ctx);
            }
            scroll(handler, Point::new(delta_x, delta_y), ctx);
        }
        MotionInput::Terminal => {
            if matches!(
                handler.status(),
                GestureStatus::Begin | GestureStatus::Active
            ) {
                handler.fail(ctx);
            }
        }
    }
}

/// Applies `delta` while the member can take it; the first delta it cannot
/// take is still applied, then the gesture fails so an outer scroller can
/// pick up the rest.
fn scroll(handler: &mut GestureHandler, delta: Point, ctx: &HandlerContext<'_>) {
    if handler.status().is_terminal() {
        return;
    }
    if !ctx.member.can_consume_gesture(delta.x, delta.y) {
        update(handler, delta, ctx);
        handler.fail(ctx);
        return;
    }
    if handler.status() != GestureStatus::Active {
        handler.on_start(Point::ZERO, ctx);
        handler.activate();
    }
    if handler.status() == GestureStatus::Active {
        update(handler, delta, ctx);
    }
}

fn update(handler: &mut GestureHandler, delta: Point, ctx: &HandlerContext<'_>) {
    ctx.member.on_gesture_scroll_by(delta.x, delta.y);
    handler.on_update(delta, ctx);
}
