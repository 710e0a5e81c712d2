//! Post-lift fling recognition.

use gesture_arena_core::Point;

use super::{GestureHandler, GestureStatus, HandlerContext};
use crate::input::{MotionInput, PointerEventKind};

/// Sits out while the finger is down, arms itself when the finger lifts,
/// then follows the fling simulation: every frame of travel the member can
/// absorb is an update, and the terminal sentinel or a rejected delta ends
/// it.
pub(super) fn on_handle(
    handler: &mut GestureHandler,
    input: &MotionInput,
    ctx: &HandlerContext<'_>,
) {
    let status = handler.status();
    match *input {
        MotionInput::Pointer(sample) => match sample.kind {
            PointerEventKind::Down | PointerEventKind::Move => handler.ignore(),
            PointerEventKind::Up => {
                if matches!(status, GestureStatus::Init | GestureStatus::Undetermined) {
                    handler.begin();
                    handler.on_begin(Point::ZERO, ctx);
                }
            }
            PointerEventKind::Cancel => {
                if !status.is_terminal() {
                    handler.fail(ctx);
                }
            }
        },
        MotionInput::Fling { delta_x, delta_y } => {
            if status.is_terminal() {
                return;
            }
            ctx.member.on_invalidate();
            if !ctx.member.can_consume_gesture(delta_x, delta_y) {
                handler.fail(ctx);
                return;
            }
            let delta = Point::new(delta_x, delta_y);
            if status != GestureStatus::Active {
                handler.begin();
                handler.on_begin(Point::ZERO, ctx);
                handler.on_start(Point::ZERO, ctx);
                handler.activate();
            }
            if handler.status() == GestureStatus::Active {
                handler.on_update(delta, ctx);
            }
        }
        MotionInput::Terminal => {
            if matches!(status, GestureStatus::Begin | GestureStatus::Active) {
                handler.fail(ctx);
            }
        }
    }
}
