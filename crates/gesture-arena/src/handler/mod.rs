//! Per-(member, detector) recognizers.
//!
//! [`GestureHandler`] is the shared driver: status bookkeeping, once-only
//! lifecycle callbacks, event emission and the armed timer. The kind modules
//! hold only the recognition rules.

mod default;
mod fling;
mod long_press;
mod native;
mod pan;
mod tap;

use std::cell::RefCell;

use gesture_arena_core::{DelayedTaskQueue, Point, TimerToken};

use crate::detector::{GestureCallback, GestureConfig, GestureDetector, GestureId, GestureKind};
use crate::event::{
    GestureEvent, GestureEventEmitter, GestureEventParams, GestureState, TouchParams,
};
use crate::input::{MotionInput, PointerEventKind, TouchPayload};
use crate::member::{GestureArenaMember, MemberId};

use long_press::LongPressState;
use pan::PanState;
use tap::TapState;

#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GestureStatus {
    Init = 0,
    Begin = 1,
    Active = 2,
    Fail = 3,
    End = 4,
    Undetermined = 5,
}

impl GestureStatus {
    /// FAIL or END; left only through `reset`.
    pub fn is_terminal(self) -> bool {
        matches!(self, GestureStatus::Fail | GestureStatus::End)
    }

    /// Still in the race: INIT, BEGIN or ACTIVE.
    pub fn is_running(self) -> bool {
        self <= GestureStatus::Active
    }
}

/// Routes a fired timer back to the recognizer that armed it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimerTarget {
    pub member_id: MemberId,
    pub gesture_id: GestureId,
}

/// Everything a recognizer may touch while handling one input.
pub struct HandlerContext<'a> {
    pub member: &'a dyn GestureArenaMember,
    pub emitter: &'a dyn GestureEventEmitter,
    pub timers: &'a RefCell<DelayedTaskQueue<TimerTarget>>,
    pub now_millis: u64,
    /// Pixels per dp.
    pub density: f32,
}

impl HandlerContext<'_> {
    pub fn dp_to_px(&self, dp: f32) -> f32 {
        dp * self.density
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct InvokedCallbacks {
    begin: bool,
    start: bool,
    end: bool,
}

#[derive(Clone, Copy, Debug)]
enum HandlerKind {
    Pan(PanState),
    Native(PanState),
    Tap(TapState),
    LongPress(LongPressState),
    Fling,
    Default(default::DefaultState),
}

impl HandlerKind {
    fn for_detector(kind: GestureKind) -> Self {
        match kind {
            GestureKind::Pan => HandlerKind::Pan(PanState::default()),
            GestureKind::Native => HandlerKind::Native(PanState::default()),
            GestureKind::Tap => HandlerKind::Tap(TapState::default()),
            GestureKind::LongPress => HandlerKind::LongPress(LongPressState::default()),
            GestureKind::Fling => HandlerKind::Fling,
            GestureKind::Default => HandlerKind::Default(default::DefaultState::default()),
        }
    }
}

pub struct GestureHandler {
    member_id: MemberId,
    detector: GestureDetector,
    status: GestureStatus,
    invoked: InvokedCallbacks,
    armed_timer: Option<TimerToken>,
    last_touch: Option<TouchPayload>,
    kind: HandlerKind,
}

impl GestureHandler {
    pub fn new(member_id: MemberId, detector: GestureDetector) -> Self {
        let kind = HandlerKind::for_detector(detector.kind());
        Self {
            member_id,
            detector,
            status: GestureStatus::Init,
            invoked: InvokedCallbacks::default(),
            armed_timer: None,
            last_touch: None,
            kind,
        }
    }

    pub fn member_id(&self) -> MemberId {
        self.member_id
    }

    pub fn gesture_id(&self) -> GestureId {
        self.detector.id()
    }

    pub fn gesture_kind(&self) -> GestureKind {
        self.detector.kind()
    }

    pub fn detector(&self) -> &GestureDetector {
        &self.detector
    }

    pub fn config(&self) -> &GestureConfig {
        self.detector.config()
    }

    pub fn status(&self) -> GestureStatus {
        self.status
    }

    pub fn armed_timer(&self) -> Option<TimerToken> {
        self.armed_timer
    }

    /// Back to INIT for the next gesture cycle.
    pub fn reset(&mut self, timers: &RefCell<DelayedTaskQueue<TimerTarget>>) {
        if let Some(token) = self.armed_timer.take() {
            timers.borrow_mut().cancel(token);
        }
        self.status = GestureStatus::Init;
        self.invoked = InvokedCallbacks::default();
        self.last_touch = None;
        self.kind = HandlerKind::for_detector(self.detector.kind());
    }

    pub fn begin(&mut self) {
        if matches!(
            self.status,
            GestureStatus::Init | GestureStatus::Undetermined
        ) {
            self.status = GestureStatus::Begin;
        }
    }

    pub fn activate(&mut self) {
        if !self.status.is_terminal() {
            self.status = GestureStatus::Active;
        }
    }

    pub fn ignore(&mut self) {
        if self.status == GestureStatus::Init {
            self.status = GestureStatus::Undetermined;
        }
    }

    /// Leaves the race and reports `onEnd` if the gesture had begun.
    pub fn fail(&mut self, ctx: &HandlerContext<'_>) {
        self.finish(GestureStatus::Fail, ctx);
    }

    /// Completes the gesture and reports `onEnd` if it had begun.
    pub fn end(&mut self, ctx: &HandlerContext<'_>) {
        self.finish(GestureStatus::End, ctx);
    }

    fn finish(&mut self, status: GestureStatus, ctx: &HandlerContext<'_>) {
        self.disarm_timer(ctx);
        if !self.status.is_terminal() {
            self.status = status;
        }
        self.on_end(Point::ZERO, ctx);
    }

    /// Feeds one input to the recognizer.
    pub fn handle_motion_event(
        &mut self,
        input: &MotionInput,
        touch: Option<&TouchPayload>,
        ctx: &HandlerContext<'_>,
    ) {
        self.last_touch = touch.cloned();
        let mut kind = self.kind;
        match &mut kind {
            HandlerKind::Pan(state) => pan::on_handle(self, state, input, ctx),
            HandlerKind::Native(state) => native::on_handle(self, state, input, ctx),
            HandlerKind::Tap(state) => tap::on_handle(self, state, input, ctx),
            HandlerKind::LongPress(state) => long_press::on_handle(self, state, input, ctx),
            HandlerKind::Fling => fling::on_handle(self, input, ctx),
            HandlerKind::Default(state) => default::on_handle(self, state, input, ctx),
        }
        self.kind = kind;
    }

    /// Observation-only touch callback for the bubble chain.
    pub fn handle_touch_observation(
        &mut self,
        kind: PointerEventKind,
        touch: Option<&TouchPayload>,
        ctx: &HandlerContext<'_>,
    ) {
        let callback = kind.touch_callback();
        if !self.detector.is_callback_enabled(callback) {
            return;
        }
        let params = self.params(Point::ZERO, touch, ctx);
        // Replies to observation callbacks are not state requests.
        let _ = ctx.emitter.send_gesture_event(self.event(callback, params));
    }

    /// Called when a timer this handler armed comes due.
    pub fn on_timer_fired(&mut self, token: TimerToken, ctx: &HandlerContext<'_>) {
        if self.armed_timer != Some(token) {
            log::trace!(
                "stale timer {} for gesture {}",
                token.raw(),
                self.gesture_id()
            );
            return;
        }
        self.armed_timer = None;
        match self.kind {
            HandlerKind::Tap(_) => tap::on_timeout(self, ctx),
            HandlerKind::LongPress(_) => long_press::on_timeout(self, ctx),
            _ => {}
        }
    }

    /// Applies a state request from outside the pointer flow.
    pub fn apply_state_request(&mut self, state: GestureState, ctx: &HandlerContext<'_>) {
        match state {
            GestureState::Fail => self.fail(ctx),
            GestureState::End => self.end(ctx),
            GestureState::Active => {
                log::debug!(
                    "gesture {} ignores an external ACTIVE request",
                    self.gesture_id()
                );
            }
        }
    }

    fn arm_timer(&mut self, delay_millis: u64, ctx: &HandlerContext<'_>) {
        self.disarm_timer(ctx);
        let target = TimerTarget {
            member_id: self.member_id,
            gesture_id: self.gesture_id(),
        };
        let token = ctx
            .timers
            .borrow_mut()
            .schedule_after(ctx.now_millis, delay_millis, target);
        self.armed_timer = Some(token);
    }

    fn disarm_timer(&mut self, ctx: &HandlerContext<'_>) {
        if let Some(token) = self.armed_timer.take() {
            ctx.timers.borrow_mut().cancel(token);
        }
    }

    fn on_begin(&mut self, delta: Point, ctx: &HandlerContext<'_>) {
        if self.invoked.begin {
            return;
        }
        self.invoked.begin = true;
        self.emit(GestureCallback::OnBegin, delta, ctx);
    }

    fn on_start(&mut self, delta: Point, ctx: &HandlerContext<'_>) {
        if !self.invoked.begin || self.invoked.start {
            return;
        }
        self.invoked.start = true;
        self.emit(GestureCallback::OnStart, delta, ctx);
    }

    fn on_update(&mut self, delta: Point, ctx: &HandlerContext<'_>) {
        self.emit(GestureCallback::OnUpdate, delta, ctx);
    }

    fn on_end(&mut self, delta: Point, ctx: &HandlerContext<'_>) {
        if !self.invoked.begin || self.invoked.end {
            return;
        }
        self.invoked.end = true;
        self.emit(GestureCallback::OnEnd, delta, ctx);
    }

    fn emit(&mut self, callback: GestureCallback, delta: Point, ctx: &HandlerContext<'_>) {
        if !self.detector.is_callback_enabled(callback) {
            return;
        }
        let params = self.params(delta, self.last_touch.as_ref(), ctx);
        let reply = ctx.emitter.send_gesture_event(self.event(callback, params));
        if let Some(state) = reply {
            log::debug!(
                "gesture {} answered {callback} with {state:?}",
                self.gesture_id()
            );
            self.apply_state_request(state, ctx);
        }
    }

    fn event(&self, callback: GestureCallback, params: GestureEventParams) -> GestureEvent {
        GestureEvent {
            member_id: self.member_id,
            gesture_id: self.gesture_id(),
            callback,
            params,
        }
    }

    fn params(
        &self,
        delta: Point,
        touch: Option<&TouchPayload>,
        ctx: &HandlerContext<'_>,
    ) -> GestureEventParams {
        let member = ctx.member;
        let scroll =
            Point::new(member.member_scroll_x(), member.member_scroll_y()).to_dp(ctx.density);
        let delta = delta.to_dp(ctx.density);
        GestureEventParams {
            scroll_x: scroll.x,
            scroll_y: scroll.y,
            delta_x: delta.x,
            delta_y: delta.y,
            is_at_start: member.is_at_border(true),
            is_at_end: member.is_at_border(false),
            touch: touch.map(|payload| TouchParams::from_payload(payload, ctx.density)),
        }
    }
}

#[cfg(test)]
#[path = "../tests/handler_tests.rs"]
mod tests;
