//! The arbiter.
//!
//! [`GestureHandlerTrigger`] decides, event by event, which arena member
//! owns the pointer. It is driven from two pump points only: raw pointer
//! phases through [`GestureHandlerTrigger::resolve_touch_event`] and frame
//! ticks through [`GestureHandlerTrigger::compute_scroll`]. Both must be
//! called from the same thread, one at a time.
//!
//! Only the winner and its simultaneous peers are fed pointer input. After
//! every dispatch the winner is re-evaluated with the competition scan, and
//! when it changes within an event the same event is redelivered to the new
//! winner before the call returns.

use std::cell::RefCell;
use std::rc::Rc;

use gesture_arena_animation::FlingScroller;
use gesture_arena_core::{Clock, DelayedTaskQueue, Point};
use rustc_hash::FxHashSet;
use smallvec::SmallVec;

use crate::config::ArenaConfig;
use crate::detector::{GestureId, SimultaneousResolver};
use crate::event::{GestureEventEmitter, GestureState};
use crate::handler::{GestureStatus, HandlerContext, TimerTarget};
use crate::input::{MotionInput, PointerEvent, PointerEventKind, PointerSample, TouchPayload};
use crate::member::{same_member, same_member_opt, GestureArenaMember, MemberId, MemberRef};
use crate::velocity_tracker::VelocityTracker;

#[derive(Clone, Copy, Debug, Default)]
struct DownAnchor {
    position: Point,
    time_millis: u64,
}

pub struct GestureHandlerTrigger {
    config: ArenaConfig,
    clock: Rc<dyn Clock>,
    emitter: Rc<dyn GestureEventEmitter>,
    resolver: Rc<dyn SimultaneousResolver>,
    timers: RefCell<DelayedTaskQueue<TimerTarget>>,
    scroller: FlingScroller,
    velocity_tracker: VelocityTracker,
    winner: Option<MemberRef>,
    last_winner: Option<MemberRef>,
    simultaneous_winners: SmallVec<[MemberRef; 2]>,
    simultaneous_gesture_ids: FxHashSet<GestureId>,
    duplicated_member: Option<MemberRef>,
    fling_winner: Option<MemberRef>,
    fling_target_id: Option<MemberId>,
    fling_scroll_pos: Point,
    down: DownAnchor,
}

impl GestureHandlerTrigger {
    pub fn new(
        config: ArenaConfig,
        clock: Rc<dyn Clock>,
        emitter: Rc<dyn GestureEventEmitter>,
        resolver: Rc<dyn SimultaneousResolver>,
    ) -> Self {
        Self {
            scroller: FlingScroller::new(config.fling_friction, config.density),
            config,
            clock,
            emitter,
            resolver,
            timers: RefCell::new(DelayedTaskQueue::new()),
            velocity_tracker: VelocityTracker::new(),
            winner: None,
            last_winner: None,
            simultaneous_winners: SmallVec::new(),
            simultaneous_gesture_ids: FxHashSet::default(),
            duplicated_member: None,
            fling_winner: None,
            fling_target_id: None,
            fling_scroll_pos: Point::ZERO,
            down: DownAnchor::default(),
        }
    }

    pub fn config(&self) -> &ArenaConfig {
        &self.config
    }

    pub fn winner(&self) -> Option<&MemberRef> {
        self.winner.as_ref()
    }

    pub fn last_winner(&self) -> Option<&MemberRef> {
        self.last_winner.as_ref()
    }

    pub fn fling_winner(&self) -> Option<&MemberRef> {
        self.fling_winner.as_ref()
    }

    pub fn simultaneous_winners(&self) -> &[MemberRef] {
        &self.simultaneous_winners
    }

    pub fn simultaneous_gesture_ids(&self) -> &FxHashSet<GestureId> {
        &self.simultaneous_gesture_ids
    }

    pub fn is_flinging(&self) -> bool {
        !self.scroller.is_finished()
    }

    /// When the host should next call [`Self::run_due_timers`], if ever.
    pub fn next_timer_deadline(&self) -> Option<u64> {
        self.timers.borrow().next_deadline()
    }

    /// Seeds the arbitration for a new pointer with the innermost candidate.
    pub fn init_current_winner_when_down(&mut self, member: Option<MemberRef>) {
        self.winner = member.clone();
        self.update_last_winner(member.clone());
        self.update_simultaneous_winner(member.as_ref());
        self.reset_gesture_handler_and_simultaneous(member.as_ref());
    }

    pub fn resolve_touch_event(
        &mut self,
        event: &PointerEvent,
        compete_chain: &[MemberRef],
        touch: Option<&TouchPayload>,
        bubble_chain: &[MemberRef],
    ) {
        self.run_due_timers(compete_chain, bubble_chain);
        if event.kind == PointerEventKind::Down {
            self.down = DownAnchor {
                position: event.position,
                time_millis: event.time_millis,
            };
        }
        let input = MotionInput::Pointer(self.sample(event));

        match event.kind {
            PointerEventKind::Down => {
                self.stop_fling_if_reachable(bubble_chain);
                self.reset_candidates_gestures(compete_chain);
                self.duplicated_member = None;
                // onBegin replies can fail the winner right away.
                let winner = self.winner.clone();
                self.dispatch_with_simultaneous_and_recompete(
                    winner.as_ref(),
                    &input,
                    touch,
                    Some(compete_chain),
                );
                self.find_next_winner_in_begin(&input, touch, compete_chain);
                self.velocity_tracker.reset();
                self.velocity_tracker
                    .add_position(event.time_millis, event.position);
            }
            PointerEventKind::Move => {
                self.velocity_tracker
                    .add_position(event.time_millis, event.position);
                let current = self.winner.take();
                self.winner = self.re_compete_by_gestures(compete_chain, current);
                if same_member_opt(self.winner.as_ref(), self.last_winner.as_ref()) {
                    let winner = self.winner.clone();
                    self.dispatch_with_simultaneous_and_recompete(
                        winner.as_ref(),
                        &input,
                        touch,
                        Some(compete_chain),
                    );
                }
                self.find_next_winner_in_begin(&input, touch, compete_chain);
            }
            PointerEventKind::Up | PointerEventKind::Cancel => {
                self.velocity_tracker
                    .add_position(event.time_millis, event.position);
                let winner = self.winner.clone();
                self.dispatch_with_simultaneous_and_recompete(
                    winner.as_ref(),
                    &input,
                    touch,
                    Some(compete_chain),
                );

                let density = self.config.density;
                let velocity = self
                    .velocity_tracker
                    .velocity_with_max(self.config.max_fling_velocity * density);
                let velocity_dp = velocity.to_dp(density);
                let threshold = self.config.fling_speed_threshold;
                let fast = velocity_dp.x.abs() > threshold || velocity_dp.y.abs() > threshold;

                if event.kind == PointerEventKind::Up && self.winner.is_some() && fast {
                    self.start_gesture_fling(velocity);
                } else {
                    let winner = self.winner.clone();
                    self.dispatch_with_simultaneous_and_recompete(
                        winner.as_ref(),
                        &MotionInput::Terminal,
                        None,
                        Some(compete_chain),
                    );
                }
            }
        }
    }

    /// Advances a running fling by one frame.
    pub fn compute_scroll(&mut self, compete_chain: &[MemberRef]) {
        self.run_due_timers(compete_chain, &[]);
        let now = self.clock.now_millis();
        if !self.scroller.compute_scroll_offset(now) {
            return;
        }
        let position = self.scroller.current();
        let delta = position - self.fling_scroll_pos;
        self.fling_scroll_pos = position;

        let current = self.fling_winner.take();
        self.fling_winner = self.re_compete_by_gestures(compete_chain, current);

        match self.fling_winner.clone() {
            Some(winner) => {
                self.fling_target_id = Some(winner.arena_member_id());
                self.dispatch_with_simultaneous_and_recompete(
                    Some(&winner),
                    &MotionInput::fling(delta),
                    None,
                    None,
                );
                if self.scroller.is_finished() {
                    log::debug!("fling on member {} finished", winner.arena_member_id());
                    self.dispatch_with_simultaneous_and_recompete(
                        Some(&winner),
                        &MotionInput::Terminal,
                        None,
                        Some(compete_chain),
                    );
                    self.fling_winner = None;
                    self.fling_target_id = None;
                }
            }
            None => {
                self.fling_target_id = None;
                if !self.scroller.is_finished() {
                    log::debug!("no member left to absorb the fling");
                    self.scroller.abort_animation();
                }
            }
        }
    }

    /// Stops a running fling when the new touch landed on (or inside) the
    /// member it drives. Returns whether a fling was stopped.
    pub fn stop_fling_if_reachable(&mut self, bubble_chain: &[MemberRef]) -> bool {
        if self.scroller.is_finished() {
            return false;
        }
        let reachable = match self.fling_target_id {
            Some(target) => bubble_chain
                .iter()
                .any(|member| member.arena_member_id() == target),
            None => !bubble_chain.is_empty(),
        };
        if !reachable {
            return false;
        }

        if let Some(member) = self.fling_winner.take() {
            if has_active_handler(&member) {
                self.dispatch_on_member(&member, &MotionInput::fling(Point::ZERO), None);
                self.dispatch_on_member(&member, &MotionInput::Terminal, None);
            }
        }
        self.scroller.abort_animation();
        self.fling_target_id = None;
        log::debug!("fling stopped by a new touch");
        self.emitter.on_gesture_recognized();
        true
    }

    /// Fans a raw phase out to every handler in the bubble chain as an
    /// observation callback. Arbitration state is not touched.
    pub fn dispatch_bubble_touch_event(
        &self,
        kind: PointerEventKind,
        touch: Option<&TouchPayload>,
        bubble_chain: &[MemberRef],
        winner: Option<&MemberRef>,
    ) {
        log::trace!(
            "bubbling {kind:?} to {} member(s), winner {:?}",
            bubble_chain.len(),
            winner.map(|member| member.arena_member_id())
        );
        for member in bubble_chain {
            let Some(handlers) = member.gesture_handlers() else {
                continue;
            };
            let ctx = self.context(member.as_ref());
            handlers.for_each_mut(|handler| handler.handle_touch_observation(kind, touch, &ctx));
        }
    }

    /// Forces a recognizer to FAIL or END outside the pointer flow.
    pub fn handle_gesture_detector_state(
        &mut self,
        member: Option<&MemberRef>,
        gesture_id: GestureId,
        state: GestureState,
    ) {
        let Some(member) = member else {
            return;
        };
        let Some(handlers) = member.gesture_handlers() else {
            return;
        };
        log::debug!(
            "external {state:?} for gesture {gesture_id} on member {}",
            member.arena_member_id()
        );
        let ctx = self.context(member.as_ref());
        let applied = handlers.with_handler_mut(gesture_id, |handler| {
            handler.apply_state_request(state, &ctx)
        });
        if applied.is_none() {
            log::debug!(
                "member {} has no gesture {gesture_id}",
                member.arena_member_id()
            );
        }
    }

    /// Fires every recognizer timer that is due by now.
    pub fn run_due_timers(&self, compete_chain: &[MemberRef], bubble_chain: &[MemberRef]) {
        let now = self.clock.now_millis();
        let due = self.timers.borrow_mut().take_due(now);
        for task in due {
            let TimerTarget {
                member_id,
                gesture_id,
            } = task.payload;
            let Some(member) = self.find_member(member_id, compete_chain, bubble_chain) else {
                log::warn!("timer for gesture {gesture_id} fired but member {member_id} is gone");
                continue;
            };
            let Some(handlers) = member.gesture_handlers() else {
                continue;
            };
            let ctx = self.context(member.as_ref());
            handlers.with_handler_mut(gesture_id, |handler| {
                handler.on_timer_fired(task.token, &ctx)
            });
        }
    }

    /// Drops all arbitration state and stops any fling.
    pub fn clear(&mut self) {
        self.winner = None;
        self.last_winner = None;
        self.simultaneous_winners.clear();
        self.simultaneous_gesture_ids.clear();
        self.duplicated_member = None;
        self.fling_winner = None;
        self.fling_target_id = None;
        self.scroller.abort_animation();
        self.velocity_tracker.reset();
        self.timers.borrow_mut().clear();
    }

    fn sample(&self, event: &PointerEvent) -> PointerSample {
        PointerSample {
            kind: event.kind,
            position: event.position,
            down_position: self.down.position,
            time_millis: event.time_millis,
            down_time_millis: self.down.time_millis,
        }
    }

    fn context<'a>(&'a self, member: &'a dyn GestureArenaMember) -> HandlerContext<'a> {
        HandlerContext {
            member,
            emitter: self.emitter.as_ref(),
            timers: &self.timers,
            now_millis: self.clock.now_millis(),
            density: self.config.density,
        }
    }

    fn find_member(
        &self,
        member_id: MemberId,
        compete_chain: &[MemberRef],
        bubble_chain: &[MemberRef],
    ) -> Option<MemberRef> {
        compete_chain
            .iter()
            .chain(bubble_chain)
            .chain(&self.simultaneous_winners)
            .chain(self.winner.iter())
            .chain(self.last_winner.iter())
            .chain(self.fling_winner.iter())
            .find(|member| member.arena_member_id() == member_id)
            .cloned()
    }

    fn start_gesture_fling(&mut self, velocity: Point) {
        let Some(winner) = self.winner.clone() else {
            return;
        };
        let start = Point::new(winner.member_scroll_x(), winner.member_scroll_y());
        // Content scrolls against the finger.
        let fling_velocity = Point::new(-velocity.x, -velocity.y);
        self.scroller.fling(
            start,
            fling_velocity,
            self.config.fling_bounds,
            self.clock.now_millis(),
        );
        self.fling_scroll_pos = start;
        self.fling_target_id = Some(winner.arena_member_id());
        winner.on_invalidate();
        self.fling_winner = Some(winner);
    }

    /// Redelivers `input` to each newly promoted winner until the winner
    /// settles, at most once per chain entry.
    fn find_next_winner_in_begin(
        &mut self,
        input: &MotionInput,
        touch: Option<&TouchPayload>,
        compete_chain: &[MemberRef],
    ) {
        for _ in 0..compete_chain.len() {
            let Some(winner) = self.winner.clone() else {
                return;
            };
            if same_member_opt(Some(&winner), self.last_winner.as_ref()) {
                return;
            }
            log::debug!(
                "member {} takes over within the same event",
                winner.arena_member_id()
            );
            self.update_last_winner(Some(winner.clone()));
            self.update_simultaneous_winner(Some(&winner));
            self.dispatch_with_simultaneous_and_recompete(
                Some(&winner),
                input,
                touch,
                Some(compete_chain),
            );
        }
        // Nobody settled: give the last candidate its closing delivery.
        let last = self.last_winner.clone();
        self.dispatch_with_simultaneous_and_recompete(
            last.as_ref(),
            input,
            touch,
            Some(compete_chain),
        );
    }

    fn dispatch_with_simultaneous_and_recompete(
        &mut self,
        winner: Option<&MemberRef>,
        input: &MotionInput,
        touch: Option<&TouchPayload>,
        compete_chain: Option<&[MemberRef]>,
    ) {
        let Some(winner) = winner else {
            return;
        };
        self.dispatch_on_member(winner, input, touch);
        let peers = self.simultaneous_winners.clone();
        for peer in &peers {
            self.dispatch_on_member(peer, input, touch);
        }
        if let Some(chain) = compete_chain {
            let current = self.winner.take();
            self.winner = self.re_compete_by_gestures(chain, current);
        }
    }

    fn dispatch_on_member(
        &self,
        member: &MemberRef,
        input: &MotionInput,
        touch: Option<&TouchPayload>,
    ) {
        let Some(handlers) = member.gesture_handlers() else {
            return;
        };
        let ctx = self.context(member.as_ref());
        handlers.for_each_mut(|handler| handler.handle_motion_event(input, touch, &ctx));
    }

    /// The competition scan. Keeps `current` while it is still running,
    /// otherwise returns the next running candidate in chain order,
    /// wrapping around once.
    fn re_compete_by_gestures(
        &mut self,
        chain: &[MemberRef],
        current: Option<MemberRef>,
    ) -> Option<MemberRef> {
        let (current, recompete_last_winner) = match (current, self.last_winner.clone()) {
            (Some(current), _) => (current, false),
            (None, Some(last)) => {
                self.reset_gesture_handler_and_simultaneous(Some(&last));
                (last, true)
            }
            (None, None) => return None,
        };

        match self.member_state(&current) {
            status if status.is_running() => return Some(current),
            GestureStatus::End => return None,
            _ => {}
        }
        if recompete_last_winner {
            return None;
        }

        let current_id = current.arena_member_id();
        let mut index = chain
            .iter()
            .position(|member| member.arena_member_id() == current_id)?;
        let last_index = chain
            .iter()
            .rposition(|member| member.arena_member_id() == current_id)
            .unwrap_or(index);
        if index != last_index {
            match self.duplicated_member.clone() {
                Some(duplicated) => {
                    index = last_index;
                    self.reset_gesture_handler_and_simultaneous(Some(&duplicated));
                }
                None => self.duplicated_member = Some(chain[index].clone()),
            }
        }

        for i in (index + 1..chain.len()).chain(0..index) {
            let node = &chain[i];
            if node.arena_member_id() == current_id {
                continue;
            }
            let revisit = self
                .duplicated_member
                .as_ref()
                .is_some_and(|duplicated| same_member(duplicated, node));
            if revisit {
                self.duplicated_member = None;
            } else {
                self.reset_gesture_handler_and_simultaneous(Some(node));
            }

            match self.member_state(node) {
                status if status.is_running() => {
                    log::debug!(
                        "winner moves from member {current_id} to {}",
                        node.arena_member_id()
                    );
                    return Some(node.clone());
                }
                GestureStatus::End => return None,
                status => log::trace!("member {} is out ({status:?})", node.arena_member_id()),
            }
        }
        None
    }

    /// Aggregate status of a member's handlers. An ACTIVE handler wins the
    /// member outright and fails its non-simultaneous siblings; an ENDED one
    /// takes the member out of contention.
    fn member_state(&mut self, member: &MemberRef) -> GestureStatus {
        let Some(handlers) = member.gesture_handlers() else {
            return GestureStatus::Fail;
        };
        let statuses = handlers.statuses();
        if statuses.is_empty() {
            return GestureStatus::Fail;
        }
        let mut min_status = GestureStatus::Undetermined;
        for (gesture_id, status) in statuses {
            match status {
                GestureStatus::End => {
                    self.reset_gesture_handler_and_simultaneous(Some(member));
                    // An ended gesture is never re-competed.
                    self.last_winner = None;
                    return GestureStatus::End;
                }
                GestureStatus::Active => {
                    self.fail_others_in_race_relation(member, gesture_id);
                    return GestureStatus::Active;
                }
                status => min_status = min_status.min(status),
            }
        }
        min_status
    }

    fn fail_others_in_race_relation(&self, member: &MemberRef, active_id: GestureId) {
        let Some(handlers) = member.gesture_handlers() else {
            return;
        };
        let ctx = self.context(member.as_ref());
        let exempt = &self.simultaneous_gesture_ids;
        handlers.for_each_mut(|handler| {
            let id = handler.gesture_id();
            if id != active_id && !exempt.contains(&id) {
                handler.fail(&ctx);
            }
        });
    }

    fn update_last_winner(&mut self, winner: Option<MemberRef>) {
        if !same_member_opt(self.last_winner.as_ref(), winner.as_ref()) {
            self.last_winner = winner;
        }
    }

    fn update_simultaneous_winner(&mut self, winner: Option<&MemberRef>) {
        let Some(winner) = winner else {
            return;
        };
        if let Some(result) = self.resolver.handle_simultaneous_winner(winner) {
            self.simultaneous_winners = result.members;
            self.simultaneous_gesture_ids = result.gesture_ids;
        }
    }

    fn reset_candidates_gestures(&self, chain: &[MemberRef]) {
        for member in chain {
            self.reset_gesture_handler(member);
        }
    }

    fn reset_gesture_handler_and_simultaneous(&self, member: Option<&MemberRef>) {
        if let Some(member) = member {
            self.reset_gesture_handler(member);
        }
        for peer in &self.simultaneous_winners {
            self.reset_gesture_handler(peer);
        }
    }

    fn reset_gesture_handler(&self, member: &MemberRef) {
        if let Some(handlers) = member.gesture_handlers() {
            handlers.for_each_mut(|handler| handler.reset(&self.timers));
        }
    }
}

fn has_active_handler(member: &MemberRef) -> bool {
    member.gesture_handlers().is_some_and(|handlers| {
        handlers
            .statuses()
            .iter()
            .any(|(_, status)| *status == GestureStatus::Active)
    })
}

#[cfg(test)]
#[path = "tests/trigger_tests.rs"]
mod tests;
