//! Owner facade wiring members, detector relations and the arbiter together.

use std::rc::Rc;

use gesture_arena_core::Clock;

use crate::config::ArenaConfig;
use crate::detector::{GestureDetectorManager, GestureId};
use crate::event::{GestureEventEmitter, GestureState};
use crate::input::{PointerEvent, PointerEventKind, TouchPayload};
use crate::member::{MemberId, MemberRef, MemberRegistry};
use crate::trigger::GestureHandlerTrigger;

/// One arena per root view. Hosts register members as they attach, hand
/// over the hit path at every pointer down, then pump pointer phases and
/// frame ticks into it.
pub struct GestureArenaManager {
    registry: Rc<MemberRegistry>,
    detector_manager: Rc<GestureDetectorManager>,
    trigger: GestureHandlerTrigger,
    compete_chain: Vec<MemberRef>,
    bubble_chain: Vec<MemberRef>,
    winner: Option<MemberRef>,
}

impl GestureArenaManager {
    pub fn new(
        config: ArenaConfig,
        clock: Rc<dyn Clock>,
        emitter: Rc<dyn GestureEventEmitter>,
    ) -> Self {
        let registry = Rc::new(MemberRegistry::new());
        let detector_manager = Rc::new(GestureDetectorManager::new(registry.clone()));
        let trigger = GestureHandlerTrigger::new(config, clock, emitter, detector_manager.clone());
        Self {
            registry,
            detector_manager,
            trigger,
            compete_chain: Vec::new(),
            bubble_chain: Vec::new(),
            winner: None,
        }
    }

    /// Registers `member` and its detectors. Returns the member id, or None
    /// for the reserved id 0.
    pub fn add_member(&mut self, member: &MemberRef) -> Option<MemberId> {
        let member_id = member.arena_member_id();
        if member_id == 0 {
            log::warn!("arena member without an id ignored");
            return None;
        }
        self.registry.insert(member);
        if let Some(detectors) = member.gesture_detectors() {
            for detector in detectors.values() {
                self.detector_manager
                    .register_gesture_detector(member_id, detector);
            }
        }
        Some(member_id)
    }

    pub fn remove_member(&mut self, member: &MemberRef) {
        let member_id = member.arena_member_id();
        self.registry.remove(member_id);
        if let Some(detectors) = member.gesture_detectors() {
            for detector in detectors.values() {
                self.detector_manager
                    .unregister_gesture_detector(member_id, detector);
            }
        }
    }

    pub fn is_member_exist(&self, member_id: MemberId) -> bool {
        self.registry.contains(member_id)
    }

    pub fn member_by_id(&self, member_id: MemberId) -> Option<MemberRef> {
        self.registry.get(member_id)
    }

    pub fn detector_manager(&self) -> &GestureDetectorManager {
        &self.detector_manager
    }

    pub fn trigger(&self) -> &GestureHandlerTrigger {
        &self.trigger
    }

    pub fn compete_chain(&self) -> &[MemberRef] {
        &self.compete_chain
    }

    pub fn bubble_chain(&self) -> &[MemberRef] {
        &self.bubble_chain
    }

    /// Innermost candidate at the last pointer down.
    pub fn winner(&self) -> Option<&MemberRef> {
        self.winner.as_ref()
    }

    /// Starts a new pointer interaction. `hit_path` lists the member ids
    /// from the touched element up to the root; ids that are not registered
    /// are skipped.
    pub fn set_active_members_at_down(&mut self, hit_path: &[MemberId]) {
        self.clear_current_gesture();
        self.bubble_chain = hit_path
            .iter()
            .filter(|id| **id != 0)
            .filter_map(|id| self.registry.get(*id))
            .collect();
        if self.bubble_chain.is_empty() {
            return;
        }
        self.compete_chain = self
            .detector_manager
            .convert_response_chain_to_compete_chain(&self.bubble_chain);
        self.winner = self.compete_chain.first().cloned();
        log::debug!(
            "pointer down: {} candidate(s), first {:?}",
            self.compete_chain.len(),
            self.winner.as_ref().map(|member| member.arena_member_id())
        );
        // Stop the fling before the new winner's handlers are reset, so its
        // listeners still see the closing update.
        self.trigger.stop_fling_if_reachable(&self.bubble_chain);
        self.trigger.init_current_winner_when_down(self.winner.clone());
    }

    pub fn dispatch_touch_event_to_arena(
        &mut self,
        event: &PointerEvent,
        touch: Option<&TouchPayload>,
    ) {
        self.trigger
            .resolve_touch_event(event, &self.compete_chain, touch, &self.bubble_chain);
    }

    pub fn dispatch_bubble_touch_event(
        &self,
        kind: PointerEventKind,
        touch: Option<&TouchPayload>,
    ) {
        self.trigger.dispatch_bubble_touch_event(
            kind,
            touch,
            &self.bubble_chain,
            self.winner.as_ref(),
        );
    }

    /// Frame tick. Call every frame while [`Self::is_flinging`].
    pub fn compute_scroll(&mut self) {
        self.trigger.compute_scroll(&self.compete_chain);
    }

    pub fn is_flinging(&self) -> bool {
        self.trigger.is_flinging()
    }

    pub fn run_due_timers(&self) {
        self.trigger
            .run_due_timers(&self.compete_chain, &self.bubble_chain);
    }

    pub fn next_timer_deadline(&self) -> Option<u64> {
        self.trigger.next_timer_deadline()
    }

    pub fn set_gesture_detector_state(
        &mut self,
        member_id: MemberId,
        gesture_id: GestureId,
        state: GestureState,
    ) {
        let member = self.registry.get(member_id);
        self.trigger
            .handle_gesture_detector_state(member.as_ref(), gesture_id, state);
    }

    /// Forgets every member and all arbitration state.
    pub fn clear(&mut self) {
        self.clear_current_gesture();
        self.registry.clear();
        self.detector_manager.clear();
        self.trigger.clear();
    }

    fn clear_current_gesture(&mut self) {
        self.winner = None;
        self.bubble_chain.clear();
        self.compete_chain.clear();
    }
}
