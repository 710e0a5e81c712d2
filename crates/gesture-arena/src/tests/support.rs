//! Minimal member and emitter doubles for unit tests.

use std::cell::{Cell, OnceCell, RefCell};
use std::rc::Rc;

use gesture_arena_core::Point;

use crate::detector::{GestureCallback, GestureDetector, GestureId};
use crate::event::{GestureEvent, GestureEventEmitter, GestureState};
use crate::member::{GestureArenaMember, GestureDetectorMap, GestureHandlerSet, MemberId, MemberRef};

pub(crate) struct StubMember {
    id: MemberId,
    detectors: GestureDetectorMap,
    handlers: OnceCell<GestureHandlerSet>,
    pub consume: Cell<bool>,
    pub scroll: Cell<Point>,
    pub invalidations: Cell<usize>,
}

impl StubMember {
    pub fn new(id: MemberId, detectors: impl IntoIterator<Item = GestureDetector>) -> Self {
        Self {
            id,
            detectors: detectors.into_iter().map(|d| (d.id(), d)).collect(),
            handlers: OnceCell::new(),
            consume: Cell::new(true),
            scroll: Cell::new(Point::ZERO),
            invalidations: Cell::new(0),
        }
    }

    pub fn shared(id: MemberId, detectors: impl IntoIterator<Item = GestureDetector>) -> MemberRef {
        Rc::new(Self::new(id, detectors))
    }

    pub fn handler_set(&self) -> &GestureHandlerSet {
        self.handlers
            .get_or_init(|| GestureHandlerSet::from_detectors(self.id, &self.detectors))
    }
}

impl GestureArenaMember for StubMember {
    fn arena_member_id(&self) -> MemberId {
        self.id
    }

    fn member_scroll_x(&self) -> f32 {
        self.scroll.get().x
    }

    fn member_scroll_y(&self) -> f32 {
        self.scroll.get().y
    }

    fn is_at_border(&self, _is_start: bool) -> bool {
        false
    }

    fn can_consume_gesture(&self, _delta_x: f32, _delta_y: f32) -> bool {
        self.consume.get()
    }

    fn on_gesture_scroll_by(&self, delta_x: f32, delta_y: f32) {
        self.scroll.set(self.scroll.get() + Point::new(delta_x, delta_y));
    }

    fn on_invalidate(&self) {
        self.invalidations.set(self.invalidations.get() + 1);
    }

    fn gesture_detectors(&self) -> Option<&GestureDetectorMap> {
        Some(&self.detectors)
    }

    fn gesture_handlers(&self) -> Option<&GestureHandlerSet> {
        Some(self.handler_set())
    }
}

#[derive(Default)]
pub(crate) struct EventLog {
    pub events: RefCell<Vec<GestureEvent>>,
    replies: RefCell<Vec<(MemberId, GestureId, GestureCallback, GestureState)>>,
    pub recognized: Cell<usize>,
}

impl EventLog {
    pub fn reply_once(
        &self,
        member_id: MemberId,
        gesture_id: GestureId,
        callback: GestureCallback,
        state: GestureState,
    ) {
        self.replies
            .borrow_mut()
            .push((member_id, gesture_id, callback, state));
    }

    pub fn callbacks(&self, member_id: MemberId, gesture_id: GestureId) -> Vec<GestureCallback> {
        self.events
            .borrow()
            .iter()
            .filter(|e| e.member_id == member_id && e.gesture_id == gesture_id)
            .map(|e| e.callback)
            .collect()
    }
}

impl GestureEventEmitter for EventLog {
    fn send_gesture_event(&self, event: GestureEvent) -> Option<GestureState> {
        let reply = {
            let mut replies = self.replies.borrow_mut();
            let found = replies.iter().position(|(member, gesture, callback, _)| {
                *member == event.member_id
                    && *gesture == event.gesture_id
                    && *callback == event.callback
            });
            found.map(|index| replies.remove(index).3)
        };
        self.events.borrow_mut().push(event);
        reply
    }

    fn on_gesture_recognized(&self) {
        self.recognized.set(self.recognized.get() + 1);
    }
}
