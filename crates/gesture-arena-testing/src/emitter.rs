use std::cell::{Cell, RefCell};

use gesture_arena::{
    GestureCallback, GestureEvent, GestureEventEmitter, GestureId, GestureState, MemberId,
};

struct ScriptedReply {
    member_id: MemberId,
    gesture_id: GestureId,
    callback: GestureCallback,
    state: GestureState,
}

/// Emitter that records every event and answers with scripted replies.
#[derive(Default)]
pub struct RecordingEmitter {
    events: RefCell<Vec<GestureEvent>>,
    replies: RefCell<Vec<ScriptedReply>>,
    recognized: Cell<usize>,
}

impl RecordingEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answers the next matching event with `state`, once.
    pub fn reply_once(
        &self,
        member_id: MemberId,
        gesture_id: GestureId,
        callback: GestureCallback,
        state: GestureState,
    ) {
        self.replies.borrow_mut().push(ScriptedReply {
            member_id,
            gesture_id,
            callback,
            state,
        });
    }

    pub fn events(&self) -> Vec<GestureEvent> {
        self.events.borrow().clone()
    }

    /// Callbacks one recognizer emitted, in order.
    pub fn callbacks_for(
        &self,
        member_id: MemberId,
        gesture_id: GestureId,
    ) -> Vec<GestureCallback> {
        self.events
            .borrow()
            .iter()
            .filter(|event| event.member_id == member_id && event.gesture_id == gesture_id)
            .map(|event| event.callback)
            .collect()
    }

    /// Lifecycle callbacks only, without the touch observations.
    pub fn lifecycle_for(
        &self,
        member_id: MemberId,
        gesture_id: GestureId,
    ) -> Vec<GestureCallback> {
        self.callbacks_for(member_id, gesture_id)
            .into_iter()
            .filter(|callback| !callback.is_touch_observation())
            .collect()
    }

    pub fn events_of(
        &self,
        member_id: MemberId,
        gesture_id: GestureId,
        callback: GestureCallback,
    ) -> Vec<GestureEvent> {
        self.events
            .borrow()
            .iter()
            .filter(|event| {
                event.member_id == member_id
                    && event.gesture_id == gesture_id
                    && event.callback == callback
            })
            .cloned()
            .collect()
    }

    pub fn count(
        &self,
        member_id: MemberId,
        gesture_id: GestureId,
        callback: GestureCallback,
    ) -> usize {
        self.events_of(member_id, gesture_id, callback).len()
    }

    pub fn recognized_count(&self) -> usize {
        self.recognized.get()
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }
}

impl GestureEventEmitter for RecordingEmitter {
    fn send_gesture_event(&self, event: GestureEvent) -> Option<GestureState> {
        log::trace!(
            "member {} gesture {} {}",
            event.member_id,
            event.gesture_id,
            event.callback
        );
        let reply = {
            let mut replies = self.replies.borrow_mut();
            let index = replies.iter().position(|reply| {
                reply.member_id == event.member_id
                    && reply.gesture_id == event.gesture_id
                    && reply.callback == event.callback
            });
            index.map(|index| replies.remove(index).state)
        };
        self.events.borrow_mut().push(event);
        reply
    }

    fn on_gesture_recognized(&self) {
        self.recognized.set(self.recognized.get() + 1);
    }
}
