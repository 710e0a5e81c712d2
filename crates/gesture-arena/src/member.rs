//! Arena members: the UI entities whose recognizers compete for a pointer.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};

use indexmap::IndexMap;
use rustc_hash::FxHashMap;

use crate::detector::{GestureDetector, GestureId};
use crate::handler::{GestureHandler, GestureStatus};

pub type MemberId = u32;

/// Detectors attached to a member, in ascending gesture id order.
pub type GestureDetectorMap = BTreeMap<GestureId, GestureDetector>;

/// Capability a UI entity implements to take part in the arena.
///
/// Methods take `&self`; members live behind `Rc` and keep their own mutable
/// state in cells. Scroll and invalidate callbacks run while the member's
/// handler set is borrowed, so they must not reach back into
/// [`GestureArenaMember::gesture_handlers`].
pub trait GestureArenaMember {
    /// Stable identity. Zero is reserved for "no member".
    fn arena_member_id(&self) -> MemberId;

    fn member_scroll_x(&self) -> f32;

    fn member_scroll_y(&self) -> f32;

    /// Whether the member's content sits at its start (or end) border.
    fn is_at_border(&self, is_start: bool) -> bool;

    /// Whether the member can still move by the given scroll delta (px).
    fn can_consume_gesture(&self, delta_x: f32, delta_y: f32) -> bool;

    fn on_gesture_scroll_by(&self, delta_x: f32, delta_y: f32);

    /// Requests another frame; a running fling needs one per step.
    fn on_invalidate(&self);

    fn gesture_detectors(&self) -> Option<&GestureDetectorMap>;

    fn gesture_handlers(&self) -> Option<&GestureHandlerSet>;
}

pub type MemberRef = Rc<dyn GestureArenaMember>;

pub fn same_member(a: &MemberRef, b: &MemberRef) -> bool {
    a.arena_member_id() == b.arena_member_id()
}

pub(crate) fn same_member_opt(a: Option<&MemberRef>, b: Option<&MemberRef>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => same_member(a, b),
        (None, None) => true,
        _ => false,
    }
}

/// One member's recognizers, keyed by gesture id in detector order.
#[derive(Default)]
pub struct GestureHandlerSet {
    handlers: RefCell<IndexMap<GestureId, GestureHandler>>,
}

impl GestureHandlerSet {
    pub fn from_detectors(member_id: MemberId, detectors: &GestureDetectorMap) -> Self {
        let handlers = detectors
            .values()
            .map(|detector| {
                (
                    detector.id(),
                    GestureHandler::new(member_id, detector.clone()),
                )
            })
            .collect();
        Self {
            handlers: RefCell::new(handlers),
        }
    }

    pub fn len(&self) -> usize {
        self.handlers.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.borrow().is_empty()
    }

    /// Runs `f` on every handler in order. Returns false without running
    /// anything if the set is already borrowed further up the stack.
    pub fn for_each_mut(&self, mut f: impl FnMut(&mut GestureHandler)) -> bool {
        match self.handlers.try_borrow_mut() {
            Ok(mut handlers) => {
                for handler in handlers.values_mut() {
                    f(handler);
                }
                true
            }
            Err(_) => {
                log::warn!("gesture handler set re-entered; dispatch dropped");
                false
            }
        }
    }

    pub fn with_handler_mut<R>(
        &self,
        gesture_id: GestureId,
        f: impl FnOnce(&mut GestureHandler) -> R,
    ) -> Option<R> {
        let mut handlers = match self.handlers.try_borrow_mut() {
            Ok(handlers) => handlers,
            Err(_) => {
                log::warn!("gesture handler set re-entered; gesture {gesture_id} skipped");
                return None;
            }
        };
        handlers.get_mut(&gesture_id).map(f)
    }

    pub fn status_of(&self, gesture_id: GestureId) -> Option<GestureStatus> {
        self.handlers
            .borrow()
            .get(&gesture_id)
            .map(GestureHandler::status)
    }

    /// Snapshot of `(gesture id, status)` pairs in handler order.
    pub fn statuses(&self) -> Vec<(GestureId, GestureStatus)> {
        self.handlers
            .borrow()
            .iter()
            .map(|(id, handler)| (*id, handler.status()))
            .collect()
    }
}

/// Id to member lookup. Holds weak references so the arena never keeps a
/// detached member alive.
#[derive(Default)]
pub struct MemberRegistry {
    members: RefCell<FxHashMap<MemberId, Weak<dyn GestureArenaMember>>>,
}

impl MemberRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, member: &MemberRef) {
        self.members
            .borrow_mut()
            .insert(member.arena_member_id(), Rc::downgrade(member));
    }

    pub fn remove(&self, member_id: MemberId) -> bool {
        self.members.borrow_mut().remove(&member_id).is_some()
    }

    pub fn get(&self, member_id: MemberId) -> Option<MemberRef> {
        self.members.borrow().get(&member_id).and_then(Weak::upgrade)
    }

    pub fn contains(&self, member_id: MemberId) -> bool {
        self.get(member_id).is_some()
    }

    pub fn len(&self) -> usize {
        self.members.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.members.borrow_mut().clear();
    }
}
