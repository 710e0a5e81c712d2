use std::cell::{Cell, OnceCell, RefCell};
use std::rc::Rc;

use gesture_arena::{
    GestureArenaMember, GestureDetector, GestureDetectorMap, GestureHandlerSet, GestureId,
    GestureStatus, MemberId, MemberRef,
};
use gesture_arena_core::Point;

/// In-memory arena member with an optional scroll range.
///
/// Without a range the member absorbs every delta. With one, a delta is
/// absorbed while the scroll position can still move in its direction on
/// some axis, and scrolling clamps to the range.
pub struct FakeMember {
    id: MemberId,
    detectors: GestureDetectorMap,
    handlers: OnceCell<GestureHandlerSet>,
    scroll: Cell<Point>,
    range: Option<(Point, Point)>,
    scrolled: RefCell<Vec<Point>>,
    invalidations: Cell<usize>,
}

impl FakeMember {
    pub fn new(id: MemberId) -> Self {
        Self {
            id,
            detectors: GestureDetectorMap::new(),
            handlers: OnceCell::new(),
            scroll: Cell::new(Point::ZERO),
            range: None,
            scrolled: RefCell::new(Vec::new()),
            invalidations: Cell::new(0),
        }
    }

    pub fn with_detector(mut self, detector: GestureDetector) -> Self {
        self.detectors.insert(detector.id(), detector);
        self
    }

    pub fn with_scroll_range(mut self, min: Point, max: Point) -> Self {
        self.range = Some((min, max));
        self
    }

    pub fn with_scroll(self, scroll: Point) -> Self {
        self.scroll.set(scroll);
        self
    }

    pub fn into_rc(self) -> Rc<FakeMember> {
        Rc::new(self)
    }

    pub fn id(&self) -> MemberId {
        self.id
    }

    pub fn scroll(&self) -> Point {
        self.scroll.get()
    }

    /// Every delta applied through `on_gesture_scroll_by`.
    pub fn scrolled(&self) -> Vec<Point> {
        self.scrolled.borrow().clone()
    }

    pub fn invalidation_count(&self) -> usize {
        self.invalidations.get()
    }

    pub fn status_of(&self, gesture_id: GestureId) -> Option<GestureStatus> {
        self.handler_set().status_of(gesture_id)
    }

    fn handler_set(&self) -> &GestureHandlerSet {
        self.handlers
            .get_or_init(|| GestureHandlerSet::from_detectors(self.id, &self.detectors))
    }
}

/// Coerces a list of fake members into arena member references.
pub fn member_refs(members: &[&Rc<FakeMember>]) -> Vec<MemberRef> {
    members
        .iter()
        .map(|member| (*member).clone() as MemberRef)
        .collect()
}

fn can_move(position: f32, delta: f32, min: f32, max: f32) -> bool {
    if delta > 0.0 {
        position < max
    } else if delta < 0.0 {
        position > min
    } else {
        false
    }
}

impl GestureArenaMember for FakeMember {
    fn arena_member_id(&self) -> MemberId {
        self.id
    }

    fn member_scroll_x(&self) -> f32 {
        self.scroll.get().x
    }

    fn member_scroll_y(&self) -> f32 {
        self.scroll.get().y
    }

    fn is_at_border(&self, is_start: bool) -> bool {
        let Some((min, max)) = self.range else {
            return false;
        };
        let scroll = self.scroll.get();
        if is_start {
            scroll.x <= min.x && scroll.y <= min.y
        } else {
            scroll.x >= max.x && scroll.y >= max.y
        }
    }

    fn can_consume_gesture(&self, delta_x: f32, delta_y: f32) -> bool {
        let Some((min, max)) = self.range else {
            return true;
        };
        if delta_x == 0.0 && delta_y == 0.0 {
            return true;
        }
        let scroll = self.scroll.get();
        can_move(scroll.x, delta_x, min.x, max.x) || can_move(scroll.y, delta_y, min.y, max.y)
    }

    fn on_gesture_scroll_by(&self, delta_x: f32, delta_y: f32) {
        self.scrolled.borrow_mut().push(Point::new(delta_x, delta_y));
        let mut next = self.scroll.get() + Point::new(delta_x, delta_y);
        if let Some((min, max)) = self.range {
            next = Point::new(next.x.clamp(min.x, max.x), next.y.clamp(min.y, max.y));
        }
        self.scroll.set(next);
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
