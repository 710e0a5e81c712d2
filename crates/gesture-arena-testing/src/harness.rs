use std::rc::Rc;

use gesture_arena::{
    ArenaConfig, GestureArenaManager, MemberId, MemberRef, PointerEvent, PointerEventKind,
    TouchPayload,
};
use gesture_arena_core::{ManualClock, Point};

use crate::emitter::RecordingEmitter;
use crate::member::FakeMember;

/// Longest fling the harness will pump before giving up.
const MAX_FLING_FRAMES: usize = 2_000;

/// A [`GestureArenaManager`] on a manual clock, driven like a host would
/// drive it: hit path at down, then pointer phases, timer pumps and frames.
pub struct ArenaHarness {
    pub clock: Rc<ManualClock>,
    pub emitter: Rc<RecordingEmitter>,
    pub arena: GestureArenaManager,
    pub frame_millis: u64,
}

impl Default for ArenaHarness {
    fn default() -> Self {
        Self::new()
    }
}

impl ArenaHarness {
    pub fn new() -> Self {
        Self::with_config(ArenaConfig::default())
    }

    pub fn with_config(config: ArenaConfig) -> Self {
        let clock = Rc::new(ManualClock::new(0));
        let emitter = Rc::new(RecordingEmitter::new());
        let arena = GestureArenaManager::new(config, clock.clone(), emitter.clone());
        Self {
            clock,
            emitter,
            arena,
            frame_millis: 16,
        }
    }

    pub fn add(&mut self, member: &Rc<FakeMember>) {
        let member: MemberRef = member.clone();
        self.arena.add_member(&member);
    }

    pub fn now(&self) -> u64 {
        use gesture_arena_core::Clock;
        self.clock.now_millis()
    }

    /// Pointer down on the element whose hit path (innermost first) is
    /// `hit_path`.
    pub fn down(&mut self, hit_path: &[MemberId], x: f32, y: f32, time_millis: u64) {
        self.clock.set(time_millis);
        self.arena.set_active_members_at_down(hit_path);
        self.pointer(PointerEventKind::Down, x, y, time_millis);
    }

    pub fn move_to(&mut self, x: f32, y: f32, time_millis: u64) {
        self.clock.set(time_millis);
        self.pointer(PointerEventKind::Move, x, y, time_millis);
    }

    pub fn up(&mut self, x: f32, y: f32, time_millis: u64) {
        self.clock.set(time_millis);
        self.pointer(PointerEventKind::Up, x, y, time_millis);
    }

    pub fn cancel(&mut self, x: f32, y: f32, time_millis: u64) {
        self.clock.set(time_millis);
        self.pointer(PointerEventKind::Cancel, x, y, time_millis);
    }

    /// Moves the clock and fires whatever timers came due.
    pub fn advance_to(&mut self, time_millis: u64) {
        self.clock.set(time_millis);
        self.arena.run_due_timers();
    }

    /// One frame tick. Returns whether a fling is still running.
    pub fn frame(&mut self) -> bool {
        self.clock.advance(self.frame_millis);
        self.arena.compute_scroll();
        self.arena.is_flinging()
    }

    /// Ticks frames until the fling stops; returns the number of frames.
    pub fn run_fling(&mut self) -> usize {
        let mut frames = 0;
        while self.arena.is_flinging() && frames < MAX_FLING_FRAMES {
            self.frame();
            frames += 1;
        }
        frames
    }

    fn pointer(&mut self, kind: PointerEventKind, x: f32, y: f32, time_millis: u64) {
        let event = PointerEvent::new(kind, Point::new(x, y), time_millis);
        let touch = TouchPayload::from_pointer(&event);
        self.arena
            .dispatch_touch_event_to_arena(&event, Some(&touch));
        self.arena.dispatch_bubble_touch_event(kind, Some(&touch));
    }
}
