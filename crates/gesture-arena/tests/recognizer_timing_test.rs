//! Distance and time thresholds of the pointer recognizers, exercised
//! through the arena with a manual clock.

use gesture_arena::gesture_constants::{MAX_DURATION, MIN_DISTANCE, MIN_DURATION};
use gesture_arena::GestureCallback::{OnBegin, OnEnd, OnStart, OnUpdate};
use gesture_arena_testing::prelude::*;

fn single(h: &mut ArenaHarness, detector: GestureDetector) -> std::rc::Rc<FakeMember> {
    let member = FakeMember::new(1).with_detector(detector).into_rc();
    h.add(&member);
    member
}

#[test]
fn pan_starts_past_its_slop_in_dp() {
    let mut h = ArenaHarness::with_config(ArenaConfig::default().with_density(2.0));
    let _member = single(
        &mut h,
        GestureDetector::new(10, GestureKind::Pan).with_config(MIN_DISTANCE, 10.0),
    );

    h.down(&[1], 0.0, 0.0, 0);
    h.move_to(12.0, 0.0, 16);
    h.move_to(19.0, -19.0, 32);
    assert_eq!(h.emitter.lifecycle_for(1, 10), vec![OnBegin]);

    h.move_to(25.0, -19.0, 48);
    assert_eq!(
        h.emitter.lifecycle_for(1, 10),
        vec![OnBegin, OnStart, OnUpdate]
    );
    let update = &h.emitter.events_of(1, 10, OnUpdate)[0];
    assert_eq!(update.params.delta_x, 3.0);
    assert_eq!(update.params.delta_y, 0.0);

    h.move_to(25.0, -29.0, 64);
    let updates = h.emitter.events_of(1, 10, OnUpdate);
    assert_eq!(updates.len(), 2);
    assert_eq!(updates[1].params.delta_y, -5.0);
}

#[test]
fn quick_tap_ends() {
    let mut h = ArenaHarness::new();
    let _member = single(&mut h, GestureDetector::new(10, GestureKind::Tap));

    h.down(&[1], 10.0, 10.0, 0);
    h.move_to(14.0, 12.0, 60);
    h.up(14.0, 12.0, 200);
    assert_eq!(
        h.emitter.lifecycle_for(1, 10),
        vec![OnBegin, OnStart, OnEnd]
    );
    assert_eq!(h.arena.next_timer_deadline(), None);
}

#[test]
fn held_tap_fails_when_its_window_closes() {
    let mut h = ArenaHarness::new();
    let tap = single(&mut h, GestureDetector::new(10, GestureKind::Tap));

    h.down(&[1], 0.0, 0.0, 0);
    assert_eq!(h.arena.next_timer_deadline(), Some(501));
    h.advance_to(500);
    assert_eq!(tap.status_of(10), Some(GestureStatus::Begin));

    h.advance_to(501);
    assert_eq!(tap.status_of(10), Some(GestureStatus::Fail));
    assert_eq!(h.emitter.lifecycle_for(1, 10), vec![OnBegin, OnEnd]);

    h.up(0.0, 0.0, 650);
    assert_eq!(h.emitter.lifecycle_for(1, 10), vec![OnBegin, OnEnd]);
}

#[test]
fn tap_lifted_exactly_at_max_duration_ends() {
    let mut h = ArenaHarness::new();
    let tap = single(&mut h, GestureDetector::new(10, GestureKind::Tap));

    h.down(&[1], 0.0, 0.0, 0);
    h.up(0.0, 0.0, 500);
    assert_eq!(tap.status_of(10), Some(GestureStatus::End));
    assert_eq!(
        h.emitter.lifecycle_for(1, 10),
        vec![OnBegin, OnStart, OnEnd]
    );
    assert_eq!(h.arena.next_timer_deadline(), None);
}

#[test]
fn late_lift_fires_the_pending_timer_first() {
    let mut h = ArenaHarness::new();
    let _member = single(
        &mut h,
        GestureDetector::new(10, GestureKind::Tap).with_config(MAX_DURATION, 200.0),
    );

    h.down(&[1], 0.0, 0.0, 0);
    h.up(0.0, 0.0, 250);
    assert_eq!(h.emitter.lifecycle_for(1, 10), vec![OnBegin, OnEnd]);
}

#[test]
fn wandering_tap_fails() {
    let mut h = ArenaHarness::new();
    let _member = single(&mut h, GestureDetector::new(10, GestureKind::Tap));

    h.down(&[1], 0.0, 0.0, 0);
    h.move_to(0.0, 10.5, 30);
    h.up(0.0, 10.5, 60);
    assert_eq!(h.emitter.lifecycle_for(1, 10), vec![OnBegin, OnEnd]);
    assert_eq!(h.arena.next_timer_deadline(), None);
}

#[test]
fn long_press_recognizes_once_after_hold() {
    let mut h = ArenaHarness::new();
    let press = single(&mut h, GestureDetector::new(10, GestureKind::LongPress));

    h.down(&[1], 0.0, 0.0, 0);
    h.move_to(4.0, 4.0, 200);
    h.advance_to(499);
    assert_eq!(h.emitter.lifecycle_for(1, 10), vec![OnBegin]);

    h.advance_to(500);
    assert_eq!(press.status_of(10), Some(GestureStatus::Active));
    h.move_to(5.0, 4.0, 700);
    h.up(5.0, 4.0, 900);
    assert_eq!(
        h.emitter.lifecycle_for(1, 10),
        vec![OnBegin, OnStart, OnEnd]
    );
}

#[test]
fn long_press_honors_configured_duration() {
    let mut h = ArenaHarness::new();
    let press = single(
        &mut h,
        GestureDetector::new(10, GestureKind::LongPress).with_config(MIN_DURATION, 300.0),
    );

    h.down(&[1], 0.0, 0.0, 1_000);
    assert_eq!(h.arena.next_timer_deadline(), Some(1_300));
    h.advance_to(1_299);
    assert_eq!(press.status_of(10), Some(GestureStatus::Begin));
    h.advance_to(1_300);
    assert_eq!(press.status_of(10), Some(GestureStatus::Active));
}

#[test]
fn moved_long_press_never_starts() {
    let mut h = ArenaHarness::new();
    let _member = single(&mut h, GestureDetector::new(10, GestureKind::LongPress));

    h.down(&[1], 0.0, 0.0, 0);
    h.move_to(11.0, 0.0, 100);
    h.advance_to(800);
    assert_eq!(h.emitter.lifecycle_for(1, 10), vec![OnBegin, OnEnd]);
    assert_eq!(h.emitter.count(1, 10, OnStart), 0);
}

#[test]
fn early_lift_fails_long_press() {
    let mut h = ArenaHarness::new();
    let _member = single(&mut h, GestureDetector::new(10, GestureKind::LongPress));

    h.down(&[1], 0.0, 0.0, 0);
    h.up(0.0, 0.0, 300);
    h.advance_to(800);
    assert_eq!(h.emitter.lifecycle_for(1, 10), vec![OnBegin, OnEnd]);
}
