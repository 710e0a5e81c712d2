use super::*;

const FRAME_MILLIS: u64 = 16;

fn run_to_end(scroller: &mut FlingScroller, start_millis: u64) -> Vec<Point> {
    let mut positions = Vec::new();
    let mut now = start_millis;
    while scroller.compute_scroll_offset(now) {
        positions.push(scroller.current());
        now += FRAME_MILLIS;
        assert!(positions.len() < 10_000, "fling never finished");
    }
    positions
}

#[test]
fn idle_scroller_reports_nothing() {
    let mut scroller = FlingScroller::with_density(1.0);
    assert!(scroller.is_finished());
    assert!(!scroller.compute_scroll_offset(100));
}

#[test]
fn fling_reaches_its_final_position() {
    let mut scroller = FlingScroller::with_density(1.0);
    scroller.fling(
        Point::new(10.0, 0.0),
        Point::new(2_000.0, 0.0),
        ScrollBounds::UNBOUNDED,
        0,
    );
    assert!(!scroller.is_finished());
    let expected = scroller.final_position();

    let positions = run_to_end(&mut scroller, 0);
    assert!(scroller.is_finished());
    let last = *positions.last().expect("at least one frame");
    assert!((last.x - expected.x).abs() < 0.01);
    assert_eq!(last.y, 0.0);
    assert!(last.x > 10.0);
}

#[test]
fn per_frame_steps_shrink() {
    let mut scroller = FlingScroller::with_density(2.0);
    scroller.fling(
        Point::ZERO,
        Point::new(0.0, -4_000.0),
        ScrollBounds::UNBOUNDED,
        0,
    );
    let positions = run_to_end(&mut scroller, FRAME_MILLIS);
    let mut previous = Point::ZERO;
    let mut last_step = f32::MAX;
    for position in positions {
        let step = (position.y - previous.y).abs();
        assert!(position.y <= previous.y, "fling must keep its direction");
        assert!(step <= last_step + 0.5, "step {step} grew past {last_step}");
        last_step = step;
        previous = position;
    }
}

#[test]
fn bounds_stop_the_axis() {
    let mut scroller = FlingScroller::with_density(1.0);
    scroller.fling(
        Point::new(0.0, 0.0),
        Point::new(5_000.0, 0.0),
        ScrollBounds::new(0.0, 50.0, 0.0, 0.0),
        0,
    );
    let positions = run_to_end(&mut scroller, 0);
    assert!(positions.iter().all(|p| p.x <= 50.0));
    assert_eq!(scroller.curr_x(), 50.0);
}

#[test]
fn abort_stops_in_place() {
    let mut scroller = FlingScroller::with_density(1.0);
    scroller.fling(
        Point::ZERO,
        Point::new(3_000.0, 3_000.0),
        ScrollBounds::UNBOUNDED,
        0,
    );
    assert!(scroller.compute_scroll_offset(48));
    let at_abort = scroller.current();
    scroller.abort_animation();
    assert!(scroller.is_finished());
    assert!(!scroller.compute_scroll_offset(96));
    assert_eq!(scroller.current(), at_abort);
}

#[test]
fn zero_velocity_finishes_immediately() {
    let mut scroller = FlingScroller::with_density(1.0);
    scroller.fling(
        Point::new(5.0, 5.0),
        Point::ZERO,
        ScrollBounds::UNBOUNDED,
        0,
    );
    assert!(scroller.is_finished());
    assert_eq!(scroller.duration_millis(), 0);
    assert_eq!(scroller.current(), Point::new(5.0, 5.0));
}
