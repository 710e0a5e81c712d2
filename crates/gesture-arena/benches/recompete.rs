use std::rc::Rc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use gesture_arena::{GestureDetector, GestureKind, MemberId};
use gesture_arena_testing::{ArenaHarness, FakeMember};

const CHAIN_LENGTHS: &[usize] = &[4, 32, 128];

/// Every member holds a tap, so one long move fails them one after another
/// and the winner walks the whole chain within a single event.
fn tap_chain(len: usize) -> (ArenaHarness, Vec<Rc<FakeMember>>, Vec<MemberId>) {
    let mut harness = ArenaHarness::new();
    let mut members = Vec::with_capacity(len);
    let mut hit_path = Vec::with_capacity(len);
    for index in 0..len {
        let id = index as MemberId + 1;
        let member = FakeMember::new(id)
            .with_detector(GestureDetector::new(id, GestureKind::Tap))
            .into_rc();
        harness.add(&member);
        members.push(member);
        hit_path.push(id);
    }
    (harness, members, hit_path)
}

fn bench_failing_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("recompete_failing_chain");
    for &len in CHAIN_LENGTHS {
        group.bench_with_input(BenchmarkId::from_parameter(len), &len, |b, &len| {
            let (mut harness, _members, hit_path) = tap_chain(len);
            let mut time = 0;
            b.iter(|| {
                time += 1_000;
                harness.down(black_box(&hit_path), 0.0, 0.0, time);
                harness.move_to(0.0, 50.0, time + 16);
                harness.up(0.0, 50.0, time + 32);
                harness.emitter.clear();
            });
        });
    }
    group.finish();
}

fn bench_fling(c: &mut Criterion) {
    c.bench_function("default_fling_to_rest", |b| {
        let mut harness = ArenaHarness::new();
        let list = FakeMember::new(1)
            .with_detector(GestureDetector::new(1, GestureKind::Default))
            .into_rc();
        harness.add(&list);
        let mut time = 0;
        b.iter(|| {
            time += 10_000;
            harness.down(&[1], 0.0, 300.0, time);
            for step in 1..=4u64 {
                harness.move_to(0.0, 300.0 - 50.0 * step as f32, time + step * 16);
            }
            harness.up(0.0, 50.0, time + 80);
            black_box(harness.run_fling());
            harness.emitter.clear();
        });
    });
}

criterion_group!(recompete, bench_failing_chain, bench_fling);
criterion_main!(recompete);
