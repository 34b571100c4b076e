//! Stabilizer throughput benchmarks
//!
//! Run with: cargo bench -p headway-stabilizer

use chrono::{Duration, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use headway_core::{EntityKey, Label, Signal};
use headway_stabilizer::{Stabilizer, StabilizerState, StatusTracker};

fn bench_resolve(c: &mut Criterion) {
    let stabilizer = Stabilizer::default();
    let t0 = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
    let cycle = [Label::Disrupted, Label::OnTrack, Label::OnTrack, Label::Slowing];

    c.bench_function("resolve_cycle", |b| {
        let mut state = StabilizerState::new();
        let mut now = t0;
        b.iter(|| {
            for label in cycle {
                now += Duration::seconds(30);
                black_box(stabilizer.resolve(&mut state, black_box(label), now));
            }
        })
    });
}

fn bench_tracker_board(c: &mut Criterion) {
    let t0 = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
    let keys: Vec<EntityKey> = (0..50)
        .map(|n| EntityKey::new("83139", n.to_string()))
        .collect();
    let signals: Vec<Signal> = Signal::all().collect();

    c.bench_function("tracker_poll_50_entities", |b| {
        let mut tracker = StatusTracker::default();
        let mut now = t0;
        let mut tick = 0usize;
        b.iter(|| {
            now += Duration::seconds(30);
            for (i, key) in keys.iter().enumerate() {
                let signal = signals[(i + tick) % signals.len()];
                black_box(tracker.observe(key, signal, now));
            }
            tick += 1;
        })
    });
}

criterion_group!(benches, bench_resolve, bench_tracker_board);
criterion_main!(benches);
