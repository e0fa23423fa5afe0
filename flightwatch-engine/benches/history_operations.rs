use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use flightwatch_engine::sim::{LinearTelemetry, SimPart, SimVessel, SimWorld};
use flightwatch_engine::{HistoryStore, Settings, Tracker};
use flightwatch_types::PartHistory;

/// Benchmark record_sample latency (hot path of every data poll)
fn bench_record_sample(c: &mut Criterion) {
    let mut store = HistoryStore::new();
    store.record_sample("bench-part", "space", 0.0);

    let mut value = 0.0;
    c.bench_function("record_sample", |b| {
        b.iter(|| {
            value += 0.1;
            store.record_sample(black_box("bench-part"), black_box("space"), black_box(value));
        });
    });
}

/// Benchmark packed-string encoding
fn bench_packed_encode(c: &mut Criterion) {
    let mut history = PartHistory::new("bench-part");
    for i in 0..8 {
        history.add_sample(&format!("scope-{i}"), i as f64 * 1.5);
    }

    c.bench_function("packed_encode", |b| {
        b.iter(|| black_box(&history).to_packed());
    });
}

/// Benchmark packed-string decoding
fn bench_packed_decode(c: &mut Criterion) {
    let mut history = PartHistory::new("bench-part");
    for i in 0..8 {
        history.add_sample(&format!("scope-{i}"), i as f64 * 1.5);
    }
    let packed = history.to_packed();

    c.bench_function("packed_decode", |b| {
        b.iter(|| PartHistory::from_packed(black_box(&packed)));
    });
}

/// Benchmark a full engine tick with varying fleet sizes
fn bench_tick_varying_vessels(c: &mut Criterion) {
    let mut group = c.benchmark_group("tick_varying_vessels");

    for vessel_count in [1usize, 10, 50].iter() {
        group.bench_with_input(
            BenchmarkId::from_parameter(vessel_count),
            vessel_count,
            |b, &vessel_count| {
                let mut world = SimWorld::new();
                for i in 0..vessel_count {
                    let mut vessel =
                        SimVessel::new(format!("Vessel {i}"), flightwatch_types::VesselClass::Ship);
                    for part_id in 0..4u32 {
                        vessel.parts.push(SimPart::new(
                            part_id,
                            format!("part-{part_id}"),
                            LinearTelemetry::new("space", 1.0),
                        ));
                    }
                    world.add_vessel(vessel);
                }
                let settings = Settings {
                    process_all_vessels: true,
                    ..Settings::default()
                };
                let mut tracker = Tracker::new(settings);
                let mut t = 0.0;

                b.iter(|| {
                    t += 1.0;
                    world.set_now(t);
                    tracker.tick(black_box(&mut world));
                });
            },
        );
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_record_sample,
    bench_packed_encode,
    bench_packed_decode,
    bench_tick_varying_vessels
);
criterion_main!(benches);
