// Benchmark for notification selection
// Measures matcher throughput over a month-scale snapshot

use chrono::{Duration, Local};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use farm_countdown::models::context::DisplayContext;
use farm_countdown::models::event::ScheduledEvent;
use farm_countdown::models::schedule::ScheduleSnapshot;
use farm_countdown::services::countdown::select_relevant;

fn build_snapshot(event_count: usize) -> ScheduleSnapshot {
    let now = Local::now();
    let kinds = [
        "deworming",
        "vitamins",
        "sanitization",
        "weekly_cleaning",
        "fertilizer",
    ];
    let trees = ["henna", "fig", "banana", "mango_small", "mango_large"];

    let events = (0..event_count)
        .map(|i| {
            let kind = kinds[i % kinds.len()];
            let mut event =
                ScheduledEvent::new(kind, now + Duration::minutes(7 * i as i64 % 43_200));
            if kind == "fertilizer" {
                event = event.with_tree(trees[i % trees.len()]);
            }
            event
        })
        .collect();

    ScheduleSnapshot {
        events,
        fetched_at: now,
    }
}

fn bench_select_relevant(c: &mut Criterion) {
    let now = Local::now();
    let mut group = c.benchmark_group("select_relevant");

    for size in [100usize, 1_000, 10_000] {
        let snapshot = build_snapshot(size);
        let dashboard = DisplayContext::dashboard();
        let mango = DisplayContext::tree_page("mango").unwrap();

        group.bench_with_input(BenchmarkId::new("dashboard", size), &snapshot, |b, snap| {
            b.iter(|| select_relevant(black_box(snap), black_box(&dashboard), now))
        });
        group.bench_with_input(BenchmarkId::new("tree_page", size), &snapshot, |b, snap| {
            b.iter(|| select_relevant(black_box(snap), black_box(&mango), now))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_select_relevant);
criterion_main!(benches);
