//! Layout and scrolling benchmarks.
//!
//! Row layout must stay cheap enough to redo on every data change, and a
//! scroll event must be answered within a frame even with years of rows.
//!
//! Run with: cargo bench --bench layout_benchmark

#![allow(missing_docs)] // criterion macros generate undocumented items

use calgrid::dates::{day_start, localize, visible_days};
use calgrid::layout::{
    layout_day_column, row_segments, DateSlotMetrics, DayLayoutAlgorithm, DayLayoutInput,
    TimeSlotMetrics,
};
use calgrid::model::{Event, RecordId};
use calgrid::view_state::{InfiniteScroller, RowUnit, ScrollerOptions};
use chrono::{Duration, NaiveDate};
use chrono_tz::Tz;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn base() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 1).unwrap()
}

/// `count` events spread over five weeks, mixing all-day and timed ones.
fn generate_events(count: usize) -> Vec<Event> {
    (0..count)
        .map(|i| {
            let day = base() + Duration::days((i * 7 % 35) as i64);
            let id = RecordId::new(format!("e{}", i)).unwrap();
            if i % 3 == 0 {
                let start = day_start(Tz::UTC, day);
                let days = (i % 5) as i64 + 1;
                Event::new(id, "all day", start, start + Duration::days(days), true)
            } else {
                let start = localize(Tz::UTC, day.and_hms_opt(8, 0, 0).unwrap())
                    + Duration::minutes((i % 20) as i64 * 30);
                Event::new(id, "timed", start, start + Duration::minutes(45 + (i % 4) as i64 * 30), false)
            }
        })
        .collect()
}

fn benchmark_row_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("row_layout");
    let range = visible_days(base() + Duration::days(7), base() + Duration::days(13));

    for count in [10, 100, 1_000, 10_000] {
        let events = generate_events(count);
        group.bench_with_input(BenchmarkId::new("segments", count), &events, |b, events| {
            b.iter(|| row_segments(black_box(events), black_box(&range)));
        });
        group.bench_with_input(BenchmarkId::new("metrics", count), &events, |b, events| {
            b.iter(|| DateSlotMetrics::new(range.clone(), black_box(events), Some(5), 0));
        });
    }

    group.finish();
}

fn benchmark_day_column(c: &mut Criterion) {
    let mut group = c.benchmark_group("day_column");
    let day = base() + Duration::days(7);
    let metrics = TimeSlotMetrics::new(
        day_start(Tz::UTC, day),
        localize(Tz::UTC, day.and_hms_opt(23, 59, 59).unwrap()),
        30,
        2,
    );

    for count in [10, 50, 200] {
        let events: Vec<Event> = (0..count)
            .map(|i| {
                let start = localize(Tz::UTC, day.and_hms_opt(8, 0, 0).unwrap())
                    + Duration::minutes((i % 24) as i64 * 20);
                Event::new(
                    RecordId::new(format!("t{}", i)).unwrap(),
                    "timed",
                    start,
                    start + Duration::minutes(60),
                    false,
                )
            })
            .collect();
        let column: Vec<usize> = (0..events.len()).collect();
        let input = DayLayoutInput {
            events: &events,
            column: &column,
            minimum_start_difference: 30,
            minimum_minutes: 15,
            slot_metrics: &metrics,
        };

        for algorithm in [DayLayoutAlgorithm::Overlap, DayLayoutAlgorithm::NoOverlap] {
            group.bench_with_input(
                BenchmarkId::new(algorithm.to_string(), count),
                &input,
                |b, input| {
                    b.iter(|| layout_day_column(&algorithm, black_box(input)));
                },
            );
        }
    }

    group.finish();
}

fn benchmark_scroll(c: &mut Criterion) {
    let mut group = c.benchmark_group("scroll");

    for span in [3u32, 12, 60] {
        let options = ScrollerOptions {
            unit: RowUnit::Week,
            span,
            ..ScrollerOptions::default()
        };
        group.bench_with_input(BenchmarkId::new("crossing", span), &options, |b, options| {
            b.iter(|| {
                let mut scroller = InfiniteScroller::new(*options, base(), 800.0);
                let mut top = scroller.scroll_top();
                scroller.on_scroll(top);
                for _ in 0..50 {
                    top += 60.0;
                    if let Some(offset) = scroller.on_scroll(top).scroll_to {
                        scroller.on_scroll(offset);
                        top = offset;
                    }
                }
                black_box(scroller.current())
            });
        });
    }

    group.finish();
}

criterion_group! {
    name = benches;
    config = Criterion::default()
        .measurement_time(std::time::Duration::from_secs(5));
    targets = benchmark_row_layout, benchmark_day_column, benchmark_scroll
}

criterion_main!(benches);
