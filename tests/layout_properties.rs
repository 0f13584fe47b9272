//! Property-based tests for row projection and lane packing.
//!
//! Tests validate:
//! 1. Every segment lies inside the row: `1 <= left <= right <= range.len()`
//! 2. No two segments in one lane share a slot
//! 3. Projection and packing are deterministic
//! 4. Limited packing keeps every segment, either in a lane or in `extra`

use calgrid::dates::{day_start, localize, visible_days};
use calgrid::layout::{event_levels, row_segments, DateSlotMetrics};
use calgrid::model::{Event, RecordId};
use chrono::{Duration, NaiveDate};
use chrono_tz::Tz;
use proptest::prelude::*;

// ===== Arbitrary Strategies =====

fn base() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 1).unwrap()
}

/// Events starting within a 6-week window around the row, lasting up to
/// three weeks.
fn arb_event() -> impl Strategy<Value = Event> {
    (0i64..42, 0i64..(21 * 24 * 60), any::<bool>(), 0i64..(24 * 60)).prop_map(
        |(day, minutes, all_day, start_minute)| {
            let tz = Tz::UTC;
            let date = base() + Duration::days(day);
            let start = if all_day {
                day_start(tz, date)
            } else {
                localize(tz, date.and_hms_opt(0, 0, 0).unwrap()) + Duration::minutes(start_minute)
            };
            let end = start + Duration::minutes(minutes);
            Event::new(RecordId::new(format!("e{}", day)).unwrap(), "event", start, end, all_day)
        },
    )
}

fn arb_events() -> impl Strategy<Value = Vec<Event>> {
    prop::collection::vec(arb_event(), 0..40)
}

/// A row of 1 to 7 days inside the window the events live in.
fn arb_range() -> impl Strategy<Value = Vec<NaiveDate>> {
    (7i64..28, 1i64..=7).prop_map(|(offset, len)| {
        let first = base() + Duration::days(offset);
        visible_days(first, first + Duration::days(len - 1))
    })
}

// ===== Properties =====

proptest! {
    #[test]
    fn segments_stay_inside_the_row(events in arb_events(), range in arb_range()) {
        for segment in row_segments(&events, &range) {
            prop_assert!(segment.left >= 1);
            prop_assert!(segment.left <= segment.right);
            prop_assert!(segment.right <= range.len());
            prop_assert_eq!(segment.span, segment.right - segment.left + 1);
        }
    }

    #[test]
    fn lanes_never_overlap(events in arb_events(), range in arb_range()) {
        let segments = row_segments(&events, &range);
        let levels = event_levels(&segments, None);
        prop_assert!(levels.extra.is_empty());
        for lane in &levels.levels {
            for (i, a) in lane.iter().enumerate() {
                for b in &lane[i + 1..] {
                    prop_assert!(
                        a.right < b.left || b.right < a.left,
                        "segments {:?} and {:?} share a lane",
                        a,
                        b
                    );
                }
            }
        }
    }

    #[test]
    fn projection_and_packing_are_idempotent(events in arb_events(), range in arb_range()) {
        let first = event_levels(&row_segments(&events, &range), Some(3));
        let second = event_levels(&row_segments(&events, &range), Some(3));
        prop_assert_eq!(first, second);
    }

    #[test]
    fn limited_packing_keeps_every_segment(
        events in arb_events(),
        range in arb_range(),
        limit in 1usize..5,
    ) {
        let segments = row_segments(&events, &range);
        let levels = event_levels(&segments, Some(limit));
        prop_assert!(levels.levels.len() <= limit);
        let placed: usize = levels.levels.iter().map(Vec::len).sum();
        prop_assert_eq!(placed + levels.extra.len(), segments.len());
    }

    #[test]
    fn slot_metrics_respect_max_rows(
        events in arb_events(),
        range in arb_range(),
        max_rows in 1usize..6,
    ) {
        let metrics = DateSlotMetrics::new(range, &events, Some(max_rows), 0);
        prop_assert!(metrics.levels().len() <= max_rows.saturating_sub(1).max(1));
    }
}
