//! End-to-end layout scenarios through the public API.

use calgrid::dates::{day_start, localize, visible_days};
use calgrid::host::{Calendar, CommandLog, FixedViewport, RecordSet};
use calgrid::interaction::resolve_drag_delta;
use calgrid::layout::{event_levels, row_segments, Segment};
use calgrid::model::{Event, RecordId, SourceRecord};
use calgrid::config::ResolvedConfig;
use calgrid::view_state::{DateChange, RowUnit};
use chrono::{Duration, NaiveDate};
use chrono_tz::Tz;
use serde_json::json;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn all_day(id: &str, first: NaiveDate, last: NaiveDate) -> Event {
    Event::new(
        RecordId::new(id).unwrap(),
        id,
        day_start(Tz::UTC, first),
        day_start(Tz::UTC, last + Duration::days(1)),
        true,
    )
}

fn week_from_monday() -> Vec<NaiveDate> {
    let monday = d(2026, 10, 19);
    visible_days(monday, monday + Duration::days(6))
}

#[test]
fn wednesday_to_friday_is_one_segment_in_level_zero() {
    let events = vec![all_day("offsite", d(2026, 10, 21), d(2026, 10, 23))];
    let levels = event_levels(&row_segments(&events, &week_from_monday()), None);

    assert_eq!(levels.levels.len(), 1);
    assert_eq!(
        levels.levels[0],
        vec![Segment {
            event: 0,
            left: 3,
            right: 5,
            span: 3,
        }]
    );
}

#[test]
fn two_full_week_events_stack_in_two_levels() {
    let range = week_from_monday();
    let events = vec![
        all_day("a", d(2026, 10, 19), d(2026, 10, 25)),
        all_day("b", d(2026, 10, 19), d(2026, 10, 25)),
    ];
    let levels = event_levels(&row_segments(&events, &range), None);

    assert_eq!(levels.levels.len(), 2);
    for lane in &levels.levels {
        assert_eq!(lane.len(), 1);
        assert_eq!((lane[0].left, lane[0].right), (1, 7));
    }
    assert_ne!(levels.levels[0][0].event, levels.levels[1][0].event);
}

#[test]
fn zero_length_all_day_event_at_midnight_spans_its_day() {
    let midnight = day_start(Tz::UTC, d(2026, 10, 21));
    let events = vec![Event::new(
        RecordId::new("point").unwrap(),
        "point",
        midnight,
        midnight,
        true,
    )];
    let segments = row_segments(&events, &[d(2026, 10, 21)]);

    assert_eq!(
        segments,
        vec![Segment {
            event: 0,
            left: 1,
            right: 1,
            span: 1,
        }]
    );
}

#[test]
fn dragging_two_hour_event_by_one_slot_moves_thirty_minutes() {
    let start = localize(Tz::UTC, d(2026, 10, 20).and_hms_opt(9, 0, 0).unwrap());
    let event = Event::new(
        RecordId::new("meeting").unwrap(),
        "meeting",
        start,
        start + Duration::hours(2),
        false,
    );

    let intent = resolve_drag_delta(&event, 40.0, 40.0, 30);

    assert_eq!(intent.start, event.start + Duration::minutes(30));
    assert_eq!(intent.end, event.end + Duration::minutes(30));
    assert_eq!(intent.end - intent.start, event.duration());
}

#[test]
fn scrolling_into_next_month_reports_it_exactly_once() {
    let records: Vec<SourceRecord> = vec![serde_json::from_value(json!({
        "_id": "a",
        "title": "Offsite",
        "start": "2026-11-18",
    }))
    .unwrap()];
    let mut calendar = Calendar::new(
        RecordSet::new(records),
        CommandLog::default(),
        ResolvedConfig::default(),
    );
    let viewport = FixedViewport {
        height: 480.0,
        row_height: 120,
    };
    calendar.attach_scroller(RowUnit::Week, d(2026, 10, 14), &viewport);
    let initial = calendar.scroller().unwrap().scroll_top();
    calendar.on_scroll(initial);

    // Scroll row by row until the center enters November.
    let mut top = initial;
    let mut applied = Vec::new();
    for _ in 0..12 {
        top += 40.0;
        let Some(outcome) = calendar.on_scroll(top) else {
            break;
        };
        if let Some(offset) = outcome.scroll_to {
            applied.push(offset);
            // The host applies the offset, which fires one scroll event.
            calendar.on_scroll(offset);
            top = offset;
        }
    }
    calendar.on_scroll_end();

    let (_, sink) = calendar.into_parts();
    assert_eq!(
        sink.navigations,
        vec![DateChange {
            date: d(2026, 11, 1),
            previous: d(2026, 10, 1),
        }]
    );
    assert_eq!(applied.len(), 1);
}
