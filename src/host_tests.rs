//! Tests for the calendar facade.

use super::*;
use crate::interaction::DropTarget;
use crate::layout::StyledEvent;
use chrono::{Duration, NaiveTime, Timelike};
use chrono_tz::Tz;
use serde_json::{json, Value};
use std::time::Duration as StdDuration;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn record(value: Value) -> SourceRecord {
    serde_json::from_value(value).unwrap()
}

fn calendar(records: Vec<Value>) -> Calendar<RecordSet, CommandLog> {
    let records = records.into_iter().map(record).collect();
    Calendar::new(
        RecordSet::new(records),
        CommandLog::default(),
        ResolvedConfig::default(),
    )
}

fn id(raw: &str) -> RecordId {
    RecordId::new(raw).unwrap()
}

fn event_spans(row: &[SpanPlacement]) -> Vec<(usize, usize, usize)> {
    row.iter()
        .filter_map(|span| match span.content {
            SpanContent::Event { segment } => Some((segment.event, segment.left, segment.right)),
            _ => None,
        })
        .collect()
}

mod events {
    use super::*;

    #[test]
    fn malformed_records_are_skipped() {
        let mut cal = calendar(vec![
            json!({"_id": "a", "title": "Ok", "start": "2026-10-21"}),
            json!({"_id": "b", "title": "No start"}),
        ]);
        let events = cal.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].title, "Ok");
    }

    #[test]
    fn events_follow_generation() {
        let mut cal = calendar(vec![json!({"_id": "a", "start": "2026-10-21"})]);
        assert_eq!(cal.events().len(), 1);

        cal.provider_mut().replace(vec![
            record(json!({"_id": "a", "start": "2026-10-21"})),
            record(json!({"_id": "b", "start": "2026-10-22"})),
        ]);
        assert_eq!(cal.events().len(), 2);
    }
}

mod rows {
    use super::*;

    #[test]
    fn wednesday_to_friday_event_covers_slots_four_to_six() {
        let mut cal = calendar(vec![json!({
            "_id": "a",
            "start": "2026-10-21",
            "end": "2026-10-23",
        })]);
        let rows = cal.month_rows(&[d(2026, 10, 18)]);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].days.len(), 7);
        assert_eq!(event_spans(&rows[0].levels[0]), vec![(0, 4, 6)]);
        assert!(rows[0].overflow.is_empty());
    }

    #[test]
    fn rows_are_memoized_per_generation_and_starts() {
        let mut cal = calendar(vec![json!({"_id": "a", "start": "2026-10-21"})]);
        let starts = vec![d(2026, 10, 18), d(2026, 10, 25)];
        cal.month_rows(&starts);
        assert!(cal.rows.is_cached(&(1, starts.clone())));

        cal.provider_mut().replace(Vec::new());
        assert!(!cal.rows.is_cached(&(2, starts.clone())));
        let rows = cal.month_rows(&starts);
        assert!(rows.iter().all(|row| row.levels.is_empty()));
    }

    #[test]
    fn month_layout_has_one_row_per_week() {
        let mut cal = calendar(Vec::new());
        let layout = cal.layout(View::Month, d(2026, 10, 19));
        assert_eq!(layout.title, "October 2026");
        match layout.body {
            LayoutBody::Rows { rows } => {
                assert_eq!(rows.len(), 5);
                assert_eq!(rows[0].days[0], d(2026, 9, 27));
            }
            other => panic!("expected rows, got {:?}", other),
        }
    }

    #[test]
    fn year_layout_has_twelve_months() {
        let mut cal = calendar(Vec::new());
        let layout = cal.layout(View::Year, d(2026, 10, 19));
        match layout.body {
            LayoutBody::Year { months } => {
                assert_eq!(months.len(), 12);
                assert_eq!(months[0].month, d(2026, 1, 1));
                assert!(months.iter().all(|m| (4..=6).contains(&m.rows.len())));
            }
            other => panic!("expected year, got {:?}", other),
        }
    }
}

mod time_grid {
    use super::*;

    #[test]
    fn header_refers_to_calendar_event_indices() {
        let mut cal = calendar(vec![
            json!({"_id": "timed", "start": "2026-10-20 09:00", "end": "2026-10-20 10:00"}),
            json!({"_id": "allday", "start": "2026-10-21"}),
        ]);
        let range: Vec<NaiveDate> = d(2026, 10, 18).iter_days().take(7).collect();
        let grid = cal.time_grid(&range);

        assert_eq!(event_spans(&grid.header.levels[0]), vec![(1, 4, 4)]);
        assert_eq!(grid.columns.len(), 7);
        let tuesday = &grid.columns[2];
        assert_eq!(tuesday.date, d(2026, 10, 20));
        assert_eq!(tuesday.events.len(), 1);
        assert_eq!(tuesday.events[0].event, 0);
    }

    #[test]
    fn overlapping_timed_events_share_the_column() {
        let mut cal = calendar(vec![
            json!({"_id": "a", "start": "2026-10-20 09:00", "end": "2026-10-20 11:00"}),
            json!({"_id": "b", "start": "2026-10-20 10:00", "end": "2026-10-20 12:00"}),
        ]);
        let column = cal.day_column(d(2026, 10, 20));
        assert_eq!(column.events.len(), 2);
        assert!(column.events.iter().all(|e| e.width < 100.0));
    }

    #[test]
    fn custom_strategy_replaces_packing() {
        let full_width = |input: &DayLayoutInput<'_>| -> Vec<StyledEvent> {
            input
                .column
                .iter()
                .map(|&event| StyledEvent {
                    event,
                    top: 0.0,
                    height: 100.0,
                    width: 100.0,
                    x_offset: 0.0,
                    padding_px: 0.0,
                })
                .collect()
        };
        let mut cal = calendar(vec![
            json!({"_id": "a", "start": "2026-10-20 09:00", "end": "2026-10-20 11:00"}),
            json!({"_id": "b", "start": "2026-10-20 10:00", "end": "2026-10-20 12:00"}),
        ])
        .with_day_layout(full_width);
        let column = cal.day_column(d(2026, 10, 20));
        assert!(column.events.iter().all(|e| e.width == 100.0));
    }

    #[test]
    fn agenda_skips_empty_days() {
        let mut cal = calendar(vec![json!({"_id": "a", "start": "2026-10-25"})]);
        let days = cal.agenda(d(2026, 10, 19));
        assert_eq!(days.len(), 1);
        assert_eq!(days[0].date, d(2026, 10, 25));
    }
}

mod interaction {
    use super::*;

    #[test]
    fn drop_forwards_changed_intent() {
        let mut cal = calendar(vec![json!({
            "_id": "a",
            "start": "2026-10-20 09:00",
            "end": "2026-10-20 11:00",
        })]);
        let target = DropTarget::TimeSlot(localize(Tz::UTC, d(2026, 10, 22).and_hms_opt(14, 0, 0).unwrap()));
        let intent = cal.drop_event(&id("a"), &target).expect("intent");

        assert_eq!(intent.start.hour(), 14);
        assert_eq!(intent.end - intent.start, Duration::hours(2));
        assert_eq!(cal.sink().edits, vec![intent]);
    }

    #[test]
    fn unchanged_drop_is_not_forwarded() {
        let mut cal = calendar(vec![json!({
            "_id": "a",
            "start": "2026-10-20 09:00",
            "end": "2026-10-20 11:00",
        })]);
        let target = DropTarget::TimeSlot(localize(Tz::UTC, d(2026, 10, 20).and_hms_opt(9, 0, 0).unwrap()));
        assert_eq!(cal.drop_event(&id("a"), &target), None);
        assert!(cal.sink().edits.is_empty());
    }

    #[test]
    fn unknown_event_yields_nothing() {
        let mut cal = calendar(Vec::new());
        assert_eq!(cal.drag_event(&id("ghost"), 40.0, 20.0), None);
    }

    #[test]
    fn drag_moves_by_whole_steps() {
        let mut cal = calendar(vec![json!({
            "_id": "a",
            "start": "2026-10-20 09:00",
            "end": "2026-10-20 11:00",
        })]);
        let intent = cal.drag_event(&id("a"), 20.0, 20.0).expect("intent");
        assert_eq!(intent.start.time(), NaiveTime::from_hms_opt(9, 30, 0).unwrap());
        assert_eq!(intent.end.time(), NaiveTime::from_hms_opt(11, 30, 0).unwrap());
    }

    #[test]
    fn selection_and_drill_down_reach_the_sink() {
        let mut cal = calendar(Vec::new());
        let range: Vec<NaiveDate> = d(2026, 10, 18).iter_days().take(7).collect();
        let selection = cal
            .select_cells(&range, 3, 1, SelectAction::Select, None)
            .expect("selection");
        assert_eq!(selection.slots.len(), 3);

        let target = cal.drill_down(View::Month, d(2026, 10, 21));
        assert_eq!(target.view, View::Day);

        assert_eq!(cal.sink().selections.len(), 1);
        assert_eq!(cal.sink().drill_downs, vec![target]);
    }

    #[test]
    fn hover_is_throttled() {
        let mut cal = calendar(Vec::new());
        let now = Instant::now();
        assert_eq!(cal.hover(now, 3), Some(3));
        assert_eq!(cal.hover(now + StdDuration::from_millis(50), 4), None);
        assert_eq!(cal.hover(now + StdDuration::from_millis(100), 5), Some(5));

        cal.teardown();
        assert_eq!(cal.hover(now + StdDuration::from_millis(110), 6), Some(6));
    }
}

mod scrolling {
    use super::*;

    const VIEWPORT: FixedViewport = FixedViewport {
        height: 600.0,
        row_height: 100,
    };

    #[test]
    fn scroll_without_scroller_is_ignored() {
        let mut cal = calendar(Vec::new());
        assert!(cal.on_scroll(100.0).is_none());
        assert!(cal.visible_month_rows().is_empty());
    }

    #[test]
    fn crossing_into_next_month_navigates_once() {
        let mut cal = calendar(Vec::new());
        cal.attach_scroller(RowUnit::Week, d(2026, 10, 19), &VIEWPORT);
        let start = cal.scroller().unwrap().scroll_top();
        // Synthetic scroll from the initial positioning.
        cal.on_scroll(start);

        let scroller = cal.scroller().unwrap();
        let row = scroller
            .rows()
            .iter()
            .position(|r| *r == d(2026, 11, 15))
            .unwrap();
        let top = scroller.heights().offset_of(row) as f64 + 50.0 - 300.0;

        let outcome = cal.on_scroll(top).unwrap();
        assert!(outcome.scroll_to.is_some());
        assert_eq!(
            cal.sink().navigations,
            vec![DateChange {
                date: d(2026, 11, 1),
                previous: d(2026, 10, 1),
            }]
        );

        // The offset the host applies comes back as one swallowed scroll.
        let applied = cal.on_scroll(outcome.scroll_to.unwrap()).unwrap();
        assert_eq!(applied.date_change, None);
        assert_eq!(cal.sink().navigations.len(), 1);
    }

    #[test]
    fn visible_rows_match_window() {
        let mut cal = calendar(Vec::new());
        let window = cal.attach_scroller(RowUnit::Week, d(2026, 10, 19), &VIEWPORT);
        let rows = cal.visible_month_rows();
        assert_eq!(rows.len(), window.len());
        assert!(rows.iter().all(|row| row.days.len() == 7));
    }

    #[test]
    fn teardown_detaches_scroller() {
        let mut cal = calendar(Vec::new());
        cal.attach_scroller(RowUnit::Month, d(2026, 10, 19), &VIEWPORT);
        assert!(cal.jump_to(d(2027, 3, 1)).is_some());
        cal.teardown();
        assert!(cal.scroller().is_none());
        assert!(cal.jump_to(d(2027, 3, 1)).is_none());
    }
}
