//! Per-row metrics for a range of days.

use chrono::NaiveDate;

use super::levels::{event_levels, Levels};
use super::segments::{end_of_range, row_segments, Segment};
use crate::dates::{ceil_day, start_of_day};
use crate::model::Event;

/// Segments, lanes and slot lookups for one row of days.
///
/// One lane is kept back for the "+N more" row, so with `max_rows = Some(n)`
/// at most `max(n - 1, 1)` lanes hold events.
#[derive(Debug, Clone, PartialEq)]
pub struct DateSlotMetrics {
    range: Vec<NaiveDate>,
    first: NaiveDate,
    last: NaiveDate,
    segments: Vec<Segment>,
    levels: Levels,
}

impl DateSlotMetrics {
    /// Compute metrics for `range`.
    ///
    /// `min_rows` pads the lane list with empty lanes so rows keep a stable
    /// height.
    pub fn new(
        range: Vec<NaiveDate>,
        events: &[Event],
        max_rows: Option<usize>,
        min_rows: usize,
    ) -> Self {
        let (first, last) = end_of_range(&range).unwrap_or((NaiveDate::MIN, NaiveDate::MIN));
        let segments = row_segments(events, &range);
        let limit = max_rows.map(|rows| rows.saturating_sub(1).max(1));
        let mut levels = event_levels(&segments, limit);
        while levels.levels.len() < min_rows {
            levels.levels.push(Vec::new());
        }
        Self {
            range,
            first,
            last,
            segments,
            levels,
        }
    }

    /// Days of the row.
    pub fn range(&self) -> &[NaiveDate] {
        &self.range
    }

    /// Number of day slots in the row.
    pub fn slots(&self) -> usize {
        self.range.len()
    }

    /// First day of the row.
    pub fn first(&self) -> NaiveDate {
        self.first
    }

    /// Day after the row's last day.
    pub fn last(&self) -> NaiveDate {
        self.last
    }

    /// Every segment, in sort order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Lanes, top to bottom.
    pub fn levels(&self) -> &[Vec<Segment>] {
        &self.levels.levels
    }

    /// Segments that did not fit in a lane.
    pub fn extra(&self) -> &[Segment] {
        &self.levels.extra
    }

    /// Date of 0-based slot `slot`.
    pub fn date_for_slot(&self, slot: usize) -> Option<NaiveDate> {
        self.range.get(slot).copied()
    }

    /// 0-based slot showing `date`.
    pub fn slot_for_date(&self, date: NaiveDate) -> Option<usize> {
        self.range.iter().position(|d| *d == date)
    }

    /// Event indices covering 1-based `slot`, in render order.
    pub fn events_for_slot(&self, slot: usize) -> Vec<usize> {
        self.segments
            .iter()
            .filter(|s| s.covers(slot))
            .map(|s| s.event)
            .collect()
    }

    /// Whether the event started before this row.
    pub fn continues_prior(&self, event: &Event) -> bool {
        start_of_day(&event.start) < self.first
    }

    /// Whether the event runs past this row.
    pub fn continues_after(&self, event: &Event) -> bool {
        ceil_day(&event.end) > self.last
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dates::{day_start, visible_days};
    use crate::model::RecordId;
    use chrono_tz::UTC;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
    }

    fn all_day(id: &str, first: u32, last_inclusive: u32) -> Event {
        Event::new(
            RecordId::new(id).unwrap(),
            id,
            day_start(UTC, date(first)),
            day_start(UTC, date(last_inclusive + 1)),
            true,
        )
    }

    fn week() -> Vec<NaiveDate> {
        visible_days(date(19), date(25))
    }

    #[test]
    fn reserves_one_lane_for_show_more() {
        let events: Vec<_> = (0..4).map(|i| all_day(&format!("e{i}"), 19, 25)).collect();
        let metrics = DateSlotMetrics::new(week(), &events, Some(3), 0);
        assert_eq!(metrics.levels().len(), 2);
        assert_eq!(metrics.extra().len(), 2);
    }

    #[test]
    fn unlimited_rows_keep_every_event() {
        let events: Vec<_> = (0..4).map(|i| all_day(&format!("e{i}"), 19, 25)).collect();
        let metrics = DateSlotMetrics::new(week(), &events, None, 0);
        assert_eq!(metrics.levels().len(), 4);
        assert!(metrics.extra().is_empty());
    }

    #[test]
    fn min_rows_pads_with_empty_lanes() {
        let metrics = DateSlotMetrics::new(week(), &[], Some(5), 3);
        assert_eq!(metrics.levels().len(), 3);
        assert!(metrics.levels().iter().all(|l| l.is_empty()));
    }

    #[test]
    fn slot_lookups() {
        let metrics = DateSlotMetrics::new(week(), &[], None, 0);
        assert_eq!(metrics.slots(), 7);
        assert_eq!(metrics.date_for_slot(2), Some(date(21)));
        assert_eq!(metrics.slot_for_date(date(25)), Some(6));
        assert_eq!(metrics.slot_for_date(date(26)), None);
        assert_eq!(metrics.first(), date(19));
        assert_eq!(metrics.last(), date(26));
    }

    #[test]
    fn continuation_flags() {
        let events = vec![all_day("long", 15, 28), all_day("inside", 20, 21)];
        let metrics = DateSlotMetrics::new(week(), &events, None, 0);
        assert!(metrics.continues_prior(&events[0]));
        assert!(metrics.continues_after(&events[0]));
        assert!(!metrics.continues_prior(&events[1]));
        assert!(!metrics.continues_after(&events[1]));
    }

    #[test]
    fn events_for_slot_lists_covering_events() {
        let events = vec![all_day("a", 19, 21), all_day("b", 21, 22)];
        let metrics = DateSlotMetrics::new(week(), &events, None, 0);
        assert_eq!(metrics.events_for_slot(3), vec![0, 1]);
        assert_eq!(metrics.events_for_slot(5), Vec::<usize>::new());
    }
}
