//! Event-to-segment projection for a row of days.
//!
//! A week row in the month grid (or the all-day header of a week view) shows a
//! fixed range of days. Each event touching the row becomes a [`Segment`]: the
//! 1-based slots it covers within that row.

use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;
use std::cmp::Ordering;

use crate::dates::{add_days, ceil_day, start_of_day};
use crate::model::Event;

/// An event's projection onto one row's day range.
///
/// # Invariants
/// - `1 <= left <= right <= range.len()`
/// - `span == right - left + 1`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Segment {
    /// Index of the event in the slice the segment was projected from.
    pub event: usize,
    /// First covered slot, 1-based.
    pub left: usize,
    /// Last covered slot, 1-based, inclusive.
    pub right: usize,
    /// Number of covered slots.
    pub span: usize,
}

impl Segment {
    /// Whether the segment covers 1-based `slot`.
    pub fn covers(&self, slot: usize) -> bool {
        self.left <= slot && self.right >= slot
    }

    /// Whether the two segments share at least one slot.
    pub fn overlaps(&self, other: &Segment) -> bool {
        other.left <= self.right && other.right >= self.left
    }
}

/// First day of the range and the (exclusive) day after its last day.
pub fn end_of_range(range: &[NaiveDate]) -> Option<(NaiveDate, NaiveDate)> {
    let first = *range.first()?;
    let last = *range.last()?;
    Some((first, add_days(last, 1)))
}

/// Whether `event` touches any day from `first` through `last` (inclusive).
///
/// A zero-length event sitting exactly on a day boundary still belongs to the
/// day it starts.
pub fn in_range(event: &Event, first: NaiveDate, last: NaiveDate) -> bool {
    let event_day = start_of_day(&event.start);
    let starts_before_end = event_day <= last;

    let end = event.end.naive_local();
    let range_start = first.and_time(NaiveTime::MIN);
    let ends_after_start = if event_day.and_time(NaiveTime::MIN) != end {
        end > range_start
    } else {
        end >= range_start
    };

    starts_before_end && ends_after_start
}

/// Project a single event onto `range`.
///
/// Returns `None` for events entirely outside the range.
pub fn event_segment(index: usize, event: &Event, range: &[NaiveDate]) -> Option<Segment> {
    let (first, last) = end_of_range(range)?;
    if !in_range(event, first, add_days(last, -1)) {
        return None;
    }

    let slots = (last - first).num_days();
    let start = start_of_day(&event.start).max(first);
    let end = ceil_day(&event.end).min(last);

    let padding = range.iter().position(|d| *d >= start)?;
    let span = (end - start).num_days().min(slots).max(1) as usize;

    let left = padding + 1;
    let right = (padding + span).clamp(left, range.len());
    Some(Segment {
        event: index,
        left,
        right,
        span: right - left + 1,
    })
}

/// Render priority of two events.
///
/// Earlier start day first, then the longer event, then all-day before
/// timed, then start instant, then end instant.
pub fn compare_events(a: &Event, b: &Event) -> Ordering {
    start_of_day(&a.start)
        .cmp(&start_of_day(&b.start))
        .then_with(|| b.day_span().cmp(&a.day_span()))
        .then_with(|| b.all_day.cmp(&a.all_day))
        .then_with(|| a.start.cmp(&b.start))
        .then_with(|| a.end.cmp(&b.end))
}

/// Indices of `events` in render priority order.
pub fn sort_events(events: &[Event]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..events.len()).collect();
    order.sort_by(|&a, &b| compare_events(&events[a], &events[b]));
    order
}

/// All segments of one row, in render priority order.
pub fn row_segments(events: &[Event], range: &[NaiveDate]) -> Vec<Segment> {
    sort_events(events)
        .into_iter()
        .filter_map(|index| event_segment(index, &events[index], range))
        .collect()
}
