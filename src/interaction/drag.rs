//! Drag-and-drop time resolution.

use chrono::{Duration, NaiveDate};
use chrono_tz::Tz;
use serde::Serialize;

use super::intent::EditIntent;
use crate::dates::{add_days, day_start, merge, start_of_day, Timestamp};
use crate::model::Event;

/// Duration given to an all-day event dropped onto a timed slot.
pub const DEFAULT_TIMED_MINUTES: i64 = 30;

/// Where a dragged event was released.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "at", rename_all = "snake_case")]
pub enum DropTarget {
    /// A slot of a day column's time grid.
    TimeSlot(Timestamp),
    /// A day of the all-day header above the time grid.
    AllDaySlot(NaiveDate),
    /// A day cell of the month grid.
    DateCell(NaiveDate),
}

/// Whole calendar days an all-day event occupies (at least one).
fn all_day_days(event: &Event) -> i64 {
    event.day_span().max(1)
}

/// New placement for `event` dropped on `target`.
///
/// Like-to-like drops keep the duration. A timed event dropped on the
/// all-day header collapses to a single all-day day; an all-day event dropped
/// on a timed slot gets [`DEFAULT_TIMED_MINUTES`]. Date cells keep the time
/// of day.
pub fn resolve_drop(event: &Event, target: &DropTarget, tz: Tz) -> EditIntent {
    let (start, end, all_day) = match (target, event.all_day) {
        (DropTarget::TimeSlot(slot), true) => {
            (*slot, *slot + Duration::minutes(DEFAULT_TIMED_MINUTES), false)
        }
        (DropTarget::TimeSlot(slot), false) => (*slot, *slot + event.duration(), false),
        (DropTarget::AllDaySlot(date), false) => {
            let midnight = day_start(tz, *date);
            (midnight, midnight, true)
        }
        (DropTarget::AllDaySlot(date) | DropTarget::DateCell(date), true) => {
            let days = if event.start == event.end { 0 } else { all_day_days(event) };
            (day_start(tz, *date), day_start(tz, add_days(*date, days)), true)
        }
        (DropTarget::DateCell(date), false) => {
            let start = merge(tz, *date, &event.start);
            (start, start + event.duration(), false)
        }
    };

    EditIntent {
        event: event.id.clone(),
        start,
        end,
        all_day,
    }
}

/// Move a timed event by a pointer delta, quantized to whole slots.
pub fn resolve_drag_delta(event: &Event, delta_px: f64, slot_height_px: f64, step: u32) -> EditIntent {
    let slots = slots_for(delta_px, slot_height_px);
    let shift = Duration::minutes(slots * i64::from(step.max(1)));
    EditIntent {
        event: event.id.clone(),
        start: event.start + shift,
        end: event.end + shift,
        all_day: event.all_day,
    }
}

/// Whole slots covered by a pixel delta, rounded to the nearest slot.
pub(crate) fn slots_for(delta_px: f64, slot_height_px: f64) -> i64 {
    if slot_height_px <= 0.0 || !delta_px.is_finite() {
        return 0;
    }
    (delta_px / slot_height_px).round() as i64
}

/// Whether the drop lands on the day the event already starts on.
pub fn is_same_day_drop(event: &Event, target: &DropTarget) -> bool {
    match target {
        DropTarget::TimeSlot(slot) => start_of_day(slot) == start_of_day(&event.start),
        DropTarget::AllDaySlot(date) | DropTarget::DateCell(date) => {
            *date == start_of_day(&event.start)
        }
    }
}
