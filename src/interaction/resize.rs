//! Edge resizing of events.

use chrono::{Duration, NaiveDate, NaiveTime, Timelike};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use super::drag::slots_for;
use super::intent::EditIntent;
use crate::dates::{add_days, ceil_day, day_start, localize, merge, start_of_day, Timestamp};
use crate::model::Event;

/// Shortest event a time-grid resize can leave behind.
pub const MIN_RESIZE_MINUTES: i64 = 30;

/// Which end of an event is being dragged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResizeEdge {
    /// Top of a time-grid event or left end of a row span.
    Start,
    /// Bottom of a time-grid event or right end of a row span.
    End,
}

/// Round `ts` to the nearest `step`-minute boundary of its wall-clock day.
fn snap_to_step(ts: Timestamp, step: i64) -> Timestamp {
    let local = ts.naive_local();
    let minute_of_day = i64::from(local.hour()) * 60 + i64::from(local.minute());
    let snapped = ((minute_of_day as f64 / step as f64).round() as i64) * step;
    localize(
        ts.timezone(),
        local.date().and_time(NaiveTime::MIN) + Duration::minutes(snapped),
    )
}

/// Drag one edge of a timed event by `delta_px` in a day column.
///
/// The moved edge lands on a slot boundary and never comes closer than
/// [`MIN_RESIZE_MINUTES`] to the fixed edge.
pub fn resolve_resize(
    event: &Event,
    edge: ResizeEdge,
    delta_px: f64,
    slot_height_px: f64,
    step: u32,
) -> EditIntent {
    let step = i64::from(step.max(1));
    let slots = slots_for(delta_px, slot_height_px);
    let mut intent = EditIntent::unchanged(event);
    if slots == 0 {
        return intent;
    }

    let minimum = Duration::minutes(MIN_RESIZE_MINUTES);
    let long_enough = event.end - event.start >= minimum;
    let shift = Duration::minutes(slots * step);

    match edge {
        ResizeEdge::Start => {
            let latest = if long_enough { event.end - minimum } else { event.start };
            intent.start = snap_to_step(event.start + shift, step).min(latest);
        }
        ResizeEdge::End => {
            let earliest = if long_enough { event.start + minimum } else { event.end };
            intent.end = snap_to_step(event.end + shift, step).max(earliest);
        }
    }
    intent
}

/// Drag one edge of an event across month-grid day cells onto `date`.
///
/// The moved edge stops at the fixed edge's day. All-day events keep whole
/// days; timed events keep their time of day.
pub fn resolve_day_resize(event: &Event, edge: ResizeEdge, date: NaiveDate, tz: Tz) -> EditIntent {
    let first_day = start_of_day(&event.start);
    let last_day = add_days(ceil_day(&event.end), -1).max(first_day);
    let mut intent = EditIntent::unchanged(event);

    match (edge, event.all_day) {
        (ResizeEdge::Start, true) => intent.start = day_start(tz, date.min(last_day)),
        (ResizeEdge::Start, false) => intent.start = merge(tz, date.min(last_day), &event.start),
        (ResizeEdge::End, true) => intent.end = day_start(tz, add_days(date.max(first_day), 1)),
        (ResizeEdge::End, false) => intent.end = merge(tz, date.max(first_day), &event.end),
    }
    if intent.end < intent.start {
        intent.end = intent.start;
    }
    intent
}
