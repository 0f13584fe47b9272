//! Slot selection in the month grid and in day columns.

use chrono::NaiveDate;
use chrono_tz::Tz;
use serde::Serialize;

use crate::dates::{add_days, day_start, Timestamp};
use crate::layout::time_slot_metrics::TimeSlotMetrics;
use crate::layout::types::Bounds;

/// Gesture that produced a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectAction {
    /// Single click on one slot.
    Click,
    /// Double click on one slot.
    DoubleClick,
    /// Pointer dragged across several slots.
    Select,
}

/// A selected run of slots. `end` is the boundary after the last slot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlotSelection {
    /// Start of every selected slot.
    pub slots: Vec<Timestamp>,
    /// Start of the first slot.
    pub start: Timestamp,
    /// Boundary after the last slot.
    pub end: Timestamp,
    /// Gesture that made the selection.
    pub action: SelectAction,
    /// Screen box of the selection, when the host measured one.
    pub bounds: Option<Bounds>,
}

/// Select day cells `from..=to` (0-based, either order) of a month row.
///
/// Returns `None` when either index is outside `range`.
pub fn select_date_cells(
    range: &[NaiveDate],
    from: usize,
    to: usize,
    tz: Tz,
    action: SelectAction,
    bounds: Option<Bounds>,
) -> Option<SlotSelection> {
    let (lo, hi) = (from.min(to), from.max(to));
    let days = range.get(lo..=hi)?;
    let last = *days.last()?;
    let slots: Vec<Timestamp> = days.iter().map(|d| day_start(tz, *d)).collect();
    Some(SlotSelection {
        start: slots[0],
        end: day_start(tz, add_days(last, 1)),
        slots,
        action,
        bounds,
    })
}

/// Select the time slots between `anchor` and `current` in a day column.
///
/// Both ends snap to their slot; the selection always covers at least one
/// slot.
pub fn select_time_slots(
    metrics: &TimeSlotMetrics,
    anchor: &Timestamp,
    current: &Timestamp,
    action: SelectAction,
    bounds: Option<Bounds>,
) -> SlotSelection {
    let a = metrics.closest_slot_from_date(anchor, 0);
    let b = metrics.closest_slot_from_date(current, 0);
    let (first, last) = if a <= b { (a, b) } else { (b, a) };

    let mut slots = vec![first];
    let mut cursor = first;
    while cursor < last {
        cursor = metrics.next_slot(&cursor);
        slots.push(cursor);
    }
    let end = metrics.next_slot(&last);

    SlotSelection {
        slots,
        start: first,
        end,
        action,
        bounds,
    }
}
