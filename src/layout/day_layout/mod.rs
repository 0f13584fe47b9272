//! Horizontal packing of timed events within a day column.
//!
//! Two built-in algorithms are provided:
//!
//! - [`DayLayoutAlgorithm::Overlap`]: events that start close together share
//!   a row and are drawn slightly wider than their column so they overlap.
//! - [`DayLayoutAlgorithm::NoOverlap`]: every event gets its own column
//!   among the events it intersects, so nothing overlaps.
//!
//! Callers can substitute their own packing by implementing
//! [`DayLayoutStrategy`] (closures taking a [`DayLayoutInput`] qualify).

mod no_overlap;
mod overlap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::segments::in_range;
use super::time_slot_metrics::TimeSlotMetrics;
use crate::model::Event;

pub use no_overlap::no_overlap_layout;
pub use overlap::overlap_layout;

/// Placement of one timed event inside a day column. All values are percent
/// of the column except `padding_px`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StyledEvent {
    /// Index into the event slice of the layout input.
    pub event: usize,
    /// Offset from the column top.
    pub top: f64,
    /// Height.
    pub height: f64,
    /// Width.
    pub width: f64,
    /// Offset from the column's left edge.
    pub x_offset: f64,
    /// Pixels to shave from the left edge (and width) to separate columns.
    pub padding_px: f64,
}

/// Everything a packing strategy gets to see.
#[derive(Debug, Clone, Copy)]
pub struct DayLayoutInput<'a> {
    /// All events of the calendar.
    pub events: &'a [Event],
    /// Indices of the events that belong to this column.
    pub column: &'a [usize],
    /// Events starting closer than this many minutes share a row.
    pub minimum_start_difference: i64,
    /// Minimum rendered height in minutes.
    pub minimum_minutes: i64,
    /// Geometry of the column.
    pub slot_metrics: &'a TimeSlotMetrics,
}

/// A pluggable day-column packing.
pub trait DayLayoutStrategy {
    /// Place the column's events.
    fn layout(&self, input: &DayLayoutInput<'_>) -> Vec<StyledEvent>;
}

impl<F> DayLayoutStrategy for F
where
    F: Fn(&DayLayoutInput<'_>) -> Vec<StyledEvent>,
{
    fn layout(&self, input: &DayLayoutInput<'_>) -> Vec<StyledEvent> {
        self(input)
    }
}

/// Built-in packing algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DayLayoutAlgorithm {
    /// Events in a row may overlap horizontally.
    #[default]
    Overlap,
    /// Events never overlap; columns widen instead.
    NoOverlap,
}

impl DayLayoutStrategy for DayLayoutAlgorithm {
    fn layout(&self, input: &DayLayoutInput<'_>) -> Vec<StyledEvent> {
        match self {
            Self::Overlap => overlap_layout(input),
            Self::NoOverlap => no_overlap_layout(input),
        }
    }
}

impl fmt::Display for DayLayoutAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Overlap => "overlap",
            Self::NoOverlap => "no-overlap",
        })
    }
}

/// Error for an unknown algorithm name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown day layout algorithm '{0}' (expected 'overlap' or 'no-overlap')")]
pub struct UnknownDayLayout(pub String);

impl FromStr for DayLayoutAlgorithm {
    type Err = UnknownDayLayout;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "overlap" => Ok(Self::Overlap),
            "no-overlap" | "no_overlap" | "nooverlap" => Ok(Self::NoOverlap),
            other => Err(UnknownDayLayout(other.to_string())),
        }
    }
}

/// Split events into those shown in the all-day header and those placed in
/// the time grid.
///
/// All-day events and events spanning more than one calendar day go to the
/// header. Returns `(all_day, timed)` index lists.
pub fn split_time_grid_events(events: &[Event]) -> (Vec<usize>, Vec<usize>) {
    (0..events.len()).partition(|&i| {
        let event = &events[i];
        event.all_day || event.day_span() > 1
    })
}

/// Timed events (from `timed`) that touch `date`.
pub fn column_events(events: &[Event], timed: &[usize], date: NaiveDate) -> Vec<usize> {
    timed
        .iter()
        .copied()
        .filter(|&i| in_range(&events[i], date, date))
        .collect()
}

/// Lay out one day column with `strategy`.
pub fn layout_day_column(
    strategy: &dyn DayLayoutStrategy,
    input: &DayLayoutInput<'_>,
) -> Vec<StyledEvent> {
    strategy.layout(input)
}
