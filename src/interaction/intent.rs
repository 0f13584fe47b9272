//! Intents emitted to the host. The engine never edits source data itself.

use chrono::NaiveDate;
use serde::Serialize;

use crate::dates::Timestamp;
use crate::model::{Event, RecordId};
use crate::views::View;

/// Proposed new placement of an event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EditIntent {
    /// Record being moved.
    pub event: RecordId,
    /// Proposed start.
    pub start: Timestamp,
    /// Proposed end.
    pub end: Timestamp,
    /// Proposed all-day flag.
    pub all_day: bool,
}

impl EditIntent {
    /// An intent that leaves `event` where it is.
    pub fn unchanged(event: &Event) -> Self {
        Self {
            event: event.id.clone(),
            start: event.start,
            end: event.end,
            all_day: event.all_day,
        }
    }

    /// Whether applying the intent would change anything.
    pub fn changes(&self, event: &Event) -> bool {
        self.start != event.start || self.end != event.end || self.all_day != event.all_day
    }
}

/// Navigation to a more detailed view of a date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DrillDown {
    /// Date to open.
    pub date: NaiveDate,
    /// View to open it in.
    pub view: View,
}

impl DrillDown {
    /// Drill down from `from` into `date`: year goes to month, everything
    /// else to day.
    pub fn from_view(from: View, date: NaiveDate) -> Self {
        let view = match from {
            View::Year => View::Month,
            _ => View::Day,
        };
        Self { date, view }
    }
}
