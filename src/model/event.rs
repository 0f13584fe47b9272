//! Calendar events resolved from source records.

use chrono::Duration;
use serde::Serialize;

use super::identifiers::{RecordId, ResourceId};
use crate::dates::{ceil_day, start_of_day, Timestamp};

/// An event as the layout engine sees it.
///
/// # Invariants
/// - `start <= end` (enforced by [`Event::new`])
/// - All-day events span whole days; their time of day is ignored by layout.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Event {
    /// Back-reference to the host row.
    pub id: RecordId,
    /// Opaque display title.
    pub title: String,
    /// First instant.
    pub start: Timestamp,
    /// Exclusive end.
    pub end: Timestamp,
    /// Shown in the all-day row rather than a time column.
    pub all_day: bool,
    /// Resource the event is booked against.
    pub resource_id: Option<ResourceId>,
}

impl Event {
    /// Build an event, collapsing a degenerate `end < start` to `end = start`.
    pub fn new(
        id: RecordId,
        title: impl Into<String>,
        start: Timestamp,
        end: Timestamp,
        all_day: bool,
    ) -> Self {
        let end = if end < start { start } else { end };
        Self {
            id,
            title: title.into(),
            start,
            end,
            all_day,
            resource_id: None,
        }
    }

    /// Attach a resource.
    pub fn with_resource(mut self, resource_id: Option<ResourceId>) -> Self {
        self.resource_id = resource_id;
        self
    }

    /// Elapsed duration between start and end.
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Number of calendar days the event touches, counting a zero-length event
    /// as zero and an event ending at midnight as ending the previous day.
    pub fn day_span(&self) -> i64 {
        (ceil_day(&self.end) - start_of_day(&self.start)).num_days()
    }
}
