//! Day-by-day event listing for the agenda view.

use chrono::NaiveDate;
use serde::Serialize;

use super::segments::{in_range, sort_events};
use crate::dates::{add_days, ceil_day, start_of_day, Timestamp};
use crate::model::Event;

/// What the time column of an agenda line shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TimeLabel {
    /// All-day event, or a timed event covering the whole day.
    AllDay,
    /// Starts and ends on this day.
    Range {
        /// Start time.
        start: Timestamp,
        /// End time.
        end: Timestamp,
    },
    /// Starts on this day and runs past it.
    Starts {
        /// Start time.
        start: Timestamp,
    },
    /// Started earlier and ends on this day.
    Ends {
        /// End time.
        end: Timestamp,
    },
}

/// One line of the agenda.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgendaItem {
    /// Index into the event slice.
    pub event: usize,
    /// Time column text.
    pub label: TimeLabel,
    /// The event started on an earlier day.
    pub continues_prior: bool,
    /// The event runs into a later day.
    pub continues_after: bool,
}

/// A day of the agenda with at least one event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgendaDay {
    /// The day.
    pub date: NaiveDate,
    /// Events touching the day, in display order.
    pub items: Vec<AgendaItem>,
}

fn label_for(event: &Event, day: NaiveDate) -> (TimeLabel, bool, bool) {
    let next = add_days(day, 1);
    let continues_prior = start_of_day(&event.start) < day;
    let continues_after = ceil_day(&event.end) > next;

    let label = if event.all_day {
        TimeLabel::AllDay
    } else {
        match (continues_prior, continues_after) {
            (false, false) => TimeLabel::Range {
                start: event.start,
                end: event.end,
            },
            (false, true) => TimeLabel::Starts { start: event.start },
            (true, false) => TimeLabel::Ends { end: event.end },
            (true, true) => TimeLabel::AllDay,
        }
    };
    (label, continues_prior, continues_after)
}

/// Group `events` into `length` consecutive days starting at `first`.
///
/// Days without events are omitted. Within a day, items follow render
/// priority order.
pub fn agenda_days(events: &[Event], first: NaiveDate, length: usize) -> Vec<AgendaDay> {
    let order = sort_events(events);
    (0..length as i64)
        .map(|offset| add_days(first, offset))
        .filter_map(|date| {
            let items: Vec<AgendaItem> = order
                .iter()
                .copied()
                .filter(|&i| in_range(&events[i], date, date))
                .map(|i| {
                    let (label, continues_prior, continues_after) = label_for(&events[i], date);
                    AgendaItem {
                        event: i,
                        label,
                        continues_prior,
                        continues_after,
                    }
                })
                .collect();
            (!items.is_empty()).then_some(AgendaDay { date, items })
        })
        .collect()
}
