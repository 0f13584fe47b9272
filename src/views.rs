//! Calendar views: which days each one shows and how it pages.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::dates::{
    add_days, add_months, end_of_week, first_of_month, first_of_year, last_of_month,
    start_of_week, visible_days,
};

/// Default number of days the agenda lists.
pub const DEFAULT_AGENDA_LENGTH: usize = 30;

/// Calendar views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum View {
    /// Month grid of week rows.
    #[default]
    Month,
    /// Seven day columns.
    Week,
    /// Monday to Friday columns.
    WorkWeek,
    /// A single day column.
    Day,
    /// Day-by-day list.
    Agenda,
    /// Twelve small month grids.
    Year,
}

/// Options that affect which days a view covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeOptions {
    /// First day of the week.
    pub week_start: Weekday,
    /// Days covered by the agenda view.
    pub agenda_length: usize,
}

impl Default for RangeOptions {
    fn default() -> Self {
        Self {
            week_start: Weekday::Sun,
            agenda_length: DEFAULT_AGENDA_LENGTH,
        }
    }
}

/// Toolbar navigation action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigate {
    /// One view period back.
    Prev,
    /// One view period forward.
    Next,
    /// Jump to the given "today".
    Today(NaiveDate),
    /// Jump to an arbitrary date.
    Date(NaiveDate),
}

impl View {
    /// Every view, in toolbar order.
    pub const ALL: [View; 6] = [
        View::Month,
        View::Week,
        View::WorkWeek,
        View::Day,
        View::Agenda,
        View::Year,
    ];

    /// Whether the view renders day columns with a time grid.
    pub fn is_time_grid(self) -> bool {
        matches!(self, View::Week | View::WorkWeek | View::Day)
    }

    /// Days shown when the view is anchored on `date`.
    ///
    /// The year view returns the first day of each month.
    pub fn range(self, date: NaiveDate, options: &RangeOptions) -> Vec<NaiveDate> {
        match self {
            View::Month => visible_days(
                start_of_week(first_of_month(date), options.week_start),
                end_of_week(last_of_month(date), options.week_start),
            ),
            View::Week => {
                let first = start_of_week(date, options.week_start);
                visible_days(first, add_days(first, 6))
            }
            View::WorkWeek => {
                let monday = start_of_week(date, Weekday::Mon);
                visible_days(monday, add_days(monday, 4))
            }
            View::Day => vec![date],
            View::Agenda => {
                let length = options.agenda_length.max(1) as i64;
                visible_days(date, add_days(date, length - 1))
            }
            View::Year => {
                let first = first_of_year(date);
                (0..12).map(|m| add_months(first, m)).collect()
            }
        }
    }

    /// Anchor date after a toolbar action.
    pub fn navigate(self, date: NaiveDate, action: Navigate, options: &RangeOptions) -> NaiveDate {
        let direction = match action {
            Navigate::Today(today) => return today,
            Navigate::Date(target) => return target,
            Navigate::Prev => -1,
            Navigate::Next => 1,
        };
        match self {
            View::Month => add_months(date, direction),
            View::Week | View::WorkWeek => add_days(date, 7 * i64::from(direction)),
            View::Day => add_days(date, i64::from(direction)),
            View::Agenda => add_days(date, options.agenda_length.max(1) as i64 * i64::from(direction)),
            View::Year => add_months(date, 12 * direction),
        }
    }

    /// Toolbar label for the range the view shows around `date`.
    pub fn title(self, date: NaiveDate, options: &RangeOptions) -> String {
        match self {
            View::Month => date.format("%B %Y").to_string(),
            View::Day => date.format("%A %b %d, %Y").to_string(),
            View::Year => date.year().to_string(),
            View::Week | View::WorkWeek | View::Agenda => {
                let range = self.range(date, options);
                match (range.first(), range.last()) {
                    (Some(first), Some(last)) if first.year() == last.year() => format!(
                        "{} - {}",
                        first.format("%b %d"),
                        last.format("%b %d, %Y")
                    ),
                    (Some(first), Some(last)) => format!(
                        "{} - {}",
                        first.format("%b %d, %Y"),
                        last.format("%b %d, %Y")
                    ),
                    _ => String::new(),
                }
            }
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            View::Month => "month",
            View::Week => "week",
            View::WorkWeek => "work-week",
            View::Day => "day",
            View::Agenda => "agenda",
            View::Year => "year",
        })
    }
}

/// Error for an unrecognized view name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown view '{0}' (expected month, week, work-week, day, agenda or year)")]
pub struct UnknownView(pub String);

impl FromStr for View {
    type Err = UnknownView;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "month" => Ok(View::Month),
            "week" => Ok(View::Week),
            "work-week" | "work_week" | "workweek" => Ok(View::WorkWeek),
            "day" => Ok(View::Day),
            "agenda" => Ok(View::Agenda),
            "year" => Ok(View::Year),
            other => Err(UnknownView(other.to_string())),
        }
    }
}
