//! Infinite scrolling over week rows (month view) or month rows (year view).
//!
//! The scroller keeps a finite list of row start dates centered on the
//! current period (a month for week rows, a year for month rows). The row at
//! the viewport center decides which period is current. When it moves into
//! another period the list is regenerated around that period and the scroll
//! offset is re-expressed so the same row stays at the same fraction under
//! the viewport center; the caller applies the returned offset.
//!
//! Applying an offset makes the host fire one synthetic scroll event. The
//! scroller swallows the next scroll after any programmatic reposition.

use chrono::{NaiveDate, Weekday};
use serde::Serialize;
use tracing::debug;

use super::height_index::HeightIndex;
use super::window::VirtualWindow;
use crate::dates::{
    add_days, add_months, end_of_week, first_of_month, first_of_year, last_of_month,
    start_of_week, weeks_in_month,
};

/// What a row of the scroller shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RowUnit {
    /// One week per row; the current period is a month.
    Week,
    /// One month per row; the current period is a year.
    Month,
}

/// Pixel height of each row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowHeights {
    /// Every row has the same height.
    Uniform(usize),
    /// A header plus a band per displayed week; month rows grow with the
    /// number of weeks their grid needs.
    ByWeeks {
        /// Header height.
        header: usize,
        /// Height of one week band.
        per_week: usize,
    },
}

impl RowHeights {
    fn height_of(&self, unit: RowUnit, row_start: NaiveDate, week_start: Weekday) -> usize {
        let height = match (*self, unit) {
            (RowHeights::Uniform(px), _) => px,
            (RowHeights::ByWeeks { header, per_week }, RowUnit::Week) => header + per_week,
            (RowHeights::ByWeeks { header, per_week }, RowUnit::Month) => {
                header + per_week * weeks_in_month(row_start, week_start)
            }
        };
        height.max(1)
    }
}

/// How an [`InfiniteScroller`] builds its rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollerOptions {
    /// What one row shows.
    pub unit: RowUnit,
    /// Estimated row heights.
    pub heights: RowHeights,
    /// First day of the week for week rows.
    pub week_start: Weekday,
    /// Periods generated on each side of the current one.
    pub span: u32,
    /// Rows rendered beyond each edge of the viewport.
    pub overscan: usize,
}

impl Default for ScrollerOptions {
    fn default() -> Self {
        Self {
            unit: RowUnit::Week,
            heights: RowHeights::Uniform(120),
            week_start: Weekday::Sun,
            span: 3,
            overscan: 4,
        }
    }
}

/// Whether the user is currently scrolling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollPhase {
    /// No scroll in progress.
    #[default]
    Idle,
    /// Scroll events are arriving.
    Scrolling,
}

/// Logical navigation caused by scrolling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateChange {
    /// First day of the new current period.
    pub date: NaiveDate,
    /// First day of the period scrolled away from.
    pub previous: NaiveDate,
}

/// Result of feeding one scroll event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScrollOutcome {
    /// Rows to render.
    pub window: VirtualWindow,
    /// Set when the current period changed.
    pub date_change: Option<DateChange>,
    /// Offset the caller must apply after the row list was regenerated.
    pub scroll_to: Option<f64>,
}

/// Virtualized list of week or month rows that regenerates around the
/// period under the viewport center.
#[derive(Debug, Clone)]
pub struct InfiniteScroller {
    options: ScrollerOptions,
    viewport_height: f64,
    rows: Vec<NaiveDate>,
    heights: HeightIndex,
    scroll_top: f64,
    phase: ScrollPhase,
    /// Swallow the next scroll event; set after a programmatic reposition
    /// that moves the viewport.
    ignore_next_scroll: bool,
    current: NaiveDate,
}

impl InfiniteScroller {
    /// Build a scroller positioned on the period containing `anchor`.
    pub fn new(options: ScrollerOptions, anchor: NaiveDate, viewport_height: f64) -> Self {
        let mut scroller = Self {
            options,
            viewport_height: viewport_height.max(0.0),
            rows: Vec::new(),
            heights: HeightIndex::new(0),
            scroll_top: 0.0,
            phase: ScrollPhase::Idle,
            ignore_next_scroll: false,
            current: anchor,
        };
        scroller.jump_to(anchor);
        scroller
    }

    /// First day of the period `date` belongs to.
    pub fn period_of(&self, date: NaiveDate) -> NaiveDate {
        match self.options.unit {
            RowUnit::Week => first_of_month(date),
            RowUnit::Month => first_of_year(date),
        }
    }

    /// Period a row is attributed to: week rows by their middle day.
    fn row_period(&self, row_start: NaiveDate) -> NaiveDate {
        match self.options.unit {
            RowUnit::Week => first_of_month(add_days(row_start, 3)),
            RowUnit::Month => first_of_year(row_start),
        }
    }

    fn generate_rows(&self, period: NaiveDate) -> Vec<NaiveDate> {
        let span = self.options.span as i32;
        match self.options.unit {
            RowUnit::Week => {
                let week_start = self.options.week_start;
                let first = start_of_week(add_months(period, -span), week_start);
                let last = end_of_week(last_of_month(add_months(period, span)), week_start);
                first
                    .iter_weeks()
                    .take_while(|start| *start <= last)
                    .collect()
            }
            RowUnit::Month => {
                let first = add_months(period, -12 * span);
                let months = 12 * (2 * span + 1);
                (0..months).map(|m| add_months(first, m)).collect()
            }
        }
    }

    fn rebuild(&mut self, period: NaiveDate) {
        self.rows = self.generate_rows(period);
        let (unit, heights, week_start) =
            (self.options.unit, self.options.heights, self.options.week_start);
        self.heights = HeightIndex::from_heights(
            self.rows
                .iter()
                .map(|row| heights.height_of(unit, *row, week_start)),
        );
        self.current = period;
    }

    /// Index of the row under the viewport center.
    fn focus_row(&self) -> usize {
        let center = (self.scroll_top + self.viewport_height / 2.0).max(0.0);
        self.heights
            .lower_bound(center.floor() as usize)
            .unwrap_or(self.rows.len().saturating_sub(1))
    }

    fn max_scroll(&self) -> f64 {
        (self.heights.total() as f64 - self.viewport_height).max(0.0)
    }

    /// Feed a scroll event.
    pub fn on_scroll(&mut self, scroll_top: f64) -> ScrollOutcome {
        self.scroll_top = scroll_top.max(0.0);
        if self.ignore_next_scroll {
            self.ignore_next_scroll = false;
            return self.outcome(None, None);
        }
        self.phase = ScrollPhase::Scrolling;

        if self.rows.is_empty() {
            return self.outcome(None, None);
        }

        let focus = self.focus_row();
        let row_start = self.rows[focus];
        let period = self.row_period(row_start);
        if period == self.current {
            return self.outcome(None, None);
        }

        let row_top = self.heights.offset_of(focus) as f64;
        let row_height = self.heights.height(focus).unwrap_or(1) as f64;
        let center = self.scroll_top + self.viewport_height / 2.0;
        let fraction = ((center - row_top) / row_height).clamp(0.0, 1.0);

        let previous = self.current;
        let reported_top = self.scroll_top;
        self.rebuild(period);
        let Some(new_focus) = self.rows.iter().position(|start| *start == row_start) else {
            return self.outcome(None, None);
        };
        let new_top = self.heights.offset_of(new_focus) as f64;
        let new_height = self.heights.height(new_focus).unwrap_or(1) as f64;
        let new_center = new_top + fraction * new_height;
        self.scroll_top = (new_center - self.viewport_height / 2.0).clamp(0.0, self.max_scroll());
        // Applying an unchanged offset fires no scroll event.
        self.ignore_next_scroll = self.scroll_top != reported_top;

        debug!(
            from = %previous,
            to = %period,
            rows = self.rows.len(),
            scroll_top = self.scroll_top,
            "scroller re-centered"
        );

        let change = DateChange {
            date: period,
            previous,
        };
        self.outcome(Some(change), Some(self.scroll_top))
    }

    /// The host reports scrolling stopped.
    pub fn on_scroll_end(&mut self) {
        self.phase = ScrollPhase::Idle;
    }

    /// Re-center on the period containing `date` and put the row holding the
    /// period's first day at the top of the viewport. Returns the offset to
    /// apply; no date change is reported.
    pub fn jump_to(&mut self, date: NaiveDate) -> f64 {
        let period = self.period_of(date);
        let previous_top = self.scroll_top;
        self.rebuild(period);
        let first_row = self
            .rows
            .iter()
            .rposition(|start| *start <= period)
            .unwrap_or(0);
        self.scroll_top = (self.heights.offset_of(first_row) as f64).min(self.max_scroll());
        self.ignore_next_scroll |= self.scroll_top != previous_top;
        self.phase = ScrollPhase::Idle;
        debug!(period = %period, scroll_top = self.scroll_top, "scroller jumped");
        self.scroll_top
    }

    /// The viewport changed size.
    pub fn resize(&mut self, viewport_height: f64) -> VirtualWindow {
        self.viewport_height = viewport_height.max(0.0);
        self.window()
    }

    /// Record a measured row height.
    pub fn set_row_height(&mut self, row: usize, height: usize) {
        if row < self.heights.len() {
            self.heights.set(row, height.max(1));
        }
    }

    /// Rows to render at the current offset.
    pub fn window(&self) -> VirtualWindow {
        VirtualWindow::compute(
            &self.heights,
            self.scroll_top,
            self.viewport_height,
            self.options.overscan,
        )
    }

    fn outcome(&self, date_change: Option<DateChange>, scroll_to: Option<f64>) -> ScrollOutcome {
        ScrollOutcome {
            window: self.window(),
            date_change,
            scroll_to,
        }
    }

    /// Start dates of every generated row.
    pub fn rows(&self) -> &[NaiveDate] {
        &self.rows
    }

    /// Row height index.
    pub fn heights(&self) -> &HeightIndex {
        &self.heights
    }

    /// First day of the current period.
    pub fn current(&self) -> NaiveDate {
        self.current
    }

    /// Current scroll phase.
    pub fn phase(&self) -> ScrollPhase {
        self.phase
    }

    /// Current scroll offset in pixels.
    pub fn scroll_top(&self) -> f64 {
        self.scroll_top
    }

    /// Viewport height in pixels.
    pub fn viewport_height(&self) -> f64 {
        self.viewport_height
    }

    /// Options the scroller was built with.
    pub fn options(&self) -> &ScrollerOptions {
        &self.options
    }

    /// Row under the viewport center and how far into it the center sits.
    pub fn focus(&self) -> Option<(NaiveDate, f64)> {
        if self.rows.is_empty() {
            return None;
        }
        let focus = self.focus_row();
        let top = self.heights.offset_of(focus) as f64;
        let height = self.heights.height(focus).unwrap_or(1) as f64;
        let center = self.scroll_top + self.viewport_height / 2.0;
        Some((self.rows[focus], ((center - top) / height).clamp(0.0, 1.0)))
    }
}
