//! The engine facade and the collaborators a host injects into it.
//!
//! A host owns the data store and the side effects. It hands the calendar a
//! [`DataProvider`] for records and a [`CommandSink`] for intents; the
//! calendar resolves events, lays out whatever the current view shows and
//! turns pointer interactions into intents on the sink. Nothing in here
//! mutates source records.

use chrono::NaiveDate;
use serde::Serialize;
use std::time::Instant;
use tracing::debug;

use crate::config::ResolvedConfig;
use crate::dates::{localize, month_weeks, Timestamp};
use crate::interaction::{
    resolve_day_resize, resolve_drag_delta, resolve_drop, resolve_resize, select_date_cells,
    select_time_slots, DrillDown, DropTarget, EditIntent, ResizeEdge, SelectAction,
    SlotSelection,
};
use crate::layout::{
    agenda_days, column_events, ending_row, event_row, layout_day_column, split_time_grid_events,
    AgendaDay, Bounds, DateSlotMetrics, DayLayoutInput, DayLayoutStrategy, SpanContent,
    SpanPlacement, StyledEvent, TimeSlotMetrics,
};
use crate::model::{resolve_events, Event, RecordId, SourceRecord};
use crate::view_state::{
    DateChange, InfiniteScroller, Memo, RowHeights, RowUnit, ScrollOutcome, Throttle,
    VirtualWindow,
};
use crate::views::View;

/// Read access to the host's records.
pub trait DataProvider {
    /// Bumped by the host whenever `records` changes.
    fn generation(&self) -> u64;
    /// Current records, in host order.
    fn records(&self) -> &[SourceRecord];
}

/// Receives everything the calendar wants the host to act on.
pub trait CommandSink {
    /// An event was dropped, dragged or resized.
    fn propose_edit(&mut self, intent: EditIntent);
    /// The user asked to open a date in a more detailed view.
    fn drill_down(&mut self, target: DrillDown);
    /// Empty slots were clicked or double-clicked.
    fn select_slots(&mut self, selection: SlotSelection);
    /// Scrolling moved the calendar to another period.
    fn navigate(&mut self, change: DateChange);
}

/// Measurements of the scroll container.
pub trait ViewportMetrics {
    /// Visible height in pixels.
    fn viewport_height(&self) -> f64;
    /// Estimated height of one row in pixels.
    fn row_height(&self) -> usize;
}

/// An in-memory record set.
#[derive(Debug, Clone, Default)]
pub struct RecordSet {
    generation: u64,
    records: Vec<SourceRecord>,
}

impl RecordSet {
    /// A record set at generation 1.
    pub fn new(records: Vec<SourceRecord>) -> Self {
        Self {
            generation: 1,
            records,
        }
    }

    /// Swap in new records and bump the generation.
    pub fn replace(&mut self, records: Vec<SourceRecord>) {
        self.records = records;
        self.generation += 1;
    }
}

impl DataProvider for RecordSet {
    fn generation(&self) -> u64 {
        self.generation
    }

    fn records(&self) -> &[SourceRecord] {
        &self.records
    }
}

/// A sink that keeps every command it receives.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandLog {
    /// Proposed edits, oldest first.
    pub edits: Vec<EditIntent>,
    /// Drill-down requests.
    pub drill_downs: Vec<DrillDown>,
    /// Slot selections.
    pub selections: Vec<SlotSelection>,
    /// Period changes from scrolling.
    pub navigations: Vec<DateChange>,
}

impl CommandSink for CommandLog {
    fn propose_edit(&mut self, intent: EditIntent) {
        self.edits.push(intent);
    }

    fn drill_down(&mut self, target: DrillDown) {
        self.drill_downs.push(target);
    }

    fn select_slots(&mut self, selection: SlotSelection) {
        self.selections.push(selection);
    }

    fn navigate(&mut self, change: DateChange) {
        self.navigations.push(change);
    }
}

/// Fixed viewport measurements.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedViewport {
    /// Viewport height in pixels.
    pub height: f64,
    /// Row height in pixels.
    pub row_height: usize,
}

impl ViewportMetrics for FixedViewport {
    fn viewport_height(&self) -> f64 {
        self.height
    }

    fn row_height(&self) -> usize {
        self.row_height
    }
}

/// One laid-out row of days.
///
/// Span contents refer to events by their index in [`Calendar::events`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthRow {
    /// Days of the row, left to right.
    pub days: Vec<NaiveDate>,
    /// One entry per lane, top to bottom.
    pub levels: Vec<Vec<SpanPlacement>>,
    /// The "+N more" row; empty when everything fit.
    pub overflow: Vec<SpanPlacement>,
}

/// Timed events placed in one day column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayColumn {
    /// Day shown by the column.
    pub date: NaiveDate,
    /// Placed events, indexed into [`Calendar::events`].
    pub events: Vec<StyledEvent>,
}

/// Week, work-week and day views: an all-day header over day columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeGrid {
    /// All-day and multi-day events.
    pub header: MonthRow,
    /// One column per day.
    pub columns: Vec<DayColumn>,
}

/// One month of the year view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearMonth {
    /// First day of the month.
    pub month: NaiveDate,
    /// Week rows of the month grid.
    pub rows: Vec<MonthRow>,
}

/// View-specific part of a [`ViewLayout`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LayoutBody {
    /// Month view.
    Rows {
        /// Week rows.
        rows: Vec<MonthRow>,
    },
    /// Week, work-week and day views.
    TimeGrid(TimeGrid),
    /// Agenda view.
    Agenda {
        /// Days that have events.
        days: Vec<AgendaDay>,
    },
    /// Year view.
    Year {
        /// The twelve months.
        months: Vec<YearMonth>,
    },
}

/// Everything a view renders for one anchor date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewLayout {
    /// View laid out.
    pub view: View,
    /// Anchor date.
    pub date: NaiveDate,
    /// Toolbar title.
    pub title: String,
    /// Resolved events; placements refer to them by index.
    pub events: Vec<Event>,
    /// Per-view placements.
    pub body: LayoutBody,
}

type RowsKey = (u64, Vec<NaiveDate>);

/// The calendar engine bound to a host.
pub struct Calendar<P, S> {
    provider: P,
    sink: S,
    config: ResolvedConfig,
    strategy: Box<dyn DayLayoutStrategy>,
    events: Memo<u64, Vec<Event>>,
    rows: Memo<RowsKey, Vec<MonthRow>>,
    scroller: Option<InfiniteScroller>,
    hover: Throttle,
}

impl<P: DataProvider, S: CommandSink> Calendar<P, S> {
    /// A calendar using the configured day-layout algorithm.
    pub fn new(provider: P, sink: S, config: ResolvedConfig) -> Self {
        let strategy: Box<dyn DayLayoutStrategy> = Box::new(config.day_layout);
        Self {
            provider,
            sink,
            config,
            strategy,
            events: Memo::new(),
            rows: Memo::new(),
            scroller: None,
            hover: Throttle::default(),
        }
    }

    /// Replace the configured day-column packing.
    pub fn with_day_layout(mut self, strategy: impl DayLayoutStrategy + 'static) -> Self {
        self.strategy = Box::new(strategy);
        self
    }

    /// Active configuration.
    pub fn config(&self) -> &ResolvedConfig {
        &self.config
    }

    /// The record source.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Mutable access for hosts that update records in place. Bump the
    /// generation or cached layouts go stale.
    pub fn provider_mut(&mut self) -> &mut P {
        &mut self.provider
    }

    /// The command sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Give back the provider and sink.
    pub fn into_parts(self) -> (P, S) {
        (self.provider, self.sink)
    }

    /// Events resolved from the current records.
    pub fn events(&mut self) -> &[Event] {
        resolved(&mut self.events, &self.provider, &self.config)
    }

    fn find_event(&mut self, id: &RecordId) -> Option<Event> {
        self.events().iter().find(|e| e.id == *id).cloned()
    }

    /// Lay out week rows starting on each of `starts`.
    pub fn month_rows(&mut self, starts: &[NaiveDate]) -> &[MonthRow] {
        let Self {
            provider,
            config,
            events,
            rows,
            ..
        } = self;
        let generation = provider.generation();
        let events = resolved(events, provider, config);
        rows.get_or_compute((generation, starts.to_vec()), |(_, starts)| {
            debug!(rows = starts.len(), generation, "Laying out month rows");
            starts
                .iter()
                .map(|start| {
                    let days = start.iter_days().take(7).collect();
                    row_layout(events, days, config.max_rows)
                })
                .collect()
        })
    }

    /// Rows inside the scroller window. Year scrolling expands each visible
    /// month into its weeks.
    pub fn visible_month_rows(&mut self) -> Vec<MonthRow> {
        let Some(scroller) = &self.scroller else {
            return Vec::new();
        };
        let window = scroller.window();
        let week_start = scroller.options().week_start;
        let unit = scroller.options().unit;
        let starts: Vec<NaiveDate> = window
            .indices()
            .filter_map(|i| scroller.rows().get(i).copied())
            .flat_map(|row| match unit {
                RowUnit::Week => vec![row],
                RowUnit::Month => month_weeks(row, week_start)
                    .into_iter()
                    .filter_map(|week| week.first().copied())
                    .collect(),
            })
            .collect();
        self.month_rows(&starts).to_vec()
    }

    /// Timed events of `date` packed into a column.
    pub fn day_column(&mut self, date: NaiveDate) -> DayColumn {
        let Self {
            provider,
            config,
            strategy,
            events,
            ..
        } = self;
        let events = resolved(events, provider, config);
        let (_, timed) = split_time_grid_events(events);
        column_layout(events, &timed, date, config, &**strategy)
    }

    /// All-day header and day columns for `range`.
    pub fn time_grid(&mut self, range: &[NaiveDate]) -> TimeGrid {
        let Self {
            provider,
            config,
            strategy,
            events,
            ..
        } = self;
        let events = resolved(events, provider, config);
        let (all_day, timed) = split_time_grid_events(events);

        let header_events: Vec<Event> = all_day.iter().map(|&i| events[i].clone()).collect();
        let mut header = row_layout(&header_events, range.to_vec(), config.max_rows);
        remap_row(&mut header, &all_day);

        let columns = range
            .iter()
            .map(|&date| column_layout(events, &timed, date, config, &**strategy))
            .collect();
        TimeGrid { header, columns }
    }

    /// Agenda days starting at `date`.
    pub fn agenda(&mut self, date: NaiveDate) -> Vec<AgendaDay> {
        let length = self.config.agenda_length;
        agenda_days(self.events(), date, length)
    }

    /// Lay out `view` anchored on `date`.
    pub fn layout(&mut self, view: View, date: NaiveDate) -> ViewLayout {
        let options = self.config.range_options();
        let range = view.range(date, &options);
        let body = match view {
            View::Month => {
                let starts: Vec<NaiveDate> = range.iter().step_by(7).copied().collect();
                LayoutBody::Rows {
                    rows: self.month_rows(&starts).to_vec(),
                }
            }
            View::Week | View::WorkWeek | View::Day => LayoutBody::TimeGrid(self.time_grid(&range)),
            View::Agenda => LayoutBody::Agenda {
                days: self.agenda(date),
            },
            View::Year => {
                let months = range
                    .iter()
                    .map(|&month| {
                        let starts: Vec<NaiveDate> = month_weeks(month, options.week_start)
                            .into_iter()
                            .filter_map(|week| week.first().copied())
                            .collect();
                        YearMonth {
                            month,
                            rows: self.month_rows(&starts).to_vec(),
                        }
                    })
                    .collect();
                LayoutBody::Year { months }
            }
        };
        ViewLayout {
            view,
            date,
            title: view.title(date, &options),
            events: self.events().to_vec(),
            body,
        }
    }

    /// Time-slot metrics of the day column for `date`.
    pub fn slot_metrics(&self, date: NaiveDate) -> TimeSlotMetrics {
        time_metrics(&self.config, date)
    }

    // ===== Scrolling =====

    /// Start infinite scrolling anchored on `anchor`.
    pub fn attach_scroller(
        &mut self,
        unit: RowUnit,
        anchor: NaiveDate,
        viewport: &dyn ViewportMetrics,
    ) -> VirtualWindow {
        let mut options = self.config.scroller_options(unit);
        options.heights = RowHeights::Uniform(viewport.row_height());
        let scroller = InfiniteScroller::new(options, anchor, viewport.viewport_height());
        let window = scroller.window();
        self.scroller = Some(scroller);
        window
    }

    /// The attached scroller, if any.
    pub fn scroller(&self) -> Option<&InfiniteScroller> {
        self.scroller.as_ref()
    }

    /// Feed a scroll event. A period change is forwarded to the sink.
    pub fn on_scroll(&mut self, scroll_top: f64) -> Option<ScrollOutcome> {
        let outcome = self.scroller.as_mut()?.on_scroll(scroll_top);
        if let Some(change) = outcome.date_change {
            debug!(date = %change.date, previous = %change.previous, "Scrolled into new period");
            self.sink.navigate(change);
        }
        Some(outcome)
    }

    /// The host reports scrolling stopped.
    pub fn on_scroll_end(&mut self) {
        if let Some(scroller) = self.scroller.as_mut() {
            scroller.on_scroll_end();
        }
    }

    /// Programmatic navigation; returns the offset to apply.
    pub fn jump_to(&mut self, date: NaiveDate) -> Option<f64> {
        self.scroller.as_mut().map(|s| s.jump_to(date))
    }

    /// The scroll container changed size.
    pub fn resize_viewport(&mut self, viewport: &dyn ViewportMetrics) -> Option<VirtualWindow> {
        self.scroller
            .as_mut()
            .map(|s| s.resize(viewport.viewport_height()))
    }

    // ===== Interaction =====

    /// Drop an event on a target. Returns the intent when it changes the
    /// event; unchanged drops are not forwarded.
    pub fn drop_event(&mut self, id: &RecordId, target: &DropTarget) -> Option<EditIntent> {
        let event = self.find_event(id)?;
        let intent = resolve_drop(&event, target, self.config.timezone);
        self.propose(&event, intent)
    }

    /// Drag a timed event vertically by `delta_px`.
    pub fn drag_event(
        &mut self,
        id: &RecordId,
        delta_px: f64,
        slot_height_px: f64,
    ) -> Option<EditIntent> {
        let event = self.find_event(id)?;
        let intent = resolve_drag_delta(&event, delta_px, slot_height_px, self.config.step);
        self.propose(&event, intent)
    }

    /// Drag one edge of a timed event in a day column.
    pub fn resize_event(
        &mut self,
        id: &RecordId,
        edge: ResizeEdge,
        delta_px: f64,
        slot_height_px: f64,
    ) -> Option<EditIntent> {
        let event = self.find_event(id)?;
        let intent = resolve_resize(&event, edge, delta_px, slot_height_px, self.config.step);
        self.propose(&event, intent)
    }

    /// Drag one edge of an event across month-grid cells onto `date`.
    pub fn resize_event_to_day(
        &mut self,
        id: &RecordId,
        edge: ResizeEdge,
        date: NaiveDate,
    ) -> Option<EditIntent> {
        let event = self.find_event(id)?;
        let intent = resolve_day_resize(&event, edge, date, self.config.timezone);
        self.propose(&event, intent)
    }

    fn propose(&mut self, event: &Event, intent: EditIntent) -> Option<EditIntent> {
        if !intent.changes(event) {
            debug!(event = %event.id, "Edit leaves event unchanged");
            return None;
        }
        self.sink.propose_edit(intent.clone());
        Some(intent)
    }

    /// Select day cells `from..=to` of `range`.
    pub fn select_cells(
        &mut self,
        range: &[NaiveDate],
        from: usize,
        to: usize,
        action: SelectAction,
        bounds: Option<Bounds>,
    ) -> Option<SlotSelection> {
        let selection = select_date_cells(range, from, to, self.config.timezone, action, bounds)?;
        self.sink.select_slots(selection.clone());
        Some(selection)
    }

    /// Select time slots between `anchor` and `current` in the column of
    /// `date`.
    pub fn select_times(
        &mut self,
        date: NaiveDate,
        anchor: &Timestamp,
        current: &Timestamp,
        action: SelectAction,
        bounds: Option<Bounds>,
    ) -> SlotSelection {
        let metrics = time_metrics(&self.config, date);
        let selection = select_time_slots(&metrics, anchor, current, action, bounds);
        self.sink.select_slots(selection.clone());
        selection
    }

    /// Drill from `from` into `date`.
    pub fn drill_down(&mut self, from: View, date: NaiveDate) -> DrillDown {
        let target = DrillDown::from_view(from, date);
        self.sink.drill_down(target);
        target
    }

    /// Pointer moved over `row`. Returns the row to highlight for the
    /// insert-row affordance, at most once per throttle interval.
    pub fn hover(&mut self, now: Instant, row: usize) -> Option<usize> {
        self.hover.ready(now).then_some(row)
    }

    /// Drop scroller and throttle state when the view unmounts.
    pub fn teardown(&mut self) {
        self.hover.reset();
        self.scroller = None;
    }
}

fn resolved<'a, P: DataProvider>(
    memo: &'a mut Memo<u64, Vec<Event>>,
    provider: &P,
    config: &ResolvedConfig,
) -> &'a [Event] {
    memo.get_or_compute(provider.generation(), |generation| {
        debug!(generation, "Resolving events");
        resolve_events(provider.records(), &config.accessors(), config.timezone).events
    })
}

fn time_metrics(config: &ResolvedConfig, date: NaiveDate) -> TimeSlotMetrics {
    let tz = config.timezone;
    TimeSlotMetrics::new(
        localize(tz, date.and_time(config.min_time)),
        localize(tz, date.and_time(config.max_time)),
        config.step,
        config.timeslots,
    )
}

fn row_layout(events: &[Event], days: Vec<NaiveDate>, max_rows: Option<usize>) -> MonthRow {
    let metrics = DateSlotMetrics::new(days, events, max_rows, 0);
    let slots = metrics.slots();
    MonthRow {
        levels: metrics
            .levels()
            .iter()
            .map(|lane| event_row(lane, slots))
            .collect(),
        overflow: ending_row(metrics.extra(), slots),
        days: metrics.range().to_vec(),
    }
}

/// Rewrite segment indices of a row laid out over a subset of events.
fn remap_row(row: &mut MonthRow, subset: &[usize]) {
    let spans = row.levels.iter_mut().flatten().chain(row.overflow.iter_mut());
    for span in spans {
        if let SpanContent::Event { segment } = &mut span.content {
            if let Some(&original) = subset.get(segment.event) {
                segment.event = original;
            }
        }
    }
}

fn column_layout(
    events: &[Event],
    timed: &[usize],
    date: NaiveDate,
    config: &ResolvedConfig,
    strategy: &dyn DayLayoutStrategy,
) -> DayColumn {
    let column = column_events(events, timed, date);
    let slot_metrics = time_metrics(config, date);
    let input = DayLayoutInput {
        events,
        column: &column,
        minimum_start_difference: config.minimum_start_difference,
        minimum_minutes: config.minimum_event_minutes,
        slot_metrics: &slot_metrics,
    };
    DayColumn {
        date,
        events: layout_day_column(strategy, &input),
    }
}

#[cfg(test)]
#[path = "host_tests.rs"]
mod tests;
