//! Layout computation.
//!
//! Everything in here is pure: given events and a range (or a time column),
//! produce placement data. Nothing here can fail; degenerate input is clamped.

pub mod agenda;
pub mod date_slot_metrics;
pub mod day_layout;
pub mod levels;
pub mod row_render;
pub mod segments;
pub mod time_slot_metrics;
pub mod types;

pub use agenda::{agenda_days, AgendaDay, AgendaItem, TimeLabel};
pub use date_slot_metrics::DateSlotMetrics;
pub use day_layout::{
    column_events, layout_day_column, split_time_grid_events, DayLayoutAlgorithm, DayLayoutInput,
    DayLayoutStrategy, StyledEvent,
};
pub use levels::{event_levels, Levels};
pub use row_render::{ending_row, event_row, render_span, SpanContent, SpanPlacement};
pub use segments::{event_segment, in_range, row_segments, sort_events, Segment};
pub use time_slot_metrics::{SlotPlacement, TimeSlotMetrics};
pub use types::{Bounds, Point};
