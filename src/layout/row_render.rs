//! Flattening lanes into span placements.
//!
//! A lane of segments renders as a sequence of horizontal spans across the
//! row: gaps between events, events, and (in the overflow row) "+N more"
//! placeholders. Each span's width is its share of the row's day slots.

use serde::Serialize;

use super::levels::{event_levels, events_in_slot};
use super::segments::Segment;

/// What a span shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SpanContent {
    /// Empty space before the next event.
    Gap,
    /// An event segment.
    Event {
        /// Segment drawn.
        segment: Segment,
    },
    /// Placeholder for hidden events.
    ShowMore {
        /// 1-based day slot.
        slot: usize,
        /// Events hidden in the slot.
        count: usize,
    },
}

/// One horizontal span of a rendered row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpanPlacement {
    /// Slots covered.
    pub len: usize,
    /// Share of the row width in percent (flex basis).
    pub basis_pct: f64,
    /// What the span shows.
    pub content: SpanContent,
}

/// Place `content` over `len` of the row's `slots`.
pub fn render_span(slots: usize, len: usize, content: SpanContent) -> SpanPlacement {
    let basis_pct = if slots == 0 {
        0.0
    } else {
        len as f64 / slots as f64 * 100.0
    };
    SpanPlacement {
        len,
        basis_pct,
        content,
    }
}

/// Spans for one lane of non-overlapping segments.
pub fn event_row(segments: &[Segment], slots: usize) -> Vec<SpanPlacement> {
    let mut row = Vec::with_capacity(segments.len() * 2);
    let mut last_end = 1;
    for segment in segments {
        let gap = segment.left.saturating_sub(last_end);
        if gap > 0 {
            row.push(render_span(slots, gap, SpanContent::Gap));
        }
        row.push(render_span(slots, segment.span, SpanContent::Event { segment: *segment }));
        last_end = segment.right + 1;
    }
    row
}

/// Spans for the overflow row built from the segments that did not fit.
///
/// An overflow segment is shown in full when it is the only hidden event in
/// every slot it covers; otherwise each slot gets a "+N more" placeholder.
pub fn ending_row(extra: &[Segment], slots: usize) -> Vec<SpanPlacement> {
    let first_lane = event_levels(extra, None).levels.into_iter().next().unwrap_or_default();
    let can_render = |left: usize, span: usize| (left..left + span).all(|s| events_in_slot(extra, s) == 1);

    let mut row = Vec::new();
    let mut current = 1;
    let mut last_end = 1;
    while current <= slots {
        let Some(segment) = first_lane.iter().find(|s| s.covers(current)) else {
            current += 1;
            continue;
        };
        let gap = segment.left.saturating_sub(last_end);
        if gap > 0 {
            row.push(render_span(slots, gap, SpanContent::Gap));
        }
        if can_render(segment.left, segment.span) {
            row.push(render_span(slots, segment.span, SpanContent::Event { segment: *segment }));
            current = segment.right + 1;
        } else {
            let count = events_in_slot(extra, current);
            row.push(render_span(slots, 1, SpanContent::ShowMore { slot: current, count }));
            current += 1;
        }
        last_end = current;
    }
    row
}
