//! Virtual window over the scrollable row list.

use serde::Serialize;

use super::height_index::HeightIndex;

/// Rows to render for the current scroll position.
///
/// # Invariants
/// - `overscan_start <= visible_start <= visible_end <= overscan_end <= rows`
/// - End indices are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct VirtualWindow {
    /// First row intersecting the viewport.
    pub visible_start: usize,
    /// One past the last row intersecting the viewport.
    pub visible_end: usize,
    /// First row to render.
    pub overscan_start: usize,
    /// One past the last row to render.
    pub overscan_end: usize,
}

impl VirtualWindow {
    /// Compute the window for a viewport at `scroll_top` of height
    /// `viewport_height`, padded by `overscan` rows on each side.
    ///
    /// A scroll offset past the end pins the window to the last row.
    pub fn compute(
        heights: &HeightIndex,
        scroll_top: f64,
        viewport_height: f64,
        overscan: usize,
    ) -> Self {
        let rows = heights.len();
        if rows == 0 {
            return Self::default();
        }

        let top = scroll_top.max(0.0).floor() as usize;
        let bottom = (scroll_top + viewport_height.max(0.0)).ceil().max(0.0) as usize;
        let last_pixel = bottom.saturating_sub(1).max(top);

        let visible_start = heights.lower_bound(top).unwrap_or(rows - 1);
        let visible_end = heights
            .lower_bound(last_pixel)
            .map_or(rows, |row| row + 1)
            .max(visible_start + 1);

        Self {
            visible_start,
            visible_end,
            overscan_start: visible_start.saturating_sub(overscan),
            overscan_end: (visible_end + overscan).min(rows),
        }
    }

    /// Largest window `compute` can return for rows at least `min_row_height`
    /// tall.
    pub fn max_len(viewport_height: f64, min_row_height: usize, overscan: usize) -> usize {
        let per_viewport = (viewport_height.max(0.0) / min_row_height.max(1) as f64).ceil() as usize;
        per_viewport + 1 + 2 * overscan
    }

    /// Number of rows intersecting the viewport.
    pub fn visible_len(&self) -> usize {
        self.visible_end - self.visible_start
    }

    /// Number of rows to render.
    pub fn len(&self) -> usize {
        self.overscan_end - self.overscan_start
    }

    /// Whether nothing is rendered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Rows to render, in order.
    pub fn indices(&self) -> std::ops::Range<usize> {
        self.overscan_start..self.overscan_end
    }

    /// Whether `row` is rendered.
    pub fn contains(&self, row: usize) -> bool {
        self.indices().contains(&row)
    }
}
