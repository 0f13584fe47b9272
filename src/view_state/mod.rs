//! View-state layer - scrolling and virtualization
//!
//! # Module Structure
//!
//! - `height_index`: HeightIndex - O(log n) prefix sums via Fenwick tree
//! - `window`: VirtualWindow - visible and overscanned row ranges
//! - `scroller`: InfiniteScroller - re-centering row list for month/year scrolling
//! - `throttle`: Throttle - pointer-move rate limiting
//! - `memo`: Memo - single-entry memoization of layout passes

pub mod height_index;
pub mod memo;
pub mod scroller;
pub mod throttle;
pub mod window;

pub use height_index::HeightIndex;
pub use memo::Memo;
pub use scroller::{
    DateChange, InfiniteScroller, RowHeights, RowUnit, ScrollOutcome, ScrollPhase, ScrollerOptions,
};
pub use throttle::{Throttle, DEFAULT_THROTTLE};
pub use window::VirtualWindow;
