//! Pointer interactions resolved into intents.
//!
//! Drag, resize, selection and drill-down never touch source data; each
//! produces an intent value that the host decides what to do with.

pub mod drag;
pub mod intent;
pub mod resize;
pub mod selection;

pub use drag::{resolve_drag_delta, resolve_drop, DropTarget, DEFAULT_TIMED_MINUTES};
pub use intent::{DrillDown, EditIntent};
pub use resize::{resolve_day_resize, resolve_resize, ResizeEdge, MIN_RESIZE_MINUTES};
pub use selection::{select_date_cells, select_time_slots, SelectAction, SlotSelection};
