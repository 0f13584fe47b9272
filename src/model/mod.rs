//! Domain model types.
//!
//! Identifiers, events and the source records they are resolved from.

pub mod error;
pub mod event;
pub mod identifiers;
pub mod record;

pub use error::{AppError, InputError, RecordError};
pub use event::Event;
pub use identifiers::{InvalidRecordId, RecordId, ResourceId};
pub use record::{resolve_event, resolve_events, Accessors, FieldAccessor, Resolution, SourceRecord};
