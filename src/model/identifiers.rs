//! Identifier newtypes with smart constructors.
//!
//! All identifiers validate non-empty strings at construction time.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Id of the host row an event was derived from.
///
/// The only identity an event has: events are rebuilt from the host data source
/// on every change, so edit intents refer back to the row by this id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Smart constructor: validates a non-empty id.
    pub fn new(raw: impl Into<String>) -> Result<Self, InvalidRecordId> {
        let raw = raw.into();
        if raw.is_empty() {
            Err(InvalidRecordId)
        } else {
            Ok(Self(raw))
        }
    }

    /// The raw id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Error for an empty record id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("record id must not be empty")]
pub struct InvalidRecordId;

/// Resource (room, person, ...) an event is booked against.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ResourceId(String);

impl ResourceId {
    /// Smart constructor: returns `None` for an empty id.
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        (!raw.is_empty()).then_some(Self(raw))
    }

    /// The raw id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_id_rejects_empty() {
        assert_eq!(RecordId::new(""), Err(InvalidRecordId));
    }

    #[test]
    fn record_id_round_trips_display() {
        let id = RecordId::new("row-1").unwrap();
        assert_eq!(id.as_str(), "row-1");
        assert_eq!(id.to_string(), "row-1");
    }

    #[test]
    fn resource_id_empty_is_none() {
        assert!(ResourceId::new("").is_none());
        assert_eq!(ResourceId::new("room-a").unwrap().as_str(), "room-a");
    }

    #[test]
    fn record_id_serializes_as_plain_string() {
        let id = RecordId::new("r9").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"r9\"");
    }
}
