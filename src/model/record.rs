//! Source records and the accessors that resolve them into events.
//!
//! The engine is agnostic to the host's record schema. A record is an id plus a
//! bag of JSON fields; [`Accessors`] say which field (or callback) yields the
//! title, start, end, all-day flag and resource of an event.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use chrono_tz::Tz;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

use super::error::RecordError;
use super::event::Event;
use super::identifiers::{RecordId, ResourceId};
use crate::dates::{add_days, day_start, localize, Timestamp};

/// A row as delivered by the host data store.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SourceRecord {
    /// Host row id.
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    /// Every other column, keyed by column name.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl SourceRecord {
    /// A record from its id and columns.
    pub fn new(id: impl Into<String>, fields: Map<String, Value>) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }
}

/// Callback resolving a value from a record.
pub type AccessorFn = Arc<dyn Fn(&SourceRecord) -> Option<Value> + Send + Sync>;

/// Resolves one logical value of an event from a record.
#[derive(Clone)]
pub enum FieldAccessor {
    /// Read a column by name.
    Field(String),
    /// Compute the value.
    Callback {
        /// Used in error messages.
        name: String,
        /// The callback.
        f: AccessorFn,
    },
}

impl FieldAccessor {
    /// Read the column `name`.
    pub fn field(name: impl Into<String>) -> Self {
        Self::Field(name.into())
    }

    /// Compute the value with `f`.
    pub fn callback(
        name: impl Into<String>,
        f: impl Fn(&SourceRecord) -> Option<Value> + Send + Sync + 'static,
    ) -> Self {
        Self::Callback {
            name: name.into(),
            f: Arc::new(f),
        }
    }

    /// Value for `record`; JSON `null` counts as absent.
    pub fn get(&self, record: &SourceRecord) -> Option<Value> {
        let value = match self {
            Self::Field(name) => record.fields.get(name).cloned(),
            Self::Callback { f, .. } => f(record),
        };
        value.filter(|v| !v.is_null())
    }

    /// Column or callback name.
    pub fn name(&self) -> &str {
        match self {
            Self::Field(name) | Self::Callback { name, .. } => name.as_str(),
        }
    }
}

impl fmt::Debug for FieldAccessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field(name) => f.debug_tuple("Field").field(name).finish(),
            Self::Callback { name, .. } => f.debug_tuple("Callback").field(name).finish(),
        }
    }
}

/// Accessors for every event field the engine reads.
#[derive(Debug, Clone)]
pub struct Accessors {
    /// Title.
    pub title: FieldAccessor,
    /// Start date.
    pub start: FieldAccessor,
    /// Absent end means the event ends where it starts.
    pub end: Option<FieldAccessor>,
    /// Absent all-day accessor means all-day is inferred from date-only values.
    pub all_day: Option<FieldAccessor>,
    /// Resource id.
    pub resource: Option<FieldAccessor>,
}

impl Accessors {
    /// Accessors reading title and start columns, nothing else.
    pub fn new(title: FieldAccessor, start: FieldAccessor) -> Self {
        Self {
            title,
            start,
            end: None,
            all_day: None,
            resource: None,
        }
    }

    /// Also read an end date.
    pub fn with_end(mut self, end: FieldAccessor) -> Self {
        self.end = Some(end);
        self
    }

    /// Read the all-day flag instead of inferring it.
    pub fn with_all_day(mut self, all_day: FieldAccessor) -> Self {
        self.all_day = Some(all_day);
        self
    }

    /// Also read a resource id.
    pub fn with_resource(mut self, resource: FieldAccessor) -> Self {
        self.resource = Some(resource);
        self
    }
}

/// Outcome of resolving a batch of records.
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    /// Events in record order.
    pub events: Vec<Event>,
    /// Records that were excluded, with the reason.
    pub rejected: Vec<RecordError>,
}

/// Resolve every record, excluding (and logging) the malformed ones.
pub fn resolve_events(records: &[SourceRecord], accessors: &Accessors, tz: Tz) -> Resolution {
    let mut resolution = Resolution::default();
    for record in records {
        match resolve_event(record, accessors, tz) {
            Ok(event) => resolution.events.push(event),
            Err(error) => {
                warn!(record = %record.id, %error, "Excluding record from calendar");
                resolution.rejected.push(error);
            }
        }
    }
    debug!(
        events = resolution.events.len(),
        rejected = resolution.rejected.len(),
        "Resolved source records"
    );
    resolution
}

/// A parsed date value: either a bare calendar date or a full instant.
#[derive(Debug, Clone, Copy, PartialEq)]
enum DateValue {
    Date(NaiveDate),
    Instant(Timestamp),
}

/// Resolve a single record.
///
/// Date-only end values are inclusive: an all-day event ending on the 7th
/// becomes an event ending at midnight starting the 8th.
pub fn resolve_event(
    record: &SourceRecord,
    accessors: &Accessors,
    tz: Tz,
) -> Result<Event, RecordError> {
    let id = RecordId::new(record.id.clone()).map_err(|_| RecordError::EmptyId)?;

    let start_raw = accessors
        .start
        .get(record)
        .ok_or_else(|| RecordError::MissingField {
            record: record.id.clone(),
            field: accessors.start.name().to_string(),
        })?;
    let start = parse_date(&start_raw, tz).ok_or_else(|| RecordError::InvalidDate {
        record: record.id.clone(),
        field: accessors.start.name().to_string(),
        value: start_raw.to_string(),
    })?;

    let end = match &accessors.end {
        Some(accessor) => match accessor.get(record) {
            Some(raw) => Some(parse_date(&raw, tz).ok_or_else(|| RecordError::InvalidDate {
                record: record.id.clone(),
                field: accessor.name().to_string(),
                value: raw.to_string(),
            })?),
            None => None,
        },
        None => None,
    };

    let all_day = match accessors.all_day.as_ref().and_then(|a| a.get(record)) {
        Some(raw) => truthy(&raw),
        None => {
            matches!(start, DateValue::Date(_))
                && !matches!(end, Some(DateValue::Instant(_)))
        }
    };

    let start_ts = match start {
        DateValue::Date(d) => day_start(tz, d),
        DateValue::Instant(ts) => ts,
    };
    let end_ts = match end {
        Some(DateValue::Date(d)) => day_start(tz, add_days(d, 1)),
        Some(DateValue::Instant(ts)) => ts,
        None if all_day => day_start(tz, add_days(start_ts.date_naive(), 1)),
        None => start_ts,
    };

    let title = accessors
        .title
        .get(record)
        .map(|v| display_value(&v))
        .unwrap_or_default();
    let resource = accessors
        .resource
        .as_ref()
        .and_then(|a| a.get(record))
        .and_then(|v| ResourceId::new(display_value(&v)));

    Ok(Event::new(id, title, start_ts, end_ts, all_day).with_resource(resource))
}

fn parse_date(value: &Value, tz: Tz) -> Option<DateValue> {
    match value {
        Value::String(s) => parse_date_str(s.trim(), tz),
        Value::Number(n) => n
            .as_i64()
            .or_else(|| whole_millis(n.as_f64()?))
            .and_then(DateTime::from_timestamp_millis)
            .map(|utc| DateValue::Instant(utc.with_timezone(&tz))),
        _ => None,
    }
}

/// Epoch milliseconds written as a float (`1.7e12`); fractions are rejected.
fn whole_millis(value: f64) -> Option<i64> {
    let in_range = value >= i64::MIN as f64 && value < i64::MAX as f64;
    (value.fract() == 0.0 && in_range).then_some(value as i64)
}

const LOCAL_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

fn parse_date_str(s: &str, tz: Tz) -> Option<DateValue> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(DateValue::Instant(dt.with_timezone(&tz)));
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(DateValue::Date(d));
    }
    LOCAL_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|naive| DateValue::Instant(localize(tz, naive)))
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => matches!(s.trim().to_ascii_lowercase().as_str(), "true" | "yes" | "1"),
        _ => false,
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(display_value)
            .collect::<Vec<_>>()
            .join(", "),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
