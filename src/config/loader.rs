//! Configuration file loading with precedence handling.

use chrono::{NaiveTime, Weekday};
use chrono_tz::Tz;
use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

use crate::layout::day_layout::DayLayoutAlgorithm;
use crate::model::{Accessors, FieldAccessor};
use crate::view_state::scroller::{RowHeights, RowUnit, ScrollerOptions};
use crate::views::{RangeOptions, View, DEFAULT_AGENDA_LENGTH};

/// Errors that can occur during config loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Failed to read config file (permission issues, not a file, ...).
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError {
        /// Path that failed to read.
        path: PathBuf,
        /// Reason for failure.
        reason: String,
    },

    /// Config file contains invalid TOML syntax or unknown keys.
    #[error("Invalid TOML in {path}: {reason}")]
    ParseError {
        /// Path with invalid TOML.
        path: PathBuf,
        /// Parse error details.
        reason: String,
    },

    /// A setting parsed but its value is not usable.
    #[error("Invalid value {value:?} for {field}: {reason}")]
    InvalidValue {
        /// Setting name.
        field: &'static str,
        /// Value as given.
        value: String,
        /// Why it was rejected.
        reason: String,
    },
}

/// TOML configuration file structure.
///
/// All fields are optional - if not specified, hardcoded defaults are used.
/// Corresponds to `~/.config/calgrid/config.toml`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// IANA time zone name (e.g. "Europe/Berlin").
    #[serde(default)]
    pub timezone: Option<String>,

    /// First day of the week ("sun", "mon", ...).
    #[serde(default)]
    pub week_start: Option<Weekday>,

    /// View shown on startup.
    #[serde(default)]
    pub view: Option<View>,

    /// Minutes per time slot.
    #[serde(default)]
    pub step: Option<u32>,

    /// Slots per labelled group.
    #[serde(default)]
    pub timeslots: Option<u32>,

    /// Earliest wall-clock time shown in day columns ("HH:MM").
    #[serde(default)]
    pub min_time: Option<String>,

    /// Latest wall-clock time shown in day columns ("HH:MM").
    #[serde(default)]
    pub max_time: Option<String>,

    /// Event rows per month cell, including the "+N more" row. 0 = unlimited.
    #[serde(default)]
    pub max_rows: Option<usize>,

    /// Day-column packing algorithm.
    #[serde(default)]
    pub day_layout: Option<DayLayoutAlgorithm>,

    /// Events starting closer than this many minutes share a row.
    #[serde(default)]
    pub minimum_start_difference: Option<i64>,

    /// Rows rendered beyond each edge of the viewport.
    #[serde(default)]
    pub overscan_rows: Option<usize>,

    /// Default pixel height of a scroller row.
    #[serde(default)]
    pub row_height: Option<usize>,

    /// Months (month view) or years (year view) generated on each side of
    /// the current one.
    #[serde(default)]
    pub scroll_span: Option<u32>,

    /// Days listed by the agenda view.
    #[serde(default)]
    pub agenda_length: Option<usize>,

    /// Minimum rendered height of a timed event, in minutes.
    #[serde(default)]
    pub minimum_event_minutes: Option<i64>,

    /// Path to log file for tracing output.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,

    /// Source record field names.
    #[serde(default)]
    pub fields: Option<FieldsSection>,
}

/// Source record field names, from the `[fields]` table.
///
/// ```toml
/// [fields]
/// title = "Name"
/// start = "Begins"
/// end = "Ends"
/// ```
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct FieldsSection {
    /// Field holding the event title.
    #[serde(default)]
    pub title: Option<String>,
    /// Field holding the start date.
    #[serde(default)]
    pub start: Option<String>,
    /// Field holding the end date.
    #[serde(default)]
    pub end: Option<String>,
    /// Field holding the all-day flag.
    #[serde(default)]
    pub all_day: Option<String>,
    /// Field holding the resource id.
    #[serde(default)]
    pub resource: Option<String>,
}

/// Resolved field names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldNames {
    /// Title field.
    pub title: String,
    /// Start field.
    pub start: String,
    /// End field.
    pub end: String,
    /// All-day flag field.
    pub all_day: String,
    /// Resource id field.
    pub resource: String,
}

impl Default for FieldNames {
    fn default() -> Self {
        Self {
            title: "title".to_string(),
            start: "start".to_string(),
            end: "end".to_string(),
            all_day: "all_day".to_string(),
            resource: "resource".to_string(),
        }
    }
}

/// Resolved configuration after applying precedence rules.
///
/// Created by merging defaults, config file, env vars, and CLI args.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    /// Zone every date is displayed in.
    pub timezone: Tz,
    /// First day of the week.
    pub week_start: Weekday,
    /// Initial view.
    pub view: View,
    /// Slot length in minutes.
    pub step: u32,
    /// Slots per labelled group.
    pub timeslots: u32,
    /// First wall-clock time shown in a day column.
    pub min_time: NaiveTime,
    /// Last wall-clock time shown in a day column.
    pub max_time: NaiveTime,
    /// Lanes per month row including the "+N more" row. `None` = unlimited.
    pub max_rows: Option<usize>,
    /// Day-column packing algorithm.
    pub day_layout: DayLayoutAlgorithm,
    /// Starts closer than this many minutes share a row in overlap layout.
    pub minimum_start_difference: i64,
    /// Rows rendered beyond each viewport edge.
    pub overscan_rows: usize,
    /// Estimated row height in pixels.
    pub row_height: usize,
    /// Periods generated on each side of the current one.
    pub scroll_span: u32,
    /// Days covered by the agenda view.
    pub agenda_length: usize,
    /// Minimum rendered event height in minutes.
    pub minimum_event_minutes: i64,
    /// Record field names.
    pub fields: FieldNames,
    /// Path to log file for tracing output.
    pub log_file_path: PathBuf,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            timezone: Tz::UTC,
            week_start: Weekday::Sun,
            view: View::Month,
            step: 30,
            timeslots: 2,
            min_time: NaiveTime::MIN,
            max_time: NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN),
            max_rows: Some(5),
            day_layout: DayLayoutAlgorithm::Overlap,
            minimum_start_difference: 30,
            overscan_rows: 4,
            row_height: 120,
            scroll_span: 3,
            agenda_length: DEFAULT_AGENDA_LENGTH,
            minimum_event_minutes: 15,
            fields: FieldNames::default(),
            log_file_path: default_log_path(),
        }
    }
}

impl ResolvedConfig {
    /// Record accessors for the configured field names.
    pub fn accessors(&self) -> Accessors {
        Accessors::new(
            FieldAccessor::field(&self.fields.title),
            FieldAccessor::field(&self.fields.start),
        )
        .with_end(FieldAccessor::field(&self.fields.end))
        .with_all_day(FieldAccessor::field(&self.fields.all_day))
        .with_resource(FieldAccessor::field(&self.fields.resource))
    }

    /// Options for computing view ranges.
    pub fn range_options(&self) -> RangeOptions {
        RangeOptions {
            week_start: self.week_start,
            agenda_length: self.agenda_length,
        }
    }

    /// Scroller settings for month view (`Week` rows) or year view
    /// (`Month` rows).
    pub fn scroller_options(&self, unit: RowUnit) -> ScrollerOptions {
        ScrollerOptions {
            unit,
            heights: RowHeights::Uniform(self.row_height),
            week_start: self.week_start,
            span: self.scroll_span,
            overscan: self.overscan_rows,
        }
    }
}

/// Resolve default log file path.
///
/// Returns `~/.local/state/calgrid/calgrid.log` on Unix-like systems,
/// or appropriate platform path on other systems.
///
/// If state directory cannot be determined, falls back to current directory.
pub fn default_log_path() -> PathBuf {
    if let Some(state_dir) = dirs::state_dir() {
        state_dir.join("calgrid").join("calgrid.log")
    } else {
        PathBuf::from("calgrid.log")
    }
}

/// Parse an IANA time zone name.
pub fn parse_timezone(value: &str) -> Result<Tz, ConfigError> {
    value
        .trim()
        .parse::<Tz>()
        .map_err(|_| ConfigError::InvalidValue {
            field: "timezone",
            value: value.to_string(),
            reason: "unknown IANA time zone".to_string(),
        })
}

/// Parse a view name.
pub fn parse_view(value: &str) -> Result<View, ConfigError> {
    value.parse::<View>().map_err(|e| ConfigError::InvalidValue {
        field: "view",
        value: value.to_string(),
        reason: e.to_string(),
    })
}

fn parse_time(field: &'static str, value: &str) -> Result<NaiveTime, ConfigError> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value.trim(), "%H:%M:%S"))
        .map_err(|e| ConfigError::InvalidValue {
            field,
            value: value.to_string(),
            reason: e.to_string(),
        })
}

/// Load configuration file from a specific path.
///
/// Returns `Ok(None)` if file doesn't exist (not an error - use defaults).
/// Returns `Err` if file exists but cannot be read or parsed.
pub fn load_config_file(path: impl Into<PathBuf>) -> Result<Option<ConfigFile>, ConfigError> {
    let path = path.into();

    // Missing file is not an error - use defaults
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    let config: ConfigFile = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    Ok(Some(config))
}

/// Resolve default config file path.
///
/// Returns `~/.config/calgrid/config.toml` on Unix, appropriate path on
/// other platforms. Returns `None` if home directory cannot be determined.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("calgrid").join("config.toml"))
}

/// Load configuration with precedence handling.
///
/// Precedence (highest to lowest):
/// 1. Explicit `config_path` argument (CLI `--config`)
/// 2. `CALGRID_CONFIG` environment variable
/// 3. Default path `~/.config/calgrid/config.toml`
///
/// Missing config files are NOT errors - defaults are used.
pub fn load_config_with_precedence(
    config_path: Option<PathBuf>,
) -> Result<Option<ConfigFile>, ConfigError> {
    if let Some(path) = config_path {
        return load_config_file(path);
    }

    if let Ok(env_path) = std::env::var("CALGRID_CONFIG") {
        return load_config_file(PathBuf::from(env_path));
    }

    if let Some(default_path) = default_config_path() {
        return load_config_file(default_path);
    }

    Ok(None)
}

/// Apply environment variable overrides to resolved config.
///
/// Checks for:
/// - `CALGRID_TIMEZONE`: Override time zone
/// - `CALGRID_VIEW`: Override startup view
pub fn apply_env_overrides(mut config: ResolvedConfig) -> Result<ResolvedConfig, ConfigError> {
    if let Ok(timezone) = std::env::var("CALGRID_TIMEZONE") {
        config.timezone = parse_timezone(&timezone)?;
    }

    if let Ok(view) = std::env::var("CALGRID_VIEW") {
        config.view = parse_view(&view)?;
    }

    Ok(config)
}

/// Merge config file into defaults to create resolved config.
///
/// For each field in `ConfigFile`, if `Some(value)`, use it; otherwise use
/// default. Values that parse as TOML but make no sense (unknown zone,
/// malformed time, zero step, `min_time` after `max_time`) are errors.
pub fn merge_config(config_file: Option<ConfigFile>) -> Result<ResolvedConfig, ConfigError> {
    let defaults = ResolvedConfig::default();

    let Some(config) = config_file else {
        return Ok(defaults);
    };

    let timezone = match config.timezone.as_deref() {
        Some(name) => parse_timezone(name)?,
        None => defaults.timezone,
    };
    let min_time = match config.min_time.as_deref() {
        Some(value) => parse_time("min_time", value)?,
        None => defaults.min_time,
    };
    let max_time = match config.max_time.as_deref() {
        Some(value) => parse_time("max_time", value)?,
        None => defaults.max_time,
    };
    if min_time >= max_time {
        return Err(ConfigError::InvalidValue {
            field: "min_time",
            value: min_time.to_string(),
            reason: format!("must be earlier than max_time ({max_time})"),
        });
    }

    let step = config.step.unwrap_or(defaults.step);
    if step == 0 {
        return Err(ConfigError::InvalidValue {
            field: "step",
            value: "0".to_string(),
            reason: "must be at least one minute".to_string(),
        });
    }

    let fields = config.fields.unwrap_or_default();
    let field_defaults = defaults.fields;

    Ok(ResolvedConfig {
        timezone,
        week_start: config.week_start.unwrap_or(defaults.week_start),
        view: config.view.unwrap_or(defaults.view),
        step,
        timeslots: config.timeslots.unwrap_or(defaults.timeslots).max(1),
        min_time,
        max_time,
        max_rows: match config.max_rows {
            Some(0) => None,
            Some(rows) => Some(rows),
            None => defaults.max_rows,
        },
        day_layout: config.day_layout.unwrap_or(defaults.day_layout),
        minimum_start_difference: config
            .minimum_start_difference
            .unwrap_or(defaults.minimum_start_difference),
        overscan_rows: config.overscan_rows.unwrap_or(defaults.overscan_rows),
        row_height: config.row_height.unwrap_or(defaults.row_height).max(1),
        scroll_span: config.scroll_span.unwrap_or(defaults.scroll_span),
        agenda_length: config.agenda_length.unwrap_or(defaults.agenda_length).max(1),
        minimum_event_minutes: config
            .minimum_event_minutes
            .unwrap_or(defaults.minimum_event_minutes),
        fields: FieldNames {
            title: fields.title.unwrap_or(field_defaults.title),
            start: fields.start.unwrap_or(field_defaults.start),
            end: fields.end.unwrap_or(field_defaults.end),
            all_day: fields.all_day.unwrap_or(field_defaults.all_day),
            resource: fields.resource.unwrap_or(field_defaults.resource),
        },
        log_file_path: config.log_file_path.unwrap_or(defaults.log_file_path),
    })
}

/// Apply CLI argument overrides to resolved config.
///
/// CLI args have the highest precedence and override all other sources.
/// Only applies overrides for flags that were explicitly set by the user.
///
/// Precedence chain: Defaults → Config File → Env Vars → CLI Args (highest)
pub fn apply_cli_overrides(
    mut config: ResolvedConfig,
    view_override: Option<View>,
    timezone_override: Option<Tz>,
) -> ResolvedConfig {
    if let Some(view) = view_override {
        config.view = view;
    }

    if let Some(timezone) = timezone_override {
        config.timezone = timezone;
    }

    config
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
