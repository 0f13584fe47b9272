//! Error types for calgrid.
//!
//! This module defines the error taxonomy using `thiserror` for structured error
//! handling. Errors compose via `?` and `From` conversions.
//!
//! # Error Hierarchy
//!
//! - [`AppError`] - Top-level CLI error wrapping all domain-specific failures
//!   - [`InputError`] - Records file reading failures (file not found, IO, invalid JSON)
//!   - [`crate::config::ConfigError`] - Configuration file failures
//!   - [`crate::logging::LoggingError`] - Tracing subscriber setup failures
//! - [`RecordError`] - A single source record that could not become an event
//!
//! # Error Recovery Strategy
//!
//! Record errors are **non-fatal**: a record with a missing or malformed date is
//! logged and excluded, and every other record still renders. The layout engine
//! itself has no error paths; it clamps and filters its inputs instead.

use std::path::PathBuf;
use thiserror::Error;

use crate::config::ConfigError;
use crate::logging::LoggingError;

/// Top-level application error encompassing all fatal failure modes of the CLI.
///
/// # Examples
///
/// ```no_run
/// use calgrid::model::error::{AppError, InputError};
///
/// fn run() -> Result<(), AppError> {
///     let _records = read_records()?;
///     Ok(())
/// }
/// # fn read_records() -> Result<(), InputError> { Ok(()) }
/// ```
#[derive(Debug, Error)]
pub enum AppError {
    /// Failed to read the records input.
    #[error("Failed to read input: {0}")]
    Input(#[from] InputError),

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Tracing could not be initialized.
    #[error("Logging error: {0}")]
    Logging(#[from] LoggingError),

    /// Layout output could not be serialized or written.
    #[error("Failed to write output: {0}")]
    Output(String),
}

/// Errors encountered when reading source records from files or stdin.
#[derive(Debug, Error)]
pub enum InputError {
    /// The specified records file does not exist at the given path.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::path::PathBuf;
    /// use calgrid::model::error::InputError;
    ///
    /// let err = InputError::FileNotFound {
    ///     path: PathBuf::from("/tmp/missing.json")
    /// };
    /// assert!(err.to_string().contains("/tmp/missing.json"));
    /// ```
    #[error("File not found: {path}")]
    FileNotFound {
        /// The filesystem path that was not found.
        path: PathBuf,
    },

    /// Input is not a JSON array of record objects.
    #[error("Invalid records JSON: {0}")]
    InvalidJson(String),

    /// Generic I/O error reading from the input source.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A source record that could not be resolved into an event.
///
/// Never fatal: the record is skipped and the calendar renders the rest.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RecordError {
    /// A required field is absent or null.
    #[error("Record {record}: missing field '{field}'")]
    MissingField {
        /// Source row id.
        record: String,
        /// Field name (or `<accessor>` for callback accessors).
        field: String,
    },

    /// A date field holds a value that is not a recognizable date.
    #[error("Record {record}: invalid date in '{field}': {value}")]
    InvalidDate {
        /// Source row id.
        record: String,
        /// Field name.
        field: String,
        /// The offending raw value.
        value: String,
    },

    /// The record id itself is unusable.
    #[error("Record has an empty id")]
    EmptyId,
}
