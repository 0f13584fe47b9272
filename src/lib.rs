//! calgrid
//!
//! Headless calendar layout engine. Host records are resolved into events,
//! projected onto rows of days, packed into lanes, placed in time-slot
//! columns and virtualized for infinite scrolling. Pointer interactions come
//! back out as intents; the engine never mutates source data.
//!
//! Pure layout lives in [`layout`], scrolling and virtualization in
//! [`view_state`], and [`host::Calendar`] ties both to a host's data
//! provider and command sink.

pub mod config;
pub mod dates;
pub mod host;
pub mod interaction;
pub mod layout;
pub mod logging;
pub mod model;
pub mod view_state;
pub mod views;
