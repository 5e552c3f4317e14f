//! # timeparser
//!
//! Parse loosely formatted times, dates, datetimes and durations.
//!
//! Instead of one fixed format, each kind is matched against a generated
//! sequence of candidate patterns: every combination of component count,
//! separator, field width and component order the configuration allows,
//! ordered from most to least specific. The first pattern that matches the
//! whole input and yields a valid value wins. Dates written without a year or
//! month are completed from a configurable "today" anchor.
//!
//! ## Modules
//!
//! - [`config`]: Format configuration for each kind, endian mode
//! - [`pattern`]: Typed patterns, scanning and rendering
//! - [`generator`]: Configuration → ordered candidate patterns
//! - [`matcher`]: First-match search and date completion
//! - [`anchor`]: The "today" anchor
//! - [`duration`]: Positional duration numbers → `TimeDelta`
//! - [`parser`]: The parsing context tying it all together
//! - [`error`]: Error types
//!
//! The free functions below act on one process-wide [`Parser`]. Create a
//! [`Parser`] of your own for isolated configuration.
//!
//! ```
//! use chrono::{NaiveDate, NaiveTime};
//!
//! timeparser::set_today(Some(2013), Some(4), Some(1)).unwrap();
//! assert_eq!(
//!     timeparser::parse_date("22.4").unwrap(),
//!     NaiveDate::from_ymd_opt(2013, 4, 22).unwrap()
//! );
//! assert_eq!(
//!     timeparser::parse_time("10:45").unwrap(),
//!     NaiveTime::from_hms_opt(10, 45, 0).unwrap()
//! );
//! timeparser::reset_today();
//! ```

pub mod anchor;
pub mod config;
pub mod duration;
pub mod error;
pub mod generator;
pub mod matcher;
pub mod parser;
pub mod pattern;

use std::sync::{Arc, OnceLock};

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};

pub use config::{
    DateConfig, DateConfigUpdate, DatetimeConfig, DatetimeConfigUpdate, EndianMode, Settings,
    TimeConfig, TimeConfigUpdate,
};
pub use duration::{unit_weights, Unit};
pub use error::{Result, TemporalKind, TimeParseError};
pub use matcher::{TimeOrDatetime, Tokens};
pub use parser::Parser;
pub use pattern::{Component, Form, Pattern, Piece};

static GLOBAL: OnceLock<Parser> = OnceLock::new();

/// The process-wide parser behind the free functions.
pub fn global() -> &'static Parser {
    GLOBAL.get_or_init(Parser::new)
}

// ── Parsing ─────────────────────────────────────────────────────────────────

pub fn parse_time<'a>(input: impl Into<Tokens<'a>>) -> Result<NaiveTime> {
    global().parse_time(input)
}

pub fn parse_date<'a>(input: impl Into<Tokens<'a>>) -> Result<NaiveDate> {
    global().parse_date(input)
}

pub fn parse_datetime<'a>(input: impl Into<Tokens<'a>>) -> Result<NaiveDateTime> {
    global().parse_datetime(input)
}

pub fn parse_time_or_datetime<'a>(input: impl Into<Tokens<'a>>) -> Result<TimeOrDatetime> {
    global().parse_time_or_datetime(input)
}

pub fn parse_duration<'a>(input: impl Into<Tokens<'a>>, key: &str) -> Result<TimeDelta> {
    global().parse_duration(input, key)
}

// ── Configuration ───────────────────────────────────────────────────────────

pub fn time_config(update: TimeConfigUpdate) -> Result<()> {
    global().time_config(update)
}

pub fn date_config(update: DateConfigUpdate) -> Result<()> {
    global().date_config(update)
}

pub fn datetime_config(update: DatetimeConfigUpdate) -> Result<()> {
    global().datetime_config(update)
}

pub fn set_endian(endian: EndianMode) {
    global().set_endian(endian)
}

pub fn endian() -> EndianMode {
    global().endian()
}

pub fn patterns(kind: TemporalKind) -> Arc<[Pattern]> {
    global().patterns(kind)
}

pub fn settings() -> Settings {
    global().settings()
}

pub fn time_settings() -> TimeConfig {
    global().time_settings()
}

pub fn date_settings() -> DateConfig {
    global().date_settings()
}

pub fn datetime_settings() -> DatetimeConfig {
    global().datetime_settings()
}

// ── Today anchor ────────────────────────────────────────────────────────────

pub fn set_today(year: Option<i32>, month: Option<u32>, day: Option<u32>) -> Result<NaiveDate> {
    global().set_today(year, month, day)
}

pub fn get_today() -> NaiveDate {
    global().get_today()
}

pub fn reset_today() -> NaiveDate {
    global().reset_today()
}
