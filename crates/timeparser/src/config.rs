//! Format configuration for each temporal kind.
//!
//! A configuration describes which pattern variants are legal: separators,
//! digit widths, component counts, and the optional no-separator, month-name
//! and sub-second forms. Configurations are plain values; the [`Parser`]
//! owns the active ones and replaces fields through the `*Update` records,
//! whose `None` fields keep the current value.
//!
//! [`Parser`]: crate::Parser

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TimeParseError};
use crate::pattern::Component;

// ── Endianness ──────────────────────────────────────────────────────────────

/// Ordering of day, month and year within a date string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndianMode {
    /// Day, month, year (`22.04.2013`).
    #[default]
    Little,
    /// Year, month, day (`2013-04-22`).
    Big,
    /// Month, day, year (`04/22/2013`).
    Middle,
}

impl EndianMode {
    /// The date components in the order they appear in a date string.
    pub fn order(self) -> [Component; 3] {
        match self {
            Self::Little => [Component::Day, Component::Month, Component::Year],
            Self::Big => [Component::Year, Component::Month, Component::Day],
            Self::Middle => [Component::Month, Component::Day, Component::Year],
        }
    }
}

impl fmt::Display for EndianMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Little => "little",
            Self::Big => "big",
            Self::Middle => "middle",
        };
        f.write_str(name)
    }
}

impl FromStr for EndianMode {
    type Err = TimeParseError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "little" => Ok(Self::Little),
            "big" => Ok(Self::Big),
            "middle" => Ok(Self::Middle),
            _ => Err(TimeParseError::InvalidConfig(format!(
                "unknown endian mode '{s}' (expected little, big or middle)"
            ))),
        }
    }
}

// ── Time ────────────────────────────────────────────────────────────────────

/// Accepted time formats.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeConfig {
    /// Separators placed between hour, minute and second.
    pub separators: Vec<String>,
    /// Per component (hour, minute, second): `true` accepts one or two
    /// digits, `false` exactly two.
    pub figure_widths: [bool; 3],
    /// Which component counts are accepted: hour only, hour and minute,
    /// hour, minute and second.
    pub lengths: [bool; 3],
    /// Accept the fixed-width forms without separators (`104522`).
    pub allow_no_separator: bool,
    /// Accept a `.` followed by up to six fractional second digits.
    pub allow_subsecond: bool,
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            separators: vec![":".to_string(), ".".to_string()],
            figure_widths: [true; 3],
            lengths: [true; 3],
            allow_no_separator: true,
            allow_subsecond: false,
        }
    }
}

impl TimeConfig {
    pub fn validate(&self) -> Result<()> {
        validate_separators(&self.separators)
    }

    /// Return a copy with the fields of `update` applied.
    pub fn updated(&self, update: TimeConfigUpdate) -> Result<Self> {
        let mut next = self.clone();
        if let Some(separators) = update.separators {
            next.separators = separators;
        }
        if let Some(widths) = update.figure_widths {
            next.figure_widths = widths;
        }
        if let Some(lengths) = update.lengths {
            next.lengths = lengths;
        }
        if let Some(allow) = update.allow_no_separator {
            next.allow_no_separator = allow;
        }
        if let Some(allow) = update.allow_subsecond {
            next.allow_subsecond = allow;
        }
        next.validate()?;
        Ok(next)
    }
}

/// Partial update for [`TimeConfig`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimeConfigUpdate {
    pub separators: Option<Vec<String>>,
    pub figure_widths: Option<[bool; 3]>,
    pub lengths: Option<[bool; 3]>,
    pub allow_no_separator: Option<bool>,
    pub allow_subsecond: Option<bool>,
}

impl TimeConfigUpdate {
    pub fn separators<I, S>(mut self, separators: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.separators = Some(separators.into_iter().map(Into::into).collect());
        self
    }

    pub fn figure_widths(mut self, widths: [bool; 3]) -> Self {
        self.figure_widths = Some(widths);
        self
    }

    pub fn lengths(mut self, lengths: [bool; 3]) -> Self {
        self.lengths = Some(lengths);
        self
    }

    pub fn allow_no_separator(mut self, allow: bool) -> Self {
        self.allow_no_separator = Some(allow);
        self
    }

    pub fn allow_subsecond(mut self, allow: bool) -> Self {
        self.allow_subsecond = Some(allow);
        self
    }
}

// ── Date ────────────────────────────────────────────────────────────────────

/// Accepted date formats.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct DateConfig {
    /// Separators placed between day, month and year.
    pub separators: Vec<String>,
    /// Per component (day, month, year). Day and month: `true` accepts one
    /// or two digits, `false` exactly two. Year: `true` accepts the two-digit
    /// form besides the four-digit one, `false` only four digits.
    pub figure_widths: [bool; 3],
    /// Which component counts are accepted: day only, day and month, full
    /// date. Omitted components are completed from the today anchor.
    pub lengths: [bool; 3],
    /// Accept the fixed-width forms without separators (`220413`).
    pub allow_no_separator: bool,
    /// Accept English month names and abbreviations in place of the month.
    pub allow_month_name: bool,
    /// Ordering of the components.
    pub endian: EndianMode,
}

impl Default for DateConfig {
    fn default() -> Self {
        Self {
            separators: vec![
                ".".to_string(),
                "/".to_string(),
                "-".to_string(),
                " ".to_string(),
            ],
            figure_widths: [true; 3],
            lengths: [true; 3],
            allow_no_separator: true,
            allow_month_name: true,
            endian: EndianMode::default(),
        }
    }
}

impl DateConfig {
    pub fn validate(&self) -> Result<()> {
        validate_separators(&self.separators)
    }

    /// Return a copy with the fields of `update` applied.
    pub fn updated(&self, update: DateConfigUpdate) -> Result<Self> {
        let mut next = self.clone();
        if let Some(separators) = update.separators {
            next.separators = separators;
        }
        if let Some(widths) = update.figure_widths {
            next.figure_widths = widths;
        }
        if let Some(lengths) = update.lengths {
            next.lengths = lengths;
        }
        if let Some(allow) = update.allow_no_separator {
            next.allow_no_separator = allow;
        }
        if let Some(allow) = update.allow_month_name {
            next.allow_month_name = allow;
        }
        if let Some(endian) = update.endian {
            next.endian = endian;
        }
        next.validate()?;
        Ok(next)
    }
}

/// Partial update for [`DateConfig`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateConfigUpdate {
    pub separators: Option<Vec<String>>,
    pub figure_widths: Option<[bool; 3]>,
    pub lengths: Option<[bool; 3]>,
    pub allow_no_separator: Option<bool>,
    pub allow_month_name: Option<bool>,
    pub endian: Option<EndianMode>,
}

impl DateConfigUpdate {
    pub fn separators<I, S>(mut self, separators: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.separators = Some(separators.into_iter().map(Into::into).collect());
        self
    }

    pub fn figure_widths(mut self, widths: [bool; 3]) -> Self {
        self.figure_widths = Some(widths);
        self
    }

    pub fn lengths(mut self, lengths: [bool; 3]) -> Self {
        self.lengths = Some(lengths);
        self
    }

    pub fn allow_no_separator(mut self, allow: bool) -> Self {
        self.allow_no_separator = Some(allow);
        self
    }

    pub fn allow_month_name(mut self, allow: bool) -> Self {
        self.allow_month_name = Some(allow);
        self
    }

    pub fn endian(mut self, endian: EndianMode) -> Self {
        self.endian = Some(endian);
        self
    }
}

// ── Datetime ────────────────────────────────────────────────────────────────

/// Accepted separators between the date and the time half of a datetime.
///
/// The halves themselves follow the active [`DateConfig`] and [`TimeConfig`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct DatetimeConfig {
    pub separators: Vec<String>,
    /// Accept date and time written back to back (`220413104522`).
    pub allow_no_separator: bool,
}

impl Default for DatetimeConfig {
    fn default() -> Self {
        Self {
            separators: vec![
                " ".to_string(),
                "T".to_string(),
                "_".to_string(),
                ",".to_string(),
            ],
            allow_no_separator: true,
        }
    }
}

impl DatetimeConfig {
    pub fn validate(&self) -> Result<()> {
        validate_separators(&self.separators)
    }

    /// Return a copy with the fields of `update` applied.
    pub fn updated(&self, update: DatetimeConfigUpdate) -> Result<Self> {
        let mut next = self.clone();
        if let Some(separators) = update.separators {
            next.separators = separators;
        }
        if let Some(allow) = update.allow_no_separator {
            next.allow_no_separator = allow;
        }
        next.validate()?;
        Ok(next)
    }
}

/// Partial update for [`DatetimeConfig`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DatetimeConfigUpdate {
    pub separators: Option<Vec<String>>,
    pub allow_no_separator: Option<bool>,
}

impl DatetimeConfigUpdate {
    pub fn separators<I, S>(mut self, separators: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.separators = Some(separators.into_iter().map(Into::into).collect());
        self
    }

    pub fn allow_no_separator(mut self, allow: bool) -> Self {
        self.allow_no_separator = Some(allow);
        self
    }
}

// ── Settings ────────────────────────────────────────────────────────────────

/// All three configurations, as loaded from a settings file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub time: TimeConfig,
    pub date: DateConfig,
    pub datetime: DatetimeConfig,
}

impl Settings {
    pub fn validate(&self) -> Result<()> {
        self.time.validate()?;
        self.date.validate()?;
        self.datetime.validate()
    }
}

/// An empty separator is spelled `allow_no_separator`; digits would make
/// separators indistinguishable from the numbers around them.
fn validate_separators(separators: &[String]) -> Result<()> {
    for sep in separators {
        if sep.is_empty() {
            return Err(TimeParseError::InvalidConfig(
                "empty separator (use allow_no_separator instead)".to_string(),
            ));
        }
        if sep.chars().any(|c| c.is_ascii_digit()) {
            return Err(TimeParseError::InvalidConfig(format!(
                "separator '{sep}' contains a digit"
            )));
        }
    }
    Ok(())
}
