//! Error types for timeparser operations.

use std::fmt;

use thiserror::Error;

/// The kind of temporal value a caller asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemporalKind {
    Time,
    Date,
    Datetime,
    Duration,
}

impl fmt::Display for TemporalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Time => "time",
            Self::Date => "date",
            Self::Datetime => "datetime",
            Self::Duration => "duration",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimeParseError {
    #[error("'{text}' couldn't be parsed as {kind}")]
    NoFormatMatched { text: String, kind: TemporalKind },

    #[error("Invalid {kind} '{text}': {reason}")]
    InvalidDurationToken {
        text: String,
        kind: TemporalKind,
        reason: String,
    },

    #[error("'{text}' couldn't be parsed as time or datetime: expected 1 or 2 tokens, got {count}")]
    AmbiguousInput { text: String, count: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, TimeParseError>;
