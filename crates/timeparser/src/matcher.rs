//! First-match search over a generated pattern sequence.
//!
//! Patterns are tried in order. The first one that consumes the whole input
//! and whose fields form a valid chrono value wins; a structural match with
//! an impossible value (month 13, 30 February) moves on to the next pattern.

use chrono::format::Parsed;
use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};

use crate::pattern::Pattern;

/// The raw input of one parse: an ordered, non-normalized token sequence.
///
/// Command-line frameworks hand over either one string or several tokens
/// that belong to a single value; both become `Tokens`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tokens<'a> {
    items: Vec<&'a str>,
}

impl<'a> Tokens<'a> {
    pub fn new(items: Vec<&'a str>) -> Self {
        Self { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn as_slice(&self) -> &[&'a str] {
        &self.items
    }

    /// All tokens joined with a single space.
    pub fn joined(&self) -> String {
        self.items.join(" ")
    }
}

impl<'a> From<&'a str> for Tokens<'a> {
    fn from(text: &'a str) -> Self {
        Self::new(vec![text])
    }
}

impl<'a> From<&'a String> for Tokens<'a> {
    fn from(text: &'a String) -> Self {
        Self::new(vec![text.as_str()])
    }
}

impl<'a, const N: usize> From<[&'a str; N]> for Tokens<'a> {
    fn from(items: [&'a str; N]) -> Self {
        Self::new(items.to_vec())
    }
}

impl<'a> From<&[&'a str]> for Tokens<'a> {
    fn from(items: &[&'a str]) -> Self {
        Self::new(items.to_vec())
    }
}

impl<'a> From<Vec<&'a str>> for Tokens<'a> {
    fn from(items: Vec<&'a str>) -> Self {
        Self::new(items)
    }
}

impl<'a> From<&'a [String]> for Tokens<'a> {
    fn from(items: &'a [String]) -> Self {
        Self::new(items.iter().map(String::as_str).collect())
    }
}

impl<'a> From<&'a Vec<String>> for Tokens<'a> {
    fn from(items: &'a Vec<String>) -> Self {
        Self::from(items.as_slice())
    }
}

/// Result of a parse that accepts either a bare time or a full datetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeOrDatetime {
    Time(NaiveTime),
    Datetime(NaiveDateTime),
}

pub fn match_time(patterns: &[Pattern], text: &str) -> Option<NaiveTime> {
    first_match(patterns, text, build_time)
}

/// Match a date, completing a missing year and month from `today`.
pub fn match_date(patterns: &[Pattern], text: &str, today: NaiveDate) -> Option<NaiveDate> {
    first_match(patterns, text, |parsed| complete_date(parsed, today))
}

pub fn match_datetime(patterns: &[Pattern], text: &str, today: NaiveDate) -> Option<NaiveDateTime> {
    first_match(patterns, text, |parsed| {
        let date = complete_date(parsed.clone(), today)?;
        let time = build_time(parsed)?;
        Some(date.and_time(time))
    })
}

fn first_match<T>(
    patterns: &[Pattern],
    text: &str,
    build: impl Fn(Parsed) -> Option<T>,
) -> Option<T> {
    patterns
        .iter()
        .filter_map(|pattern| pattern.scan(text))
        .find_map(build)
}

fn complete_date(mut parsed: Parsed, today: NaiveDate) -> Option<NaiveDate> {
    if parsed.month().is_none() {
        parsed.set_month(today.month().into()).ok()?;
    }
    if parsed.year().is_none() && parsed.year_mod_100().is_none() {
        parsed.set_year(today.year().into()).ok()?;
    }
    parsed.to_naive_date().ok()
}

fn build_time(mut parsed: Parsed) -> Option<NaiveTime> {
    // chrono accepts 60 as a leap second; a clock reading does not.
    if parsed.second() == Some(60) {
        return None;
    }
    if parsed.minute().is_none() {
        parsed.set_minute(0).ok()?;
    }
    parsed.to_naive_time().ok()
}
