//! The parsing context: active configuration, pattern cache and today anchor.
//!
//! A [`Parser`] owns everything a parse depends on, so independent parsers
//! never observe each other's configuration. The crate-level free functions
//! share one process-wide parser.
//!
//! Pattern sequences are generated lazily per kind and cached as
//! `Arc<[Pattern]>`. A configuration call that actually changes a
//! configuration drops the cached sequences of the affected kinds; datetime
//! patterns depend on both the date and the time configuration.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use log::debug;

use crate::anchor::TodayAnchor;
use crate::config::{
    DateConfig, DateConfigUpdate, DatetimeConfig, DatetimeConfigUpdate, EndianMode, Settings,
    TimeConfig, TimeConfigUpdate,
};
use crate::duration;
use crate::error::{Result, TemporalKind, TimeParseError};
use crate::generator::{generate_date, generate_datetime, generate_time};
use crate::matcher::{self, TimeOrDatetime, Tokens};
use crate::pattern::Pattern;

#[derive(Debug, Default)]
struct PatternCache {
    time: Option<Arc<[Pattern]>>,
    date: Option<Arc<[Pattern]>>,
    datetime: Option<Arc<[Pattern]>>,
}

impl PatternCache {
    fn slot(&mut self, kind: TemporalKind) -> Option<&mut Option<Arc<[Pattern]>>> {
        match kind {
            TemporalKind::Time => Some(&mut self.time),
            TemporalKind::Date => Some(&mut self.date),
            TemporalKind::Datetime => Some(&mut self.datetime),
            TemporalKind::Duration => None,
        }
    }

    fn get(&self, kind: TemporalKind) -> Option<Arc<[Pattern]>> {
        match kind {
            TemporalKind::Time => self.time.clone(),
            TemporalKind::Date => self.date.clone(),
            TemporalKind::Datetime => self.datetime.clone(),
            TemporalKind::Duration => None,
        }
    }

    fn invalidate(&mut self, kinds: &[TemporalKind]) {
        for kind in kinds {
            if let Some(slot) = self.slot(*kind) {
                *slot = None;
            }
        }
    }
}

#[derive(Debug, Default)]
struct FormatState {
    settings: Settings,
    cache: PatternCache,
    version: u64,
}

impl FormatState {
    fn patterns(&mut self, kind: TemporalKind) -> Arc<[Pattern]> {
        if let Some(patterns) = self.cache.get(kind) {
            return patterns;
        }
        let generated: Arc<[Pattern]> = match kind {
            TemporalKind::Time => generate_time(&self.settings.time).into(),
            TemporalKind::Date => generate_date(&self.settings.date).into(),
            TemporalKind::Datetime => {
                let date = self.patterns(TemporalKind::Date);
                let time = self.patterns(TemporalKind::Time);
                generate_datetime(&self.settings.datetime, &date, &time).into()
            }
            TemporalKind::Duration => return Arc::from(Vec::new()),
        };
        debug!(
            "generated {} {kind} patterns (configuration version {})",
            generated.len(),
            self.version
        );
        if let Some(slot) = self.cache.slot(kind) {
            *slot = Some(Arc::clone(&generated));
        }
        generated
    }

    fn changed(&mut self, kinds: &[TemporalKind]) {
        self.cache.invalidate(kinds);
        self.version += 1;
        debug!("configuration version {}: dropped cached {kinds:?} patterns", self.version);
    }
}

/// Configurable parser for times, dates, datetimes and durations.
#[derive(Debug, Default)]
pub struct Parser {
    formats: RwLock<FormatState>,
    today: TodayAnchor,
}

impl Parser {
    /// A parser with default formats, anchored at the real local date.
    pub fn new() -> Self {
        Self::default()
    }

    /// A parser with the given formats.
    ///
    /// # Errors
    ///
    /// Returns [`TimeParseError::InvalidConfig`] if a configuration is
    /// structurally invalid.
    pub fn with_settings(settings: Settings) -> Result<Self> {
        settings.validate()?;
        Ok(Self {
            formats: RwLock::new(FormatState {
                settings,
                ..FormatState::default()
            }),
            today: TodayAnchor::new(),
        })
    }

    /// Replace the today anchor.
    pub fn anchored_at(mut self, today: NaiveDate) -> Self {
        self.today = TodayAnchor::fixed(today);
        self
    }

    fn read_formats(&self) -> RwLockReadGuard<'_, FormatState> {
        self.formats.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_formats(&self) -> RwLockWriteGuard<'_, FormatState> {
        self.formats.write().unwrap_or_else(PoisonError::into_inner)
    }

    // ── Configuration ───────────────────────────────────────────────────────

    pub fn time_config(&self, update: TimeConfigUpdate) -> Result<()> {
        let mut state = self.write_formats();
        let next = state.settings.time.updated(update)?;
        if next != state.settings.time {
            state.settings.time = next;
            state.changed(&[TemporalKind::Time, TemporalKind::Datetime]);
        }
        Ok(())
    }

    pub fn date_config(&self, update: DateConfigUpdate) -> Result<()> {
        let mut state = self.write_formats();
        let next = state.settings.date.updated(update)?;
        if next != state.settings.date {
            state.settings.date = next;
            state.changed(&[TemporalKind::Date, TemporalKind::Datetime]);
        }
        Ok(())
    }

    pub fn datetime_config(&self, update: DatetimeConfigUpdate) -> Result<()> {
        let mut state = self.write_formats();
        let next = state.settings.datetime.updated(update)?;
        if next != state.settings.datetime {
            state.settings.datetime = next;
            state.changed(&[TemporalKind::Datetime]);
        }
        Ok(())
    }

    pub fn set_endian(&self, endian: EndianMode) {
        let mut state = self.write_formats();
        if state.settings.date.endian != endian {
            state.settings.date.endian = endian;
            state.changed(&[TemporalKind::Date, TemporalKind::Datetime]);
        }
    }

    pub fn endian(&self) -> EndianMode {
        self.read_formats().settings.date.endian
    }

    pub fn settings(&self) -> Settings {
        self.read_formats().settings.clone()
    }

    pub fn time_settings(&self) -> TimeConfig {
        self.read_formats().settings.time.clone()
    }

    pub fn date_settings(&self) -> DateConfig {
        self.read_formats().settings.date.clone()
    }

    pub fn datetime_settings(&self) -> DatetimeConfig {
        self.read_formats().settings.datetime.clone()
    }

    /// Incremented by every configuration call that changes something.
    pub fn config_version(&self) -> u64 {
        self.read_formats().version
    }

    /// The candidate patterns for `kind`, in matching order.
    ///
    /// Durations are not pattern-based; their sequence is empty.
    pub fn patterns(&self, kind: TemporalKind) -> Arc<[Pattern]> {
        if let Some(patterns) = self.read_formats().cache.get(kind) {
            return patterns;
        }
        self.write_formats().patterns(kind)
    }

    // ── Today anchor ────────────────────────────────────────────────────────

    /// Set the today anchor; omitted parts come from the real local date.
    pub fn set_today(
        &self,
        year: Option<i32>,
        month: Option<u32>,
        day: Option<u32>,
    ) -> Result<NaiveDate> {
        self.today.set(year, month, day)
    }

    pub fn get_today(&self) -> NaiveDate {
        self.today.get()
    }

    pub fn reset_today(&self) -> NaiveDate {
        self.today.reset()
    }

    // ── Parsing ─────────────────────────────────────────────────────────────

    /// Parse a time. Several tokens are joined with a space.
    ///
    /// # Errors
    ///
    /// Returns [`TimeParseError::NoFormatMatched`] if no time pattern
    /// matches.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::NaiveTime;
    /// use timeparser::Parser;
    ///
    /// let parser = Parser::new();
    /// assert_eq!(parser.parse_time("104522").unwrap(), NaiveTime::from_hms_opt(10, 45, 22).unwrap());
    /// assert_eq!(parser.parse_time("9:5").unwrap(), NaiveTime::from_hms_opt(9, 5, 0).unwrap());
    /// ```
    pub fn parse_time<'a>(&self, input: impl Into<Tokens<'a>>) -> Result<NaiveTime> {
        let text = input.into().joined();
        let patterns = self.patterns(TemporalKind::Time);
        matcher::match_time(&patterns, &text).ok_or_else(|| no_format(text, TemporalKind::Time))
    }

    /// Parse a date, completing an omitted year and month from the today
    /// anchor. Several tokens are joined with a space.
    ///
    /// # Errors
    ///
    /// Returns [`TimeParseError::NoFormatMatched`] if no date pattern
    /// matches.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use timeparser::Parser;
    ///
    /// let parser = Parser::new().anchored_at(NaiveDate::from_ymd_opt(2013, 4, 1).unwrap());
    /// let expected = NaiveDate::from_ymd_opt(2013, 4, 22).unwrap();
    /// assert_eq!(parser.parse_date("22.4.13").unwrap(), expected);
    /// assert_eq!(parser.parse_date("22042013").unwrap(), expected);
    /// assert_eq!(parser.parse_date("22").unwrap(), expected);
    /// ```
    pub fn parse_date<'a>(&self, input: impl Into<Tokens<'a>>) -> Result<NaiveDate> {
        let text = input.into().joined();
        let patterns = self.patterns(TemporalKind::Date);
        matcher::match_date(&patterns, &text, self.today.get())
            .ok_or_else(|| no_format(text, TemporalKind::Date))
    }

    /// Parse a datetime.
    ///
    /// Exactly two tokens are parsed as a date and a time on their own and
    /// combined. Any other input is joined and matched against the datetime
    /// patterns.
    ///
    /// # Errors
    ///
    /// Returns [`TimeParseError::NoFormatMatched`] if the input (or either
    /// half of a two-token input) does not match.
    pub fn parse_datetime<'a>(&self, input: impl Into<Tokens<'a>>) -> Result<NaiveDateTime> {
        let tokens = input.into();
        if let [date, time] = tokens.as_slice() {
            return self.combine(date, time);
        }
        let text = tokens.joined();
        let patterns = self.patterns(TemporalKind::Datetime);
        matcher::match_datetime(&patterns, &text, self.today.get())
            .ok_or_else(|| no_format(text, TemporalKind::Datetime))
    }

    /// Parse one token as a time, or two tokens as a date and a time.
    ///
    /// # Errors
    ///
    /// Returns [`TimeParseError::AmbiguousInput`] for any other token count,
    /// and [`TimeParseError::NoFormatMatched`] if the tokens do not match.
    pub fn parse_time_or_datetime<'a>(&self, input: impl Into<Tokens<'a>>) -> Result<TimeOrDatetime> {
        let tokens = input.into();
        match tokens.as_slice() {
            [time] => self.parse_time(*time).map(TimeOrDatetime::Time),
            [date, time] => self.combine(date, time).map(TimeOrDatetime::Datetime),
            _ => Err(TimeParseError::AmbiguousInput {
                text: tokens.joined(),
                count: tokens.len(),
            }),
        }
    }

    /// Parse positional duration numbers whose units follow from `key`.
    ///
    /// # Errors
    ///
    /// Returns [`TimeParseError::InvalidDurationToken`] for malformed or
    /// surplus numbers.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::TimeDelta;
    /// use timeparser::Parser;
    ///
    /// let parser = Parser::new();
    /// let delta = parser.parse_duration(["20", "12", "4"], "days").unwrap();
    /// assert_eq!(delta, TimeDelta::days(20) + TimeDelta::hours(12) + TimeDelta::minutes(4));
    /// ```
    pub fn parse_duration<'a>(&self, input: impl Into<Tokens<'a>>, key: &str) -> Result<TimeDelta> {
        duration::decompose(key, &input.into())
    }

    fn combine(&self, date: &str, time: &str) -> Result<NaiveDateTime> {
        let no_match = || no_format(format!("{date} {time}"), TemporalKind::Datetime);
        let date = self.parse_date(date).map_err(|_| no_match())?;
        let time = self.parse_time(time).map_err(|_| no_match())?;
        Ok(date.and_time(time))
    }
}

fn no_format(text: String, kind: TemporalKind) -> TimeParseError {
    TimeParseError::NoFormatMatched { text, kind }
}
