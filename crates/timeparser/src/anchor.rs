//! The "today" anchor used to complete partial dates.
//!
//! A date written as a day only takes its year and month from the anchor; a
//! day and month takes its year. The anchor is read at match time, so a
//! change is visible to the very next parse.

use std::sync::{PoisonError, RwLock};

use chrono::{Datelike, Local, NaiveDate};

use crate::error::{Result, TimeParseError};

#[derive(Debug)]
pub struct TodayAnchor {
    date: RwLock<NaiveDate>,
}

impl Default for TodayAnchor {
    fn default() -> Self {
        Self::new()
    }
}

impl TodayAnchor {
    /// An anchor set to the real local date.
    pub fn new() -> Self {
        Self::fixed(real_today())
    }

    pub fn fixed(date: NaiveDate) -> Self {
        Self {
            date: RwLock::new(date),
        }
    }

    pub fn get(&self) -> NaiveDate {
        *self.date.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Set the anchor. Omitted parts come from the real local date.
    ///
    /// # Errors
    ///
    /// Returns [`TimeParseError::InvalidConfig`] if the parts do not form a
    /// valid date (e.g. month 2, day 30).
    pub fn set(&self, year: Option<i32>, month: Option<u32>, day: Option<u32>) -> Result<NaiveDate> {
        let today = real_today();
        let year = year.unwrap_or(today.year());
        let month = month.unwrap_or(today.month());
        let day = day.unwrap_or(today.day());

        let date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
            TimeParseError::InvalidConfig(format!(
                "today anchor {year:04}-{month:02}-{day:02} is not a valid date"
            ))
        })?;
        *self.date.write().unwrap_or_else(PoisonError::into_inner) = date;
        Ok(date)
    }

    /// Reset the anchor to the real local date.
    pub fn reset(&self) -> NaiveDate {
        let today = real_today();
        *self.date.write().unwrap_or_else(PoisonError::into_inner) = today;
        today
    }
}

fn real_today() -> NaiveDate {
    Local::now().date_naive()
}
