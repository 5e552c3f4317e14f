//! Positional duration decomposition.
//!
//! A duration is written as up to three numbers whose units follow from a
//! destination key: for `weeks`, `"2 12 30"` is 2 weeks, 12 hours and
//! 30 minutes. Unknown keys use days, hours and minutes.
//!
//! Numbers are signed integers or decimals. They may be split across tokens
//! and separated by commas or whitespace. The weighted sum is computed
//! exactly in nanoseconds.

use chrono::TimeDelta;

use crate::error::{Result, TemporalKind, TimeParseError};
use crate::matcher::Tokens;

const NANOS_PER_SECOND: i128 = 1_000_000_000;

/// Fraction digits beyond nanosecond precision of the largest unit.
const MAX_FRACTION_DIGITS: usize = 18;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Unit {
    Weeks,
    Days,
    Hours,
    Minutes,
    Seconds,
    Milliseconds,
    Microseconds,
}

impl Unit {
    pub fn nanoseconds(self) -> i128 {
        match self {
            Self::Weeks => 7 * 24 * 3600 * NANOS_PER_SECOND,
            Self::Days => 24 * 3600 * NANOS_PER_SECOND,
            Self::Hours => 3600 * NANOS_PER_SECOND,
            Self::Minutes => 60 * NANOS_PER_SECOND,
            Self::Seconds => NANOS_PER_SECOND,
            Self::Milliseconds => 1_000_000,
            Self::Microseconds => 1_000,
        }
    }
}

const DEFAULT_WEIGHTS: &[Unit] = &[Unit::Days, Unit::Hours, Unit::Minutes];

/// The unit of each positional number for `key`.
///
/// Keys are matched case-insensitively, singular or plural.
pub fn unit_weights(key: &str) -> &'static [Unit] {
    let lowered = key.trim().to_ascii_lowercase();
    let stem = lowered.strip_suffix('s').unwrap_or(&lowered);
    match stem {
        "week" => &[Unit::Weeks, Unit::Hours, Unit::Minutes],
        "day" => &[Unit::Days, Unit::Hours, Unit::Minutes],
        "hour" => &[Unit::Hours, Unit::Minutes, Unit::Seconds],
        "minute" => &[Unit::Minutes, Unit::Seconds, Unit::Milliseconds],
        "second" => &[Unit::Seconds, Unit::Milliseconds, Unit::Microseconds],
        "millisecond" => &[Unit::Milliseconds, Unit::Microseconds],
        "microsecond" => &[Unit::Microseconds],
        _ => DEFAULT_WEIGHTS,
    }
}

/// Build a duration from positional numbers.
///
/// # Errors
///
/// Returns [`TimeParseError::InvalidDurationToken`] if a number is
/// malformed, if there are no numbers or more numbers than units for `key`,
/// or if the sum exceeds the [`TimeDelta`] range.
pub fn decompose(key: &str, tokens: &Tokens<'_>) -> Result<TimeDelta> {
    let text = tokens.joined();
    let invalid = |reason: String| TimeParseError::InvalidDurationToken {
        text: text.clone(),
        kind: TemporalKind::Duration,
        reason,
    };

    let numbers: Vec<&str> = tokens
        .as_slice()
        .iter()
        .flat_map(|token| token.split(|c: char| c == ',' || c.is_whitespace()))
        .filter(|number| !number.is_empty())
        .collect();

    let weights = unit_weights(key);
    if numbers.is_empty() {
        return Err(invalid("no duration components".to_string()));
    }
    if numbers.len() > weights.len() {
        return Err(invalid(format!(
            "expected at most {} components for '{key}', got {}",
            weights.len(),
            numbers.len()
        )));
    }

    let mut total: i128 = 0;
    for (number, unit) in numbers.iter().zip(weights) {
        let nanos = weighted_nanos(number, *unit).map_err(invalid)?;
        total = total
            .checked_add(nanos)
            .ok_or_else(|| invalid("duration out of range".to_string()))?;
    }

    let seconds = i64::try_from(total.div_euclid(NANOS_PER_SECOND))
        .map_err(|_| invalid("duration out of range".to_string()))?;
    // rem_euclid of a positive divisor is in 0..1e9
    let nanos = total.rem_euclid(NANOS_PER_SECOND) as u32;
    TimeDelta::new(seconds, nanos).ok_or_else(|| invalid("duration out of range".to_string()))
}

/// `number * unit` in nanoseconds, truncated toward zero.
fn weighted_nanos(number: &str, unit: Unit) -> std::result::Result<i128, String> {
    let not_a_number = || format!("'{number}' is not a number");

    let (negative, body) = if let Some(rest) = number.strip_prefix('-') {
        (true, rest)
    } else {
        (false, number.strip_prefix('+').unwrap_or(number))
    };
    let (integer, fraction) = body.split_once('.').unwrap_or((body, ""));
    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if (integer.is_empty() && fraction.is_empty()) || !all_digits(integer) || !all_digits(fraction) {
        return Err(not_a_number());
    }

    let unit_nanos = unit.nanoseconds();
    let out_of_range = || format!("'{number}' is out of range");

    let mut nanos = if integer.is_empty() {
        0
    } else {
        integer
            .parse::<i128>()
            .ok()
            .and_then(|value| value.checked_mul(unit_nanos))
            .ok_or_else(out_of_range)?
    };

    let fraction = &fraction[..fraction.len().min(MAX_FRACTION_DIGITS)];
    if !fraction.is_empty() {
        let numerator: i128 = fraction.parse().map_err(|_| not_a_number())?;
        let denominator = 10i128.pow(fraction.len() as u32);
        nanos = nanos
            .checked_add(numerator * unit_nanos / denominator)
            .ok_or_else(out_of_range)?;
    }

    Ok(if negative { -nanos } else { nanos })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(key: &str, text: &str) -> Result<TimeDelta> {
        decompose(key, &Tokens::from(text))
    }

    #[test]
    fn test_unit_weights_lookup() {
        assert_eq!(unit_weights("weeks"), &[Unit::Weeks, Unit::Hours, Unit::Minutes]);
        assert_eq!(unit_weights("Hour"), &[Unit::Hours, Unit::Minutes, Unit::Seconds]);
        assert_eq!(unit_weights("timeout"), DEFAULT_WEIGHTS);
        assert_eq!(unit_weights(""), DEFAULT_WEIGHTS);
    }

    #[test]
    fn test_days_key() {
        let expected = TimeDelta::days(20) + TimeDelta::hours(4) + TimeDelta::minutes(46);
        assert_eq!(parse("days", "20 04 46").unwrap(), expected);
        assert_eq!(parse("days", "20,04,46").unwrap(), expected);
        assert_eq!(parse("days", "20 04,46").unwrap(), expected);
        assert_eq!(parse("days", "0 0 46").unwrap(), TimeDelta::minutes(46));
    }

    #[test]
    fn test_minutes_key() {
        assert_eq!(parse("minutes", "46 0").unwrap(), TimeDelta::minutes(46));
        assert_eq!(parse("minutes", "1,0").unwrap(), TimeDelta::minutes(1));
        assert_eq!(
            parse("minutes", "1 30 250").unwrap(),
            TimeDelta::minutes(1) + TimeDelta::seconds(30) + TimeDelta::milliseconds(250)
        );
    }

    #[test]
    fn test_fewer_numbers_than_units() {
        assert_eq!(parse("weeks", "2").unwrap(), TimeDelta::weeks(2));
    }

    #[test]
    fn test_mixed_signs_sum_algebraically() {
        let tokens = Tokens::from(["-20", "0", "-4"]);
        assert_eq!(
            decompose("weeks", &tokens).unwrap(),
            TimeDelta::weeks(-20) + TimeDelta::minutes(-4)
        );
        assert_eq!(parse("hours", "1 -30").unwrap(), TimeDelta::minutes(30));
        assert_eq!(parse("hours", "+1").unwrap(), TimeDelta::hours(1));
    }

    #[test]
    fn test_decimal_numbers() {
        assert_eq!(parse("days", "1.5").unwrap(), TimeDelta::hours(36));
        assert_eq!(parse("hours", ".25").unwrap(), TimeDelta::minutes(15));
        assert_eq!(parse("hours", "-0.5").unwrap(), TimeDelta::minutes(-30));
        assert_eq!(parse("seconds", "2.").unwrap(), TimeDelta::seconds(2));
    }

    #[test]
    fn test_invalid_numbers() {
        for text in ["20w 1", "20 1o", "20_1", "0_1", "abc def", "3 abc", ".", "-", "1e5", "1.2.3"] {
            let err = parse("days", text).unwrap_err();
            assert!(
                matches!(err, TimeParseError::InvalidDurationToken { .. }),
                "{text}: {err}"
            );
            assert!(err.to_string().contains(text), "got: {err}");
        }
    }

    #[test]
    fn test_invalid_token_reports_duration_kind() {
        let err = parse("days", "20w").unwrap_err();
        assert!(
            matches!(
                &err,
                TimeParseError::InvalidDurationToken { kind: TemporalKind::Duration, .. }
            ),
            "got: {err}"
        );
        assert!(err.to_string().starts_with("Invalid duration '20w'"), "got: {err}");
    }

    #[test]
    fn test_too_many_numbers() {
        let err = parse("days", "1 2 3 4").unwrap_err();
        assert!(err.to_string().contains("at most 3"), "got: {err}");
        let err = parse("microseconds", "1 2").unwrap_err();
        assert!(err.to_string().contains("at most 1"), "got: {err}");
    }

    #[test]
    fn test_no_numbers() {
        assert!(parse("days", "").is_err());
        assert!(parse("days", " , ").is_err());
    }

    #[test]
    fn test_out_of_range() {
        let err = parse("weeks", "99999999999999999999").unwrap_err();
        assert!(err.to_string().contains("out of range"), "got: {err}");
    }
}
