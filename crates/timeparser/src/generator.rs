//! Candidate pattern generation.
//!
//! Generation is a product over tagged axes (component count, separator
//! variant, month form, year form, sub-second form), rendered into typed
//! [`Pattern`]s and ordered by specificity. The functions here are pure: the
//! same configuration always yields the same sequence, in the same order.
//!
//! # Ordering
//!
//! Patterns are stable-sorted by:
//!
//! 1. year width: 4-digit year, then 2-digit year, then no year;
//! 2. component count, more first;
//! 3. explicit separators before back-to-back fields;
//! 4. minimum matched length, longer first.
//!
//! Ties keep generation order, which follows the configured separator order.
//!
//! # Back-to-back datetimes
//!
//! A datetime written without a separator is only generated from a date
//! with a 4-digit year and a time with seconds. Any shorter half would let
//! one digit string split in several places: `220413104522` could be a
//! 2-digit year date followed by `%H%M%S`, or a 4-digit year date followed
//! by `%H%M`.

use std::collections::HashSet;

use crate::config::{DateConfig, DatetimeConfig, TimeConfig};
use crate::pattern::{Component, Form, Pattern, Piece};

const TIME_ORDER: [Component; 3] = [Component::Hour, Component::Minute, Component::Second];

/// Separator axis. Back-to-back fields are always written with fixed widths,
/// so the field boundaries stay unambiguous.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Separator<'a> {
    Explicit(&'a str),
    Compact,
}

impl<'a> Separator<'a> {
    fn literal(self) -> Option<&'a str> {
        match self {
            Self::Explicit(sep) => Some(sep),
            Self::Compact => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MonthForm {
    Numeric,
    Name,
}

fn separator_axis(separators: &[String], allow_no_separator: bool) -> Vec<Separator<'_>> {
    let mut axis: Vec<Separator<'_>> = separators
        .iter()
        .map(|sep| Separator::Explicit(sep.as_str()))
        .collect();
    if allow_no_separator {
        axis.push(Separator::Compact);
    }
    axis
}

/// Numeric form for a one-or-two digit component.
fn numeric_form(flexible: bool, separator: Separator<'_>, length: usize) -> Form {
    if flexible && (length == 1 || separator != Separator::Compact) {
        Form::Flexible
    } else {
        Form::Fixed(2)
    }
}

/// Ordered, duplicate-free collection of generated patterns.
#[derive(Debug, Default)]
struct PatternSet {
    seen: HashSet<Pattern>,
    patterns: Vec<Pattern>,
}

impl PatternSet {
    fn push(&mut self, pattern: Pattern) {
        if self.seen.insert(pattern.clone()) {
            self.patterns.push(pattern);
        }
    }

    fn finish(mut self) -> Vec<Pattern> {
        self.patterns.sort_by_key(Pattern::specificity);
        self.patterns
    }
}

/// Generate time patterns: `hour[sep minute[sep second[.subsecond]]]`.
pub fn generate_time(config: &TimeConfig) -> Vec<Pattern> {
    let separators = separator_axis(&config.separators, config.allow_no_separator);
    let mut set = PatternSet::default();

    for length in (1..=3).rev() {
        if !config.lengths[length - 1] {
            continue;
        }
        let subsecond_axis: &[bool] = if length == 3 && config.allow_subsecond {
            &[true, false]
        } else {
            &[false]
        };

        for &separator in &separators {
            for &subsecond in subsecond_axis {
                let mut pieces = Vec::new();
                for (i, component) in TIME_ORDER[..length].iter().enumerate() {
                    if i > 0 {
                        if let Some(sep) = separator.literal() {
                            pieces.push(Piece::Literal(sep.to_string()));
                        }
                    }
                    let form = numeric_form(config.figure_widths[i], separator, length);
                    pieces.push(Piece::Field(*component, form));
                }
                if subsecond {
                    pieces.push(Piece::Field(Component::Subsecond, Form::Fraction));
                }
                set.push(Pattern::new(pieces));
            }
        }
    }

    set.finish()
}

/// Generate date patterns in the configured endian order.
///
/// A shorter date drops the year first, then the month: one component is
/// always a day, two are always day and month.
pub fn generate_date(config: &DateConfig) -> Vec<Pattern> {
    let separators = separator_axis(&config.separators, config.allow_no_separator);
    let [day_flexible, month_flexible, two_digit_year] = config.figure_widths;
    let mut set = PatternSet::default();

    for length in (1..=3).rev() {
        if !config.lengths[length - 1] {
            continue;
        }
        let components: Vec<Component> = config
            .endian
            .order()
            .into_iter()
            .filter(|component| match component {
                Component::Year => length == 3,
                Component::Month => length >= 2,
                _ => true,
            })
            .collect();

        let mut month_axis = vec![MonthForm::Numeric];
        if config.allow_month_name && length >= 2 {
            month_axis.push(MonthForm::Name);
        }
        let year_axis: &[u8] = match (length, two_digit_year) {
            (3, true) => &[4, 2],
            (3, false) => &[4],
            _ => &[0],
        };

        for &separator in &separators {
            for &month_form in &month_axis {
                for &year_digits in year_axis {
                    let mut pieces = Vec::new();
                    for (i, component) in components.iter().enumerate() {
                        if i > 0 {
                            if let Some(sep) = separator.literal() {
                                pieces.push(Piece::Literal(sep.to_string()));
                            }
                        }
                        let form = match (component, month_form) {
                            (Component::Year, _) => Form::Fixed(year_digits),
                            (Component::Month, MonthForm::Name) => Form::Name,
                            (Component::Month, MonthForm::Numeric) => {
                                numeric_form(month_flexible, separator, length)
                            }
                            _ => numeric_form(day_flexible, separator, length),
                        };
                        pieces.push(Piece::Field(*component, form));
                    }
                    set.push(Pattern::new(pieces));
                }
            }
        }
    }

    set.finish()
}

/// Whether a date and a time can be written back to back.
fn joins_compact(date: &Pattern, time: &Pattern) -> bool {
    date.year_digits() == Some(4) && time.has(Component::Second)
}

/// Generate datetime patterns: every date pattern, separator variant and
/// time pattern combined. Back-to-back halves use fixed widths throughout.
pub fn generate_datetime(config: &DatetimeConfig, date: &[Pattern], time: &[Pattern]) -> Vec<Pattern> {
    let separators = separator_axis(&config.separators, config.allow_no_separator);
    let mut set = PatternSet::default();

    for date_pattern in date {
        for &separator in &separators {
            for time_pattern in time {
                let pattern = match separator {
                    Separator::Explicit(sep) => Pattern::joined(date_pattern, Some(sep), time_pattern),
                    Separator::Compact if joins_compact(date_pattern, time_pattern) => {
                        Pattern::joined(&date_pattern.rigid(), None, &time_pattern.rigid())
                    }
                    Separator::Compact => continue,
                };
                set.push(pattern);
            }
        }
    }

    set.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DateConfigUpdate, EndianMode, TimeConfigUpdate};

    fn rendered(patterns: &[Pattern]) -> Vec<String> {
        patterns.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_default_time_patterns() {
        let patterns = generate_time(&TimeConfig::default());
        assert_eq!(
            rendered(&patterns),
            vec!["%-H:%-M:%-S", "%-H.%-M.%-S", "%H%M%S", "%-H:%-M", "%-H.%-M", "%H%M", "%-H"]
        );
    }

    #[test]
    fn test_time_subsecond_precedes_plain_seconds() {
        let config = TimeConfig::default()
            .updated(TimeConfigUpdate::default().allow_subsecond(true))
            .unwrap();
        let patterns = rendered(&generate_time(&config));
        assert_eq!(patterns[0], "%-H:%-M:%-S.%f");
        assert!(!generate_time(&config)[0].is_compact());
        let with_fraction = patterns.iter().position(|p| p == "%H%M%S.%f").unwrap();
        let without = patterns.iter().position(|p| p == "%-H:%-M:%-S").unwrap();
        assert!(with_fraction < without);
    }

    #[test]
    fn test_time_fixed_widths() {
        let config = TimeConfig::default()
            .updated(TimeConfigUpdate::default().figure_widths([false, false, false]))
            .unwrap();
        let patterns = rendered(&generate_time(&config));
        assert_eq!(patterns[0], "%H:%M:%S");
        assert_eq!(patterns.last().unwrap(), "%H");
    }

    #[test]
    fn test_time_without_no_separator_forms() {
        let config = TimeConfig::default()
            .updated(TimeConfigUpdate::default().allow_no_separator(false))
            .unwrap();
        let patterns = generate_time(&config);
        assert!(patterns.iter().all(|p| !p.is_compact()));
        assert_eq!(patterns.len(), 5);
    }

    #[test]
    fn test_empty_separator_axis_generates_nothing() {
        let config = TimeConfig::default()
            .updated(
                TimeConfigUpdate::default()
                    .separators(Vec::<String>::new())
                    .allow_no_separator(false),
            )
            .unwrap();
        assert!(generate_time(&config).is_empty());
    }

    #[test]
    fn test_lengths_restrict_component_counts() {
        let config = TimeConfig::default()
            .updated(TimeConfigUpdate::default().lengths([false, false, true]))
            .unwrap();
        let patterns = generate_time(&config);
        assert!(patterns.iter().all(|p| p.components().count() == 3));
    }

    #[test]
    fn test_default_date_pattern_count() {
        // 5 separator variants x (2 month forms x 2 year forms + 2 month forms) + day only
        assert_eq!(generate_date(&DateConfig::default()).len(), 31);
    }

    #[test]
    fn test_date_year_width_ordering() {
        let patterns = generate_date(&DateConfig::default());
        let digits: Vec<u8> = patterns.iter().map(|p| p.year_digits().unwrap_or(0)).collect();
        let mut sorted = digits.clone();
        sorted.sort_by(|a, b| b.cmp(a));
        assert_eq!(digits, sorted);
        assert_eq!(patterns[0].year_digits(), Some(4));
        assert_eq!(patterns.last().unwrap().to_string(), "%-d");
    }

    #[test]
    fn test_date_explicit_separator_before_compact() {
        let patterns = rendered(&generate_date(&DateConfig::default()));
        let dotted = patterns.iter().position(|p| p == "%-d.%-m.%Y").unwrap();
        let compact = patterns.iter().position(|p| p == "%d%m%Y").unwrap();
        assert!(dotted < compact);
    }

    #[test]
    fn test_date_endian_order() {
        let big = DateConfig::default()
            .updated(DateConfigUpdate::default().endian(EndianMode::Big))
            .unwrap();
        let patterns = rendered(&generate_date(&big));
        assert!(patterns.contains(&"%Y-%-m-%-d".to_string()));
        assert!(patterns.contains(&"%-m-%-d".to_string()));
        assert!(patterns.contains(&"%Y%m%d".to_string()));

        let middle = DateConfig::default()
            .updated(DateConfigUpdate::default().endian(EndianMode::Middle))
            .unwrap();
        let patterns = rendered(&generate_date(&middle));
        assert!(patterns.contains(&"%-m/%-d/%Y".to_string()));
        assert!(patterns.contains(&"%b %-d %Y".to_string()));
    }

    #[test]
    fn test_date_without_month_names_or_two_digit_years() {
        let config = DateConfig::default()
            .updated(
                DateConfigUpdate::default()
                    .allow_month_name(false)
                    .figure_widths([true, true, false]),
            )
            .unwrap();
        let patterns = generate_date(&config);
        assert!(patterns.iter().all(|p| p.year_digits() != Some(2)));
        assert!(patterns.iter().all(|p| !p.to_string().contains("%b")));
    }

    #[test]
    fn test_compact_date_uses_fixed_widths() {
        let patterns = rendered(&generate_date(&DateConfig::default()));
        assert!(patterns.contains(&"%d%m%y".to_string()));
        assert!(!patterns.iter().any(|p| p.starts_with("%-d%")));
    }

    #[test]
    fn test_datetime_product_size() {
        let date = generate_date(&DateConfig::default());
        let time = generate_time(&TimeConfig::default());
        let datetime = generate_datetime(&DatetimeConfig::default(), &date, &time);
        let explicit = DatetimeConfig::default().separators.len();
        let full_dates = date.iter().filter(|p| p.year_digits() == Some(4)).count();
        let full_times = time.iter().filter(|p| p.has(Component::Second)).count();
        assert_eq!(
            datetime.len(),
            date.len() * explicit * time.len() + full_dates * full_times
        );
        assert_eq!(datetime.len(), 898);
        assert_eq!(datetime[0].year_digits(), Some(4));
    }

    #[test]
    fn test_datetime_compact_halves_are_rigid() {
        let date = generate_date(&DateConfig::default());
        let time = generate_time(&TimeConfig::default());
        let datetime = rendered(&generate_datetime(&DatetimeConfig::default(), &date, &time));
        assert!(datetime.contains(&"%d.%m.%Y%H:%M:%S".to_string()));
        assert!(datetime.contains(&"%d%m%Y%H%M%S".to_string()));
        assert!(!datetime.contains(&"%-d.%-m.%Y%-H:%-M:%-S".to_string()));
    }

    #[test]
    fn test_datetime_compact_needs_full_year_and_seconds() {
        let date = generate_date(&DateConfig::default());
        let time = generate_time(&TimeConfig::default());
        let datetime = rendered(&generate_datetime(&DatetimeConfig::default(), &date, &time));
        assert!(!datetime.contains(&"%d%m%y%H%M%S".to_string()));
        assert!(!datetime.contains(&"%d.%m.%Y%H:%M".to_string()));
        assert!(!datetime.contains(&"%d.%m%H%M%S".to_string()));
        assert!(datetime.contains(&"%d%m%y %H%M".to_string()));
    }

    #[test]
    fn test_generation_is_deterministic() {
        let config = DateConfig::default();
        assert_eq!(generate_date(&config), generate_date(&config));
    }
}
