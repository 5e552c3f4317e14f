//! Property tests for pattern generation and matching.

use chrono::{Datelike, NaiveDate, NaiveTime};
use proptest::prelude::*;
use timeparser::generator::{generate_date, generate_time};
use timeparser::{
    Component, DateConfig, DateConfigUpdate, EndianMode, Parser, TemporalKind, TimeConfig,
    TimeConfigUpdate,
};

fn endian() -> impl Strategy<Value = EndianMode> {
    prop_oneof![
        Just(EndianMode::Little),
        Just(EndianMode::Big),
        Just(EndianMode::Middle),
    ]
}

fn date_config() -> impl Strategy<Value = DateConfig> {
    (
        any::<[bool; 3]>(),
        any::<[bool; 3]>(),
        any::<bool>(),
        any::<bool>(),
        endian(),
    )
        .prop_map(|(widths, lengths, compact, names, endian)| {
            DateConfig::default()
                .updated(
                    DateConfigUpdate::default()
                        .figure_widths(widths)
                        .lengths(lengths)
                        .allow_no_separator(compact)
                        .allow_month_name(names)
                        .endian(endian),
                )
                .unwrap()
        })
}

fn time_config() -> impl Strategy<Value = TimeConfig> {
    (any::<[bool; 3]>(), any::<[bool; 3]>(), any::<bool>(), any::<bool>()).prop_map(
        |(widths, lengths, compact, subsecond)| {
            TimeConfig::default()
                .updated(
                    TimeConfigUpdate::default()
                        .figure_widths(widths)
                        .lengths(lengths)
                        .allow_no_separator(compact)
                        .allow_subsecond(subsecond),
                )
                .unwrap()
        },
    )
}

fn any_date() -> impl Strategy<Value = NaiveDate> {
    (1000i32..=9999, 1u32..=12, 1u32..=28)
        .prop_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

fn any_time() -> impl Strategy<Value = NaiveTime> {
    (0u32..24, 0u32..60, 0u32..60).prop_map(|(h, m, s)| NaiveTime::from_hms_opt(h, m, s).unwrap())
}

proptest! {
    #[test]
    fn prop_generation_is_deterministic(config in date_config(), time in time_config()) {
        prop_assert_eq!(generate_date(&config), generate_date(&config));
        prop_assert_eq!(generate_time(&time), generate_time(&time));
    }

    #[test]
    fn prop_year_width_then_component_count_order(config in date_config()) {
        let keys: Vec<(u8, usize)> = generate_date(&config)
            .iter()
            .map(|p| (p.year_digits().unwrap_or(0), p.components().count()))
            .collect();
        for pair in keys.windows(2) {
            prop_assert!(pair[0] >= pair[1], "out of order: {:?}", keys);
        }
    }

    #[test]
    fn prop_day_only_completes_from_anchor(
        year in 1970i32..2100,
        month in 1u32..=12,
        day in 1u32..=28,
        padded in any::<bool>(),
    ) {
        let parser = Parser::new();
        let today = parser.set_today(Some(year), Some(month), Some(1)).unwrap();
        let text = if padded { format!("{day:02}") } else { day.to_string() };
        let parsed = parser.parse_date(text.as_str()).unwrap();
        prop_assert_eq!(parsed, today.with_day(day).unwrap());
    }

    #[test]
    fn prop_full_date_renderings_parse_back(date in any_date(), endian in endian()) {
        let parser = Parser::new();
        parser.set_endian(endian);
        let patterns = parser.patterns(TemporalKind::Date);
        for pattern in patterns.iter().filter(|p| p.has(Component::Year)) {
            let Some(text) = pattern.render_date(date) else {
                continue;
            };
            let parsed = parser.parse_date(text.as_str());
            prop_assert_eq!(parsed, Ok(date), "{} rendered as {}", pattern, text);
        }
    }

    #[test]
    fn prop_full_time_renderings_parse_back(time in any_time()) {
        let parser = Parser::new();
        let patterns = parser.patterns(TemporalKind::Time);
        for pattern in patterns.iter().filter(|p| p.has(Component::Second)) {
            let Some(text) = pattern.render_time(time) else {
                continue;
            };
            prop_assert_eq!(parser.parse_time(text.as_str()), Ok(time), "{} rendered as {}", pattern, text);
        }
    }
}

proptest! {
    // Each case walks every datetime pattern.
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn prop_full_datetime_renderings_parse_back(
        date in any_date(),
        time in any_time(),
        endian in endian(),
    ) {
        let parser = Parser::new();
        parser.set_endian(endian);
        let patterns = parser.patterns(TemporalKind::Datetime);
        let full = patterns
            .iter()
            .filter(|p| p.has(Component::Year) && p.has(Component::Second));
        for pattern in full {
            let Some(text) = pattern.render(Some(date), Some(time)) else {
                continue;
            };
            prop_assert_eq!(
                parser.parse_datetime(text.as_str()),
                Ok(date.and_time(time)),
                "{} rendered as {}",
                pattern,
                text
            );
        }
    }
}
