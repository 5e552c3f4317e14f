//! Typed format patterns.
//!
//! A [`Pattern`] is an ordered sequence of component placeholders and
//! literal separators. It lowers to chrono format items: matching runs
//! `chrono::format::parse` into a [`Parsed`], rendering runs
//! `format_with_items`.
//!
//! chrono reads numbers greedily with loose widths (`%Y` takes one to four
//! digits, `%m` one or two), so the digit layout of the input is checked
//! first. Every run of adjacent numeric fields needs a run of digits of the
//! right length, and the text between runs must equal the separators. The
//! generator only puts fixed-width fields next to each other, so once the
//! layout fits, chrono's greedy reads split each run correctly.

use std::borrow::Cow;
use std::cmp::Reverse;
use std::fmt::{self, Write as _};

use chrono::format::{self, Fixed, Item, Numeric, Pad, Parsed};
use chrono::{Datelike, NaiveDate, NaiveTime, Timelike};

/// A date or time component a placeholder stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Component {
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
    Subsecond,
}

/// How a placeholder is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Form {
    /// One or two digits.
    Flexible,
    /// Exactly this many digits. A two-digit year pivots at 69.
    Fixed(u8),
    /// A dot and one to six fractional second digits.
    Fraction,
    /// An English month name or its three-letter abbreviation.
    Name,
}

impl Form {
    fn digit_bounds(self) -> (usize, usize) {
        match self {
            Self::Flexible => (1, 2),
            Self::Fixed(n) => (n as usize, n as usize),
            Self::Fraction => (1, 6),
            Self::Name => (3, 3),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Piece {
    Field(Component, Form),
    Literal(String),
}

/// Two-digit years below this value belong to the 21st century.
const TWO_DIGIT_YEAR_PIVOT: i32 = 69;

/// One stretch of the input layout a pattern accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Digits { min: usize, max: usize },
    /// Separators, possibly around a month name. Text holding a name is
    /// left to chrono.
    Text { literal: String, named: bool },
}

fn push_digits(layout: &mut Vec<Segment>, (low, high): (usize, usize)) {
    match layout.last_mut() {
        Some(Segment::Digits { min, max }) => {
            *min += low;
            *max += high;
        }
        _ => layout.push(Segment::Digits { min: low, max: high }),
    }
}

fn push_text(layout: &mut Vec<Segment>, text: &str, name: bool) {
    match layout.last_mut() {
        Some(Segment::Text { literal, named }) => {
            literal.push_str(text);
            *named |= name;
        }
        _ => layout.push(Segment::Text {
            literal: text.to_string(),
            named: name,
        }),
    }
}

/// chrono knows `sep` and `september` but not `sept`.
fn fold_month_spellings(text: &str) -> Cow<'_, str> {
    let lower = text.to_ascii_lowercase();
    let mut folded = String::with_capacity(text.len());
    let mut copied = 0;
    let mut from = 0;
    while let Some(found) = lower[from..].find("sept") {
        let at = from + found;
        let end = at + 4;
        if !lower[end..].starts_with('e') {
            folded.push_str(&text[copied..at + 3]);
            copied = end;
        }
        from = end;
    }
    if copied == 0 {
        return Cow::Borrowed(text);
    }
    folded.push_str(&text[copied..]);
    Cow::Owned(folded)
}

/// Sort key implementing the pattern ordering contract: 4-digit years, then
/// 2-digit years, then no year; more components first; explicit separators
/// before back-to-back fields; longer minimum length first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) struct Specificity {
    year_digits: Reverse<u8>,
    components: Reverse<usize>,
    compact: bool,
    min_len: Reverse<usize>,
}

/// An ordered template of placeholders and literal separators.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Pattern {
    pieces: Vec<Piece>,
}

impl Pattern {
    pub fn new(pieces: Vec<Piece>) -> Self {
        Self { pieces }
    }

    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    pub fn components(&self) -> impl Iterator<Item = Component> + '_ {
        self.pieces.iter().filter_map(|piece| match piece {
            Piece::Field(component, _) => Some(*component),
            Piece::Literal(_) => None,
        })
    }

    pub fn has(&self, component: Component) -> bool {
        self.components().any(|c| c == component)
    }

    /// Number of year digits, if the pattern has a year.
    pub fn year_digits(&self) -> Option<u8> {
        self.pieces.iter().find_map(|piece| match piece {
            Piece::Field(Component::Year, Form::Fixed(n)) => Some(*n),
            _ => None,
        })
    }

    /// Whether two fields follow each other without a separator. The dot of
    /// a fraction counts as a separator.
    pub fn is_compact(&self) -> bool {
        self.pieces.windows(2).any(|pair| match pair {
            [Piece::Field(..), Piece::Field(_, form)] => *form != Form::Fraction,
            _ => false,
        })
    }

    /// Length of the shortest string this pattern matches.
    pub fn min_len(&self) -> usize {
        self.pieces
            .iter()
            .map(|piece| match piece {
                Piece::Literal(lit) => lit.len(),
                Piece::Field(_, Form::Fraction) => 2,
                Piece::Field(_, form) => form.digit_bounds().0,
            })
            .sum()
    }

    fn has_month_name(&self) -> bool {
        self.pieces
            .iter()
            .any(|piece| matches!(piece, Piece::Field(_, Form::Name)))
    }

    pub(crate) fn specificity(&self) -> Specificity {
        Specificity {
            year_digits: Reverse(self.year_digits().unwrap_or(0)),
            components: Reverse(self.components().count()),
            compact: self.is_compact(),
            min_len: Reverse(self.min_len()),
        }
    }

    /// The same pattern with every one-or-two digit field fixed to two digits.
    pub(crate) fn rigid(&self) -> Self {
        let pieces = self
            .pieces
            .iter()
            .map(|piece| match piece {
                Piece::Field(component, Form::Flexible) => Piece::Field(*component, Form::Fixed(2)),
                other => other.clone(),
            })
            .collect();
        Self { pieces }
    }

    /// Concatenate a date and a time pattern around an optional separator.
    pub(crate) fn joined(date: &Pattern, separator: Option<&str>, time: &Pattern) -> Self {
        let mut pieces = Vec::with_capacity(date.pieces.len() + time.pieces.len() + 1);
        pieces.extend(date.pieces.iter().cloned());
        if let Some(sep) = separator {
            pieces.push(Piece::Literal(sep.to_string()));
        }
        pieces.extend(time.pieces.iter().cloned());
        Self { pieces }
    }

    fn layout(&self) -> Vec<Segment> {
        let mut layout = Vec::with_capacity(self.pieces.len());
        for piece in &self.pieces {
            match piece {
                Piece::Literal(lit) => push_text(&mut layout, lit, false),
                Piece::Field(_, Form::Name) => push_text(&mut layout, "", true),
                Piece::Field(_, Form::Fraction) => {
                    push_text(&mut layout, ".", false);
                    push_digits(&mut layout, Form::Fraction.digit_bounds());
                }
                Piece::Field(_, form) => push_digits(&mut layout, form.digit_bounds()),
            }
        }
        layout
    }

    fn fits_layout(&self, text: &str) -> bool {
        let mut rest = text;
        for segment in self.layout() {
            let end = match segment {
                Segment::Digits { .. } => rest.find(|c: char| !c.is_ascii_digit()),
                Segment::Text { .. } => rest.find(|c: char| c.is_ascii_digit()),
            }
            .unwrap_or(rest.len());
            let (head, tail) = rest.split_at(end);
            let fits = match segment {
                Segment::Digits { min, max } => (min..=max).contains(&head.len()),
                Segment::Text { literal, named } => !head.is_empty() && (named || head == literal),
            };
            if !fits {
                return false;
            }
            rest = tail;
        }
        rest.is_empty()
    }

    fn items(&self, fraction: Fixed) -> Vec<Item<'_>> {
        self.pieces
            .iter()
            .map(|piece| match piece {
                Piece::Literal(lit) => Item::Literal(lit.as_str()),
                Piece::Field(Component::Subsecond, _) => Item::Fixed(fraction.clone()),
                Piece::Field(_, Form::Name) => Item::Fixed(Fixed::ShortMonthName),
                Piece::Field(component, form) => {
                    let numeric = match component {
                        Component::Year if *form == Form::Fixed(2) => Numeric::YearMod100,
                        Component::Year => Numeric::Year,
                        Component::Month => Numeric::Month,
                        Component::Day => Numeric::Day,
                        Component::Hour => Numeric::Hour,
                        Component::Minute => Numeric::Minute,
                        Component::Second | Component::Subsecond => Numeric::Second,
                    };
                    let pad = if *form == Form::Flexible { Pad::None } else { Pad::Zero };
                    Item::Numeric(numeric, pad)
                }
            })
            .collect()
    }

    /// Match `text` against this pattern. The whole input must be consumed.
    ///
    /// Each field is range-checked on its own and a two-digit year is placed
    /// in its century, but the fields are not combined: `30.2.2013` scans.
    pub fn scan(&self, text: &str) -> Option<Parsed> {
        let text = if self.has_month_name() {
            fold_month_spellings(text)
        } else {
            Cow::Borrowed(text)
        };
        if !self.fits_layout(&text) {
            return None;
        }

        let mut parsed = Parsed::new();
        format::parse(&mut parsed, &text, self.items(Fixed::Nanosecond).iter()).ok()?;
        if let Some(short) = parsed.year_mod_100() {
            if parsed.year_div_100().is_none() {
                let century = if short < TWO_DIGIT_YEAR_PIVOT { 20 } else { 19 };
                parsed.set_year_div_100(century).ok()?;
            }
        }
        Some(parsed)
    }

    /// Write a value using this pattern.
    ///
    /// Returns `None` when the pattern needs a half that was not given, or a
    /// component cannot be written in its form (a year outside 1969..=2068
    /// for two digits, sub-microsecond fractions, leap seconds). Components
    /// the pattern lacks are simply left out.
    pub fn render(&self, date: Option<NaiveDate>, time: Option<NaiveTime>) -> Option<String> {
        for component in self.components() {
            match component {
                Component::Year => {
                    let year = date?.year();
                    let writable = if self.year_digits() == Some(2) {
                        1900 + TWO_DIGIT_YEAR_PIVOT..2000 + TWO_DIGIT_YEAR_PIVOT
                    } else {
                        0..10_000
                    };
                    if !writable.contains(&year) {
                        return None;
                    }
                }
                Component::Month | Component::Day => {
                    date?;
                }
                Component::Hour | Component::Minute | Component::Second | Component::Subsecond => {
                    let nanos = time?.nanosecond();
                    if nanos >= 1_000_000_000 {
                        return None;
                    }
                    if component == Component::Subsecond && nanos % 1_000 != 0 {
                        return None;
                    }
                }
            }
        }

        let items = self.items(Fixed::Nanosecond6);
        let mut out = String::new();
        let written = match (date, time) {
            (Some(date), Some(time)) => {
                write!(out, "{}", date.and_time(time).format_with_items(items.iter()))
            }
            (Some(date), None) => write!(out, "{}", date.format_with_items(items.iter())),
            (None, Some(time)) => write!(out, "{}", time.format_with_items(items.iter())),
            (None, None) => {
                for piece in &self.pieces {
                    if let Piece::Literal(lit) = piece {
                        out.push_str(lit);
                    }
                }
                Ok(())
            }
        };
        written.ok()?;
        Some(out)
    }

    pub fn render_date(&self, date: NaiveDate) -> Option<String> {
        self.render(Some(date), None)
    }

    pub fn render_time(&self, time: NaiveTime) -> Option<String> {
        self.render(None, Some(time))
    }
}

impl fmt::Display for Pattern {
    /// strftime-like notation; `%-d` is a one-or-two digit day.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for piece in &self.pieces {
            match piece {
                Piece::Literal(lit) => f.write_str(&lit.replace('%', "%%"))?,
                Piece::Field(component, form) => {
                    let letter = match component {
                        Component::Year => {
                            f.write_str(if *form == Form::Fixed(2) { "%y" } else { "%Y" })?;
                            continue;
                        }
                        Component::Month if *form == Form::Name => {
                            f.write_str("%b")?;
                            continue;
                        }
                        Component::Subsecond => {
                            f.write_str(".%f")?;
                            continue;
                        }
                        Component::Month => 'm',
                        Component::Day => 'd',
                        Component::Hour => 'H',
                        Component::Minute => 'M',
                        Component::Second => 'S',
                    };
                    if *form == Form::Flexible {
                        write!(f, "%-{letter}")?;
                    } else {
                        write!(f, "%{letter}")?;
                    }
                }
            }
        }
        Ok(())
    }
}
