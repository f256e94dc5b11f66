//! Date strings of the event table.
//!
//! Accepted spellings, slash-separated:
//!   YYYY            1815
//!   YYYY/M          1815/6
//!   YYYY/M/D        1815/6/18
//!   D/M/YYYY        18/6/1815
//! Month and day take one or two digits. Validation and parsing are separate:
//! `parse_date` assumes the string already passed `validate_date`.

use std::sync::LazyLock;

use atlas_types::DateValue;
use regex::Regex;
use thiserror::Error;

static RE_YEAR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]{4}$").unwrap());

// Month or day: one or two ASCII digits, nothing else.
static RE_SHORT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]{1,2}$").unwrap());

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DateError {
    #[error("Date is missing")]
    Missing,
    #[error("Date has too many parts, it was {0}")]
    TooManyParts(String),
    #[error("Date must be in the format YYYY/MM/DD but was {0}")]
    BadFormat(String),
}

/// Which of the accepted spellings a date string uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateShape {
    YearOnly,
    YearMonth,
    YearMonthDay,
    DayMonthYear,
}

/// Classify `parts` in precedence order; first match wins.
fn shape_of(parts: &[&str]) -> Option<DateShape> {
    let year = |i: usize| RE_YEAR.is_match(parts[i]);
    let short = |i: usize| RE_SHORT.is_match(parts[i]);

    match parts.len() {
        1 if year(0) => Some(DateShape::YearOnly),
        2 if year(0) && short(1) => Some(DateShape::YearMonth),
        3 if year(0) && short(1) && short(2) => Some(DateShape::YearMonthDay),
        3 if year(2) && short(1) && short(0) => Some(DateShape::DayMonthYear),
        _ => None,
    }
}

/// Check a raw date string against the accepted grammar.
///
/// An empty string is `Missing` unless `optional`, in which case it passes.
pub fn validate_date(date: &str, optional: bool) -> Result<Option<DateShape>, DateError> {
    if date.is_empty() {
        return if optional {
            Ok(None)
        } else {
            Err(DateError::Missing)
        };
    }

    let parts: Vec<&str> = date.split('/').collect();
    if parts.len() > 3 {
        return Err(DateError::TooManyParts(date.to_string()));
    }

    shape_of(&parts)
        .map(Some)
        .ok_or_else(|| DateError::BadFormat(date.to_string()))
}

/// Parse a validated date string into year-first parts.
///
/// Day-first input (third part four characters long) is reversed, so
/// "15/3/2024" and "2024/3/15" give the same value. Blank input → `None`.
pub fn parse_date(date: &str) -> Option<DateValue> {
    let date = date.trim();
    if date.is_empty() {
        return None;
    }

    let mut parts: Vec<&str> = date.split('/').collect();
    if parts.len() >= 3 && parts[2].chars().count() == 4 {
        parts.reverse();
    }

    let mut parts = parts.into_iter().map(str::to_string);
    let year = parts.next()?;
    Some(DateValue {
        year,
        month: parts.next(),
        day: parts.next(),
    })
}
