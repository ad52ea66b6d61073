//! Date index parsing and sanity checks.
//!
//! Raw date cells are parsed leniently (plain dates, date-times, offset-bearing
//! date-times), made timezone-naive by keeping the local wall-clock time, and
//! truncated to date granularity. The resulting index must then be complete,
//! unique, and strictly ascending.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::collections::HashSet;

use crate::data::error::ValidationError;

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
];

const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%#z",
    "%Y-%m-%dT%H:%M:%S%.f%#z",
];

/// Parse one raw date cell to a calendar date.
///
/// Offset-bearing values drop their offset without conversion, then any time of
/// day is discarded. Returns `None` for empty or unrecognised input.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local().date());
    }
    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(raw, fmt) {
            return Some(dt.naive_local().date());
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt.date());
        }
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
}

/// Parse a whole date column, rejecting it if any row is missing or unparseable.
pub fn parse_index(cells: &[Option<String>], file: &str) -> Result<Vec<NaiveDate>, ValidationError> {
    let mut index = Vec::with_capacity(cells.len());
    let mut bad_count = 0;
    let mut example: Option<String> = None;

    for cell in cells {
        match cell.as_deref().and_then(parse_date) {
            Some(date) => index.push(date),
            None => {
                bad_count += 1;
                if example.is_none() {
                    example = Some(cell.clone().unwrap_or_default());
                }
            }
        }
    }

    if bad_count > 0 {
        return Err(ValidationError::UnparseableDates {
            count: bad_count,
            example: example.unwrap_or_default(),
            file: file.to_string(),
        });
    }

    Ok(index)
}

/// Check the index is unique, then strictly ascending.
///
/// Uniqueness is checked first so that an ordering failure always names two
/// distinct dates.
pub fn check_index(index: &[NaiveDate], file: &str) -> Result<(), ValidationError> {
    let mut seen = HashSet::with_capacity(index.len());
    if let Some(&date) = index.iter().find(|date| !seen.insert(**date)) {
        return Err(ValidationError::DuplicateDate {
            date,
            file: file.to_string(),
        });
    }

    if let Some(pair) = index.windows(2).find(|pair| pair[1] <= pair[0]) {
        return Err(ValidationError::NotAscending {
            prev: pair[0],
            next: pair[1],
            file: file.to_string(),
        });
    }

    Ok(())
}
