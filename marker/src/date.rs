//! Calendar day values used for due dates and submission timestamps.

use crate::error::MarkerError;
use chrono::{Datelike, Local};
use std::fmt;

/// A calendar day, totally ordered by (year, month, day).
///
/// The default date is January 1, 1901 — a sentinel meaning "no due date
/// configured yet". Any real submission date compares later than the
/// sentinel and is therefore treated as late (fail-closed).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Date {
    year: i32,
    month: u32,
    day: u32,
}

impl Date {
    pub fn new(year: i32, month: u32, day: u32) -> Self {
        Date { year, month, day }
    }

    /// Today's date in the local timezone, used to stamp submissions.
    pub fn today() -> Self {
        let now = Local::now().date_naive();
        Date {
            year: now.year(),
            month: now.month(),
            day: now.day(),
        }
    }

    /// Parses a zero-padded `YYYY-MM-DD` string.
    ///
    /// Any other shape, or an out-of-range month/day component, is an
    /// [`MarkerError::InvalidDate`]. Callers loading configuration fall
    /// back to the sentinel default on failure so that late checks stay
    /// fail-closed.
    pub fn parse(s: &str) -> Result<Self, MarkerError> {
        let bytes = s.as_bytes();
        if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
            return Err(MarkerError::InvalidDate(format!(
                "expected YYYY-MM-DD, got '{}'",
                s
            )));
        }

        // Every component byte must be a digit; str::parse alone would
        // also accept a leading '+', which is not zero-padded form.
        let component = |range: std::ops::Range<usize>| -> Result<u32, MarkerError> {
            if !bytes[range.clone()].iter().all(|b| b.is_ascii_digit()) {
                return Err(MarkerError::InvalidDate(format!(
                    "non-numeric component in '{}'",
                    s
                )));
            }
            s[range.clone()]
                .parse::<u32>()
                .map_err(|_| MarkerError::InvalidDate(format!("non-numeric component in '{}'", s)))
        };

        let year = component(0..4)? as i32;
        let month = component(5..7)?;
        let day = component(8..10)?;

        if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
            return Err(MarkerError::InvalidDate(format!(
                "out-of-range component in '{}'",
                s
            )));
        }

        Ok(Date { year, month, day })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn day(&self) -> u32 {
        self.day
    }
}

impl Default for Date {
    fn default() -> Self {
        Date {
            year: 1901,
            month: 1,
            day: 1,
        }
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}
