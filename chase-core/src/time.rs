//! Calendar utilities: month keys and month-span arithmetic.

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A calendar month, ordered chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&format!("{:04}-{:02}", self.year, self.month))
    }
}

/// January 1 of the year containing `today`.
pub fn first_of_year(today: NaiveDate) -> NaiveDate {
    today.with_month(1).and_then(|d| d.with_day(1)).unwrap_or(today)
}

/// The 1st of the month containing `today`.
pub fn first_of_month(today: NaiveDate) -> NaiveDate {
    today.with_day(1).unwrap_or(today)
}

/// Number of whole-month steps taken from `start` before reaching `end`.
///
/// Each step advances one calendar month on the same day of month (clamped to
/// the month's length), so `2024-01-01..2024-10-01` is 9 and any partial month
/// at the tail counts as a step.
pub fn months_between(start: NaiveDate, end: NaiveDate) -> u32 {
    let mut n = 0;
    let mut cursor = start;
    while cursor < end {
        n += 1;
        match start.checked_add_months(Months::new(n)) {
            Some(next) => cursor = next,
            None => break,
        }
    }
    n
}
