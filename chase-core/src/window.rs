//! Half-open date windows with relative bound tokens.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::time::{first_of_month, first_of_year};

/// One side of a date window, before it is resolved against today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateBound {
    /// Unbounded: the earliest (start) or latest (end) representable date.
    #[default]
    Open,
    Absolute(NaiveDate),
    /// `foy`: January 1 of the current year.
    FirstOfYear,
    /// `fom`: the 1st of the current month.
    FirstOfMonth,
}

impl DateBound {
    fn resolve(self, today: NaiveDate, open: NaiveDate) -> NaiveDate {
        match self {
            DateBound::Open => open,
            DateBound::Absolute(d) => d,
            DateBound::FirstOfYear => first_of_year(today),
            DateBound::FirstOfMonth => first_of_month(today),
        }
    }
}

impl FromStr for DateBound {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "" => Ok(DateBound::Open),
            "foy" => Ok(DateBound::FirstOfYear),
            "fom" => Ok(DateBound::FirstOfMonth),
            other => NaiveDate::parse_from_str(other, "%Y-%m-%d")
                .map(DateBound::Absolute)
                .map_err(|e| {
                    Error::InvalidDateRange(format!(
                        "'{other}' is not YYYY-MM-DD, foy or fom: {e}"
                    ))
                }),
        }
    }
}

/// `[start, end)` with both bounds already resolved to calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    /// Resolve relative tokens once against `today` and validate the range.
    pub fn resolve(start: DateBound, end: DateBound, today: NaiveDate) -> Result<Self> {
        let window = Self {
            start: start.resolve(today, NaiveDate::MIN),
            end: end.resolve(today, NaiveDate::MAX),
        };
        if window.start >= window.end {
            return Err(Error::InvalidDateRange(format!(
                "start {} is not before end {}",
                window.start, window.end
            )));
        }
        Ok(window)
    }

    /// A window that admits every date.
    pub fn unbounded() -> Self {
        Self {
            start: NaiveDate::MIN,
            end: NaiveDate::MAX,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date < self.end
    }

    pub fn has_open_start(&self) -> bool {
        self.start == NaiveDate::MIN
    }

    pub fn has_open_end(&self) -> bool {
        self.end == NaiveDate::MAX
    }
}

impl Default for DateWindow {
    fn default() -> Self {
        Self::unbounded()
    }
}
