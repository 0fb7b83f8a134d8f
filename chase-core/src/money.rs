//! Exact currency amounts stored as integer cents.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub};
use std::str::FromStr;
use thiserror::Error;

/// A signed amount in cents. Spend is positive, credits are negative.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(i64);

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid amount: {0:?}")]
pub struct ParseMoneyError(String);

impl Money {
    pub const ZERO: Money = Money(0);

    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    pub const fn cents(self) -> i64 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Divide by `n`, rounding half away from zero to the nearest cent.
    /// `None` when `n` is zero.
    pub fn checked_div_round(self, n: i64) -> Option<Money> {
        if n == 0 {
            return None;
        }
        let (num, den) = if n < 0 { (-self.0, -n) } else { (self.0, n) };
        Some(Money(round_half_away(num, den)))
    }

    /// Whole dollars, rounded half away from zero.
    pub fn whole_dollars(self) -> i64 {
        round_half_away(self.0, 100)
    }

    /// Lossy conversion for plotting only.
    pub fn as_dollars_f64(self) -> f64 {
        self.0 as f64 / 100.0
    }
}

// `den` must be positive.
fn round_half_away(num: i64, den: i64) -> i64 {
    let q = num / den;
    let r = num % den;
    if r.abs() * 2 >= den { q + num.signum() } else { q }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let s = format!("{}{}.{:02}", sign, abs / 100, abs % 100);
        f.pad(&s)
    }
}

impl FromStr for Money {
    type Err = ParseMoneyError;

    /// Accepts `-12.34`, `+5`, `$1,234.50`, `(45.00)` and `.99`.
    /// More than two fractional digits is rejected rather than rounded.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseMoneyError(s.to_string());

        let mut cleaned: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, '$' | ',' | ' '))
            .collect();

        let mut negative = false;
        if cleaned.starts_with('(') && cleaned.ends_with(')') && cleaned.len() >= 2 {
            negative = true;
            cleaned = cleaned[1..cleaned.len() - 1].to_string();
        }

        let unsigned = if let Some(rest) = cleaned.strip_prefix('-') {
            negative = !negative;
            rest
        } else if let Some(rest) = cleaned.strip_prefix('+') {
            rest
        } else {
            cleaned.as_str()
        };

        let (int_part, frac_part) = match unsigned.split_once('.') {
            Some((i, f)) => (i, f),
            None => (unsigned, ""),
        };

        if int_part.is_empty() && frac_part.is_empty() {
            return Err(err());
        }
        if frac_part.len() > 2 {
            return Err(err());
        }
        let all_digits = |p: &str| p.chars().all(|c| c.is_ascii_digit());
        if !all_digits(int_part) || !all_digits(frac_part) {
            return Err(err());
        }

        let dollars: i64 = if int_part.is_empty() {
            0
        } else {
            int_part.parse().map_err(|_| err())?
        };
        let cents: i64 = match frac_part.len() {
            0 => 0,
            1 => frac_part.parse::<i64>().map_err(|_| err())? * 10,
            _ => frac_part.parse().map_err(|_| err())?,
        };

        let total = dollars
            .checked_mul(100)
            .and_then(|d| d.checked_add(cents))
            .ok_or_else(err)?;

        Ok(Money(if negative { -total } else { total }))
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Money {
        Money(self.0 - rhs.0)
    }
}

impl Neg for Money {
    type Output = Money;

    fn neg(self) -> Money {
        Money(-self.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Money {
        iter.copied().sum()
    }
}
