//! Date-window filtering.

use chase_core::{DateWindow, Transaction};
use chrono::NaiveDate;

/// Half-open membership test: `start <= date < end`.
pub fn in_window(date: NaiveDate, window: &DateWindow) -> bool {
    window.contains(date)
}

/// Keep the transactions inside `window`, preserving input order.
pub fn filter_window(txns: &[Transaction], window: &DateWindow) -> Vec<Transaction> {
    txns.iter()
        .filter(|t| in_window(t.date, window))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chase_core::{DateBound, Money};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_start_included_end_excluded() {
        let w = DateWindow::resolve(
            DateBound::Absolute(d(2024, 1, 1)),
            DateBound::Absolute(d(2024, 2, 1)),
            d(2026, 10, 19),
        )
        .unwrap();
        assert!(in_window(d(2024, 1, 1), &w));
        assert!(!in_window(d(2024, 2, 1), &w));
    }

    #[test]
    fn test_filter_preserves_order() {
        let txns = vec![
            Transaction::new(d(2024, 1, 20), "B", Money::from_cents(1), "B", "X"),
            Transaction::new(d(2023, 12, 31), "old", Money::from_cents(1), "old", "X"),
            Transaction::new(d(2024, 1, 5), "A", Money::from_cents(1), "A", "X"),
        ];
        let w = DateWindow::resolve(
            DateBound::Absolute(d(2024, 1, 1)),
            DateBound::Open,
            d(2026, 10, 19),
        )
        .unwrap();
        let kept: Vec<_> = filter_window(&txns, &w).into_iter().map(|t| t.merchant).collect();
        assert_eq!(kept, ["B", "A"]);
    }
}
