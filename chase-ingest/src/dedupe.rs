//! Opt-in removal of rows repeated across overlapping exports.
//!
//! Two downloads of "the trailing 90 days" taken a month apart share 60 days
//! of rows. Identical rows inside one file are distinct purchases and stay.

use chase_core::{Money, RawTransaction};
use chrono::NaiveDate;
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::debug;

type RowKey = (NaiveDate, String, Money, String);

fn row_key(t: &RawTransaction) -> RowKey {
    (t.date, t.description.clone(), t.amount, t.source_category.clone())
}

/// Drop rows already seen in a different file; the first file to contain a
/// row owns it.
pub fn dedupe_across_files(rows: Vec<RawTransaction>) -> Vec<RawTransaction> {
    let mut owner: HashMap<RowKey, PathBuf> = HashMap::new();
    let before = rows.len();

    let kept: Vec<RawTransaction> = rows
        .into_iter()
        .filter(|t| {
            let file = owner
                .entry(row_key(t))
                .or_insert_with(|| t.source.file.clone());
            *file == t.source.file
        })
        .collect();

    if kept.len() != before {
        debug!("Dropped {} rows repeated across files", before - kept.len());
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use chase_core::SourceRef;

    fn row(file: &str, line: u64, day: u32, desc: &str, cents: i64) -> RawTransaction {
        RawTransaction {
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            description: desc.to_string(),
            amount: Money::from_cents(cents),
            source_category: "Food & Drink".to_string(),
            source: SourceRef {
                file: PathBuf::from(file),
                row: line,
            },
        }
    }

    #[test]
    fn test_keeps_duplicates_within_one_file() {
        let rows = vec![
            row("a.csv", 2, 5, "STARBUCKS #123", 450),
            row("a.csv", 3, 5, "STARBUCKS #123", 450),
        ];
        assert_eq!(dedupe_across_files(rows).len(), 2);
    }

    #[test]
    fn test_drops_rows_repeated_in_later_file() {
        let rows = vec![
            row("a.csv", 2, 5, "STARBUCKS #123", 450),
            row("a.csv", 3, 5, "STARBUCKS #123", 450),
            row("b.csv", 2, 5, "STARBUCKS #123", 450),
            row("b.csv", 3, 9, "NETFLIX.COM", 1599),
        ];
        let kept = dedupe_across_files(rows);
        assert_eq!(kept.len(), 3);
        assert!(kept[..2].iter().all(|t| t.source.file == PathBuf::from("a.csv")));
        assert_eq!(kept[2].description, "NETFLIX.COM");
    }
}
