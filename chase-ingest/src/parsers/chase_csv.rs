//! Delimited export parser.
//!
//! Chase downloads look like:
//!   Transaction Date,Post Date,Description,Category,Type,Amount,Memo
//!   01/05/2024,01/06/2024,STARBUCKS #123,Food & Drink,Sale,-4.50,
//!
//! Checking downloads use `Posting Date` and have no `Category`, so the
//! `Type` column (ACH_DEBIT, DEBIT_CARD, ...) stands in for it.

use chase_core::{Error, Money, RawTransaction, Result, SourceRef};
use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord, Trim};
use std::io::Read;
use std::path::Path;

use crate::schema::{CsvSchema, SignConvention};

/// Resolved header positions for one file.
struct Columns {
    date: Option<usize>,
    description: Option<usize>,
    amount: Option<usize>,
    category: Option<usize>,
}

impl Columns {
    fn locate(headers: &StringRecord, schema: &CsvSchema) -> Self {
        let find = |name: &str| headers.iter().position(|h| h == name);
        let first_of = |names: &[String]| names.iter().find_map(|n| find(n.as_str()));
        Self {
            date: first_of(&schema.date_columns),
            description: find(&schema.description_column),
            amount: find(&schema.amount_column),
            category: first_of(&schema.category_columns),
        }
    }
}

fn required<'r>(
    record: &'r StringRecord,
    idx: Option<usize>,
    name: &str,
    file: &Path,
    row: u64,
) -> Result<&'r str> {
    idx.and_then(|i| record.get(i))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| Error::malformed(file, row, format!("missing {name}")))
}

/// Decode failures from the reader, labelled with the file and line.
fn decode_error(file: &Path, fallback_row: u64, err: csv::Error) -> Error {
    let row = err.position().map(|p| p.line()).unwrap_or(fallback_row);
    Error::malformed(file, row, err.to_string())
}

fn parse_date(s: &str, formats: &[String]) -> Option<NaiveDate> {
    formats
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

/// Parse a delimited export into spend-positive raw transactions.
///
/// `file` is only used to label rows; nothing is read from it.
pub fn parse_csv<R: Read>(reader: R, file: &Path, schema: &CsvSchema) -> Result<Vec<RawTransaction>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::Headers)
        .from_reader(reader);

    let headers = rdr
        .headers()
        .map_err(|e| decode_error(file, 1, e))?
        .clone();
    let cols = Columns::locate(&headers, schema);
    let mut txns = Vec::new();

    for (i, result) in rdr.records().enumerate() {
        let record = result.map_err(|e| decode_error(file, i as u64 + 2, e))?;
        let row = record
            .position()
            .map(|p| p.line())
            .unwrap_or(i as u64 + 2);

        // Blank trailing lines in some exports.
        if record.iter().all(|f| f.trim().is_empty()) {
            continue;
        }

        let date_str = required(&record, cols.date, "date", file, row)?;
        let date = parse_date(date_str, &schema.date_formats).ok_or_else(|| {
            Error::malformed(file, row, format!("unparsable date '{date_str}'"))
        })?;

        let description = required(&record, cols.description, &schema.description_column, file, row)?;

        let amount_str = required(&record, cols.amount, &schema.amount_column, file, row)?;
        let amount: Money = amount_str.parse().map_err(|_| {
            Error::malformed(file, row, format!("unparsable amount '{amount_str}'"))
        })?;
        let amount = match schema.sign {
            SignConvention::NegativeIsSpend => -amount,
            SignConvention::PositiveIsSpend => amount,
        };

        let source_category = cols
            .category
            .and_then(|i| record.get(i))
            .map(|s| s.trim().to_string())
            .unwrap_or_default();

        txns.push(RawTransaction {
            date,
            description: description.to_string(),
            amount,
            source_category,
            source: SourceRef {
                file: file.to_path_buf(),
                row,
            },
        });
    }

    Ok(txns)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CARD: &str = "\
Transaction Date,Post Date,Description,Category,Type,Amount,Memo
01/05/2024,01/06/2024,STARBUCKS #123,Food & Drink,Sale,-4.50,
01/20/2024,01/21/2024,STARBUCKS #456,Food & Drink,Sale,-5.25,
01/22/2024,01/22/2024,Payment Thank You-Mobile,,Payment,250.00,
";

    fn parse(text: &str) -> Result<Vec<RawTransaction>> {
        parse_csv(text.as_bytes(), Path::new("card.csv"), &CsvSchema::chase())
    }

    #[test]
    fn test_parse_card_export() {
        let txns = parse(CARD).unwrap();
        assert_eq!(txns.len(), 3);

        let first = &txns[0];
        assert_eq!(first.date, NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
        assert_eq!(first.description, "STARBUCKS #123");
        assert_eq!(first.amount, Money::from_cents(450), "purchases become spend-positive");
        assert_eq!(first.source_category, "Food & Drink");
        assert_eq!(first.source.row, 2);

        // Payments are credits and the empty Category falls through as empty.
        assert_eq!(txns[2].amount, Money::from_cents(-25_000));
        assert_eq!(txns[2].source_category, "");
    }

    #[test]
    fn test_parse_checking_export_uses_posting_date_and_type() {
        let text = "\
Details,Posting Date,Description,Amount,Type,Balance,Check or Slip #
DEBIT,02/01/2024,NETFLIX.COM,-15.99,DEBIT_CARD,1000.00,,
";
        let txns = parse(text).unwrap();
        assert_eq!(txns.len(), 1);
        assert_eq!(txns[0].date, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert_eq!(txns[0].source_category, "DEBIT_CARD");
        assert_eq!(txns[0].amount, Money::from_cents(1599));
    }

    #[test]
    fn test_positive_is_spend_schema() {
        let schema = CsvSchema {
            date_columns: vec!["Date".to_string()],
            category_columns: vec![],
            sign: SignConvention::PositiveIsSpend,
            ..CsvSchema::chase()
        };
        let text = "Date,Description,Amount\n2024-03-04,WHOLE FOODS,61.10\n";
        let txns = parse_csv(text.as_bytes(), Path::new("amex.csv"), &schema).unwrap();
        assert_eq!(txns[0].amount, Money::from_cents(6110));
        assert_eq!(txns[0].source_category, "");
    }

    #[test]
    fn test_bad_amount_names_file_and_row() {
        let text = "\
Transaction Date,Post Date,Description,Category,Type,Amount,Memo
01/05/2024,01/06/2024,STARBUCKS #123,Food & Drink,Sale,-4.50,
01/06/2024,01/07/2024,STARBUCKS #123,Food & Drink,Sale,four fifty,
";
        match parse(text).unwrap_err() {
            Error::MalformedRecord { file, row, reason } => {
                assert_eq!(file, Path::new("card.csv"));
                assert_eq!(row, 3);
                assert!(reason.contains("four fifty"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_date_column_is_malformed() {
        let text = "When,Description,Amount\n01/05/2024,STARBUCKS,-4.50\n";
        let err = parse(text).unwrap_err();
        assert!(matches!(err, Error::MalformedRecord { row: 2, .. }));
    }

    #[test]
    fn test_unparsable_date_is_malformed() {
        let text = "Transaction Date,Description,Amount\n13/45/2024,STARBUCKS,-4.50\n";
        assert!(matches!(parse(text), Err(Error::MalformedRecord { .. })));
    }

    #[test]
    fn test_short_row_is_malformed() {
        let text = "Transaction Date,Description,Amount\n01/05/2024,STARBUCKS\n";
        assert!(matches!(parse(text), Err(Error::MalformedRecord { .. })));
    }

    #[test]
    fn test_invalid_utf8_names_file_and_row() {
        let mut bytes = CARD.lines().take(2).collect::<Vec<_>>().join("\n").into_bytes();
        bytes.extend_from_slice(b"\n01/07/2024,01/08/2024,CAF\xC9 ROUGE,Food & Drink,Sale,-8.00,\n");
        let err = parse_csv(bytes.as_slice(), Path::new("card.csv"), &CsvSchema::chase()).unwrap_err();
        match err {
            Error::MalformedRecord { file, row, reason } => {
                assert_eq!(file, Path::new("card.csv"));
                assert_eq!(row, 3);
                assert!(reason.contains("utf-8"), "{reason}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_invalid_utf8_header_is_malformed() {
        let bytes = b"Transaction Date,Descripci\xF3n,Amount\n01/05/2024,STARBUCKS,-4.50\n";
        let err = parse_csv(&bytes[..], Path::new("card.csv"), &CsvSchema::chase()).unwrap_err();
        match err {
            Error::MalformedRecord { file, .. } => assert_eq!(file, Path::new("card.csv")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_header_only_file_is_empty() {
        let text = "Transaction Date,Post Date,Description,Category,Type,Amount,Memo\n";
        assert!(parse(text).unwrap().is_empty());
    }
}
