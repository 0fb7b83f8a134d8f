use chase_core::{
    AliasRules, CategoryOverrides, DateBound, DateWindow, EngineConfig, Money, ReportMode,
    ReportRequest, UNCATEGORIZED,
};
use chase_finance::{Engine, chart};
use chase_ingest::{CsvSchema, load_file};
use chrono::NaiveDate;
use std::collections::BTreeSet;
use std::path::PathBuf;

fn chase_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join("chase.csv")
}

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn config() -> EngineConfig {
    EngineConfig {
        aliases: AliasRules::from_pairs(
            &[
                ("WHOLEFDS", "Whole Foods"),
                ("AMAZON", "Amazon"),
                ("Payment Thank You", "Card Payment"),
            ],
            &[("STARBUCKS", "Starbucks"), ("NETFLIX", "Netflix")],
        )
        .unwrap(),
        overrides: CategoryOverrides::from_pairs(&[("Card Payment", "Payment")]).unwrap(),
        chart_exclude_categories: BTreeSet::from(["Payment".to_string()]),
    }
}

fn first_quarter() -> DateWindow {
    DateWindow::resolve(
        DateBound::Absolute(d(2024, 1, 1)),
        DateBound::Absolute(d(2024, 4, 1)),
        d(2026, 10, 19),
    )
    .unwrap()
}

/// Real-layout regression: a card export through the whole pipeline.
#[test]
fn test_category_merchant_report_from_card_export() {
    let raws = load_file(chase_path(), &CsvSchema::chase()).unwrap();
    assert_eq!(raws.len(), 12);

    let cfg = config();
    let report = Engine::new(&cfg).report(
        &raws,
        &first_quarter(),
        &ReportRequest::new(ReportMode::CategoryMerchant),
    );

    assert_eq!(
        report.root.child_keys(),
        ["Groceries", "Shopping", "Entertainment", "Food & Drink", "Payment"]
    );
    assert_eq!(report.category("Groceries").unwrap().total, Money::from_cents(23_650));
    assert_eq!(report.category("Groceries").unwrap().child_keys(), ["Whole Foods"]);

    // Return nets against the purchases and both Amazon descriptions collapse.
    let shopping = report.category("Shopping").unwrap();
    assert_eq!(shopping.total, Money::from_cents(6_499));
    assert_eq!(shopping.count, 3);
    assert_eq!(shopping.child_keys(), ["Amazon"]);

    let payment = report.category("Payment").unwrap();
    assert_eq!(payment.total, Money::from_cents(-50_000));
    assert!(report.category(UNCATEGORIZED).is_none());

    // April is outside the window.
    assert_eq!(report.category("Food & Drink").unwrap().total, Money::from_cents(975));
    assert_eq!(report.summary.count, 11);
    assert_eq!(report.summary.total, Money::from_cents(-15_678));
    assert_eq!(report.summary.span_months, 3);
}

#[test]
fn test_monthly_report_and_charts_from_card_export() {
    let raws = load_file(chase_path(), &CsvSchema::chase()).unwrap();
    let cfg = config();
    let report = Engine::new(&cfg).report(
        &raws,
        &first_quarter(),
        &ReportRequest::new(ReportMode::CategoryMonth),
    );

    let groceries = report.monthly_for("Groceries").unwrap();
    let totals: Vec<_> = groceries.months.iter().map(|(_, m)| m.cents()).collect();
    assert_eq!(totals, [8_210, 6_440, 9_000]);
    assert_eq!(groceries.average_over_span, Some(Money::from_cents(7_883)));
    assert_eq!(groceries.moving_average_window, 3);
    assert_eq!(groceries.moving_average.last(), Some(&Some(Money::from_cents(7_883))));

    let totals = chart::category_totals(&report, &cfg.chart_exclude_categories);
    assert!(!totals.labels.iter().any(|l| l == "Payment"));
    assert_eq!(totals.values[0], 237);

    let monthly = chart::monthly_category(&report, "Groceries", true).unwrap();
    assert_eq!(monthly.labels, ["2024-01", "2024-02", "2024-03"]);
    assert_eq!(
        monthly.title,
        "Monthly Totals for \"Groceries\" over 3 Months from 2024-01-01 to 2024-04-01"
    );
}

#[test]
fn test_unbounded_window_keeps_every_row() {
    let raws = load_file(chase_path(), &CsvSchema::chase()).unwrap();
    let cfg = config();
    let report = Engine::new(&cfg).report(&raws, &DateWindow::unbounded(), &ReportRequest::default());
    assert_eq!(report.summary.count, raws.len());
    assert_eq!(report.summary.first_date, Some(d(2024, 1, 5)));
    assert_eq!(report.summary.last_date, Some(d(2024, 4, 1)));
    assert_eq!(report.category("Food & Drink").unwrap().total, Money::from_cents(1_575));
}
