//! Chart series preparation.
//!
//! Charts and the text report read the same `Report`; this module only picks,
//! orders and rounds values for plotting. Values are whole dollars.

use chase_core::{Money, Report, Summary};
use serde::Serialize;
use std::collections::BTreeSet;

/// Trailing average drawn over a chronological month axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovingAverageLine {
    pub window: usize,
    /// Dollars per bar; `None` until the window fills.
    pub points: Vec<Option<f64>>,
}

impl MovingAverageLine {
    pub fn label(&self) -> String {
        format!("{}-Month Moving Average", self.window)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub labels: Vec<String>,
    pub values: Vec<i64>,
    pub moving_average: Option<MovingAverageLine>,
}

impl ChartSeries {
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// One wedge of a pie chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieSlice {
    pub label: String,
    pub value: i64,
    /// Share of the sum of absolute values, 0..=100.
    pub percent: f64,
}

fn fmt_date(d: Option<chrono::NaiveDate>) -> String {
    d.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// "Category Totals over 9 Months from 2024-01-01 to 2024-10-01"
pub fn chart_title(title: &str, summary: &Summary) -> String {
    format!(
        "{} over {} Months from {} to {}",
        title,
        summary.span_months,
        fmt_date(summary.span_start),
        fmt_date(summary.span_end)
    )
}

/// Category totals in report order, minus excluded categories.
pub fn category_totals(report: &Report, exclude: &BTreeSet<String>) -> ChartSeries {
    let (labels, values) = report
        .categories()
        .iter()
        .filter(|c| !exclude.contains(&c.key))
        .map(|c| (c.key.clone(), c.total.whole_dollars()))
        .unzip();

    ChartSeries {
        title: chart_title("Category Totals", &report.summary),
        x_label: "Categories".to_string(),
        y_label: "Total".to_string(),
        labels,
        values,
        moving_average: None,
    }
}

/// Per-category monthly average over the report span, largest first.
///
/// Falls back to the months-with-data average when the span is empty.
pub fn monthly_averages(report: &Report, exclude: &BTreeSet<String>) -> ChartSeries {
    let mut rows: Vec<(String, Money)> = report
        .monthly
        .iter()
        .filter(|m| !exclude.contains(&m.category))
        .map(|m| {
            (
                m.category.clone(),
                m.average_over_span.unwrap_or(m.average_with_data),
            )
        })
        .collect();
    rows.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    let (labels, values) = rows
        .into_iter()
        .map(|(label, avg)| (label, avg.whole_dollars()))
        .unzip();

    ChartSeries {
        title: chart_title("Monthly Averages", &report.summary),
        x_label: "Categories".to_string(),
        y_label: "Monthly Average".to_string(),
        labels,
        values,
        moving_average: None,
    }
}

/// Chronological monthly totals for one category. `None` if the category is absent.
pub fn monthly_category(report: &Report, category: &str, with_moving_average: bool) -> Option<ChartSeries> {
    let series = report.monthly_for(category)?;
    let (labels, values) = series
        .months
        .iter()
        .map(|(ym, total)| (ym.to_string(), total.whole_dollars()))
        .unzip();

    let moving_average = with_moving_average.then(|| MovingAverageLine {
        window: series.moving_average_window,
        points: series
            .moving_average
            .iter()
            .map(|p| p.map(Money::as_dollars_f64))
            .collect(),
    });

    Some(ChartSeries {
        title: chart_title(&format!("Monthly Totals for {category:?}"), &report.summary),
        x_label: "Months".to_string(),
        y_label: "Total".to_string(),
        labels,
        values,
        moving_average,
    })
}

/// Wedges sorted by absolute size; sizes use absolute values, labels keep the sign.
pub fn pie_slices(series: &ChartSeries) -> Vec<PieSlice> {
    let sum_abs: i64 = series.values.iter().map(|v| v.abs()).sum();
    let mut slices: Vec<PieSlice> = series
        .labels
        .iter()
        .zip(&series.values)
        .map(|(label, &value)| PieSlice {
            label: label.clone(),
            value,
            percent: if sum_abs == 0 {
                0.0
            } else {
                value.abs() as f64 * 100.0 / sum_abs as f64
            },
        })
        .collect();
    slices.sort_by(|a, b| b.value.abs().cmp(&a.value.abs()).then_with(|| a.label.cmp(&b.label)));
    slices
}
