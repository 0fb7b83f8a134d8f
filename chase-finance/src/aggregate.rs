//! Aggregator: group categorized transactions into the report tree.
//!
//! Every level is ordered by descending total with the key as an ascending
//! tie-break, so repeated runs over the same rows produce the same tree.
//! Nodes only exist for keys that have at least one transaction.

use chase_core::{
    AggregateNode, CategoryMonthly, DateWindow, Money, NodeKind, Report, ReportMode,
    ReportRequest, Summary, Transaction, YearMonth, months_between,
};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Months in the trailing moving-average window.
pub const MOVING_AVERAGE_WINDOW: usize = 4;

fn sort_nodes(nodes: &mut [AggregateNode]) {
    nodes.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.key.cmp(&b.key)));
}

fn leaf(t: &Transaction) -> AggregateNode {
    AggregateNode {
        key: t.description.clone(),
        kind: NodeKind::Transaction { date: t.date },
        total: t.amount,
        count: 1,
        children: Vec::new(),
    }
}

/// Build a node over `txns`; detail leaves are chronological, ties keep input order.
fn node(key: String, kind: NodeKind, txns: &[&Transaction], detail: bool) -> AggregateNode {
    let children = if detail {
        let mut sorted = txns.to_vec();
        sorted.sort_by_key(|t| t.date);
        sorted.into_iter().map(leaf).collect()
    } else {
        Vec::new()
    };
    AggregateNode {
        key,
        kind,
        total: txns.iter().map(|t| t.amount).sum(),
        count: txns.len(),
        children,
    }
}

fn merchant_nodes(txns: &[&Transaction], detail: bool) -> Vec<AggregateNode> {
    let mut groups: BTreeMap<&str, Vec<&Transaction>> = BTreeMap::new();
    for &t in txns {
        groups.entry(t.merchant.as_str()).or_default().push(t);
    }
    let mut nodes: Vec<_> = groups
        .into_iter()
        .map(|(merchant, items)| node(merchant.to_string(), NodeKind::Merchant, &items, detail))
        .collect();
    sort_nodes(&mut nodes);
    nodes
}

fn month_groups<'t>(txns: &[&'t Transaction]) -> BTreeMap<YearMonth, Vec<&'t Transaction>> {
    let mut groups: BTreeMap<YearMonth, Vec<&Transaction>> = BTreeMap::new();
    for &t in txns {
        groups.entry(YearMonth::of(t.date)).or_default().push(t);
    }
    groups
}

fn month_nodes(txns: &[&Transaction], detail: bool) -> Vec<AggregateNode> {
    let mut nodes: Vec<_> = month_groups(txns)
        .into_iter()
        .map(|(ym, items)| node(ym.to_string(), NodeKind::Month(ym), &items, detail))
        .collect();
    sort_nodes(&mut nodes);
    nodes
}

/// Trailing simple average; positions before the window fills are `None`.
pub fn moving_average(values: &[Money], window: usize) -> Vec<Option<Money>> {
    (0..values.len())
        .map(|i| {
            if window == 0 || i + 1 < window {
                return None;
            }
            let sum: Money = values[i + 1 - window..=i].iter().sum();
            sum.checked_div_round(window as i64)
        })
        .collect()
}

fn monthly_series(category: &AggregateNode, txns: &[&Transaction], span_months: u32) -> CategoryMonthly {
    // Always chronological, whatever order the month nodes are displayed in.
    let months: Vec<(YearMonth, Money)> = month_groups(txns)
        .into_iter()
        .map(|(ym, items)| (ym, items.iter().map(|t| t.amount).sum()))
        .collect();
    let values: Vec<Money> = months.iter().map(|(_, m)| *m).collect();
    let window = MOVING_AVERAGE_WINDOW.min(values.len());

    CategoryMonthly {
        category: category.key.clone(),
        // A category node always holds at least one month.
        average_with_data: category
            .total
            .checked_div_round(months.len() as i64)
            .unwrap_or(Money::ZERO),
        average_over_span: category.total.checked_div_round(i64::from(span_months)),
        moving_average: moving_average(&values, window),
        moving_average_window: window,
        months,
    }
}

fn summarize(txns: &[&Transaction], window: &DateWindow) -> Summary {
    let first_date = txns.iter().map(|t| t.date).min();
    let last_date = txns.iter().map(|t| t.date).max();
    let span_start = if window.has_open_start() {
        first_date
    } else {
        Some(window.start)
    };
    let span_end = if window.has_open_end() {
        last_date
    } else {
        Some(window.end)
    };
    let span_months = match (span_start, span_end) {
        (Some(s), Some(e)) => months_between(s, e),
        _ => 0,
    };

    Summary {
        total: txns.iter().map(|t| t.amount).sum(),
        count: txns.len(),
        first_date,
        last_date,
        span_start,
        span_end,
        span_months,
    }
}

/// Aggregate already-filtered transactions into a report.
///
/// `window` is only used to describe the span; rows are not re-filtered here.
pub fn aggregate(txns: &[Transaction], window: &DateWindow, request: &ReportRequest) -> Report {
    let selected: Vec<&Transaction> = txns
        .iter()
        .filter(|t| {
            request
                .category
                .as_deref()
                .is_none_or(|c| t.category == c)
        })
        .collect();

    let summary = summarize(&selected, window);

    let mut by_category: BTreeMap<&str, Vec<&Transaction>> = BTreeMap::new();
    for &t in &selected {
        by_category.entry(t.category.as_str()).or_default().push(t);
    }

    let mut categories: Vec<(AggregateNode, Vec<&Transaction>)> = by_category
        .into_iter()
        .map(|(category, items)| {
            let children = match request.mode {
                ReportMode::CategoryMerchant => merchant_nodes(&items, request.detail),
                ReportMode::CategoryMonth => month_nodes(&items, request.detail),
            };
            let mut n = node(category.to_string(), NodeKind::Category, &items, false);
            n.children = children;
            (n, items)
        })
        .collect();
    categories.sort_by(|(a, _), (b, _)| b.total.cmp(&a.total).then_with(|| a.key.cmp(&b.key)));

    let monthly = match request.mode {
        ReportMode::CategoryMonth => categories
            .iter()
            .map(|(n, items)| monthly_series(n, items, summary.span_months))
            .collect(),
        ReportMode::CategoryMerchant => Vec::new(),
    };

    let mut root = AggregateNode::root();
    root.total = summary.total;
    root.count = summary.count;
    root.children = categories.into_iter().map(|(n, _)| n).collect();

    if root.children.is_empty() {
        warn!(
            "No transactions matched{}",
            request
                .category
                .as_deref()
                .map(|c| format!(" category '{c}'"))
                .unwrap_or_default()
        );
    } else {
        debug!(
            "Aggregated {} transactions into {} categories",
            root.count,
            root.children.len()
        );
    }

    Report {
        request: request.clone(),
        window: *window,
        root,
        summary,
        monthly,
    }
}
