//! The report model shared by every renderer.
//!
//! A report is built once by the aggregator and never mutated afterwards.
//! Equality is structural, so two runs over the same input compare equal.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::time::YearMonth;
use crate::window::DateWindow;

/// What the children of a category node are.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ReportMode {
    #[default]
    #[serde(rename = "category-merchant")]
    CategoryMerchant,
    #[serde(rename = "category-month")]
    CategoryMonth,
}

/// Shape of the report to build.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReportRequest {
    pub mode: ReportMode,
    /// Attach contributing transactions as leaves.
    pub detail: bool,
    /// Restrict to one category (exact, case-sensitive).
    pub category: Option<String>,
}

impl ReportRequest {
    pub fn new(mode: ReportMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn with_detail(mut self, detail: bool) -> Self {
        self.detail = detail;
        self
    }

    pub fn with_category(mut self, category: Option<String>) -> Self {
        self.category = category;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    Root,
    Category,
    Merchant,
    Month(YearMonth),
    /// A single contributing row; `key` holds its raw description.
    Transaction { date: NaiveDate },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateNode {
    pub key: String,
    pub kind: NodeKind,
    pub total: Money,
    pub count: usize,
    pub children: Vec<AggregateNode>,
}

impl AggregateNode {
    pub fn root() -> Self {
        Self {
            key: String::new(),
            kind: NodeKind::Root,
            total: Money::ZERO,
            count: 0,
            children: Vec::new(),
        }
    }

    pub fn child(&self, key: &str) -> Option<&AggregateNode> {
        self.children.iter().find(|c| c.key == key)
    }

    pub fn child_keys(&self) -> Vec<&str> {
        self.children.iter().map(|c| c.key.as_str()).collect()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Chronological month series for one category (monthly mode only).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryMonthly {
    pub category: String,
    /// Months with at least one transaction, oldest first.
    pub months: Vec<(YearMonth, Money)>,
    /// Category total divided by the number of months present.
    pub average_with_data: Money,
    /// Category total divided by the months in the report span, if non-zero.
    pub average_over_span: Option<Money>,
    /// Trailing average per month; `None` until the window fills.
    pub moving_average: Vec<Option<Money>>,
    pub moving_average_window: usize,
}

/// Header scalars for renderers.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Summary {
    pub total: Money,
    pub count: usize,
    /// Earliest and latest transaction dates actually present.
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
    /// Window bounds, with open bounds replaced by the observed dates.
    pub span_start: Option<NaiveDate>,
    pub span_end: Option<NaiveDate>,
    pub span_months: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub request: ReportRequest,
    pub window: DateWindow,
    pub root: AggregateNode,
    pub summary: Summary,
    /// Same order as `root.children`; empty outside monthly mode.
    pub monthly: Vec<CategoryMonthly>,
}

impl Report {
    pub fn is_empty(&self) -> bool {
        self.root.children.is_empty()
    }

    pub fn categories(&self) -> &[AggregateNode] {
        &self.root.children
    }

    pub fn category(&self, name: &str) -> Option<&AggregateNode> {
        self.root.child(name)
    }

    pub fn monthly_for(&self, category: &str) -> Option<&CategoryMonthly> {
        self.monthly.iter().find(|m| m.category == category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_mode_serializes_kebab() {
        let json = serde_json::to_string(&ReportMode::CategoryMonth).unwrap();
        assert_eq!(json, "\"category-month\"");
    }

    #[test]
    fn test_root_is_empty() {
        let root = AggregateNode::root();
        assert_eq!(root.total, Money::ZERO);
        assert_eq!(root.count, 0);
        assert!(root.is_leaf());
        assert!(root.child("Dining").is_none());
    }
}
