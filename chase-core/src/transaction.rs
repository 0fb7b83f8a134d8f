//! Transaction records, raw and categorized.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::money::Money;

/// Where a row came from, for error messages and duplicate detection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceRef {
    pub file: PathBuf,
    /// 1-based line number in the file
    pub row: u64,
}

/// Normalized output of the record loader (bank-agnostic)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTransaction {
    pub date: NaiveDate,
    pub description: String,
    /// Positive means spend; negative means credit/refund.
    pub amount: Money,
    /// Category embedded in the export; may be empty.
    pub source_category: String,
    pub source: SourceRef,
}

/// A transaction after merchant normalization and category resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub date: NaiveDate,
    pub description: String,
    pub amount: Money,
    pub source_category: String,
    /// Canonical merchant; never empty.
    pub merchant: String,
    /// Final category; never empty.
    pub category: String,
}

impl Transaction {
    /// Build a categorized transaction directly, mostly for tests and fixtures.
    pub fn new(
        date: NaiveDate,
        description: impl Into<String>,
        amount: Money,
        merchant: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        let category = category.into();
        Self {
            date,
            description: description.into(),
            amount,
            source_category: category.clone(),
            merchant: merchant.into(),
            category,
        }
    }
}
