//! Engine: runs loader output through normalize -> resolve -> filter -> aggregate.

use chase_core::{DateWindow, EngineConfig, RawTransaction, Report, ReportRequest, Transaction};
use tracing::debug;

use crate::aggregate::aggregate;
use crate::category_rules::resolve_category;
use crate::filter::filter_window;
use crate::merchant::normalize;

/// Applies one validated configuration to raw rows.
pub struct Engine<'a> {
    config: &'a EngineConfig,
}

impl<'a> Engine<'a> {
    pub fn new(config: &'a EngineConfig) -> Self {
        Self { config }
    }

    /// Normalize the merchant and resolve the category of one row.
    pub fn categorize(&self, raw: &RawTransaction) -> Transaction {
        let merchant = normalize(&raw.description, &self.config.aliases);
        let category = resolve_category(&merchant, &raw.source_category, &self.config.overrides);
        Transaction {
            date: raw.date,
            description: raw.description.clone(),
            amount: raw.amount,
            source_category: raw.source_category.clone(),
            merchant,
            category,
        }
    }

    pub fn categorize_all(&self, raws: &[RawTransaction]) -> Vec<Transaction> {
        let txns: Vec<Transaction> = raws.iter().map(|r| self.categorize(r)).collect();
        debug!("Categorized {} transactions", txns.len());
        txns
    }

    /// Full pipeline from loader rows to a report.
    pub fn report(&self, raws: &[RawTransaction], window: &DateWindow, request: &ReportRequest) -> Report {
        run(&self.categorize_all(raws), window, request)
    }
}

/// Filter categorized transactions to `window` and aggregate them.
///
/// An unknown `request.category` produces an empty report, not an error.
pub fn run(transactions: &[Transaction], window: &DateWindow, request: &ReportRequest) -> Report {
    let filtered = filter_window(transactions, window);
    debug!(
        "{} of {} transactions inside {}..{}",
        filtered.len(),
        transactions.len(),
        window.start,
        window.end
    );
    aggregate(&filtered, window, request)
}
