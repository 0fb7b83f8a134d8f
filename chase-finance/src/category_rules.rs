//! Deterministic category resolution.
//!
//! Priority: per-merchant override > category embedded in the export > Uncategorized.

use chase_core::{CategoryOverrides, UNCATEGORIZED};

/// Resolve the final category of a transaction from its canonical merchant.
pub fn resolve_category(merchant: &str, source_category: &str, overrides: &CategoryOverrides) -> String {
    if let Some(category) = overrides.get(merchant) {
        return category.to_string();
    }
    let source = source_category.trim();
    if source.is_empty() {
        UNCATEGORIZED.to_string()
    } else {
        source.to_string()
    }
}
