//! Merchant normalization: collapse noisy descriptions into canonical names.
//!
//! Prefix rules anchor on issuer boilerplate at the start of a description and
//! are more specific than substring rules, so they are tried first.

use chase_core::{AliasRule, AliasRules, UNKNOWN_MERCHANT};

fn first_match<'r>(rules: &'r [AliasRule], hit: impl Fn(&str) -> bool) -> Option<&'r str> {
    rules
        .iter()
        .find(|r| hit(r.folded()))
        .map(|r| r.merchant.as_str())
}

/// Map a raw description to its canonical merchant.
///
/// Comparison is case-insensitive; the mapped merchant is returned verbatim.
/// Without a match the trimmed description is the merchant; a blank
/// description becomes [`UNKNOWN_MERCHANT`].
pub fn normalize(description: &str, rules: &AliasRules) -> String {
    let trimmed = description.trim();
    if trimmed.is_empty() {
        return UNKNOWN_MERCHANT.to_string();
    }
    let folded = trimmed.to_lowercase();

    first_match(rules.startswith(), |p| folded.starts_with(p))
        .or_else(|| first_match(rules.contains(), |p| folded.contains(p)))
        .unwrap_or(trimmed)
        .to_string()
}
