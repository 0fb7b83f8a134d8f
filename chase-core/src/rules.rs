//! User rule tables: merchant aliases and per-merchant category overrides.

use std::collections::{BTreeSet, HashMap};

use crate::error::{Error, Result};

/// Category assigned when neither an override nor the export supplies one.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Merchant assigned to a row whose description is blank.
pub const UNKNOWN_MERCHANT: &str = "Unknown Merchant";

/// One alias rule: a literal pattern and the canonical merchant it maps to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasRule {
    pub pattern: String,
    pub merchant: String,
    folded: String,
}

impl AliasRule {
    fn new(pattern: String, merchant: String, table: &str) -> Result<Self> {
        if pattern.trim().is_empty() {
            return Err(Error::Configuration(format!(
                "{table}: empty pattern for merchant '{merchant}'"
            )));
        }
        if merchant.trim().is_empty() {
            return Err(Error::Configuration(format!(
                "{table}: pattern '{pattern}' maps to an empty merchant"
            )));
        }
        let folded = pattern.to_lowercase();
        Ok(Self {
            pattern,
            merchant,
            folded,
        })
    }

    /// Lower-cased pattern used for case-insensitive matching.
    pub fn folded(&self) -> &str {
        &self.folded
    }
}

/// The two ordered alias tables. Table order is the tie-break.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasRules {
    startswith: Vec<AliasRule>,
    contains: Vec<AliasRule>,
}

impl AliasRules {
    pub fn new<S, C>(startswith: S, contains: C) -> Result<Self>
    where
        S: IntoIterator<Item = (String, String)>,
        C: IntoIterator<Item = (String, String)>,
    {
        let startswith = startswith
            .into_iter()
            .map(|(p, m)| AliasRule::new(p, m, "startswith_aliases"))
            .collect::<Result<Vec<_>>>()?;
        let contains = contains
            .into_iter()
            .map(|(p, m)| AliasRule::new(p, m, "in_aliases"))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            startswith,
            contains,
        })
    }

    /// Convenience for literal tables, e.g. in tests.
    pub fn from_pairs(startswith: &[(&str, &str)], contains: &[(&str, &str)]) -> Result<Self> {
        let own = |pairs: &[(&str, &str)]| {
            pairs
                .iter()
                .map(|(p, m)| (p.to_string(), m.to_string()))
                .collect::<Vec<_>>()
        };
        Self::new(own(startswith), own(contains))
    }

    pub fn startswith(&self) -> &[AliasRule] {
        &self.startswith
    }

    pub fn contains(&self) -> &[AliasRule] {
        &self.contains
    }

    pub fn is_empty(&self) -> bool {
        self.startswith.is_empty() && self.contains.is_empty()
    }
}

/// Canonical merchant -> category, applied after normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryOverrides(HashMap<String, String>);

impl CategoryOverrides {
    pub fn new<I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut map = HashMap::new();
        for (merchant, category) in pairs {
            if category.trim().is_empty() {
                return Err(Error::Configuration(format!(
                    "categories_by_merchant: '{merchant}' maps to an empty category"
                )));
            }
            map.insert(merchant, category);
        }
        Ok(Self(map))
    }

    pub fn from_pairs(pairs: &[(&str, &str)]) -> Result<Self> {
        Self::new(pairs.iter().map(|(m, c)| (m.to_string(), c.to_string())))
    }

    pub fn get(&self, merchant: &str) -> Option<&str> {
        self.0.get(merchant).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Validated configuration consumed by the engine and the chart renderer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineConfig {
    pub aliases: AliasRules,
    pub overrides: CategoryOverrides,
    /// Only the chart renderer reads this.
    pub chart_exclude_categories: BTreeSet<String>,
}
