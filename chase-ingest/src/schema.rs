use serde::{Deserialize, Serialize};

/// How the export encodes spending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SignConvention {
    /// Purchases are negative, payments and refunds positive (Chase card exports).
    #[default]
    NegativeIsSpend,
    PositiveIsSpend,
}

/// Column mapping for a delimited export.
///
/// Where a field lists several columns, the first one present in the header
/// row is used. Credit-card exports carry `Transaction Date`; checking exports
/// carry `Posting Date` or `Post Date` and put the transaction type where the
/// category would be.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CsvSchema {
    pub date_columns: Vec<String>,
    pub date_formats: Vec<String>,
    pub description_column: String,
    pub amount_column: String,
    pub category_columns: Vec<String>,
    pub sign: SignConvention,
}

impl Default for CsvSchema {
    fn default() -> Self {
        Self::chase()
    }
}

impl CsvSchema {
    /// Chase credit-card and checking CSV downloads.
    pub fn chase() -> Self {
        Self {
            date_columns: vec![
                "Transaction Date".to_string(),
                "Posting Date".to_string(),
                "Post Date".to_string(),
            ],
            date_formats: vec!["%m/%d/%Y".to_string(), "%Y-%m-%d".to_string()],
            description_column: "Description".to_string(),
            amount_column: "Amount".to_string(),
            category_columns: vec!["Category".to_string(), "Type".to_string()],
            sign: SignConvention::NegativeIsSpend,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_schema_fills_defaults() {
        let schema: CsvSchema = toml::from_str(
            r#"
sign = "positive-is-spend"
date_columns = ["Date"]
"#,
        )
        .unwrap();
        assert_eq!(schema.sign, SignConvention::PositiveIsSpend);
        assert_eq!(schema.date_columns, ["Date"]);
        assert_eq!(schema.amount_column, "Amount");
    }
}
