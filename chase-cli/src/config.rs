//! `~/.chase.toml` loading and validation.
//!
//! ```toml
//! datafiles = "~/Downloads/Chase*.CSV"
//! chart_exclude_categories = ["Payment", "Transfer"]
//!
//! [startswith_aliases]
//! "AMAZON MKTPL" = "Amazon Marketplace"
//! "AMAZON" = "Amazon"
//!
//! [in_aliases]
//! "STARBUCKS" = "Starbucks"
//!
//! [categories_by_merchant]
//! "Amazon" = "Shopping"
//! ```
//!
//! Alias tables are matched in file order, so the TOML map must keep it.

use anyhow::{Context, Result};
use chase_core::{AliasRules, CategoryOverrides, EngineConfig, Error};
use chase_ingest::CsvSchema;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use toml::{Table, Value};
use tracing::{debug, warn};

use crate::state::{default_config_path, expand_tilde};

const KNOWN_KEYS: &[&str] = &[
    "datafiles",
    "startswith_aliases",
    "in_aliases",
    "categories_by_merchant",
    "chart_exclude_categories",
    "schema",
];

/// Everything the CLI reads from the config file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Settings {
    /// Glob used by `--use-datafiles`, unexpanded.
    pub datafiles: Option<String>,
    pub engine: EngineConfig,
    pub schema: CsvSchema,
}

/// Load `path`, or `~/.chase.toml` when none is given.
///
/// A missing default file means an empty configuration; a missing explicit
/// file is an error.
pub fn load_settings(path: Option<&Path>) -> Result<Settings> {
    let (p, explicit) = match path {
        Some(p) => (expand_tilde(&p.to_string_lossy())?, true),
        None => (default_config_path()?, false),
    };
    if !explicit && !p.exists() {
        debug!("No config at {}, using defaults", p.display());
        return Ok(Settings::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    let settings = parse_settings(&s).with_context(|| format!("parse {}", p.display()))?;
    debug!(
        "Loaded {} startswith, {} in aliases and {} overrides from {}",
        settings.engine.aliases.startswith().len(),
        settings.engine.aliases.contains().len(),
        settings.engine.overrides.len(),
        p.display()
    );
    Ok(settings)
}

fn string_pairs(table: &Table, key: &str) -> chase_core::Result<Vec<(String, String)>> {
    let inner = match table.get(key) {
        None => return Ok(Vec::new()),
        Some(Value::Table(t)) => t,
        Some(other) => {
            return Err(Error::Configuration(format!(
                "{key} must be a table, found {}",
                other.type_str()
            )));
        }
    };
    inner
        .iter()
        .map(|(k, v)| match v {
            Value::String(s) => Ok((k.clone(), s.clone())),
            other => Err(Error::Configuration(format!(
                "{key}.\"{k}\" must be a string, found {}",
                other.type_str()
            ))),
        })
        .collect()
}

fn string_list(table: &Table, key: &str) -> chase_core::Result<Vec<String>> {
    let items = match table.get(key) {
        None => return Ok(Vec::new()),
        Some(Value::Array(items)) => items,
        Some(other) => {
            return Err(Error::Configuration(format!(
                "{key} must be an array, found {}",
                other.type_str()
            )));
        }
    };
    items
        .iter()
        .map(|v| {
            v.as_str().map(str::to_string).ok_or_else(|| {
                Error::Configuration(format!(
                    "{key} entries must be strings, found {}",
                    v.type_str()
                ))
            })
        })
        .collect()
}

/// Parse and validate config text.
pub fn parse_settings(text: &str) -> chase_core::Result<Settings> {
    let table: Table =
        toml::from_str(text).map_err(|e| Error::Configuration(e.message().to_string()))?;

    for key in table.keys().filter(|k| !KNOWN_KEYS.contains(&k.as_str())) {
        warn!("Ignoring unknown config key '{key}'");
    }

    let datafiles = match table.get("datafiles") {
        None => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => {
            return Err(Error::Configuration(format!(
                "datafiles must be a string, found {}",
                other.type_str()
            )));
        }
    };

    let aliases = AliasRules::new(
        string_pairs(&table, "startswith_aliases")?,
        string_pairs(&table, "in_aliases")?,
    )?;
    let overrides = CategoryOverrides::new(string_pairs(&table, "categories_by_merchant")?)?;
    let chart_exclude_categories: BTreeSet<String> =
        string_list(&table, "chart_exclude_categories")?.into_iter().collect();

    let schema = match table.get("schema") {
        None => CsvSchema::default(),
        Some(v) => v
            .clone()
            .try_into()
            .map_err(|e: toml::de::Error| Error::Configuration(format!("schema: {}", e.message())))?,
    };

    Ok(Settings {
        datafiles,
        engine: EngineConfig {
            aliases,
            overrides,
            chart_exclude_categories,
        },
        schema,
    })
}

/// Expand `~` and the glob in `pattern`; matches are sorted by path.
pub fn datafile_paths(pattern: &str) -> Result<Vec<PathBuf>> {
    let expanded = expand_tilde(pattern)?;
    let pattern = expanded.to_string_lossy();
    let mut paths = glob::glob(&pattern)
        .with_context(|| format!("invalid datafiles pattern '{pattern}'"))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .context("reading datafiles")?;
    paths.sort();
    if paths.is_empty() {
        warn!("datafiles pattern '{pattern}' matched no files");
    }
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chase_ingest::SignConvention;

    const SAMPLE: &str = r#"
datafiles = "~/Downloads/Chase*.CSV"
chart_exclude_categories = ["Payment", "Transfer"]

[startswith_aliases]
"AMAZON MKTPL" = "Amazon Marketplace"
"AMAZON" = "Amazon"
"WHOLEFDS" = "Whole Foods"

[in_aliases]
"STARBUCKS" = "Starbucks"

[categories_by_merchant]
"Amazon" = "Shopping"
"#;

    #[test]
    fn test_parse_sample() {
        let s = parse_settings(SAMPLE).unwrap();
        assert_eq!(s.datafiles.as_deref(), Some("~/Downloads/Chase*.CSV"));
        let patterns: Vec<_> = s
            .engine
            .aliases
            .startswith()
            .iter()
            .map(|r| r.pattern.as_str())
            .collect();
        assert_eq!(patterns, ["AMAZON MKTPL", "AMAZON", "WHOLEFDS"]);
        assert_eq!(s.engine.aliases.contains()[0].merchant, "Starbucks");
        assert_eq!(s.engine.overrides.get("Amazon"), Some("Shopping"));
        assert!(s.engine.chart_exclude_categories.contains("Transfer"));
        assert_eq!(s.schema, CsvSchema::chase());
    }

    #[test]
    fn test_empty_text_is_default() {
        assert_eq!(parse_settings("").unwrap(), Settings::default());
    }

    #[test]
    fn test_non_string_alias_is_configuration_error() {
        let err = parse_settings("[in_aliases]\nSTARBUCKS = 3\n").unwrap_err();
        assert!(matches!(err, Error::Configuration(ref m) if m.contains("STARBUCKS")));

        let err = parse_settings("in_aliases = \"STARBUCKS\"\n").unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));

        let err = parse_settings("chart_exclude_categories = [\"Payment\", 1]\n").unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn test_empty_pattern_is_configuration_error() {
        let err = parse_settings("[startswith_aliases]\n\"\" = \"Nobody\"\n").unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn test_invalid_toml_is_configuration_error() {
        assert!(matches!(
            parse_settings("[in_aliases\n").unwrap_err(),
            Error::Configuration(_)
        ));
    }

    #[test]
    fn test_schema_override() {
        let s = parse_settings(
            "[schema]\ndate_columns = [\"Date\"]\nsign = \"positive-is-spend\"\n",
        )
        .unwrap();
        assert_eq!(s.schema.date_columns, ["Date"]);
        assert_eq!(s.schema.sign, SignConvention::PositiveIsSpend);
        assert_eq!(s.schema.amount_column, "Amount");
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chase.toml");
        fs::write(&path, SAMPLE).unwrap();
        let s = load_settings(Some(path.as_path())).unwrap();
        assert_eq!(s.engine.overrides.len(), 1);

        assert!(load_settings(Some(dir.path().join("missing.toml").as_path())).is_err());
    }

    #[test]
    fn test_datafile_paths_sorted() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["Chase2.CSV", "Chase1.CSV", "notes.txt"] {
            fs::write(dir.path().join(name), "").unwrap();
        }
        let pattern = format!("{}/Chase*.CSV", dir.path().display());
        let paths = datafile_paths(&pattern).unwrap();
        let names: Vec<_> = paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["Chase1.CSV", "Chase2.CSV"]);
    }
}
