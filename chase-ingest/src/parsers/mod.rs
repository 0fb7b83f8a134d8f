//! File-level entry points for the record loader.

mod chase_csv;

pub use chase_csv::parse_csv;

use chase_core::{Error, RawTransaction, Result};
use std::fs::File;
use std::path::Path;
use tracing::debug;

use crate::schema::CsvSchema;

/// Parse one export file. The handle is closed before returning.
pub fn load_file(path: impl AsRef<Path>, schema: &CsvSchema) -> Result<Vec<RawTransaction>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| Error::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let txns = parse_csv(file, path, schema)?;
    debug!("Parsed {} transactions from {}", txns.len(), path.display());
    Ok(txns)
}

/// Parse every file in order and concatenate the rows. No de-duplication.
pub fn load_files<P: AsRef<Path>>(paths: &[P], schema: &CsvSchema) -> Result<Vec<RawTransaction>> {
    let mut out = Vec::new();
    for path in paths {
        out.extend(load_file(path, schema)?);
    }
    debug!("Loaded {} transactions from {} files", out.len(), paths.len());
    Ok(out)
}
