//! chase-ingest: statement ingestion for delimited bank exports.

pub mod dedupe;
pub mod parsers;
pub mod schema;

pub use dedupe::dedupe_across_files;
pub use parsers::{load_file, load_files, parse_csv};
pub use schema::{CsvSchema, SignConvention};
