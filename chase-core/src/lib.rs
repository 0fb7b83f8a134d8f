//! chase-core: Core types shared by the loader, the categorization engine and the renderers

pub mod error;
pub mod money;
pub mod report;
pub mod rules;
pub mod time;
pub mod transaction;
pub mod window;

pub use error::{Error, Result};
pub use money::{Money, ParseMoneyError};
pub use report::{
    AggregateNode, CategoryMonthly, NodeKind, Report, ReportMode, ReportRequest, Summary,
};
pub use rules::{AliasRule, AliasRules, CategoryOverrides, EngineConfig, UNCATEGORIZED, UNKNOWN_MERCHANT};
pub use time::{YearMonth, months_between};
pub use transaction::{RawTransaction, SourceRef, Transaction};
pub use window::{DateBound, DateWindow};
