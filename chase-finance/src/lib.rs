//! chase-finance: merchant normalization, category resolution, date filtering,
//! aggregation and chart series preparation

pub mod aggregate;
pub mod category_rules;
pub mod chart;
pub mod engine;
pub mod filter;
pub mod merchant;

pub use aggregate::{MOVING_AVERAGE_WINDOW, aggregate, moving_average};
pub use category_rules::resolve_category;
pub use engine::{Engine, run};
pub use filter::{filter_window, in_window};
pub use merchant::normalize;
