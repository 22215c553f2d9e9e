//! Analysis modules.
//!
//! Aggregation of job records into location metrics, and the insights
//! derived from the ranked result.

pub mod aggregator;
pub mod insights;

pub use aggregator::*;
pub use insights::generate_insights;
