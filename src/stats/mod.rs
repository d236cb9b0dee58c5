//! Stats module - descriptive statistics and significance testing

mod calculator;
mod comparator;
mod summary;

pub use calculator::StatsCalculator;
pub use comparator::{SexComparison, FEMALE, MALE};
pub use summary::Summary;
