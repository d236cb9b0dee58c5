//! Male vs Female comparison of ESTIMATE.

use super::calculator::{StatsCalculator, WelchTest};
use crate::data::Observation;
use serde::Serialize;
use std::fmt;

pub const MALE: &str = "Male";
pub const FEMALE: &str = "Female";

#[derive(Debug, Clone, Serialize)]
pub struct SexComparison {
    pub male_count: usize,
    pub female_count: usize,
    pub male_mean: f64,
    pub female_mean: f64,
    pub test: WelchTest,
}

impl SexComparison {
    /// Rows labelled anything other than Male or Female are ignored.
    pub fn from_observations(observations: &[Observation]) -> Self {
        let rates = |label: &str| -> Vec<f64> {
            observations
                .iter()
                .filter(|o| o.has_label(label))
                .map(|o| o.estimate)
                .collect()
        };
        let male = rates(MALE);
        let female = rates(FEMALE);

        Self {
            male_count: male.len(),
            female_count: female.len(),
            male_mean: StatsCalculator::mean(&male),
            female_mean: StatsCalculator::mean(&female),
            test: StatsCalculator::welch_ttest(&male, &female),
        }
    }
}

impl fmt::Display for SexComparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Welch t-test between Male and Female Suicide Rates")?;
        writeln!(f, "t-statistic: {:.4}", self.test.statistic)?;
        write!(f, "P-value: {:.4}", self.test.p_value)
    }
}
