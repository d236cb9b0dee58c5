//! Observation Table
//! The cleaned, read-only dataset shared by every analysis step.

use polars::prelude::*;

pub const YEAR: &str = "YEAR";
pub const STUB_LABEL: &str = "STUB_LABEL";
pub const AGE: &str = "AGE";
pub const ESTIMATE: &str = "ESTIMATE";

/// Columns the analysis cannot run without.
pub const REQUIRED_COLUMNS: [&str; 4] = [YEAR, STUB_LABEL, AGE, ESTIMATE];

/// One typed row of the table, restricted to the analysed fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub year: i64,
    pub stub_label: Option<String>,
    pub age: Option<String>,
    pub estimate: f64,
}

impl Observation {
    pub fn has_label(&self, label: &str) -> bool {
        self.stub_label.as_deref() == Some(label)
    }
}

/// Cleaned DataFrame. Only the cleaner can build one, and nothing can
/// mutate it afterwards.
#[derive(Debug, Clone)]
pub struct ObservationTable {
    df: DataFrame,
}

impl ObservationTable {
    pub(crate) fn from_cleaned(df: DataFrame) -> Self {
        Self { df }
    }

    pub fn dataframe(&self) -> &DataFrame {
        &self.df
    }

    pub fn height(&self) -> usize {
        self.df.height()
    }

    /// Project every row onto [`Observation`], in table order.
    pub fn observations(&self) -> PolarsResult<Vec<Observation>> {
        let years = self.df.column(YEAR)?.as_materialized_series().i64()?;
        let estimates = self.df.column(ESTIMATE)?.as_materialized_series().f64()?;
        let labels = self
            .df
            .column(STUB_LABEL)?
            .as_materialized_series()
            .cast(&DataType::String)?;
        let ages = self
            .df
            .column(AGE)?
            .as_materialized_series()
            .cast(&DataType::String)?;

        let rows = years
            .into_iter()
            .zip(estimates)
            .zip(labels.str()?)
            .zip(ages.str()?)
            .filter_map(|(((year, estimate), label), age)| {
                Some(Observation {
                    year: year?,
                    stub_label: label.map(str::to_string),
                    age: age.map(str::to_string),
                    estimate: estimate?,
                })
            })
            .collect();

        Ok(rows)
    }
}
