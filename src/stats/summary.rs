//! Dataset Summary
//! Shape, missing values, dtypes, describe() table and ESTIMATE central tendency.

use super::calculator::{DescriptiveStats, StatsCalculator};
use crate::data::{ObservationTable, ESTIMATE};
use polars::prelude::*;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Serialize)]
pub struct ColumnInfo {
    pub name: String,
    pub dtype: String,
    pub non_null: usize,
    pub null_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct NumericSummary {
    pub name: String,
    #[serde(flatten)]
    pub stats: DescriptiveStats,
}

#[derive(Debug, Clone, Serialize)]
pub struct CentralTendency {
    pub mean: f64,
    pub median: f64,
    pub modes: Vec<f64>,
}

/// Text report of the cleaned table.
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub rows: usize,
    pub columns: usize,
    pub column_info: Vec<ColumnInfo>,
    pub numeric: Vec<NumericSummary>,
    pub estimate: CentralTendency,
}

fn is_numeric(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Float32
            | DataType::Float64
            | DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
    )
}

/// Non-null, non-NaN values of a numeric column as f64.
fn numeric_values(column: &Column) -> PolarsResult<Vec<f64>> {
    let values = column
        .as_materialized_series()
        .cast(&DataType::Float64)?;
    Ok(values
        .f64()?
        .into_iter()
        .flatten()
        .filter(|v| !v.is_nan())
        .collect())
}

impl Summary {
    pub fn from_table(table: &ObservationTable) -> PolarsResult<Self> {
        let df = table.dataframe();

        let column_info = df
            .get_columns()
            .iter()
            .map(|c| ColumnInfo {
                name: c.name().to_string(),
                dtype: c.dtype().to_string(),
                non_null: c.len() - c.null_count(),
                null_count: c.null_count(),
            })
            .collect();

        let numeric = df
            .get_columns()
            .iter()
            .filter(|c| is_numeric(c.dtype()))
            .map(|c| {
                Ok(NumericSummary {
                    name: c.name().to_string(),
                    stats: StatsCalculator::compute_descriptive_stats(&numeric_values(c)?),
                })
            })
            .collect::<PolarsResult<Vec<_>>>()?;

        let estimates = numeric_values(df.column(ESTIMATE)?)?;
        let estimate = CentralTendency {
            mean: StatsCalculator::mean(&estimates),
            median: StatsCalculator::median(&estimates),
            modes: StatsCalculator::modes(&estimates),
        };

        Ok(Self {
            rows: df.height(),
            columns: df.width(),
            column_info,
            numeric,
            estimate,
        })
    }

    fn write_describe(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .numeric
            .iter()
            .map(|n| n.name.len())
            .max()
            .unwrap_or(0)
            .max(12);

        write!(f, "{:<6}", "")?;
        for col in &self.numeric {
            write!(f, " {:>width$}", col.name)?;
        }
        writeln!(f)?;

        let rows: [(&str, fn(&DescriptiveStats) -> f64); 8] = [
            ("count", |s: &DescriptiveStats| s.count as f64),
            ("mean", |s: &DescriptiveStats| s.mean),
            ("std", |s: &DescriptiveStats| s.std),
            ("min", |s: &DescriptiveStats| s.min),
            ("25%", |s: &DescriptiveStats| s.p25),
            ("50%", |s: &DescriptiveStats| s.median),
            ("75%", |s: &DescriptiveStats| s.p75),
            ("max", |s: &DescriptiveStats| s.max),
        ];
        for (label, pick) in rows {
            write!(f, "{:<6}", label)?;
            for col in &self.numeric {
                write!(f, " {:>width$.6}", pick(&col.stats))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name_width = self
            .column_info
            .iter()
            .map(|c| c.name.len())
            .max()
            .unwrap_or(0);

        writeln!(f, "=== Dataset Info ===")?;
        writeln!(f, "Dataset shape: ({}, {})", self.rows, self.columns)?;

        writeln!(f, "\nMissing values per column:")?;
        for c in &self.column_info {
            writeln!(f, "{:<name_width$}  {}", c.name, c.null_count)?;
        }

        writeln!(f, "\nData Types:")?;
        writeln!(
            f,
            " #   {:<name_width$}  Non-Null Count  Dtype",
            "Column"
        )?;
        for (i, c) in self.column_info.iter().enumerate() {
            writeln!(
                f,
                " {:<3} {:<name_width$}  {:>5} non-null  {}",
                i, c.name, c.non_null, c.dtype
            )?;
        }

        writeln!(f, "\nDescriptive Statistics")?;
        self.write_describe(f)?;

        let modes: Vec<String> = self.estimate.modes.iter().map(f64::to_string).collect();
        writeln!(
            f,
            "\nMean of Suicide Rate (ESTIMATE): {:.2}",
            self.estimate.mean
        )?;
        writeln!(
            f,
            "Median of Suicide Rate (ESTIMATE): {:.2}",
            self.estimate.median
        )?;
        write!(
            f,
            "Mode(s) of Suicide Rate (ESTIMATE): [{}]",
            modes.join(" ")
        )
    }
}
