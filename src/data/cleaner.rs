//! Data Cleaner Module
//! Turns the raw CSV frame into an [`ObservationTable`].

use super::table::{ObservationTable, ESTIMATE, REQUIRED_COLUMNS, YEAR};
use polars::prelude::*;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum CleanError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Required column `{0}` is missing")]
    MissingColumn(String),
}

/// Convert one raw YEAR value to an integer year.
///
/// Text is trimmed and parsed as a number; fractional years truncate.
/// Returns `None` for anything that is not a finite number.
pub fn coerce_year(raw: &str) -> Option<i64> {
    let value: f64 = raw.trim().parse().ok()?;
    value.is_finite().then(|| value.trunc() as i64)
}

/// Cleaning steps, applied in a fixed order.
pub struct Cleaner;

impl Cleaner {
    pub fn clean(raw: &DataFrame) -> Result<ObservationTable, CleanError> {
        let rows_in = raw.height();

        let df = Self::strip_column_names(raw)?;
        Self::require_columns(&df)?;
        let df = Self::drop_missing_estimates(df)?;
        let df = Self::coerce_years(df)?;
        let df = Self::strip_text_values(&df)?;

        info!(
            rows_in,
            rows_out = df.height(),
            columns = df.width(),
            "cleaned observation table"
        );
        Ok(ObservationTable::from_cleaned(df))
    }

    fn strip_column_names(df: &DataFrame) -> PolarsResult<DataFrame> {
        let columns = df
            .get_columns()
            .iter()
            .map(|c| {
                let name: PlSmallStr = c.name().trim().into();
                c.clone().with_name(name)
            })
            .collect();
        DataFrame::new(columns)
    }

    fn require_columns(df: &DataFrame) -> Result<(), CleanError> {
        let present = df.get_column_names();
        match REQUIRED_COLUMNS
            .iter()
            .find(|required| !present.iter().any(|name| name.as_str() == **required))
        {
            Some(missing) => Err(CleanError::MissingColumn(missing.to_string())),
            None => Ok(()),
        }
    }

    /// Cast ESTIMATE to Float64 and drop rows where it is null or NaN.
    /// A value that cannot be read as a number is an error, not a drop.
    fn drop_missing_estimates(mut df: DataFrame) -> PolarsResult<DataFrame> {
        let estimates = df
            .column(ESTIMATE)?
            .as_materialized_series()
            .strict_cast(&DataType::Float64)?;
        let keep: Vec<bool> = estimates
            .f64()?
            .into_iter()
            .map(|v| v.is_some_and(|x| !x.is_nan()))
            .collect();

        df.with_column(estimates)?;
        let before = df.height();
        let df = df.filter(&BooleanChunked::from_slice("keep".into(), &keep))?;
        debug!(dropped = before - df.height(), "rows without ESTIMATE");
        Ok(df)
    }

    /// Replace YEAR by Int64 values, dropping rows that do not convert.
    fn coerce_years(df: DataFrame) -> PolarsResult<DataFrame> {
        let raw = df
            .column(YEAR)?
            .as_materialized_series()
            .cast(&DataType::String)?;
        let years: Vec<Option<i64>> = raw
            .str()?
            .into_iter()
            .map(|v| v.and_then(coerce_year))
            .collect();

        let keep: Vec<bool> = years.iter().map(Option::is_some).collect();
        let kept: Vec<i64> = years.into_iter().flatten().collect();

        let before = df.height();
        let mut df = df.filter(&BooleanChunked::from_slice("keep".into(), &keep))?;
        df.with_column(Series::new(YEAR.into(), kept))?;
        debug!(dropped = before - df.height(), "rows with non-numeric YEAR");
        Ok(df)
    }

    fn strip_text_values(df: &DataFrame) -> PolarsResult<DataFrame> {
        let columns = df
            .get_columns()
            .iter()
            .map(|c| {
                if c.dtype() != &DataType::String {
                    return Ok(c.clone());
                }
                let trimmed: Vec<Option<&str>> = c
                    .as_materialized_series()
                    .str()?
                    .into_iter()
                    .map(|v| v.map(str::trim))
                    .collect();
                Ok(Column::new(c.name().clone(), trimmed))
            })
            .collect::<PolarsResult<Vec<_>>>()?;
        DataFrame::new(columns)
    }
}
