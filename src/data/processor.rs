//! Data Processor Module
//! Handles numeric coercion of table columns.

use super::loader::is_numeric_dtype;
use polars::prelude::*;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcessorError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

/// Turns table columns into plain numeric series.
pub struct DataProcessor;

impl DataProcessor {
    /// Coerce every cell of a column to `f64`, dropping what does not convert.
    ///
    /// Text cells are trimmed and parsed, booleans count as 0/1, and nulls or
    /// NaN never make it into the output. Columns of any other type (dates,
    /// lists, ...) yield no values.
    pub fn coerce_numeric(column: &Column) -> Result<Vec<f64>, ProcessorError> {
        let values: Vec<f64> = match column.dtype() {
            DataType::String => column
                .as_materialized_series()
                .str()?
                .into_iter()
                .flatten()
                .filter_map(Self::parse_numeric)
                .collect(),
            dtype if is_numeric_dtype(dtype) || matches!(dtype, DataType::Boolean) => {
                let value_f64 = column.cast(&DataType::Float64)?;
                value_f64.f64()?.into_iter().flatten().collect()
            }
            _ => Vec::new(),
        };

        Ok(values.into_iter().filter(|v| !v.is_nan()).collect())
    }

    /// Numeric values of the named column.
    pub fn numeric_column(df: &DataFrame, name: &str) -> Result<Vec<f64>, ProcessorError> {
        let column = df.column(name)?;
        Self::coerce_numeric(column)
    }

    fn parse_numeric(raw: &str) -> Option<f64> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        trimmed.parse::<f64>().ok()
    }
}
