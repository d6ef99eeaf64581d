//! Statistics Calculator Module
//! Handles per-column averages and the overall average across them.

use crate::data::{DataProcessor, ProcessorError, YearColumn};
use polars::prelude::*;
use statrs::statistics::Statistics;
use tracing::debug;

/// Mean of one column after numeric coercion.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnAverage {
    /// Year for year columns, column name otherwise.
    pub label: String,
    pub column: String,
    /// Cells that survived coercion.
    pub count: usize,
    pub mean: f64,
}

/// Handles average calculations over a loaded table.
pub struct StatsCalculator;

impl StatsCalculator {
    /// Arithmetic mean, NaN when `values` is empty.
    pub fn mean(values: &[f64]) -> f64 {
        values.iter().mean()
    }

    /// Average of the numeric cells of `column`.
    pub fn column_average(
        df: &DataFrame,
        label: &str,
        column: &str,
    ) -> Result<ColumnAverage, ProcessorError> {
        let values = DataProcessor::numeric_column(df, column)?;
        let mean = Self::mean(&values);
        debug!(column, count = values.len(), mean, "column average");

        Ok(ColumnAverage {
            label: label.to_string(),
            column: column.to_string(),
            count: values.len(),
            mean,
        })
    }

    /// Average of the column bound to a year, labelled with the year.
    pub fn year_average(
        df: &DataFrame,
        year_column: &YearColumn,
    ) -> Result<ColumnAverage, ProcessorError> {
        Self::column_average(df, &year_column.year.to_string(), &year_column.column)
    }

    /// Unweighted mean of the averages; `None` when there are none.
    pub fn overall_average(averages: &[ColumnAverage]) -> Option<f64> {
        if averages.is_empty() {
            return None;
        }
        Some(averages.iter().map(|a| a.mean).mean())
    }
}
