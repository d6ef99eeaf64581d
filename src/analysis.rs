//! Analysis Module
//! Runs loading, year matching, averaging and reporting for one spreadsheet.

use crate::data::{DataLoader, YearColumnMatcher};
use crate::report::Reporter;
use crate::stats::{ColumnAverage, StatsCalculator};
use std::io::{self, Write};
use std::ops::RangeInclusive;
use std::path::PathBuf;
use tracing::{info, warn};

/// Settings for a single run.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub path: PathBuf,
    pub sheet: usize,
    pub years: RangeInclusive<i32>,
    pub preview_rows: usize,
}

/// What a run ended up computing.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The file could not be loaded; the error has been reported.
    LoadFailed,
    /// Averages of year columns, in year order.
    YearColumns {
        averages: Vec<ColumnAverage>,
        overall: Option<f64>,
    },
    /// No year column was found; averages of every numeric column.
    NumericColumns {
        averages: Vec<ColumnAverage>,
        overall: Option<f64>,
    },
    /// Neither year columns nor numeric columns.
    NoNumericColumns,
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        !matches!(self, Outcome::LoadFailed)
    }

    pub fn averages(&self) -> &[ColumnAverage] {
        match self {
            Outcome::YearColumns { averages, .. } | Outcome::NumericColumns { averages, .. } => {
                averages
            }
            Outcome::LoadFailed | Outcome::NoNumericColumns => &[],
        }
    }

    pub fn overall(&self) -> Option<f64> {
        match self {
            Outcome::YearColumns { overall, .. } | Outcome::NumericColumns { overall, .. } => {
                *overall
            }
            Outcome::LoadFailed | Outcome::NoNumericColumns => None,
        }
    }
}

/// Analyze `config.path`, reporting every step through `reporter`.
///
/// Load failures and per-column failures are reported and do not end in an
/// `Err`; only a failure to write the report does.
pub fn run<W: Write>(config: &AnalysisConfig, reporter: &mut Reporter<W>) -> io::Result<Outcome> {
    reporter.file_status(&config.path, config.path.exists())?;

    let df = match DataLoader::load(&config.path, config.sheet) {
        Ok(df) => df,
        Err(e) => {
            warn!(error = %e, "load failed");
            reporter.load_failure(&e)?;
            return Ok(Outcome::LoadFailed);
        }
    };
    reporter.loaded(&df)?;

    let matcher = YearColumnMatcher::new(config.years.clone());
    let year_columns = matcher.match_columns(&DataLoader::get_columns(&df));

    if !year_columns.is_empty() {
        info!(found = year_columns.len(), "matched year columns");
        reporter.year_columns_found(year_columns.len())?;

        let mut averages = Vec::with_capacity(year_columns.len());
        for year_column in &year_columns {
            match StatsCalculator::year_average(&df, year_column) {
                Ok(average) => {
                    info!(
                        year = year_column.year,
                        count = average.count,
                        "averaged year column"
                    );
                    reporter.year_average(&average)?;
                    averages.push(average);
                }
                Err(e) => {
                    warn!(year = year_column.year, error = %e, "skipping year");
                    reporter.column_error(&year_column.year.to_string(), &e)?;
                }
            }
        }

        let overall = StatsCalculator::overall_average(&averages);
        if let Some(value) = overall {
            reporter.overall(&config.years, value)?;
        }
        return Ok(Outcome::YearColumns { averages, overall });
    }

    // Fallback: average every column already stored as a number
    reporter.fallback_start()?;
    let numeric_columns = DataLoader::get_numeric_columns(&df);
    if numeric_columns.is_empty() {
        reporter.no_numeric_columns(&df, config.preview_rows)?;
        return Ok(Outcome::NoNumericColumns);
    }
    info!(found = numeric_columns.len(), "falling back to numeric columns");
    reporter.numeric_columns_found(numeric_columns.len())?;

    let mut averages = Vec::with_capacity(numeric_columns.len());
    for column in &numeric_columns {
        match StatsCalculator::column_average(&df, column, column) {
            Ok(average) => {
                info!(
                    column = average.column.as_str(),
                    count = average.count,
                    "averaged numeric column"
                );
                reporter.column_average(&average)?;
                averages.push(average);
            }
            Err(e) => {
                warn!(column = column.as_str(), error = %e, "skipping column");
                reporter.column_error(column, &e)?;
            }
        }
    }

    let overall = StatsCalculator::overall_average(&averages);
    if let Some(value) = overall {
        reporter.overall(&config.years, value)?;
    }
    Ok(Outcome::NumericColumns { averages, overall })
}
