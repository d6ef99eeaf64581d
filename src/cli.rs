//! Command line arguments.

use crate::analysis::AnalysisConfig;
use crate::data::DEFAULT_YEARS;
use anyhow::{bail, Result};
use clap::Parser;
use std::path::PathBuf;

/// Workbook the regional capital formation figures ship in.
pub const DEFAULT_PATH: &str = "实验2 2005-2010中国各地区资本形成总额.xlsx";

#[derive(Parser, Debug)]
#[command(
    name = "capital-stats",
    version,
    about = "Average regional capital formation per year from a spreadsheet"
)]
pub struct Cli {
    /// Spreadsheet to analyze (.xlsx, .xls, .ods or .csv)
    #[arg(default_value = DEFAULT_PATH)]
    pub path: PathBuf,

    /// Worksheet index, 0 is the first sheet
    #[arg(long, default_value_t = 0)]
    pub sheet: usize,

    /// First year to look for in column headers
    #[arg(long, default_value_t = *DEFAULT_YEARS.start())]
    pub from_year: i32,

    /// Last year to look for in column headers
    #[arg(long, default_value_t = *DEFAULT_YEARS.end())]
    pub to_year: i32,

    /// Rows to preview when the table has no numeric column
    #[arg(long, default_value_t = 5)]
    pub preview_rows: usize,
}

impl Cli {
    pub fn config(&self) -> Result<AnalysisConfig> {
        if self.from_year > self.to_year {
            bail!(
                "--from-year ({}) must not be after --to-year ({})",
                self.from_year,
                self.to_year
            );
        }

        Ok(AnalysisConfig {
            path: self.path.clone(),
            sheet: self.sheet,
            years: self.from_year..=self.to_year,
            preview_rows: self.preview_rows,
        })
    }
}
