//! Console Report Module
//! Writes load details and averages as human-readable text.

use crate::data::{LoaderError, ProcessorError};
use crate::stats::ColumnAverage;
use polars::prelude::*;
use std::io::{self, Write};
use std::ops::RangeInclusive;
use std::path::Path;

/// Plain text reporter over any writer (stdout in the binary).
pub struct Reporter<W: Write> {
    out: W,
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn file_status(&mut self, path: &Path, exists: bool) -> io::Result<()> {
        writeln!(self.out, "Reading file: {}", path.display())?;
        writeln!(self.out, "File exists: {exists}")
    }

    /// Load confirmation, shape and the numbered column listing.
    pub fn loaded(&mut self, df: &DataFrame) -> io::Result<()> {
        writeln!(self.out, "\nData loaded successfully!")?;
        writeln!(self.out, "\nShape: ({}, {})", df.height(), df.width())?;
        writeln!(self.out, "\nColumns:")?;
        for (i, name) in df.get_column_names().iter().enumerate() {
            writeln!(self.out, "{i}: {name}")?;
        }
        Ok(())
    }

    pub fn load_failure(&mut self, error: &LoaderError) -> io::Result<()> {
        writeln!(self.out, "Error reading file: {error}")?;
        let hint = match error {
            LoaderError::NotFound(_) => {
                "Check the path, or pass the workbook location as the first argument."
            }
            LoaderError::NotAFile(_) => "Pass the path of a spreadsheet file, not a directory.",
            LoaderError::MissingSheet(_) => {
                "Pass --sheet with an index below the number of worksheets."
            }
            _ => "Make sure the file is a readable .xlsx, .xls, .ods or .csv file.",
        };
        writeln!(self.out, "\n{hint}")
    }

    pub fn year_columns_found(&mut self, count: usize) -> io::Result<()> {
        writeln!(self.out, "\nFound {count} year columns")
    }

    pub fn year_average(&mut self, average: &ColumnAverage) -> io::Result<()> {
        writeln!(
            self.out,
            "{} average capital formation: {:.2}",
            average.label, average.mean
        )
    }

    pub fn column_error(&mut self, label: &str, error: &ProcessorError) -> io::Result<()> {
        writeln!(self.out, "Error processing {label}: {error}")
    }

    pub fn fallback_start(&mut self) -> io::Result<()> {
        writeln!(
            self.out,
            "\nCould not identify year columns, trying all numeric columns..."
        )
    }

    pub fn numeric_columns_found(&mut self, count: usize) -> io::Result<()> {
        writeln!(self.out, "Found {count} numeric columns")
    }

    pub fn column_average(&mut self, average: &ColumnAverage) -> io::Result<()> {
        writeln!(self.out, "{}: {:.2}", average.label, average.mean)
    }

    /// Same line for both the year path and the numeric column fallback.
    pub fn overall(&mut self, years: &RangeInclusive<i32>, value: f64) -> io::Result<()> {
        writeln!(
            self.out,
            "\nAverage annual capital formation {}-{}: {value:.2}",
            years.start(),
            years.end()
        )
    }

    pub fn no_numeric_columns(&mut self, df: &DataFrame, preview_rows: usize) -> io::Result<()> {
        writeln!(
            self.out,
            "\nNo numeric columns found, please check the data format"
        )?;
        writeln!(self.out, "\nData preview:")?;
        writeln!(self.out, "{}", df.head(Some(preview_rows)))
    }
}
