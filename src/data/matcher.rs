//! Year Column Matcher Module
//! Binds each target year to the first column header that mentions it.

use std::ops::RangeInclusive;
use tracing::debug;

/// Years covered by the capital formation tables.
pub const DEFAULT_YEARS: RangeInclusive<i32> = 2005..=2010;

/// A year and the column whose header contains it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearColumn {
    pub year: i32,
    pub column: String,
}

/// Substring matcher over column headers.
pub struct YearColumnMatcher {
    years: RangeInclusive<i32>,
}

impl YearColumnMatcher {
    pub fn new(years: RangeInclusive<i32>) -> Self {
        Self { years }
    }

    /// Bind years to columns, in year order.
    ///
    /// Headers are scanned left to right and the first one containing the
    /// year wins. A header such as `2005-2010 Average` can be bound to more
    /// than one year. An empty result means no year columns exist.
    pub fn match_columns(&self, columns: &[String]) -> Vec<YearColumn> {
        self.years
            .clone()
            .filter_map(|year| {
                let token = year.to_string();
                columns
                    .iter()
                    .find(|column| column.contains(&token))
                    .map(|column| {
                        debug!(year, column = column.as_str(), "bound year column");
                        YearColumn {
                            year,
                            column: column.clone(),
                        }
                    })
            })
            .collect()
    }
}
