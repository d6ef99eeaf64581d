//! Stats module - column averages

mod calculator;

pub use calculator::{ColumnAverage, StatsCalculator};
