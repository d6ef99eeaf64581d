//! Data module - spreadsheet loading, year matching and numeric coercion

mod loader;
mod matcher;
mod processor;

pub use loader::{DataLoader, LoaderError};
pub use matcher::{YearColumn, YearColumnMatcher, DEFAULT_YEARS};
pub use processor::{DataProcessor, ProcessorError};
