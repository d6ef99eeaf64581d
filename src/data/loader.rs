//! Spreadsheet Loader Module
//! Handles workbook and CSV loading into a Polars DataFrame.

use calamine::{open_workbook_auto, Data, Range, Reader};
use polars::prelude::*;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Path is not a regular file: {}", .0.display())]
    NotAFile(PathBuf),
    #[error("Failed to read workbook: {0}")]
    Workbook(#[from] calamine::Error),
    #[error("Workbook has no worksheet at index {0}")]
    MissingSheet(usize),
    #[error("Failed to build table: {0}")]
    Table(#[from] PolarsError),
}

/// Storage type picked for a worksheet column from its cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CellKind {
    Int,
    Float,
    Bool,
    Text,
}

/// Integer and floating point dtypes; booleans and text are not numeric.
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
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

/// Loads a single table from a workbook sheet or a CSV file.
pub struct DataLoader;

impl DataLoader {
    /// Load `path` into a DataFrame.
    ///
    /// `.csv` files go through Polars; anything else is opened as a workbook
    /// and the worksheet at `sheet` is read with its first row as the header.
    pub fn load(path: &Path, sheet: usize) -> Result<DataFrame, LoaderError> {
        if !path.exists() {
            return Err(LoaderError::NotFound(path.to_path_buf()));
        }
        if !path.is_file() {
            return Err(LoaderError::NotAFile(path.to_path_buf()));
        }

        let is_csv = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));

        let df = if is_csv {
            Self::read_csv(path)?
        } else {
            Self::read_workbook(path, sheet)?
        };

        info!(
            rows = df.height(),
            columns = df.width(),
            "loaded {}",
            path.display()
        );
        Ok(df)
    }

    fn read_csv(path: &Path) -> Result<DataFrame, LoaderError> {
        // Unparseable cells demote the column to strings instead of failing the load
        let df = LazyCsvReader::new(path)
            .with_infer_schema_length(Some(10000))
            .with_ignore_errors(true)
            .finish()?
            .collect()?;
        Ok(df)
    }

    fn read_workbook(path: &Path, sheet: usize) -> Result<DataFrame, LoaderError> {
        let mut workbook = open_workbook_auto(path)?;
        let range = workbook
            .worksheet_range_at(sheet)
            .ok_or(LoaderError::MissingSheet(sheet))??;
        debug!(
            sheet,
            height = range.height(),
            width = range.width(),
            "read worksheet range"
        );
        range_to_dataframe(&range)
    }

    /// Get list of column names from a loaded DataFrame.
    pub fn get_columns(df: &DataFrame) -> Vec<String> {
        df.get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    /// Get list of numeric column names.
    pub fn get_numeric_columns(df: &DataFrame) -> Vec<String> {
        df.get_columns()
            .iter()
            .filter(|col| is_numeric_dtype(col.dtype()))
            .map(|col| col.name().to_string())
            .collect()
    }
}

/// Convert a worksheet range to a DataFrame, using the first row as headers.
fn range_to_dataframe(range: &Range<Data>) -> Result<DataFrame, LoaderError> {
    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return Ok(DataFrame::empty());
    };
    let body: Vec<&[Data]> = rows.collect();

    let columns: Vec<Column> = header_names(header)
        .into_iter()
        .enumerate()
        .map(|(idx, name)| {
            let cells: Vec<Option<&Data>> = body
                .iter()
                .map(|row| row.get(idx).filter(|cell| !matches!(cell, Data::Empty)))
                .collect();
            build_column(name, &cells)
        })
        .collect();

    Ok(DataFrame::new(columns)?)
}

/// Blank header cells, including whitespace-only text.
fn is_blank(cell: &Data) -> bool {
    match cell {
        Data::Empty => true,
        Data::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// Header names with blanks filled as `Unnamed: i` and repeats suffixed `.1`, `.2`, ...
fn header_names(header: &[Data]) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();

    header
        .iter()
        .enumerate()
        .map(|(idx, cell)| {
            let base = if is_blank(cell) {
                format!("Unnamed: {idx}")
            } else {
                cell.to_string()
            };

            let mut name = base.clone();
            let mut suffix = 1;
            while !seen.insert(name.clone()) {
                name = format!("{base}.{suffix}");
                suffix += 1;
            }
            name
        })
        .collect()
}

fn infer_kind(cells: &[Option<&Data>]) -> CellKind {
    let present: Vec<&Data> = cells.iter().flatten().copied().collect();
    if present.is_empty() {
        return CellKind::Float;
    }
    if present.iter().all(|cell| matches!(cell, Data::Bool(_))) {
        return CellKind::Bool;
    }
    if !present
        .iter()
        .all(|cell| matches!(cell, Data::Int(_) | Data::Float(_)))
    {
        return CellKind::Text;
    }

    let integral = present.iter().all(|cell| match cell {
        Data::Int(_) => true,
        Data::Float(v) => v.fract() == 0.0 && v.abs() < i64::MAX as f64,
        _ => false,
    });

    // Integer columns only when nothing is missing
    if integral && present.len() == cells.len() {
        CellKind::Int
    } else {
        CellKind::Float
    }
}

fn build_column(name: String, cells: &[Option<&Data>]) -> Column {
    let kind = infer_kind(cells);
    debug!(column = name.as_str(), ?kind, "inferred column type");

    match kind {
        CellKind::Int => {
            let values: Vec<Option<i64>> = cells
                .iter()
                .map(|cell| match cell {
                    Some(Data::Int(v)) => Some(*v),
                    Some(Data::Float(v)) => Some(*v as i64),
                    _ => None,
                })
                .collect();
            Column::new(name.into(), values)
        }
        CellKind::Float => {
            let values: Vec<Option<f64>> = cells
                .iter()
                .map(|cell| match cell {
                    Some(Data::Int(v)) => Some(*v as f64),
                    Some(Data::Float(v)) => Some(*v),
                    _ => None,
                })
                .collect();
            Column::new(name.into(), values)
        }
        CellKind::Bool => {
            let values: Vec<Option<bool>> = cells
                .iter()
                .map(|cell| match cell {
                    Some(Data::Bool(b)) => Some(*b),
                    _ => None,
                })
                .collect();
            Column::new(name.into(), values)
        }
        CellKind::Text => {
            let values: Vec<Option<String>> = cells
                .iter()
                .map(|cell| {
                    cell.map(|c| match c {
                        Data::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                })
                .collect();
            Column::new(name.into(), values)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::{Data, Range};
    use rust_xlsxwriter::Workbook;
    use std::io::Write;
    use std::path::Path;

    fn sheet(rows: &[Vec<Data>]) -> Range<Data> {
        let height = rows.len() as u32;
        let width = rows.iter().map(|r| r.len()).max().unwrap_or(1) as u32;
        let mut range = Range::new((0, 0), (height - 1, width - 1));
        for (r, row) in rows.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                range.set_value((r as u32, c as u32), cell.clone());
            }
        }
        range
    }

    fn text(s: &str) -> Data {
        Data::String(s.to_string())
    }

    fn csv_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".csv")
            .tempfile()
            .unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn worksheet_columns_get_typed_from_cells() {
        let range = sheet(&[
            vec![text("Region"), Data::Float(2005.0), text("2006 Total")],
            vec![text("A"), Data::Float(10.0), Data::Float(20.0)],
            vec![text("B"), Data::Float(30.0), text("N/A")],
        ]);

        let df = range_to_dataframe(&range).unwrap();
        assert_eq!(df.shape(), (2, 3));

        let names: Vec<String> = df.get_column_names().iter().map(|s| s.to_string()).collect();
        assert_eq!(names, vec!["Region", "2005", "2006 Total"]);

        assert_eq!(df.column("Region").unwrap().dtype(), &DataType::String);
        assert_eq!(df.column("2005").unwrap().dtype(), &DataType::Int64);
        assert_eq!(df.column("2006 Total").unwrap().dtype(), &DataType::String);
    }

    #[test]
    fn missing_cells_make_float_columns() {
        let range = sheet(&[
            vec![text("Region"), text("2007")],
            vec![text("A"), Data::Int(4)],
            vec![text("B"), Data::Empty],
            vec![text("C"), Data::Float(2.5)],
        ]);

        let df = range_to_dataframe(&range).unwrap();
        let column = df.column("2007").unwrap();
        assert_eq!(column.dtype(), &DataType::Float64);
        assert_eq!(column.null_count(), 1);
    }

    #[test]
    fn boolean_and_empty_columns() {
        let range = sheet(&[
            vec![text("Flag"), text("Blank")],
            vec![Data::Bool(true), Data::Empty],
            vec![Data::Bool(false), Data::Empty],
        ]);

        let df = range_to_dataframe(&range).unwrap();
        assert_eq!(df.column("Flag").unwrap().dtype(), &DataType::Boolean);
        assert_eq!(df.column("Blank").unwrap().dtype(), &DataType::Float64);
        assert_eq!(df.column("Blank").unwrap().null_count(), 2);
    }

    #[test]
    fn whitespace_text_keeps_column_as_text() {
        let range = sheet(&[
            vec![text("Region"), text("GDP")],
            vec![text("A"), Data::Float(10.0)],
            vec![text("B"), text("  ")],
        ]);

        let df = range_to_dataframe(&range).unwrap();
        assert_eq!(df.column("GDP").unwrap().dtype(), &DataType::String);
        assert!(DataLoader::get_numeric_columns(&df).is_empty());
    }

    #[test]
    fn blank_and_repeated_headers_are_renamed() {
        let names = header_names(&[text("Region"), Data::Empty, text("Total"), text("Total"), text("Total")]);
        assert_eq!(
            names,
            vec!["Region", "Unnamed: 1", "Total", "Total.1", "Total.2"]
        );
    }

    #[test]
    fn empty_worksheet_gives_empty_table() {
        let range: Range<Data> = Range::empty();
        let df = range_to_dataframe(&range).unwrap();
        assert_eq!(df.shape(), (0, 0));
    }

    #[test]
    fn loads_csv_with_mixed_column() {
        let file = csv_file("Region,2005 Total,2006 Total\nA,10,20\nB,30,N/A\n");

        let df = DataLoader::load(file.path(), 0).unwrap();
        assert_eq!(df.shape(), (2, 3));

        assert_eq!(
            DataLoader::get_columns(&df),
            vec!["Region", "2005 Total", "2006 Total"]
        );
        assert_eq!(DataLoader::get_numeric_columns(&df), vec!["2005 Total"]);
    }

    #[test]
    fn loads_first_worksheet_of_xlsx() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("capital.xlsx");

        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.write_string(0, 0, "Region").unwrap();
        worksheet.write_string(0, 1, "2005 Total").unwrap();
        worksheet.write_number(0, 2, 2006).unwrap();
        worksheet.write_string(1, 0, "A").unwrap();
        worksheet.write_number(1, 1, 10).unwrap();
        worksheet.write_number(1, 2, 20).unwrap();
        worksheet.write_string(2, 0, "B").unwrap();
        worksheet.write_number(2, 1, 30).unwrap();
        worksheet.write_string(2, 2, "N/A").unwrap();
        workbook.save(&path).unwrap();

        let df = DataLoader::load(&path, 0).unwrap();
        assert_eq!(df.shape(), (2, 3));
        assert_eq!(
            DataLoader::get_columns(&df),
            vec!["Region", "2005 Total", "2006"]
        );
        assert_eq!(df.column("2005 Total").unwrap().dtype(), &DataType::Int64);
        assert_eq!(df.column("2006").unwrap().dtype(), &DataType::String);
    }

    #[test]
    fn sheet_index_past_the_last_worksheet() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("single.xlsx");

        let mut workbook = Workbook::new();
        workbook.add_worksheet().write_string(0, 0, "Region").unwrap();
        workbook.save(&path).unwrap();

        let err = DataLoader::load(&path, 4).unwrap_err();
        assert!(matches!(err, LoaderError::MissingSheet(4)));
    }

    #[test]
    fn missing_file_is_not_found() {
        let err = DataLoader::load(Path::new("no/such/workbook.xlsx"), 0).unwrap_err();
        assert!(matches!(err, LoaderError::NotFound(_)));
    }

    #[test]
    fn directory_is_not_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = DataLoader::load(dir.path(), 0).unwrap_err();
        assert!(matches!(err, LoaderError::NotAFile(_)));
    }

    #[test]
    fn corrupt_workbook_is_reported() {
        let mut file = tempfile::Builder::new()
            .suffix(".xlsx")
            .tempfile()
            .unwrap();
        file.write_all(b"this is not a zip archive").unwrap();
        file.flush().unwrap();

        let err = DataLoader::load(file.path(), 0).unwrap_err();
        assert!(matches!(err, LoaderError::Workbook(_)));
    }

    #[test]
    fn numeric_dtypes() {
        assert!(is_numeric_dtype(&DataType::Int64));
        assert!(is_numeric_dtype(&DataType::Float32));
        assert!(!is_numeric_dtype(&DataType::Boolean));
        assert!(!is_numeric_dtype(&DataType::String));
    }
}
