//! Excel file parser (xlsx, xls, ods)

use std::borrow::Cow;
use std::path::Path;

use anyhow::{bail, Context, Result};
use calamine::{open_workbook_auto, Data, Range, Reader};

use crate::config::CompareOptions;
use crate::model::{CellValue, Column, Table};

use super::{infer_column_types, Parser};

/// Parser for Excel files; reads the first sheet of the workbook
pub struct ExcelParser;

impl Parser for ExcelParser {
    fn parse(&self, path: &Path, _options: &CompareOptions) -> Result<Table> {
        let mut workbook = open_workbook_auto(path)
            .with_context(|| format!("Failed to open Excel file: {}", path.display()))?;

        let sheets = workbook.sheet_names();
        if sheets.is_empty() {
            bail!("No sheets found in workbook: {}", path.display());
        }
        let sheet_name = sheets[0].clone();

        let range: Range<Data> = workbook
            .worksheet_range(&sheet_name)
            .with_context(|| format!("Failed to read sheet: {}", sheet_name))?;

        parse_range(range)
    }

    fn supports_extension(&self, ext: &str) -> bool {
        matches!(ext.to_lowercase().as_str(), "xlsx" | "xls" | "ods" | "xlsm")
    }
}

fn parse_range(range: Range<Data>) -> Result<Table> {
    let (row_count, col_count) = range.get_size();

    if row_count == 0 {
        bail!("Empty sheet");
    }

    // First row is the header
    let header_row = range.rows().next().context("No header row found")?;
    let columns: Vec<Column> = header_row
        .iter()
        .enumerate()
        .map(|(i, cell)| {
            let name = cell_to_string(cell);
            Column::new(
                if name.is_empty() {
                    format!("Column{}", i + 1)
                } else {
                    name
                },
                i,
            )
        })
        .collect();

    let mut table = Table::new(columns);

    for row in range.rows().skip(1) {
        let mut cells: Vec<CellValue> = row.iter().take(col_count).map(convert_cell).collect();

        if cells.len() < table.column_count() {
            cells.resize(table.column_count(), CellValue::Null);
        }

        table.add_row(cells);
    }

    infer_column_types(&mut table);

    Ok(table)
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => format!("{}", dt),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
        Data::Error(e) => format!("#{:?}", e),
    }
}

fn convert_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Null,
        Data::String(s) => {
            if s.trim().is_empty() {
                CellValue::Null
            } else {
                CellValue::String(Cow::Owned(s.clone()))
            }
        }
        Data::Float(f) => {
            // Integral floats read back as ints so values round-trip
            if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64 {
                CellValue::Int(*f as i64)
            } else {
                CellValue::Float(*f)
            }
        }
        Data::Int(i) => CellValue::Int(*i),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => {
            let s = format!("{}", dt);
            if let Ok(datetime) = chrono::NaiveDateTime::parse_from_str(&s, "%Y-%m-%d %H:%M:%S%.f")
            {
                CellValue::DateTime(datetime)
            } else if let Ok(datetime) =
                chrono::NaiveDateTime::parse_from_str(&s, "%Y-%m-%dT%H:%M:%S%.f")
            {
                CellValue::DateTime(datetime)
            } else if let Ok(date) = chrono::NaiveDate::parse_from_str(&s, "%Y-%m-%d") {
                CellValue::Date(date)
            } else {
                CellValue::String(Cow::Owned(s))
            }
        }
        Data::DateTimeIso(s) => {
            if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
                CellValue::DateTime(dt)
            } else if let Ok(d) = chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d") {
                CellValue::Date(d)
            } else {
                CellValue::String(Cow::Owned(s.clone()))
            }
        }
        Data::DurationIso(s) => CellValue::String(Cow::Owned(s.clone())),
        Data::Error(e) => CellValue::String(Cow::Owned(format!("#{:?}", e))),
    }
}
