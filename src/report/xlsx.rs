//! Multi-sheet spreadsheet report

use std::path::Path;

use rust_xlsxwriter::{Workbook, Worksheet, XlsxError};

use crate::compare::Comparison;
use crate::model::{CellValue, Table};

/// Excel rejects sheet names longer than 31 characters
const MAX_SHEET_NAME: usize = 31;

pub fn write_workbook(
    comparison: &Comparison,
    path: &Path,
    write_originals: bool,
    only_deltas: bool,
) -> Result<(), XlsxError> {
    let opts = comparison.options();
    let mut workbook = Workbook::new();

    if write_originals && !only_deltas {
        add_table_sheet(&mut workbook, &opts.df1_name, comparison.df1())?;
        add_table_sheet(&mut workbook, &opts.df2_name, comparison.df2())?;
    }

    add_table_sheet(&mut workbook, "Changes", comparison.diverging_subset())?;

    if !only_deltas {
        if !comparison.df1_unq_column_names().is_empty() {
            add_table_sheet(
                &mut workbook,
                &format!("{}_unqCols", opts.df1_name),
                comparison.df1_unq_columns(),
            )?;
        }
        if !comparison.df2_unq_column_names().is_empty() {
            add_table_sheet(
                &mut workbook,
                &format!("{}_unqCols", opts.df2_name),
                comparison.df2_unq_columns(),
            )?;
        }
        if comparison.df1_unq_rows().row_count() > 0 {
            add_table_sheet(
                &mut workbook,
                &format!("{}_unqRows", opts.df1_name),
                comparison.df1_unq_rows(),
            )?;
        }
        if comparison.df2_unq_rows().row_count() > 0 {
            add_table_sheet(
                &mut workbook,
                &format!("{}_unqRows", opts.df2_name),
                comparison.df2_unq_rows(),
            )?;
        }
    }

    workbook.save(path)?;
    Ok(())
}

fn add_table_sheet(workbook: &mut Workbook, name: &str, table: &Table) -> Result<(), XlsxError> {
    let sheet = workbook.add_worksheet();
    sheet.set_name(truncate_sheet_name(name))?;

    for (col_idx, col) in table.columns.iter().enumerate() {
        sheet.write_string(0, col_idx as u16, &col.name)?;
    }
    for (row_idx, row) in table.rows.iter().enumerate() {
        for (col_idx, cell) in row.cells.iter().enumerate() {
            write_cell(sheet, (row_idx + 1) as u32, col_idx as u16, cell)?;
        }
    }
    Ok(())
}

fn write_cell(
    sheet: &mut Worksheet,
    row: u32,
    col: u16,
    value: &CellValue,
) -> Result<(), XlsxError> {
    match value {
        CellValue::Null => {}
        CellValue::Bool(b) => {
            sheet.write_boolean(row, col, *b)?;
        }
        CellValue::Int(i) => {
            sheet.write_number(row, col, *i as f64)?;
        }
        // NaN is the missing marker for floats and stays blank like Null
        CellValue::Float(f) if f.is_nan() => {}
        CellValue::Float(f) => {
            sheet.write_number(row, col, *f)?;
        }
        CellValue::String(s) => {
            sheet.write_string(row, col, s.as_ref())?;
        }
        CellValue::Date(_) | CellValue::DateTime(_) => {
            sheet.write_string(row, col, value.display().as_ref())?;
        }
    }
    Ok(())
}

fn truncate_sheet_name(name: &str) -> String {
    name.chars().take(MAX_SHEET_NAME).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sheet_names_capped_at_31_chars() {
        let long = "a_very_long_dataframe_alias_that_overflows_unqCols";
        assert_eq!(truncate_sheet_name(long).chars().count(), 31);
        assert_eq!(truncate_sheet_name("Changes"), "Changes");
    }
}
