//! CSV file parser

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::config::CompareOptions;
use crate::model::{CellValue, Column, Table};

use super::{decode_bytes, infer_column_types, parse_cell_value, Parser};

/// Parser for CSV files
pub struct CsvParser;

impl Parser for CsvParser {
    fn parse(&self, path: &Path, options: &CompareOptions) -> Result<Table> {
        let bytes = fs::read(path)
            .with_context(|| format!("Failed to open file: {}", path.display()))?;
        let text = decode_bytes(&bytes, options.encoding.as_deref(), path)?;

        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(text.as_bytes());

        let headers = csv_reader
            .headers()
            .context("Failed to read CSV headers")?
            .clone();

        let columns: Vec<Column> = headers
            .iter()
            .enumerate()
            .map(|(i, name)| Column::new(name.to_string(), i))
            .collect();

        let mut table = Table::new(columns);

        for (line_num, result) in csv_reader.records().enumerate() {
            // +2 for 1-indexing and the header line
            let record = result
                .with_context(|| format!("Failed to read CSV row {}", line_num + 2))?;

            let mut cells: Vec<CellValue> = record.iter().map(parse_cell_value).collect();

            // Pad short rows with nulls
            if cells.len() < table.column_count() {
                cells.resize(table.column_count(), CellValue::Null);
            }

            table.add_row(cells);
        }

        infer_column_types(&mut table);

        Ok(table)
    }

    fn supports_extension(&self, ext: &str) -> bool {
        matches!(ext.to_lowercase().as_str(), "csv" | "tsv" | "txt")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CellType;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_csv(content: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn parses_headers_and_types() {
        let file = write_csv("id,name,score\n1,alice,9.5\n2,bob,\n");
        let table = CsvParser
            .parse(file.path(), &CompareOptions::default())
            .unwrap();

        assert_eq!(table.column_names(), vec!["id", "name", "score"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.rows[0].cells[0], CellValue::Int(1));
        assert_eq!(table.rows[1].cells[2], CellValue::Null);
        assert_eq!(table.column("id").unwrap().inferred_type, CellType::Int);
        assert_eq!(table.column("score").unwrap().inferred_type, CellType::Float);
    }

    #[test]
    fn short_rows_padded_with_nulls() {
        let file = write_csv("a,b,c\n1,2\n");
        let table = CsvParser
            .parse(file.path(), &CompareOptions::default())
            .unwrap();
        assert_eq!(table.rows[0].cells.len(), 3);
        assert_eq!(table.rows[0].cells[2], CellValue::Null);
    }
}
