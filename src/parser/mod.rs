//! Parser layer for reading tabular data files

mod csv;
mod excel;
mod json;

use std::borrow::Cow;
use std::path::Path;

use anyhow::{anyhow, bail, Result};
use encoding_rs::Encoding;

use crate::config::CompareOptions;
use crate::model::{CellType, CellValue, Table};

pub use self::csv::CsvParser;
pub use self::excel::ExcelParser;
pub use self::json::JsonParser;

/// Trait for parsing tabular data files
pub trait Parser: Send + Sync {
    /// Parse a file and return a Table
    fn parse(&self, path: &Path, options: &CompareOptions) -> Result<Table>;

    /// Check if this parser can handle the given file extension
    fn supports_extension(&self, ext: &str) -> bool;
}

/// Factory for creating parsers based on file extension
pub struct ParserFactory {
    parsers: Vec<Box<dyn Parser>>,
}

impl Default for ParserFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl ParserFactory {
    /// Create a new parser factory with all supported parsers
    pub fn new() -> Self {
        Self {
            parsers: vec![
                Box::new(CsvParser),
                Box::new(JsonParser),
                Box::new(ExcelParser),
            ],
        }
    }

    /// Get a parser for the given file path
    pub fn get_parser(&self, path: &Path) -> Result<&dyn Parser> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        for parser in &self.parsers {
            if parser.supports_extension(&ext) {
                return Ok(parser.as_ref());
            }
        }

        bail!(
            "Unsupported file format: {}",
            path.extension()
                .and_then(|e| e.to_str())
                .unwrap_or("unknown")
        )
    }

    /// Parse a file using the appropriate parser
    pub fn parse(&self, path: &Path, options: &CompareOptions) -> Result<Table> {
        let parser = self.get_parser(path)?;
        parser.parse(path, options)
    }
}

/// Decode raw file bytes with the configured encoding. With no encoding
/// configured, UTF-8 is tried first and ISO-8859-1 is the fallback, matching
/// common export tooling that emits Latin-1 CSVs.
pub(crate) fn decode_bytes(bytes: &[u8], encoding: Option<&str>, path: &Path) -> Result<String> {
    match encoding {
        Some(label) => {
            let enc = Encoding::for_label(label.as_bytes())
                .ok_or_else(|| anyhow!("Unknown encoding label: {}", label))?;
            let (text, _, had_errors) = enc.decode(bytes);
            if had_errors {
                bail!(
                    "File {} could not be decoded as {}",
                    path.display(),
                    label
                );
            }
            Ok(text.into_owned())
        }
        None => match std::str::from_utf8(bytes) {
            Ok(s) => Ok(s.to_string()),
            Err(_) => {
                let (text, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
                Ok(text.into_owned())
            }
        },
    }
}

/// Parse a string value into a CellValue with type inference
pub(crate) fn parse_cell_value(s: &str) -> CellValue {
    let trimmed = s.trim();

    if trimmed.is_empty()
        || trimmed.eq_ignore_ascii_case("null")
        || trimmed.eq_ignore_ascii_case("nan")
        || trimmed == "NA"
    {
        return CellValue::Null;
    }

    if trimmed.eq_ignore_ascii_case("true") {
        return CellValue::Bool(true);
    }
    if trimmed.eq_ignore_ascii_case("false") {
        return CellValue::Bool(false);
    }

    if let Ok(i) = trimmed.parse::<i64>() {
        return CellValue::Int(i);
    }

    if let Ok(f) = trimmed.parse::<f64>() {
        return CellValue::Float(f);
    }

    if let Ok(date) = chrono::NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return CellValue::Date(date);
    }

    if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S") {
        return CellValue::DateTime(dt);
    }
    if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S") {
        return CellValue::DateTime(dt);
    }

    CellValue::String(Cow::Owned(trimmed.to_string()))
}

/// Infer column types by widening over every cell in each column
pub(crate) fn infer_column_types(table: &mut Table) {
    for col_idx in 0..table.column_count() {
        let mut inferred = CellType::Null;

        for row in &table.rows {
            if let Some(cell) = row.cells.get(col_idx) {
                let cell_type = match cell {
                    CellValue::Null => CellType::Null,
                    CellValue::Bool(_) => CellType::Bool,
                    CellValue::Int(_) => CellType::Int,
                    CellValue::Float(_) => CellType::Float,
                    CellValue::String(_) => CellType::String,
                    CellValue::Date(_) => CellType::Date,
                    CellValue::DateTime(_) => CellType::DateTime,
                };

                inferred = inferred.widen(cell_type);
            }
        }

        if let Some(col) = table.columns.get_mut(col_idx) {
            col.inferred_type = inferred;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::borrow::Cow;

    #[test]
    fn parse_cell_value_infers_types() {
        assert_eq!(parse_cell_value(""), CellValue::Null);
        assert_eq!(parse_cell_value("null"), CellValue::Null);
        assert_eq!(parse_cell_value("NA"), CellValue::Null);
        assert_eq!(parse_cell_value("NaN"), CellValue::Null);
        assert_eq!(parse_cell_value("true"), CellValue::Bool(true));
        assert_eq!(parse_cell_value("42"), CellValue::Int(42));
        assert_eq!(parse_cell_value("3.14"), CellValue::Float(3.14));
        assert_eq!(
            parse_cell_value("hello"),
            CellValue::String(Cow::Owned("hello".to_string()))
        );
        assert!(matches!(parse_cell_value("2024-06-01"), CellValue::Date(_)));
    }

    #[test]
    fn latin1_fallback_on_invalid_utf8() {
        // 0xE9 is 'é' in ISO-8859-1 and invalid standalone UTF-8
        let bytes = b"caf\xe9";
        let decoded = decode_bytes(bytes, None, Path::new("x.csv")).unwrap();
        assert_eq!(decoded, "café");
    }

    #[test]
    fn explicit_encoding_label() {
        let bytes = b"caf\xe9";
        let decoded = decode_bytes(bytes, Some("iso-8859-1"), Path::new("x.csv")).unwrap();
        assert_eq!(decoded, "café");
        assert!(decode_bytes(bytes, Some("bogus-enc"), Path::new("x.csv")).is_err());
    }
}
