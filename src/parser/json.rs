//! JSON array parser

use std::borrow::Cow;
use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use indexmap::IndexSet;
use serde_json::Value;

use crate::config::CompareOptions;
use crate::model::{CellValue, Column, Table};

use super::{decode_bytes, infer_column_types, Parser};

/// Parser for JSON array-of-objects files
pub struct JsonParser;

impl Parser for JsonParser {
    fn parse(&self, path: &Path, options: &CompareOptions) -> Result<Table> {
        let bytes = fs::read(path)
            .with_context(|| format!("Failed to open JSON file: {}", path.display()))?;
        let text = decode_bytes(&bytes, options.encoding.as_deref(), path)?;

        let value: Value = serde_json::from_str(&text).context("Failed to parse JSON file")?;

        // Accept both an array of objects and a single object
        let array = match value {
            Value::Array(arr) => arr,
            Value::Object(_) => vec![value],
            _ => bail!("JSON must be an array or object"),
        };

        if array.is_empty() {
            bail!("JSON array is empty");
        }

        // Column list is the union of keys across all objects, in first-seen order
        let mut column_names: IndexSet<String> = IndexSet::new();
        for item in &array {
            if let Value::Object(obj) = item {
                for key in obj.keys() {
                    column_names.insert(key.clone());
                }
            }
        }

        let columns: Vec<Column> = column_names
            .iter()
            .enumerate()
            .map(|(i, name)| Column::new(name.clone(), i))
            .collect();

        let mut table = Table::new(columns);

        for item in &array {
            let cells = match item {
                Value::Object(obj) => column_names
                    .iter()
                    .map(|key| json_value_to_cell(obj.get(key)))
                    .collect(),
                _ => {
                    // Non-object array item: first column, rest null
                    let mut cells = vec![json_value_to_cell(Some(item))];
                    cells.resize(column_names.len(), CellValue::Null);
                    cells
                }
            };

            table.add_row(cells);
        }

        infer_column_types(&mut table);

        Ok(table)
    }

    fn supports_extension(&self, ext: &str) -> bool {
        matches!(ext.to_lowercase().as_str(), "json")
    }
}

fn json_value_to_cell(value: Option<&Value>) -> CellValue {
    match value {
        None | Some(Value::Null) => CellValue::Null,
        Some(Value::Bool(b)) => CellValue::Bool(*b),
        Some(Value::Number(n)) => {
            if let Some(i) = n.as_i64() {
                CellValue::Int(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::String(Cow::Owned(n.to_string()))
            }
        }
        Some(Value::String(s)) => {
            if let Ok(date) = chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d") {
                return CellValue::Date(date);
            }
            if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
                return CellValue::DateTime(dt);
            }
            if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
                return CellValue::DateTime(dt);
            }
            CellValue::String(Cow::Owned(s.clone()))
        }
        Some(Value::Array(arr)) => {
            CellValue::String(Cow::Owned(serde_json::to_string(arr).unwrap_or_default()))
        }
        Some(Value::Object(obj)) => {
            CellValue::String(Cow::Owned(serde_json::to_string(obj).unwrap_or_default()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parses_array_of_objects() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        file.write_all(br#"[{"id": 1, "name": "a"}, {"id": 2, "extra": true}]"#)
            .unwrap();

        let table = JsonParser
            .parse(file.path(), &CompareOptions::default())
            .unwrap();
        assert_eq!(table.column_names(), vec!["id", "name", "extra"]);
        assert_eq!(table.row_count(), 2);
        // missing keys become nulls
        assert_eq!(table.rows[0].cells[2], CellValue::Null);
        assert_eq!(table.rows[1].cells[1], CellValue::Null);
        assert_eq!(table.rows[1].cells[2], CellValue::Bool(true));
    }
}
