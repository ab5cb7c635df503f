//! Table, Row, and Cell data structures

use std::borrow::Cow;
use std::hash::{Hash, Hasher};

use chrono::{NaiveDate, NaiveDateTime};
use rustc_hash::FxHasher;

use super::schema::Column;

/// A cell value with type information. `Null` is the missing-value marker.
#[derive(Debug, Clone)]
pub enum CellValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(Cow<'static, str>),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

impl PartialEq for CellValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (CellValue::Null, CellValue::Null) => true,
            (CellValue::Bool(a), CellValue::Bool(b)) => a == b,
            (CellValue::Int(a), CellValue::Int(b)) => a == b,
            (CellValue::Float(a), CellValue::Float(b)) => {
                // NaN compares equal to NaN so missing floats match
                if a.is_nan() && b.is_nan() {
                    true
                } else {
                    a == b
                }
            }
            (CellValue::String(a), CellValue::String(b)) => a == b,
            (CellValue::Date(a), CellValue::Date(b)) => a == b,
            (CellValue::DateTime(a), CellValue::DateTime(b)) => a == b,
            // Cross-type numeric comparison: a column widened to float on one
            // side still compares value-wise against the int side
            (CellValue::Int(a), CellValue::Float(b)) => (*a as f64) == *b,
            (CellValue::Float(a), CellValue::Int(b)) => *a == (*b as f64),
            _ => false,
        }
    }
}

impl Eq for CellValue {}

impl Hash for CellValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            CellValue::Null => {}
            CellValue::Bool(b) => b.hash(state),
            CellValue::Int(i) => i.hash(state),
            CellValue::Float(f) => f.to_bits().hash(state),
            CellValue::String(s) => s.hash(state),
            CellValue::Date(d) => d.hash(state),
            CellValue::DateTime(dt) => dt.hash(state),
        }
    }
}

impl CellValue {
    /// Check if the value is missing. A float NaN counts as missing, which
    /// is how numeric columns carry absent values.
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null) || matches!(self, CellValue::Float(f) if f.is_nan())
    }

    /// Natural textual representation. Null renders as the empty string,
    /// which is what the diff annotations and report sheets expect.
    pub fn display(&self) -> Cow<'_, str> {
        match self {
            CellValue::Null => Cow::Borrowed(""),
            CellValue::Bool(b) => Cow::Owned(b.to_string()),
            CellValue::Int(i) => Cow::Owned(i.to_string()),
            CellValue::Float(f) => Cow::Owned(f.to_string()),
            CellValue::String(s) => Cow::Borrowed(s.as_ref()),
            CellValue::Date(d) => Cow::Owned(d.to_string()),
            CellValue::DateTime(dt) => Cow::Owned(dt.to_string()),
        }
    }

    /// Numeric view of the value, if it has one
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Int(i) => Some(*i as f64),
            CellValue::Float(f) => Some(*f),
            _ => None,
        }
    }
}

impl std::fmt::Display for CellValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::String(Cow::Owned(s.to_string()))
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::String(Cow::Owned(s))
    }
}

impl From<i64> for CellValue {
    fn from(i: i64) -> Self {
        CellValue::Int(i)
    }
}

impl From<f64> for CellValue {
    fn from(f: f64) -> Self {
        CellValue::Float(f)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

impl<T> From<Option<T>> for CellValue
where
    T: Into<CellValue>,
{
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => v.into(),
            None => CellValue::Null,
        }
    }
}

/// A row in the table
#[derive(Debug, Clone)]
pub struct Row {
    /// Cell values in column order
    pub cells: Vec<CellValue>,
    /// Composite key string for this row
    pub key: String,
    /// Pre-computed hash of the key for O(1) lookup
    pub key_hash: u64,
}

impl Row {
    /// Create a new row with computed key
    pub fn new(cells: Vec<CellValue>, key_column_indices: &[usize]) -> Self {
        let key = Self::compute_key(&cells, key_column_indices);
        let key_hash = Self::hash_key(&key);
        Self {
            cells,
            key,
            key_hash,
        }
    }

    /// Compute composite key from the given columns; all columns when none
    /// are specified. Components are joined with `|`, so any separator or
    /// escape character inside a value is backslash-escaped to keep distinct
    /// key tuples distinct.
    fn compute_key(cells: &[CellValue], key_column_indices: &[usize]) -> String {
        let escape = |c: &CellValue| c.display().replace('\\', "\\\\").replace('|', "\\|");
        if key_column_indices.is_empty() {
            cells.iter().map(escape).collect::<Vec<_>>().join("|")
        } else {
            key_column_indices
                .iter()
                .filter_map(|&i| cells.get(i))
                .map(escape)
                .collect::<Vec<_>>()
                .join("|")
        }
    }

    fn hash_key(key: &str) -> u64 {
        let mut hasher = FxHasher::default();
        key.hash(&mut hasher);
        hasher.finish()
    }

    /// Get a cell value by column index
    pub fn get(&self, index: usize) -> Option<&CellValue> {
        self.cells.get(index)
    }

    /// Recompute the key with new key column indices
    pub fn recompute_key(&mut self, key_column_indices: &[usize]) {
        self.key = Self::compute_key(&self.cells, key_column_indices);
        self.key_hash = Self::hash_key(&self.key);
    }
}

/// An ordered collection of named columns with rows of equal width
#[derive(Debug, Clone)]
pub struct Table {
    /// Column definitions
    pub columns: Vec<Column>,
    /// All rows in the table
    pub rows: Vec<Row>,
    /// Indices of the join-key columns, empty for positional alignment
    pub key_columns: Vec<usize>,
}

impl Table {
    /// Create a new empty table with column definitions
    pub fn new(columns: Vec<Column>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
            key_columns: Vec::new(),
        }
    }

    /// Add a row to the table
    pub fn add_row(&mut self, cells: Vec<CellValue>) {
        self.rows.push(Row::new(cells, &self.key_columns));
    }

    /// Set key columns by name. Names not present in the table are skipped;
    /// callers that need them all validate up front.
    pub fn set_key_columns(&mut self, key_names: &[String]) {
        self.key_columns = key_names
            .iter()
            .filter_map(|name| self.columns.iter().position(|c| &c.name == name))
            .collect();

        for row in &mut self.rows {
            row.recompute_key(&self.key_columns);
        }
    }

    /// Get column index by name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Get column by name
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Column names in order
    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    /// Number of rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Lowercase every column name in place
    pub fn lowercase_column_names(&mut self) {
        for col in &mut self.columns {
            col.name = col.name.to_lowercase();
        }
    }

    /// Remove the named columns, keeping row/column widths consistent.
    /// Unknown names are ignored, matching pandas-style drop with errors
    /// suppressed.
    pub fn drop_columns(&mut self, names: &[String]) {
        let drop_indices: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .filter(|(_, c)| names.contains(&c.name))
            .map(|(i, _)| i)
            .collect();
        if drop_indices.is_empty() {
            return;
        }

        let keep = |i: &usize| !drop_indices.contains(i);
        self.columns = self
            .columns
            .iter()
            .enumerate()
            .filter(|(i, _)| keep(i))
            .enumerate()
            .map(|(new_idx, (_, c))| Column::with_type(c.name.clone(), new_idx, c.inferred_type))
            .collect();
        for row in &mut self.rows {
            row.cells = row
                .cells
                .iter()
                .enumerate()
                .filter(|(i, _)| keep(i))
                .map(|(_, c)| c.clone())
                .collect();
        }
        // Key indices may have shifted; the caller re-sets them
        self.key_columns.clear();
        for row in &mut self.rows {
            row.recompute_key(&[]);
        }
    }

    /// Build a new table holding only the named columns, in the given order.
    /// Names missing from this table are skipped.
    pub fn select_columns(&self, names: &[String]) -> Table {
        let indices: Vec<usize> = names
            .iter()
            .filter_map(|name| self.column_index(name))
            .collect();
        let columns: Vec<Column> = indices
            .iter()
            .enumerate()
            .map(|(new_idx, &i)| {
                Column::with_type(
                    self.columns[i].name.clone(),
                    new_idx,
                    self.columns[i].inferred_type,
                )
            })
            .collect();
        let mut out = Table::new(columns);
        for row in &self.rows {
            let cells = indices
                .iter()
                .map(|&i| row.cells.get(i).cloned().unwrap_or(CellValue::Null))
                .collect();
            out.add_row(cells);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Column;

    fn sample() -> Table {
        let mut t = Table::new(vec![
            Column::new("id", 0),
            Column::new("name", 1),
            Column::new("score", 2),
        ]);
        t.add_row(vec![
            CellValue::Int(1),
            CellValue::from("a"),
            CellValue::Float(1.5),
        ]);
        t.add_row(vec![
            CellValue::Int(2),
            CellValue::from("b"),
            CellValue::Null,
        ]);
        t
    }

    #[test]
    fn key_recomputed_on_set_key_columns() {
        let mut t = sample();
        t.set_key_columns(&["id".to_string()]);
        assert_eq!(t.rows[0].key, "1");
        assert_eq!(t.rows[1].key, "2");
    }

    #[test]
    fn drop_columns_shrinks_rows() {
        let mut t = sample();
        t.drop_columns(&["name".to_string()]);
        assert_eq!(t.column_names(), vec!["id", "score"]);
        assert_eq!(t.rows[0].cells.len(), 2);
        assert_eq!(t.columns[1].index, 1);
    }

    #[test]
    fn select_columns_preserves_row_order() {
        let t = sample();
        let s = t.select_columns(&["score".to_string(), "id".to_string()]);
        assert_eq!(s.column_names(), vec!["score", "id"]);
        assert_eq!(s.rows[0].cells[1], CellValue::Int(1));
        assert_eq!(s.rows[1].cells[0], CellValue::Null);
    }

    #[test]
    fn cross_type_numeric_equality() {
        assert_eq!(CellValue::Int(3), CellValue::Float(3.0));
        assert_ne!(CellValue::Int(3), CellValue::from("3"));
    }

    #[test]
    fn nan_floats_count_as_missing() {
        assert!(CellValue::Float(f64::NAN).is_null());
        assert!(!CellValue::Float(0.0).is_null());
    }

    #[test]
    fn separator_in_key_values_keeps_tuples_distinct() {
        let keys = vec!["k1".to_string(), "k2".to_string()];
        let mut a = Table::new(vec![Column::new("k1", 0), Column::new("k2", 1)]);
        a.add_row(vec![CellValue::from("a|b"), CellValue::from("c")]);
        a.set_key_columns(&keys);
        let mut b = Table::new(vec![Column::new("k1", 0), Column::new("k2", 1)]);
        b.add_row(vec![CellValue::from("a"), CellValue::from("b|c")]);
        b.set_key_columns(&keys);

        assert_ne!(a.rows[0].key, b.rows[0].key);
        assert_eq!(a.rows[0].key, "a\\|b|c");
    }
}
