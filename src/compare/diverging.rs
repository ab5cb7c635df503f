//! Diverging subset construction
//!
//! The diverging subset is a single table with one row per intersecting row:
//! join-key columns keep their original values, and every other intersecting
//! column holds either a `{old} --> {new}` annotation where the values
//! differ, or the missing marker where they compare equal.

use super::cell::ValueComparator;
use super::engine::JoinResult;
use crate::model::{CellType, CellValue, Column, Table};

/// Diff state of one column's value across a joined row
#[derive(Debug, Clone, PartialEq)]
pub enum DiffCell {
    /// Values match under the configured rules (includes both missing)
    Equal,
    /// Both present, values differ
    Differing(CellValue, CellValue),
    /// Present in table 1 only
    LeftOnly(CellValue),
    /// Present in table 2 only
    RightOnly(CellValue),
}

impl DiffCell {
    /// Classify a pair of values
    pub fn classify(v1: &CellValue, v2: &CellValue, comparator: &ValueComparator) -> Self {
        match (v1.is_null(), v2.is_null()) {
            (true, true) => DiffCell::Equal,
            (false, true) => DiffCell::LeftOnly(v1.clone()),
            (true, false) => DiffCell::RightOnly(v2.clone()),
            (false, false) => {
                if comparator.equal(v1, v2) {
                    DiffCell::Equal
                } else {
                    DiffCell::Differing(v1.clone(), v2.clone())
                }
            }
        }
    }

    /// Render to an output cell: equal cells become the missing marker,
    /// everything else becomes the `{old} --> {new}` annotation with an
    /// empty side for one-sided values.
    pub fn render(&self) -> CellValue {
        match self {
            DiffCell::Equal => CellValue::Null,
            DiffCell::Differing(v1, v2) => {
                CellValue::from(format!("{{{}}} --> {{{}}}", v1.display(), v2.display()))
            }
            DiffCell::LeftOnly(v1) => CellValue::from(format!("{{{}}} --> {{}}", v1.display())),
            DiffCell::RightOnly(v2) => CellValue::from(format!("{{}} --> {{{}}}", v2.display())),
        }
    }
}

/// Build the diverging subset table.
///
/// One output row per joined row, in join order. Columns are the join keys
/// (original values, table-1 types) followed by every non-key intersecting
/// column in original left-to-right order.
pub fn build_diverging_subset(
    df1: &Table,
    df2: &Table,
    join: &JoinResult,
    join_columns: &[String],
    compare_columns: &[String],
    comparator: &ValueComparator,
) -> Table {
    let mut columns: Vec<Column> = Vec::new();
    for name in join_columns {
        let inferred = df1
            .column(name)
            .map(|c| c.inferred_type)
            .unwrap_or_default();
        columns.push(Column::with_type(name.clone(), columns.len(), inferred));
    }
    for name in compare_columns {
        columns.push(Column::with_type(name.clone(), columns.len(), CellType::String));
    }

    let key_indices: Vec<Option<usize>> = join_columns
        .iter()
        .map(|name| df1.column_index(name))
        .collect();
    let value_indices: Vec<(Option<usize>, Option<usize>)> = compare_columns
        .iter()
        .map(|name| (df1.column_index(name), df2.column_index(name)))
        .collect();

    let mut out = Table::new(columns);
    for pair in &join.pairs {
        let row1 = &df1.rows[pair.df1_index];
        let row2 = &df2.rows[pair.df2_index];

        let mut cells: Vec<CellValue> = Vec::with_capacity(join_columns.len() + compare_columns.len());
        for idx in &key_indices {
            cells.push(
                idx.and_then(|i| row1.get(i).cloned())
                    .unwrap_or(CellValue::Null),
            );
        }
        for (i1, i2) in &value_indices {
            let v1 = i1.and_then(|i| row1.get(i)).unwrap_or(&CellValue::Null);
            let v2 = i2.and_then(|i| row2.get(i)).unwrap_or(&CellValue::Null);
            cells.push(DiffCell::classify(v1, v2, comparator).render());
        }
        out.add_row(cells);
    }

    out
}
