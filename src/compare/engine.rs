//! Join engine: aligns the rows and columns of two tables

use std::collections::VecDeque;

use indexmap::IndexMap;

use super::cell::ValueComparator;
use crate::model::{CellValue, Table};

/// A row present in both tables, referenced by index into each
#[derive(Debug, Clone)]
pub struct RowPair {
    /// Composite join key (the 0-based row index in positional mode)
    pub key: String,
    /// Row index in table 1
    pub df1_index: usize,
    /// Row index in table 2
    pub df2_index: usize,
}

/// Outcome of aligning rows between the two tables
#[derive(Debug, Default)]
pub struct JoinResult {
    /// Rows present in both tables, in table-1 order
    pub pairs: Vec<RowPair>,
    /// Indices of rows only in table 1, in table-1 order
    pub df1_unique: Vec<usize>,
    /// Indices of rows only in table 2, in table-2 order
    pub df2_unique: Vec<usize>,
}

/// Column membership across the two tables
#[derive(Debug, Default)]
pub struct ColumnSets {
    /// Columns present in both tables, in table-1 order
    pub intersect: Vec<String>,
    /// Columns only in table 1, in table-1 order
    pub df1_unique: Vec<String>,
    /// Columns only in table 2, in table-2 order
    pub df2_unique: Vec<String>,
}

/// Partition column names into intersecting and one-sided sets
pub fn column_sets(df1: &Table, df2: &Table) -> ColumnSets {
    let df1_names = df1.column_names();
    let df2_names = df2.column_names();

    ColumnSets {
        intersect: df1_names
            .iter()
            .filter(|n| df2_names.contains(n))
            .cloned()
            .collect(),
        df1_unique: df1_names
            .iter()
            .filter(|n| !df2_names.contains(n))
            .cloned()
            .collect(),
        df2_unique: df2_names
            .iter()
            .filter(|n| !df1_names.contains(n))
            .cloned()
            .collect(),
    }
}

/// Align rows between the two tables.
///
/// Keyed mode matches on the precomputed composite key; duplicate keys pair
/// up in order of occurrence (the nth duplicate on the left matches the nth
/// on the right). Positional mode pairs row i with row i.
pub fn join_rows(df1: &Table, df2: &Table, keyed: bool) -> JoinResult {
    if !keyed {
        return join_positional(df1, df2);
    }

    // FIFO queues per key so duplicate keys match rank-for-rank
    let mut df2_queues: IndexMap<u64, VecDeque<usize>> = IndexMap::new();
    for (idx, row) in df2.rows.iter().enumerate() {
        df2_queues.entry(row.key_hash).or_default().push_back(idx);
    }

    let mut result = JoinResult::default();
    let mut df2_matched = vec![false; df2.row_count()];

    for (df1_idx, row) in df1.rows.iter().enumerate() {
        let matched = df2_queues.get_mut(&row.key_hash).and_then(|queue| {
            // Guard against hash collisions before consuming the slot
            match queue.front() {
                Some(&df2_idx) if df2.rows[df2_idx].key == row.key => queue.pop_front(),
                _ => None,
            }
        });

        match matched {
            Some(df2_idx) => {
                df2_matched[df2_idx] = true;
                result.pairs.push(RowPair {
                    key: row.key.clone(),
                    df1_index: df1_idx,
                    df2_index: df2_idx,
                });
            }
            None => result.df1_unique.push(df1_idx),
        }
    }

    result.df2_unique = df2_matched
        .iter()
        .enumerate()
        .filter(|(_, m)| !**m)
        .map(|(idx, _)| idx)
        .collect();

    result
}

fn join_positional(df1: &Table, df2: &Table) -> JoinResult {
    let common = df1.row_count().min(df2.row_count());
    JoinResult {
        pairs: (0..common)
            .map(|i| RowPair {
                key: i.to_string(),
                df1_index: i,
                df2_index: i,
            })
            .collect(),
        df1_unique: (common..df1.row_count()).collect(),
        df2_unique: (common..df2.row_count()).collect(),
    }
}

/// Per-cell match flags for every joined row and compared column.
/// `flags[pair][col]` is true when the values compare equal.
pub fn match_cells(
    df1: &Table,
    df2: &Table,
    join: &JoinResult,
    compare_columns: &[String],
    comparator: &ValueComparator,
) -> Vec<Vec<bool>> {
    let indices: Vec<(usize, usize)> = compare_columns
        .iter()
        .filter_map(|name| Some((df1.column_index(name)?, df2.column_index(name)?)))
        .collect();

    join.pairs
        .iter()
        .map(|pair| {
            let row1 = &df1.rows[pair.df1_index];
            let row2 = &df2.rows[pair.df2_index];
            indices
                .iter()
                .map(|&(i1, i2)| {
                    let v1 = row1.get(i1).unwrap_or(&CellValue::Null);
                    let v2 = row2.get(i2).unwrap_or(&CellValue::Null);
                    comparator.equal(v1, v2)
                })
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Column;

    fn table(names: &[&str], rows: Vec<Vec<CellValue>>, keys: &[&str]) -> Table {
        let columns = names
            .iter()
            .enumerate()
            .map(|(i, n)| Column::new(*n, i))
            .collect();
        let mut t = Table::new(columns);
        for cells in rows {
            t.add_row(cells);
        }
        let keys: Vec<String> = keys.iter().map(|s| s.to_string()).collect();
        if !keys.is_empty() {
            t.set_key_columns(&keys);
        }
        t
    }

    #[test]
    fn keyed_join_partitions_rows() {
        let t1 = table(
            &["id", "v"],
            vec![
                vec![CellValue::Int(1), CellValue::Int(10)],
                vec![CellValue::Int(2), CellValue::Int(20)],
                vec![CellValue::Int(3), CellValue::Int(30)],
            ],
            &["id"],
        );
        let t2 = table(
            &["id", "v"],
            vec![
                vec![CellValue::Int(2), CellValue::Int(21)],
                vec![CellValue::Int(4), CellValue::Int(40)],
            ],
            &["id"],
        );

        let join = join_rows(&t1, &t2, true);
        assert_eq!(join.pairs.len(), 1);
        assert_eq!(join.pairs[0].key, "2");
        assert_eq!(join.df1_unique, vec![0, 2]);
        assert_eq!(join.df2_unique, vec![1]);
        // partition property: unique + matched covers every row exactly once
        assert_eq!(join.pairs.len() + join.df1_unique.len(), t1.row_count());
        assert_eq!(join.pairs.len() + join.df2_unique.len(), t2.row_count());
    }

    #[test]
    fn duplicate_keys_match_in_order() {
        let t1 = table(
            &["id", "v"],
            vec![
                vec![CellValue::Int(1), CellValue::Int(10)],
                vec![CellValue::Int(1), CellValue::Int(11)],
            ],
            &["id"],
        );
        let t2 = table(
            &["id", "v"],
            vec![vec![CellValue::Int(1), CellValue::Int(99)]],
            &["id"],
        );

        let join = join_rows(&t1, &t2, true);
        assert_eq!(join.pairs.len(), 1);
        assert_eq!(join.pairs[0].df1_index, 0);
        assert_eq!(join.df1_unique, vec![1]);
        assert!(join.df2_unique.is_empty());
    }

    #[test]
    fn positional_join_pairs_by_index() {
        let t1 = table(
            &["a"],
            vec![vec![CellValue::Int(1)], vec![CellValue::Int(2)]],
            &[],
        );
        let t2 = table(&["a"], vec![vec![CellValue::Int(1)]], &[]);

        let join = join_rows(&t1, &t2, false);
        assert_eq!(join.pairs.len(), 1);
        assert_eq!(join.pairs[0].key, "0");
        assert_eq!(join.df1_unique, vec![1]);
    }

    #[test]
    fn column_sets_preserve_order() {
        let t1 = table(&["a", "b", "c"], vec![], &[]);
        let t2 = table(&["c", "a", "d"], vec![], &[]);

        let cols = column_sets(&t1, &t2);
        assert_eq!(cols.intersect, vec!["a", "c"]);
        assert_eq!(cols.df1_unique, vec!["b"]);
        assert_eq!(cols.df2_unique, vec!["d"]);
    }

    #[test]
    fn match_cells_flags_mismatches() {
        let t1 = table(
            &["id", "v"],
            vec![vec![CellValue::Int(1), CellValue::Int(10)]],
            &["id"],
        );
        let t2 = table(
            &["id", "v"],
            vec![vec![CellValue::Int(1), CellValue::Int(11)]],
            &["id"],
        );

        let join = join_rows(&t1, &t2, true);
        let flags = match_cells(
            &t1,
            &t2,
            &join,
            &["v".to_string()],
            &ValueComparator::default(),
        );
        assert_eq!(flags, vec![vec![false]]);
    }
}
