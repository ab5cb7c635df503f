//! Comparison of two tables on a set of join keys

pub mod cell;
pub mod diverging;
pub mod engine;
mod summary;

use std::path::Path;

use crate::config::CompareOptions;
use crate::error::CompareError;
use crate::model::Table;
use crate::report;

pub use cell::ValueComparator;
pub use diverging::DiffCell;
pub use engine::{ColumnSets, JoinResult, RowPair};

/// An immutable comparison of two tables.
///
/// All derived results (intersecting rows/columns, unique rows/columns per
/// side, the diverging subset, the text report) are computed once at
/// construction and never mutated afterwards; every accessor is a plain read.
#[derive(Debug)]
pub struct Comparison {
    df1: Table,
    df2: Table,
    options: CompareOptions,
    columns: ColumnSets,
    join: JoinResult,
    /// Non-key intersecting columns, in original left-to-right order
    compare_columns: Vec<String>,
    diverging: Table,
    df1_unq_rows: Table,
    df2_unq_rows: Table,
    df1_unq_columns: Table,
    df2_unq_columns: Table,
    report: String,
}

impl Comparison {
    /// Compare two tables under the given options.
    ///
    /// Fails with [`CompareError::Configuration`] when join columns are
    /// named but absent from one or both tables. An empty row or column
    /// intersection is not an error; the derived results are simply empty
    /// and the report carries a note.
    pub fn new(
        mut df1: Table,
        mut df2: Table,
        mut options: CompareOptions,
    ) -> Result<Comparison, CompareError> {
        if options.cast_column_names_lower {
            df1.lowercase_column_names();
            df2.lowercase_column_names();
            options.join_columns = options
                .join_columns
                .iter()
                .map(|c| c.to_lowercase())
                .collect();
            options.ignore_columns = options
                .ignore_columns
                .iter()
                .map(|c| c.to_lowercase())
                .collect();
        }

        if !options.ignore_columns.is_empty() {
            df1.drop_columns(&options.ignore_columns);
            df2.drop_columns(&options.ignore_columns);
        }

        validate_join_columns(&df1, &df2, &options)?;
        if options.is_keyed() {
            df1.set_key_columns(&options.join_columns);
            df2.set_key_columns(&options.join_columns);
        }

        let columns = engine::column_sets(&df1, &df2);
        let join = engine::join_rows(&df1, &df2, options.is_keyed());

        let compare_columns: Vec<String> = columns
            .intersect
            .iter()
            .filter(|name| !options.join_columns.contains(name))
            .cloned()
            .collect();

        let comparator = ValueComparator::new(&options);
        let match_flags = engine::match_cells(&df1, &df2, &join, &compare_columns, &comparator);

        let diverging = diverging::build_diverging_subset(
            &df1,
            &df2,
            &join,
            &options.join_columns,
            &compare_columns,
            &comparator,
        );

        let df1_unq_rows = rows_subset(&df1, &join.df1_unique);
        let df2_unq_rows = rows_subset(&df2, &join.df2_unique);
        let df1_unq_columns = unique_columns_table(&df1, &options.join_columns, &columns.df1_unique);
        let df2_unq_columns = unique_columns_table(&df2, &options.join_columns, &columns.df2_unique);

        let report = summary::render_summary(&summary::SummaryContext {
            options: &options,
            df1: &df1,
            df2: &df2,
            columns: &columns,
            join: &join,
            compare_columns: &compare_columns,
            match_flags: &match_flags,
        });

        Ok(Comparison {
            df1,
            df2,
            options,
            columns,
            join,
            compare_columns,
            diverging,
            df1_unq_rows,
            df2_unq_rows,
            df1_unq_columns,
            df2_unq_columns,
            report,
        })
    }

    /// Table 1 as compared (after ignore/lowercase preprocessing)
    pub fn df1(&self) -> &Table {
        &self.df1
    }

    /// Table 2 as compared (after ignore/lowercase preprocessing)
    pub fn df2(&self) -> &Table {
        &self.df2
    }

    pub fn options(&self) -> &CompareOptions {
        &self.options
    }

    /// Human-readable comparison summary
    pub fn report(&self) -> &str {
        &self.report
    }

    /// The diverging subset: one row per intersecting row, join-key columns
    /// with original values, and `{old} --> {new}` annotations where values
    /// differ (missing marker where they match).
    pub fn diverging_subset(&self) -> &Table {
        &self.diverging
    }

    /// Columns present in both tables, in table-1 order
    pub fn intersect_columns(&self) -> &[String] {
        &self.columns.intersect
    }

    /// Rows present in both tables under the key spec, in table-1 order
    pub fn intersect_rows(&self) -> &[RowPair] {
        &self.join.pairs
    }

    /// Rows only in table 1
    pub fn df1_unq_rows(&self) -> &Table {
        &self.df1_unq_rows
    }

    /// Rows only in table 2
    pub fn df2_unq_rows(&self) -> &Table {
        &self.df2_unq_rows
    }

    /// Join-key columns plus the columns present only in table 1
    pub fn df1_unq_columns(&self) -> &Table {
        &self.df1_unq_columns
    }

    /// Join-key columns plus the columns present only in table 2
    pub fn df2_unq_columns(&self) -> &Table {
        &self.df2_unq_columns
    }

    /// Names of columns present only in table 1
    pub fn df1_unq_column_names(&self) -> &[String] {
        &self.columns.df1_unique
    }

    /// Names of columns present only in table 2
    pub fn df2_unq_column_names(&self) -> &[String] {
        &self.columns.df2_unique
    }

    /// Write the summary report as a plain-text file
    pub fn report_to_txt(&self, path: &Path) -> Result<(), CompareError> {
        report::write_text(self, path)
    }

    /// Write an HTML document with the diverging subset and the summary
    pub fn report_to_html(&self, path: &Path) -> Result<(), CompareError> {
        report::write_html(self, path)
    }

    /// Write the multi-sheet spreadsheet report
    pub fn report_to_xlsx(
        &self,
        path: &Path,
        write_originals: bool,
        only_deltas: bool,
    ) -> Result<(), CompareError> {
        report::write_xlsx(self, path, write_originals, only_deltas)
    }
}

fn validate_join_columns(
    df1: &Table,
    df2: &Table,
    options: &CompareOptions,
) -> Result<(), CompareError> {
    if !options.is_keyed() {
        return Ok(());
    }
    let mut missing: Vec<String> = Vec::new();
    for (table, name) in [(df1, &options.df1_name), (df2, &options.df2_name)] {
        for col in &options.join_columns {
            if table.column_index(col).is_none() {
                missing.push(format!("'{}' not in {}", col, name));
            }
        }
    }
    if missing.is_empty() {
        Ok(())
    } else {
        Err(CompareError::Configuration(format!(
            "join column(s) missing: {}",
            missing.join(", ")
        )))
    }
}

fn rows_subset(table: &Table, indices: &[usize]) -> Table {
    let mut out = Table::new(table.columns.clone());
    out.key_columns = table.key_columns.clone();
    for &i in indices {
        out.rows.push(table.rows[i].clone());
    }
    out
}

fn unique_columns_table(table: &Table, join_columns: &[String], unique: &[String]) -> Table {
    let mut names: Vec<String> = join_columns.to_vec();
    names.extend(unique.iter().cloned());
    table.select_columns(&names)
}
