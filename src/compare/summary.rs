//! Plain-text comparison report

use std::fmt::Write;

use super::engine::{ColumnSets, JoinResult};
use crate::config::CompareOptions;
use crate::model::Table;

/// Everything the report needs, borrowed from the finished comparison
pub struct SummaryContext<'a> {
    pub options: &'a CompareOptions,
    pub df1: &'a Table,
    pub df2: &'a Table,
    pub columns: &'a ColumnSets,
    pub join: &'a JoinResult,
    /// Non-key intersecting columns, in compare order
    pub compare_columns: &'a [String],
    /// flags[pair][col]: true when the pair's values in that column match
    pub match_flags: &'a [Vec<bool>],
}

/// Render the standard text report: table shapes, column membership, row
/// matching counts, and per-column mismatch counts.
pub fn render_summary(ctx: &SummaryContext<'_>) -> String {
    let mut out = String::new();
    let opts = ctx.options;

    section(&mut out, "TabularCompare Comparison");

    section(&mut out, "DataFrame Summary");
    let name_width = opts.df1_name.len().max(opts.df2_name.len()).max(9);
    let _ = writeln!(out, "{:<name_width$}  Columns  Rows", "DataFrame");
    let _ = writeln!(
        out,
        "{:<name_width$}  {:>7}  {:>4}",
        opts.df1_name,
        ctx.df1.column_count(),
        ctx.df1.row_count()
    );
    let _ = writeln!(
        out,
        "{:<name_width$}  {:>7}  {:>4}",
        opts.df2_name,
        ctx.df2.column_count(),
        ctx.df2.row_count()
    );
    out.push('\n');

    section(&mut out, "Column Summary");
    let _ = writeln!(
        out,
        "Number of columns in common: {}",
        ctx.columns.intersect.len()
    );
    let _ = writeln!(
        out,
        "Number of columns in {} but not in {}: {}{}",
        opts.df1_name,
        opts.df2_name,
        ctx.columns.df1_unique.len(),
        name_list(&ctx.columns.df1_unique)
    );
    let _ = writeln!(
        out,
        "Number of columns in {} but not in {}: {}{}",
        opts.df2_name,
        opts.df1_name,
        ctx.columns.df2_unique.len(),
        name_list(&ctx.columns.df2_unique)
    );
    if ctx.columns.intersect.is_empty() {
        let _ = writeln!(out, "Note: the tables have no columns in common.");
    }
    out.push('\n');

    section(&mut out, "Row Summary");
    if opts.is_keyed() {
        let _ = writeln!(out, "Matched on: {}", opts.join_columns.join(", "));
    } else {
        let _ = writeln!(out, "Matched on: index (positional)");
    }
    let duplicates = has_duplicate_keys(ctx);
    let _ = writeln!(
        out,
        "Any duplicates on match values: {}",
        if duplicates { "Yes" } else { "No" }
    );
    let _ = writeln!(out, "Absolute tolerance: {}", opts.abs_tol);
    let _ = writeln!(out, "Relative tolerance: {}", opts.rel_tol);
    let _ = writeln!(out, "Number of rows in common: {}", ctx.join.pairs.len());
    let _ = writeln!(
        out,
        "Number of rows in {} but not in {}: {}",
        opts.df1_name,
        opts.df2_name,
        ctx.join.df1_unique.len()
    );
    let _ = writeln!(
        out,
        "Number of rows in {} but not in {}: {}",
        opts.df2_name,
        opts.df1_name,
        ctx.join.df2_unique.len()
    );
    out.push('\n');

    let rows_unequal = ctx
        .match_flags
        .iter()
        .filter(|flags| flags.iter().any(|m| !m))
        .count();
    let _ = writeln!(
        out,
        "Number of rows with some compared columns unequal: {}",
        rows_unequal
    );
    let _ = writeln!(
        out,
        "Number of rows with all compared columns equal: {}",
        ctx.join.pairs.len() - rows_unequal
    );
    if ctx.join.pairs.is_empty() {
        let _ = writeln!(out, "Note: the tables have no rows in common.");
    }
    out.push('\n');

    section(&mut out, "Column Comparison");
    let mismatches = per_column_mismatches(ctx);
    let unequal_columns = mismatches.iter().filter(|(_, n)| *n > 0).count();
    let total_unequal: usize = mismatches.iter().map(|(_, n)| n).sum();
    let _ = writeln!(
        out,
        "Number of columns compared with some values unequal: {}",
        unequal_columns
    );
    let _ = writeln!(
        out,
        "Number of columns compared with all values equal: {}",
        mismatches.len() - unequal_columns
    );
    let _ = writeln!(
        out,
        "Total number of values which compare unequal: {}",
        total_unequal
    );
    out.push('\n');

    if unequal_columns > 0 {
        section(&mut out, "Columns with Unequal Values");
        let col_width = mismatches
            .iter()
            .filter(|(_, n)| *n > 0)
            .map(|(name, _)| name.len())
            .max()
            .unwrap_or(6)
            .max(6);
        let _ = writeln!(out, "{:<col_width$}  Unequal Values", "Column");
        for (name, count) in &mismatches {
            if *count > 0 {
                let _ = writeln!(out, "{:<col_width$}  {:>14}", name, count);
            }
        }
        out.push('\n');
    }

    out
}

fn section(out: &mut String, title: &str) {
    let _ = writeln!(out, "{}", title);
    let _ = writeln!(out, "{}", "-".repeat(title.len()));
    out.push('\n');
}

fn name_list(names: &[String]) -> String {
    if names.is_empty() {
        String::new()
    } else {
        format!(" [{}]", names.join(", "))
    }
}

fn per_column_mismatches(ctx: &SummaryContext<'_>) -> Vec<(String, usize)> {
    ctx.compare_columns
        .iter()
        .enumerate()
        .map(|(col_idx, name)| {
            let count = ctx
                .match_flags
                .iter()
                .filter(|flags| !flags.get(col_idx).copied().unwrap_or(true))
                .count();
            (name.clone(), count)
        })
        .collect()
}

fn has_duplicate_keys(ctx: &SummaryContext<'_>) -> bool {
    if !ctx.options.is_keyed() {
        return false;
    }
    use rustc_hash::FxHashSet;
    for table in [ctx.df1, ctx.df2] {
        let mut seen: FxHashSet<&str> = FxHashSet::default();
        for row in &table.rows {
            if !seen.insert(row.key.as_str()) {
                return true;
            }
        }
    }
    false
}
