//! HTML report: diverging-subset table plus preformatted summary

use std::io::Write;

use crate::compare::Comparison;
use crate::model::Table;

/// Large diverging subsets are truncated for rendering, as reading hundreds
/// of annotation rows in a browser is not useful.
const MAX_TABLE_ROWS: usize = 100;
const MAX_TABLE_COLUMNS: usize = 10;

/// Render the full HTML document
pub fn render(comparison: &Comparison, writer: &mut dyn Write) -> std::io::Result<()> {
    let opts = comparison.options();

    writeln!(writer, "<!DOCTYPE html>")?;
    writeln!(writer, "<html lang=\"en\">")?;
    writeln!(writer, "<head>")?;
    writeln!(writer, "  <meta charset=\"UTF-8\">")?;
    writeln!(
        writer,
        "  <title>tabularcompare: {} vs {}</title>",
        html_escape(&opts.df1_name),
        html_escape(&opts.df2_name)
    )?;
    writeln!(writer, "  <style>")?;
    writeln!(writer, "{}", CSS_STYLES)?;
    writeln!(writer, "  </style>")?;
    writeln!(writer, "</head>")?;
    writeln!(writer, "<body>")?;

    writeln!(writer, "  <p class=\"caption\">TabularCompare Diverging Subset</p>")?;
    write_diverging_table(writer, comparison.diverging_subset())?;

    writeln!(writer, "  <pre>{}</pre>", html_escape(comparison.report()))?;

    writeln!(writer, "</body>")?;
    writeln!(writer, "</html>")?;
    Ok(())
}

fn write_diverging_table(writer: &mut dyn Write, table: &Table) -> std::io::Result<()> {
    let col_count = table.column_count().min(MAX_TABLE_COLUMNS);
    let row_count = table.row_count().min(MAX_TABLE_ROWS);

    writeln!(writer, "  <table class=\"diverging\">")?;
    writeln!(writer, "    <tr>")?;
    for col in table.columns.iter().take(col_count) {
        writeln!(writer, "      <th>{}</th>", html_escape(&col.name))?;
    }
    writeln!(writer, "    </tr>")?;

    for row in table.rows.iter().take(row_count) {
        writeln!(writer, "    <tr>")?;
        for cell in row.cells.iter().take(col_count) {
            writeln!(writer, "      <td>{}</td>", html_escape(cell.display()))?;
        }
        writeln!(writer, "    </tr>")?;
    }
    writeln!(writer, "  </table>")?;

    if table.row_count() > row_count || table.column_count() > col_count {
        writeln!(
            writer,
            "  <p class=\"caption\">Showing {} of {} rows and {} of {} columns.</p>",
            row_count,
            table.row_count(),
            col_count,
            table.column_count()
        )?;
    }
    Ok(())
}

fn html_escape(s: impl AsRef<str>) -> String {
    s.as_ref()
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

const CSS_STYLES: &str = r#"
    body {
      font-family: Monospace;
      font-size: 12px;
      color: #222;
      padding: 1.5rem;
    }

    .caption {
      font-size: 12.5px;
      margin-bottom: 0.5rem;
    }

    table.diverging {
      border-collapse: collapse;
      margin-bottom: 1.5rem;
    }

    th, td {
      text-align: left;
      padding: 0.4rem 0.75rem;
      border: 1px solid #444;
      max-width: 160px;
      overflow-wrap: break-word;
    }

    th {
      background: #333;
      color: #eee;
    }

    tr:nth-child(even) {
      background: #f0f0f0;
    }

    pre {
      font-size: 12px;
      line-height: 1.4;
    }
"#;
