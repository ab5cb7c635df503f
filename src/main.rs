//! tabularcompare - compare two tabular datasets on join keys

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use tabularcompare::compare::Comparison;
use tabularcompare::config::CompareOptions;
use tabularcompare::parser::ParserFactory;

/// Compare two tabular datasets (CSV, JSON, Excel) on join keys
#[derive(Parser, Debug)]
#[command(name = "tabularcompare")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "Shorthand flags longer than one letter take two dashes: \
--ic, --n1, --n2, --is, --ci, --cl, --at, --rt, --od.")]
struct Cli {
    /// First table to compare (CSV, JSON, or Excel; inferred by extension)
    df1: PathBuf,

    /// Second table to compare
    df2: PathBuf,

    /// Comma-separated join key column(s); rows match on index when omitted
    #[arg(short = 'c', long = "columns", value_delimiter = ',')]
    columns: Vec<String>,

    /// Comma-separated column(s) to exclude from the comparison
    #[arg(long = "ignore_columns", alias = "ic", value_delimiter = ',')]
    ignore_columns: Vec<String>,

    /// Display alias for table 1
    #[arg(long = "df1_name", alias = "n1", default_value = "df1")]
    df1_name: String,

    /// Display alias for table 2
    #[arg(long = "df2_name", alias = "n2", default_value = "df2")]
    df2_name: String,

    /// Strip and ignore whitespace in string comparisons
    #[arg(long = "ignore_spaces", alias = "is")]
    ignore_spaces: bool,

    /// Case-insensitive string comparison
    #[arg(long = "case_insensitive", alias = "ci")]
    case_insensitive: bool,

    /// Lowercase column names before comparing
    #[arg(long = "cast_lowercase", alias = "cl")]
    cast_lowercase: bool,

    /// Absolute numeric tolerance
    #[arg(long = "abs_tol", alias = "at", default_value_t = 0.0)]
    abs_tol: f64,

    /// Relative numeric tolerance
    #[arg(long = "rel_tol", alias = "rt", default_value_t = 0.0)]
    rel_tol: f64,

    /// Also emit a .txt summary report
    #[arg(long = "txt")]
    txt: bool,

    /// Also emit an .html report
    #[arg(long = "html")]
    html: bool,

    /// Spreadsheet report contains only the diverging subset
    #[arg(long = "only_deltas", alias = "od")]
    only_deltas: bool,

    /// Output directory for report files
    #[arg(short = 'o', long = "output", default_value = ".")]
    output: PathBuf,

    /// Character encoding for reading input files
    #[arg(short = 'e', long = "encoding")]
    encoding: Option<String>,

    /// Verbose logging
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    env_logger::Builder::from_default_env()
        .filter_level(if cli.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        })
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            print_status(&format!("Error: {:#}", e), Color::Red);
            ExitCode::from(1)
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut options = CompareOptions::new()
        .with_join_columns(trim_list(&cli.columns))
        .with_ignore_columns(trim_list(&cli.ignore_columns))
        .with_names(&cli.df1_name, &cli.df2_name)
        .with_ignore_spaces(cli.ignore_spaces)
        .with_case_insensitive(cli.case_insensitive)
        .with_cast_column_names_lower(cli.cast_lowercase)
        .with_abs_tol(cli.abs_tol)
        .with_rel_tol(cli.rel_tol);
    if let Some(encoding) = &cli.encoding {
        options = options.with_encoding(encoding.clone());
    }

    let factory = ParserFactory::new();
    let df1 = factory
        .parse(&cli.df1, &options)
        .with_context(|| format!("Failed to parse {}", cli.df1.display()))?;
    let df2 = factory
        .parse(&cli.df2, &options)
        .with_context(|| format!("Failed to parse {}", cli.df2.display()))?;
    log::debug!(
        "Loaded {} ({} rows) and {} ({} rows)",
        cli.df1.display(),
        df1.row_count(),
        cli.df2.display(),
        df2.row_count()
    );

    let comparison = Comparison::new(df1, df2, options)?;

    let base = format!("{}_to_{}_comparison_report", cli.df1_name, cli.df2_name);
    let mut failures: Vec<String> = Vec::new();

    // The xlsx report is always written; a failure in one format does not
    // stop the remaining formats.
    let xlsx_path = cli.output.join(format!("{}.xlsx", base));
    log::debug!("Writing .xlsx report to {}", xlsx_path.display());
    let write_originals = !cli.only_deltas;
    record(
        comparison.report_to_xlsx(&xlsx_path, write_originals, cli.only_deltas),
        &xlsx_path,
        ".xlsx",
        &mut failures,
    );

    if cli.txt {
        let txt_path = cli.output.join(format!("{}.txt", base));
        log::debug!("Writing .txt report to {}", txt_path.display());
        record(
            comparison.report_to_txt(&txt_path),
            &txt_path,
            ".txt",
            &mut failures,
        );
    }

    if cli.html {
        let html_path = cli.output.join(format!("{}.html", base));
        log::debug!("Writing .html report to {}", html_path.display());
        record(
            comparison.report_to_html(&html_path),
            &html_path,
            ".html",
            &mut failures,
        );
    }

    if failures.is_empty() {
        Ok(())
    } else {
        anyhow::bail!("failed to write report(s): {}", failures.join("; "))
    }
}

fn record(
    result: Result<(), tabularcompare::CompareError>,
    path: &Path,
    kind: &str,
    failures: &mut Vec<String>,
) {
    match result {
        Ok(()) => {
            let mut stdout = StandardStream::stdout(ColorChoice::Auto);
            let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Green)));
            let _ = writeln!(
                &mut stdout,
                "Comparison {} report written to {}",
                kind,
                path.display()
            );
            let _ = stdout.reset();
        }
        Err(e) => {
            print_status(&format!("Failed to write {}: {}", path.display(), e), Color::Red);
            failures.push(format!("{} ({})", path.display(), e));
        }
    }
}

fn trim_list(values: &[String]) -> Vec<String> {
    values
        .iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn print_status(msg: &str, color: Color) {
    let mut stream = StandardStream::stderr(ColorChoice::Auto);
    let _ = stream.set_color(ColorSpec::new().set_fg(Some(color)));
    let _ = writeln!(&mut stream, "{}", msg);
    let _ = stream.reset();
}
