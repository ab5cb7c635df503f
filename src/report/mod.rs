//! Report serialization: text, HTML, and spreadsheet

mod html;
mod xlsx;

use std::fs;
use std::path::Path;

use crate::compare::Comparison;
use crate::error::CompareError;

/// Write the plain-text summary report
pub fn write_text(comparison: &Comparison, path: &Path) -> Result<(), CompareError> {
    ensure_parent_dir(path)?;
    fs::write(path, comparison.report())?;
    Ok(())
}

/// Write the HTML report: diverging-subset table followed by the
/// preformatted text summary
pub fn write_html(comparison: &Comparison, path: &Path) -> Result<(), CompareError> {
    ensure_parent_dir(path)?;
    let mut file = fs::File::create(path)?;
    html::render(comparison, &mut file)?;
    Ok(())
}

/// Write the multi-sheet spreadsheet report.
///
/// Sheets, in order: the two original tables (when `write_originals` and not
/// `only_deltas`), the diverging subset ("Changes"), then the unique-column
/// and unique-row sheets per side when non-empty. `only_deltas` suppresses
/// every sheet except "Changes".
pub fn write_xlsx(
    comparison: &Comparison,
    path: &Path,
    write_originals: bool,
    only_deltas: bool,
) -> Result<(), CompareError> {
    ensure_parent_dir(path)?;
    xlsx::write_workbook(comparison, path, write_originals, only_deltas)?;
    Ok(())
}

fn ensure_parent_dir(path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
