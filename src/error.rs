//! Error taxonomy for the comparison library

use thiserror::Error;

/// Errors surfaced by the library API
#[derive(Debug, Error)]
pub enum CompareError {
    /// Bad or missing configuration, such as join keys absent from a table.
    /// Raised before any I/O happens.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Report file could not be written
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Spreadsheet serialization failed
    #[error("failed to write spreadsheet: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
}
