//! Data model: tables, rows, cells, and column metadata

mod schema;
mod table;

pub use schema::{CellType, Column};
pub use table::{CellValue, Row, Table};
