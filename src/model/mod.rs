//! Data model for tabular data representation

mod schema;
mod table;
mod table_set;

pub use schema::{normalize_header_names, CellType, Column};
pub use table::{CellValue, Row, ShapeError, Table};
pub use table_set::{NamedTableSet, Transcript};
