//! Export layer: serialize an edited table into a downloadable file

mod csv;

use std::str::FromStr;

use tracing::debug;

use crate::error::{Result, TableError};
use crate::model::{NamedTableSet, Table};

pub use self::csv::CsvExporter;

/// Suggested file name for the downloaded table
pub const DOWNLOAD_FILE_NAME: &str = "modified_data.csv";

/// MIME type of the downloaded table
pub const DOWNLOAD_MIME: &str = "text/csv";

/// Formats a table can be exported to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExportFormat {
    /// Comma-separated text with a header row
    #[default]
    Csv,
}

impl ExportFormat {
    pub fn mime_type(self) -> &'static str {
        match self {
            ExportFormat::Csv => DOWNLOAD_MIME,
        }
    }
}

impl FromStr for ExportFormat {
    type Err = TableError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            _ => Err(TableError::unsupported(s)),
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportFormat::Csv => write!(f, "csv"),
        }
    }
}

/// Trait for table serializers
pub trait Exporter {
    /// Serialize the whole table, columns and rows in table order
    fn export(&self, table: &Table) -> Result<Vec<u8>>;
}

/// Factory for exporters
pub struct TableExporter;

impl TableExporter {
    /// Create an exporter for a format
    pub fn create(format: ExportFormat) -> Box<dyn Exporter> {
        match format {
            ExportFormat::Csv => Box::new(CsvExporter::new()),
        }
    }

    /// Serialize a table in the given format
    pub fn export(table: &Table, format: ExportFormat) -> Result<Vec<u8>> {
        let bytes = Self::create(format).export(table)?;
        debug!(%format, rows = table.row_count(), len = bytes.len(), "exported table");
        Ok(bytes)
    }
}

/// Which table of an edit result gets exported
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ExportPolicy {
    /// The first table in insertion order
    #[default]
    First,
    /// The table with this name
    Named(String),
}

impl ExportPolicy {
    /// Pick a table from the set; `None` if the set is empty or lacks the name
    pub fn select<'a>(&self, tables: &'a NamedTableSet) -> Option<(&'a str, &'a Table)> {
        match self {
            ExportPolicy::First => tables.first(),
            ExportPolicy::Named(name) => tables.iter().find(|(n, _)| *n == name.as_str()),
        }
    }
}

impl FromStr for ExportPolicy {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(if s.is_empty() {
            ExportPolicy::First
        } else {
            ExportPolicy::Named(s.to_string())
        })
    }
}

/// A serialized table ready to hand to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    /// Name of the exported table within the edit result
    pub table_name: String,
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl Download {
    /// Export the table chosen by `policy`; `Ok(None)` when there is nothing to export
    pub fn prepare(
        tables: &NamedTableSet,
        policy: &ExportPolicy,
        format: ExportFormat,
    ) -> Result<Option<Self>> {
        let Some((name, table)) = policy.select(tables) else {
            return Ok(None);
        };

        let bytes = TableExporter::export(table, format)?;
        Ok(Some(Self {
            table_name: name.to_string(),
            file_name: DOWNLOAD_FILE_NAME.to_string(),
            mime_type: format.mime_type().to_string(),
            bytes,
        }))
    }
}
