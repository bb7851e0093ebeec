//! Loader layer for reading uploaded tabular data
//!
//! The format is chosen from the extension the caller declares, never from
//! the content. Bytes that do not match their declared format fail with
//! [`TableError::ParseError`].

mod cache;
mod csv;
mod excel;

use tracing::debug;

use crate::error::{Result, TableError};
use crate::model::Table;

pub use self::cache::{global_loader, load_cached, CacheStats, CachedLoader};
pub use self::csv::CsvParser;
pub use self::excel::{ExcelParser, WorkbookKind};

/// Trait for parsing an in-memory file into a Table
pub trait Parser: Send + Sync {
    /// Parse raw bytes and return a Table
    fn parse(&self, bytes: &[u8]) -> Result<Table>;

    /// Check if this parser handles the given (lowercase) extension
    fn supports_extension(&self, ext: &str) -> bool;
}

/// Dispatches uploads to a parser based on their declared extension
pub struct TableLoader {
    parsers: Vec<Box<dyn Parser>>,
}

impl Default for TableLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl TableLoader {
    /// Create a loader with the CSV, XLS and XLSX parsers
    pub fn new() -> Self {
        Self::with_parsers(vec![
            Box::new(CsvParser),
            Box::new(ExcelParser::new(WorkbookKind::Xls)),
            Box::new(ExcelParser::new(WorkbookKind::Xlsx)),
        ])
    }

    /// Create a loader from an explicit parser list
    pub fn with_parsers(parsers: Vec<Box<dyn Parser>>) -> Self {
        Self { parsers }
    }

    /// Get a parser for the given extension
    pub fn get_parser(&self, extension: &str) -> Result<&dyn Parser> {
        let ext = extension.to_lowercase();

        self.parsers
            .iter()
            .find(|p| p.supports_extension(&ext))
            .map(|p| p.as_ref())
            .ok_or_else(|| TableError::unsupported(extension))
    }

    /// Parse `bytes` as the format named by `extension` (case-insensitive)
    pub fn load(&self, bytes: &[u8], extension: &str) -> Result<Table> {
        let parser = self.get_parser(extension)?;
        debug!(extension, len = bytes.len(), "parsing upload");
        parser.parse(bytes)
    }

    /// Parse an upload, taking the extension from its file name
    pub fn load_file(&self, file_name: &str, bytes: &[u8]) -> Result<Table> {
        self.load(bytes, extension_of(file_name))
    }
}

/// Text after the last `.` of a file name, or the whole name if it has none
pub fn extension_of(file_name: &str) -> &str {
    match file_name.rsplit_once('.') {
        Some((_, ext)) => ext,
        None => file_name,
    }
}
