//! CSV parser

use std::borrow::Cow;

use crate::error::{Result, TableError};
use crate::model::{normalize_header_names, CellValue, Table};

use super::Parser;

const FORMAT: &str = "CSV";

/// Tokens read as missing values
const NULL_TOKENS: &[&str] = &["", "NA", "N/A", "NaN", "nan", "null", "NULL", "None"];

/// Parser for comma-separated text with a header row
pub struct CsvParser;

impl Parser for CsvParser {
    fn parse(&self, bytes: &[u8]) -> Result<Table> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(false)
            .from_reader(bytes);

        // Read headers
        let headers = csv_reader
            .headers()
            .map_err(|e| TableError::parse_with_source(FORMAT, "failed to read header row", e))?
            .clone();

        if headers.is_empty() {
            return Err(TableError::parse(FORMAT, "no columns to parse from file"));
        }

        let names = normalize_header_names(headers.iter());

        // Read rows
        let mut rows = Vec::new();
        for result in csv_reader.records() {
            let record = result.map_err(|e| {
                let message = match e.position() {
                    Some(pos) => format!("malformed row at line {}", pos.line()),
                    None => "malformed row".to_string(),
                };
                TableError::parse_with_source(FORMAT, message, e)
            })?;

            rows.push(record.iter().map(parse_cell_value).collect());
        }

        Table::from_rows(names, rows)
            .map_err(|e| TableError::parse_with_source(FORMAT, "inconsistent table shape", e))
    }

    fn supports_extension(&self, ext: &str) -> bool {
        ext == "csv"
    }
}

/// Parse a string value into a CellValue with type inference.
///
/// Whitespace is ignored when detecting numbers, booleans and dates; text
/// that stays a string is kept exactly as written.
fn parse_cell_value(s: &str) -> CellValue {
    let trimmed = s.trim();

    // Check for empty/null
    if NULL_TOKENS.contains(&trimmed) {
        return CellValue::Null;
    }

    // Try parsing as boolean
    if trimmed.eq_ignore_ascii_case("true") {
        return CellValue::Bool(true);
    }
    if trimmed.eq_ignore_ascii_case("false") {
        return CellValue::Bool(false);
    }

    // Try parsing as integer
    if let Ok(i) = trimmed.parse::<i64>() {
        return CellValue::Int(i);
    }

    // Try parsing as float
    if let Ok(f) = trimmed.parse::<f64>() {
        return CellValue::Float(f);
    }

    // Try parsing as date
    if let Ok(date) = chrono::NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return CellValue::Date(date);
    }

    // Try parsing as datetime (ISO 8601)
    if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S") {
        return CellValue::DateTime(dt);
    }
    if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S") {
        return CellValue::DateTime(dt);
    }

    // Default to string
    CellValue::String(Cow::Owned(s.to_string()))
}
