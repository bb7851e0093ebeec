//! JSON output format

use std::io::Write;

use anyhow::Result;
use serde::Serialize;
use termcolor::WriteColor;

use crate::model::{CellValue, Table};
use crate::pipeline::PassOutcome;

use super::OutputFormatter;

/// JSON output formatter
pub struct JsonOutput {
    pretty: bool,
}

impl JsonOutput {
    pub fn new() -> Self {
        Self { pretty: true }
    }

    pub fn compact() -> Self {
        Self { pretty: false }
    }
}

impl Default for JsonOutput {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
struct JsonColumn<'a> {
    name: &'a str,
    #[serde(rename = "type")]
    cell_type: String,
}

#[derive(Serialize)]
struct JsonTable<'a> {
    name: &'a str,
    columns: Vec<JsonColumn<'a>>,
    row_count: usize,
    rows: Vec<Vec<serde_json::Value>>,
}

#[derive(Serialize)]
struct JsonDownload<'a> {
    file_name: &'a str,
    mime_type: &'a str,
    table: &'a str,
    bytes: usize,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    file: &'a str,
    source_rows: usize,
    source_columns: usize,
    tables: Vec<JsonTable<'a>>,
    transcript: &'a str,
    download: Option<JsonDownload<'a>>,
}

fn cell_value_to_json(value: &CellValue) -> serde_json::Value {
    match value {
        CellValue::Null => serde_json::Value::Null,
        CellValue::Bool(b) => serde_json::Value::Bool(*b),
        CellValue::Int(i) => serde_json::json!(*i),
        CellValue::Float(f) => serde_json::json!(*f),
        CellValue::String(s) => serde_json::Value::String(s.to_string()),
        CellValue::Date(_) | CellValue::DateTime(_) => {
            serde_json::Value::String(value.canonical_text().into_owned())
        }
    }
}

fn json_table<'a>(name: &'a str, table: &'a Table) -> JsonTable<'a> {
    JsonTable {
        name,
        columns: table
            .columns()
            .iter()
            .map(|c| JsonColumn {
                name: c.name.as_str(),
                cell_type: c.inferred_type.to_string(),
            })
            .collect(),
        row_count: table.row_count(),
        rows: table
            .rows()
            .iter()
            .map(|r| r.cells.iter().map(cell_value_to_json).collect())
            .collect(),
    }
}

impl OutputFormatter for JsonOutput {
    fn render(
        &self,
        outcome: &PassOutcome,
        file_name: &str,
        writer: &mut dyn WriteColor,
    ) -> Result<()> {
        let report = JsonReport {
            file: file_name,
            source_rows: outcome.source.row_count(),
            source_columns: outcome.source.column_count(),
            tables: outcome
                .tables
                .iter()
                .map(|(name, table)| json_table(name, table))
                .collect(),
            transcript: outcome.transcript.as_str(),
            download: outcome.download.as_ref().map(|d| JsonDownload {
                file_name: d.file_name.as_str(),
                mime_type: d.mime_type.as_str(),
                table: d.table_name.as_str(),
                bytes: d.bytes.len(),
            }),
        };

        if self.pretty {
            serde_json::to_writer_pretty(&mut *writer, &report)?;
        } else {
            serde_json::to_writer(&mut *writer, &report)?;
        }
        writeln!(writer)?;

        Ok(())
    }
}
