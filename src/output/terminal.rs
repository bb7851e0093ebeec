//! Colored terminal output

use std::io::Write;

use anyhow::Result;
use tabled::builder::Builder;
use tabled::settings::Style;
use termcolor::{Color, ColorSpec, WriteColor};

use crate::model::Table;
use crate::pipeline::PassOutcome;

use super::OutputFormatter;

/// Terminal output with colors
pub struct TerminalOutput {
    max_rows: usize,
}

impl TerminalOutput {
    pub fn new() -> Self {
        Self { max_rows: 20 }
    }

    /// Limit how many rows of each table are printed
    pub fn with_max_rows(max_rows: usize) -> Self {
        Self { max_rows }
    }

    fn write_status(
        &self,
        writer: &mut dyn WriteColor,
        color: Color,
        message: &str,
    ) -> Result<()> {
        writer.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true))?;
        write!(writer, "{}", message)?;
        writer.reset()?;
        writeln!(writer)?;
        Ok(())
    }

    fn write_heading(&self, writer: &mut dyn WriteColor, title: &str) -> Result<()> {
        writer.set_color(ColorSpec::new().set_bold(true))?;
        write!(writer, "{}", title)?;
        writer.reset()?;
        writeln!(writer)?;
        Ok(())
    }

    fn write_table(&self, name: &str, table: &Table, writer: &mut dyn WriteColor) -> Result<()> {
        writeln!(
            writer,
            "Table: {} ({} rows × {} columns)",
            name,
            table.row_count(),
            table.column_count()
        )?;

        if table.column_count() == 0 {
            writeln!(writer, "(no columns)")?;
            return Ok(());
        }

        writeln!(writer, "{}", build_grid(table, self.max_rows))?;

        let hidden = table.row_count().saturating_sub(self.max_rows);
        if hidden > 0 {
            writeln!(writer, "… {} more rows", hidden)?;
        }
        Ok(())
    }

    fn write_transcript(&self, outcome: &PassOutcome, writer: &mut dyn WriteColor) -> Result<()> {
        self.write_heading(writer, "Edit transcript")?;
        if outcome.transcript.is_empty() {
            writeln!(writer, "(no edits)")?;
        } else {
            write!(writer, "{}", outcome.transcript)?;
            if !outcome.transcript.as_str().ends_with('\n') {
                writeln!(writer)?;
            }
        }
        writeln!(writer)?;
        Ok(())
    }
}

impl Default for TerminalOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputFormatter for TerminalOutput {
    fn render(
        &self,
        outcome: &PassOutcome,
        file_name: &str,
        writer: &mut dyn WriteColor,
    ) -> Result<()> {
        self.write_status(
            writer,
            Color::Green,
            &format!(
                "File successfully uploaded and read: {} ({} rows × {} columns)",
                file_name,
                outcome.source.row_count(),
                outcome.source.column_count()
            ),
        )?;
        writeln!(writer)?;

        self.write_heading(writer, "Modified data")?;
        if outcome.tables.is_empty() {
            writeln!(writer, "(the edit returned no tables)")?;
        }
        for (name, table) in outcome.tables.iter() {
            self.write_table(name, table, writer)?;
        }
        writeln!(writer)?;

        self.write_transcript(outcome, writer)?;

        match &outcome.download {
            Some(download) => writeln!(
                writer,
                "Download: {} ({}, {} bytes) from table '{}'",
                download.file_name,
                download.mime_type,
                download.bytes.len(),
                download.table_name
            )?,
            None => self.write_status(writer, Color::Blue, "Nothing to download.")?,
        }

        Ok(())
    }
}

/// Render the header and the first `max_rows` rows as a bordered grid
fn build_grid(table: &Table, max_rows: usize) -> String {
    let mut builder = Builder::default();
    builder.push_record(table.column_names().map(str::to_string));
    for row in table.rows().iter().take(max_rows) {
        builder.push_record(row.cells.iter().map(|c| c.display().into_owned()));
    }

    let mut grid = builder.build();
    grid.with(Style::modern());
    grid.to_string()
}
