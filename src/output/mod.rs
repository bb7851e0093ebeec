//! Reporting the result of a pass

mod json;
mod terminal;

use anyhow::Result;
use termcolor::{ColorChoice, StandardStream, WriteColor};

use crate::config::{Config, ReportFormat};
use crate::pipeline::PassOutcome;

pub use json::JsonOutput;
pub use terminal::TerminalOutput;

/// Trait for report formatters
pub trait OutputFormatter {
    /// Render a pass outcome for the upload named `file_name`
    fn render(&self, outcome: &PassOutcome, file_name: &str, writer: &mut dyn WriteColor)
        -> Result<()>;
}

/// Factory for creating output formatters
pub struct OutputFactory;

impl OutputFactory {
    /// Create the output formatter a configuration asks for
    pub fn create(config: &Config) -> Box<dyn OutputFormatter> {
        match config.report_format {
            ReportFormat::Terminal => Box::new(TerminalOutput::with_max_rows(config.preview_rows)),
            ReportFormat::Json if config.compact_json => Box::new(JsonOutput::compact()),
            ReportFormat::Json => Box::new(JsonOutput::new()),
        }
    }
}

/// Render a pass outcome to stdout
pub fn render_to_stdout(outcome: &PassOutcome, file_name: &str, config: &Config) -> Result<()> {
    let formatter = OutputFactory::create(config);
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    formatter.render(outcome, file_name, &mut stdout)
}
