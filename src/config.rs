//! Configuration handling for tabedit

use std::path::PathBuf;

use crate::export::{ExportFormat, ExportPolicy, DOWNLOAD_FILE_NAME};
use crate::session::{EditSurface, ExternalEditorSurface, PassthroughSurface, DEFAULT_TABLE_NAME};

/// How the result of a pass is reported
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportFormat {
    #[default]
    Terminal,
    Json,
}

/// Rows of each table shown by default in the terminal report
pub const DEFAULT_PREVIEW_ROWS: usize = 20;

/// Configuration for one edit pass
#[derive(Debug, Clone)]
pub struct Config {
    /// File to load
    pub input_file: PathBuf,
    /// Editor command; `None` returns the table unedited
    pub editor_command: Option<String>,
    /// Name given to the edited table
    pub table_name: String,
    /// Format of the downloaded file
    pub export_format: ExportFormat,
    /// Which result table is downloaded
    pub export_policy: ExportPolicy,
    /// Where the downloaded file is written
    pub output_path: PathBuf,
    /// How the pass is reported
    pub report_format: ReportFormat,
    /// Rows of each table shown in the terminal report
    pub preview_rows: usize,
    /// Print the JSON report on a single line
    pub compact_json: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_file: PathBuf::new(),
            editor_command: None,
            table_name: DEFAULT_TABLE_NAME.to_string(),
            export_format: ExportFormat::default(),
            export_policy: ExportPolicy::default(),
            output_path: PathBuf::from(DOWNLOAD_FILE_NAME),
            report_format: ReportFormat::default(),
            preview_rows: DEFAULT_PREVIEW_ROWS,
            compact_json: false,
        }
    }
}

impl Config {
    /// Create a new Config for an input file
    pub fn new(input_file: PathBuf) -> Self {
        Self {
            input_file,
            ..Default::default()
        }
    }

    /// Edit through an external command
    pub fn with_editor_command(mut self, command: impl Into<String>) -> Self {
        self.editor_command = Some(command.into());
        self
    }

    /// Set the name of the edited table
    pub fn with_table_name(mut self, name: impl Into<String>) -> Self {
        self.table_name = name.into();
        self
    }

    /// Set export format
    pub fn with_export_format(mut self, format: ExportFormat) -> Self {
        self.export_format = format;
        self
    }

    /// Set which result table is exported
    pub fn with_export_policy(mut self, policy: ExportPolicy) -> Self {
        self.export_policy = policy;
        self
    }

    /// Set the download path
    pub fn with_output_path(mut self, path: PathBuf) -> Self {
        self.output_path = path;
        self
    }

    /// Set report format
    pub fn with_report_format(mut self, format: ReportFormat) -> Self {
        self.report_format = format;
        self
    }

    /// Limit how many rows of each table the terminal report shows
    pub fn with_preview_rows(mut self, rows: usize) -> Self {
        self.preview_rows = rows;
        self
    }

    /// Print the JSON report without indentation
    pub fn with_compact_json(mut self, compact: bool) -> Self {
        self.compact_json = compact;
        self
    }

    /// Build the editing surface this configuration asks for
    pub fn surface(&self) -> Box<dyn EditSurface> {
        match &self.editor_command {
            Some(command) => Box::new(
                ExternalEditorSurface::new(command.as_str()).with_table_name(self.table_name.as_str()),
            ),
            None => Box::new(PassthroughSurface::new().with_table_name(self.table_name.as_str())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::new(PathBuf::from("data.csv"));
        assert_eq!(config.output_path, PathBuf::from("modified_data.csv"));
        assert_eq!(config.table_name, "df1");
        assert_eq!(config.export_policy, ExportPolicy::First);
        assert_eq!(config.surface().name(), "passthrough");
        assert_eq!(config.preview_rows, DEFAULT_PREVIEW_ROWS);
        assert!(!config.compact_json);
    }

    #[test]
    fn test_editor_selects_external_surface() {
        let config = Config::new(PathBuf::from("data.csv")).with_editor_command("vi");
        assert_eq!(config.surface().name(), "external-editor");
    }
}
