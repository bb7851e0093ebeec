//! Surface that hands the table to an external editor program

use std::fs;
use std::process::Command;

use tracing::{debug, info};

use crate::error::{Result, TableError};
use crate::export::{CsvExporter, Exporter};
use crate::loader::TableLoader;
use crate::model::Table;

use super::{describe_changes, EditSurface, SurfaceOutput, SurfaceSheet, DEFAULT_TABLE_NAME};

/// Writes the table to a scratch CSV file, runs an editor command on it and
/// reads the saved file back.
///
/// The command is split on whitespace; the file path is appended as the last
/// argument. The editor must exit successfully for the pass to count.
pub struct ExternalEditorSurface {
    command: String,
    table_name: String,
    loader: TableLoader,
}

impl ExternalEditorSurface {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            table_name: DEFAULT_TABLE_NAME.to_string(),
            loader: TableLoader::new(),
        }
    }

    pub fn with_table_name(mut self, name: impl Into<String>) -> Self {
        self.table_name = name.into();
        self
    }

    fn failure(&self, message: impl Into<String>) -> TableError {
        TableError::surface(self.name(), message)
    }
}

impl EditSurface for ExternalEditorSurface {
    fn name(&self) -> &str {
        "external-editor"
    }

    fn render(&mut self, input: &Table) -> Result<SurfaceOutput> {
        let mut parts = self.command.split_whitespace();
        let program = parts
            .next()
            .ok_or_else(|| self.failure("editor command is empty"))?;

        let dir = tempfile::tempdir()?;
        let path = dir.path().join(scratch_file_name(&self.table_name));
        fs::write(&path, CsvExporter::new().export(input)?)?;

        info!(command = %self.command, path = %path.display(), "waiting for editor");
        let status = Command::new(program)
            .args(parts)
            .arg(&path)
            .status()
            .map_err(|e| {
                TableError::surface_with_source(
                    self.name(),
                    format!("failed to launch '{}'", program),
                    e,
                )
            })?;

        if !status.success() {
            return Err(self.failure(format!("editor exited with {}", status)));
        }

        let bytes = fs::read(&path)?;
        debug!(len = bytes.len(), "reading edited file");
        let edited = self.loader.load(&bytes, "csv").map_err(|e| {
            TableError::surface_with_source(self.name(), "edited file could not be parsed", e)
        })?;

        Ok(SurfaceOutput {
            transcript: describe_changes(&self.table_name, input, &edited),
            sheets: vec![SurfaceSheet::from_table(self.table_name.as_str(), &edited)],
        })
    }
}

/// File name for the scratch copy; anything but `[A-Za-z0-9_-]` becomes `_`
/// so the name cannot leave the scratch directory
fn scratch_file_name(table_name: &str) -> String {
    let stem: String = table_name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if stem.is_empty() {
        format!("{}.csv", DEFAULT_TABLE_NAME)
    } else {
        format!("{}.csv", stem)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::model::CellValue;

    fn input() -> Table {
        Table::from_rows(
            vec!["x", "y"],
            vec![
                vec![CellValue::Int(1), CellValue::Int(2)],
                vec![CellValue::Int(3), CellValue::Int(4)],
            ],
        )
        .unwrap()
    }

    /// Write a shell script standing in for an editor
    fn script(dir: &tempfile::TempDir, body: &str) -> PathBuf {
        let path = dir.path().join("editor.sh");
        fs::write(&path, format!("{}\n", body)).unwrap();
        path
    }

    #[test]
    fn test_scratch_file_name() {
        assert_eq!(scratch_file_name("df1"), "df1.csv");
        assert_eq!(scratch_file_name("../escape"), "___escape.csv");
        assert_eq!(scratch_file_name("a/b\\c"), "a_b_c.csv");
        assert_eq!(scratch_file_name(""), "df1.csv");
    }

    #[test]
    fn test_editor_that_saves_changes() {
        let dir = tempfile::tempdir().unwrap();
        let editor = script(&dir, r#"printf 'x,y\n1,5\n3,4\n' > "$1""#);

        let mut surface = ExternalEditorSurface::new(format!("sh {}", editor.display()));
        let output = surface.render(&input()).unwrap();

        assert_eq!(output.sheets.len(), 1);
        assert_eq!(output.sheets[0].name, "df1");
        assert_eq!(output.sheets[0].rows[0], vec![CellValue::Int(1), CellValue::Int(5)]);
        assert_eq!(output.transcript, "df1: set [0, 'y']: 2 -> 5\n");
    }

    #[test]
    fn test_editor_that_changes_nothing() {
        let mut surface = ExternalEditorSurface::new("true").with_table_name("orders");
        let output = surface.render(&input()).unwrap();

        assert_eq!(output.sheets, vec![SurfaceSheet::from_table("orders", &input())]);
        assert!(output.transcript.is_empty());
    }

    #[test]
    fn test_table_name_stays_inside_scratch_dir() {
        let dir = tempfile::tempdir().unwrap();
        let seen = dir.path().join("seen.txt");
        let editor = script(&dir, &format!(r#"printf '%s' "$1" > "{}""#, seen.display()));

        let mut surface = ExternalEditorSurface::new(format!("sh {}", editor.display()))
            .with_table_name("../escape");
        let output = surface.render(&input()).unwrap();

        let edited = PathBuf::from(fs::read_to_string(&seen).unwrap());
        assert_eq!(edited.file_name().unwrap(), "___escape.csv");
        assert!(!edited.components().any(|c| c == std::path::Component::ParentDir));
        assert_eq!(output.sheets[0].name, "../escape");
    }

    #[test]
    fn test_failing_editor() {
        let mut surface = ExternalEditorSurface::new("false");
        assert!(matches!(
            surface.render(&input()),
            Err(TableError::EditSurfaceError { .. })
        ));
    }

    #[test]
    fn test_missing_editor() {
        let mut surface = ExternalEditorSurface::new("tabedit-no-such-editor-binary");
        assert!(matches!(
            surface.render(&input()),
            Err(TableError::EditSurfaceError { .. })
        ));
    }

    #[test]
    fn test_empty_command() {
        let mut surface = ExternalEditorSurface::new("   ");
        assert!(matches!(
            surface.render(&input()),
            Err(TableError::EditSurfaceError { .. })
        ));
    }

    #[test]
    fn test_unparseable_save() {
        let dir = tempfile::tempdir().unwrap();
        let editor = script(&dir, r#"printf 'x,y\n1,2,3\n' > "$1""#);

        let mut surface = ExternalEditorSurface::new(format!("sh {}", editor.display()));
        match surface.render(&input()) {
            Err(TableError::EditSurfaceError { source, .. }) => assert!(source.is_some()),
            other => panic!("expected EditSurfaceError, got {:?}", other),
        }
    }
}
