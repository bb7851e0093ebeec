//! One Load → Edit → Export pass

use std::fs;
use std::path::Path;
use std::sync::Arc;

use tracing::info;

use crate::error::Result;
use crate::export::{Download, ExportFormat, ExportPolicy};
use crate::loader::CachedLoader;
use crate::model::{NamedTableSet, Table, Transcript};
use crate::session::{EditSessionAdapter, EditSurface};

/// A user-supplied file: its name (for the extension) and its bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes: bytes.into(),
        }
    }

    /// Read a file from disk, keeping only its final path component as the name
    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = fs::read(path)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self { file_name, bytes })
    }
}

/// Everything one pass produced
#[derive(Debug)]
pub struct PassOutcome {
    /// The table as loaded, before editing
    pub source: Arc<Table>,
    pub tables: NamedTableSet,
    pub transcript: Transcript,
    /// `None` when the edit produced no table the policy could select
    pub download: Option<Download>,
}

/// Load an upload, run it through the edit surface, and export the result
pub fn run_pass<S: EditSurface>(
    loader: &CachedLoader,
    upload: &Upload,
    adapter: &mut EditSessionAdapter<S>,
    policy: &ExportPolicy,
    format: ExportFormat,
) -> Result<PassOutcome> {
    let source = loader.load_file(&upload.file_name, &upload.bytes)?;
    info!(
        file = %upload.file_name,
        rows = source.row_count(),
        columns = source.column_count(),
        "loaded upload"
    );

    let (tables, transcript) = adapter.edit(&source)?;
    let download = Download::prepare(&tables, policy, format)?;

    Ok(PassOutcome {
        source,
        tables,
        transcript,
        download,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TableError;
    use crate::loader::TableLoader;
    use crate::model::CellValue;
    use crate::session::{PassthroughSurface, SurfaceOutput, SurfaceSheet};

    fn passthrough() -> EditSessionAdapter<PassthroughSurface> {
        EditSessionAdapter::new(PassthroughSurface::new())
    }

    #[test]
    fn test_unedited_pass_round_trips() {
        let loader = CachedLoader::new(TableLoader::new());
        let upload = Upload::new("data.csv", b"x,y\n1,2\n3,4\n".to_vec());

        let outcome = run_pass(
            &loader,
            &upload,
            &mut passthrough(),
            &ExportPolicy::First,
            ExportFormat::Csv,
        )
        .unwrap();

        assert_eq!(outcome.tables.len(), 1);
        assert!(outcome.transcript.is_empty());
        let download = outcome.download.unwrap();
        assert_eq!(download.table_name, "df1");
        assert_eq!(download.bytes, b"x,y\n1,2\n3,4\n");
    }

    #[test]
    fn test_rerun_reuses_loaded_table() {
        let loader = CachedLoader::new(TableLoader::new());
        let upload = Upload::new("data.csv", b"a\n1\n".to_vec());
        let mut adapter = passthrough();

        let first = run_pass(&loader, &upload, &mut adapter, &ExportPolicy::First, ExportFormat::Csv)
            .unwrap();
        let second = run_pass(&loader, &upload, &mut adapter, &ExportPolicy::First, ExportFormat::Csv)
            .unwrap();

        assert!(Arc::ptr_eq(&first.source, &second.source));
        assert_eq!(loader.stats().hits, 1);
    }

    #[test]
    fn test_unsupported_upload() {
        let loader = CachedLoader::new(TableLoader::new());
        let upload = Upload::new("notes.txt", b"hello".to_vec());
        let err = run_pass(
            &loader,
            &upload,
            &mut passthrough(),
            &ExportPolicy::First,
            ExportFormat::Csv,
        )
        .unwrap_err();
        assert!(matches!(err, TableError::UnsupportedFormat { .. }));
    }

    /// Splits the input into two named tables
    struct SplittingSurface;

    impl EditSurface for SplittingSurface {
        fn name(&self) -> &str {
            "splitting"
        }

        fn render(&mut self, input: &Table) -> Result<SurfaceOutput> {
            let summary = Table::from_rows(
                vec!["rows"],
                vec![vec![CellValue::Int(input.row_count() as i64)]],
            )
            .unwrap();
            Ok(SurfaceOutput {
                sheets: vec![
                    SurfaceSheet::from_table("A", input),
                    SurfaceSheet::from_table("B", &summary),
                ],
                transcript: "B = len(A)".to_string(),
            })
        }
    }

    #[test]
    fn test_policy_chooses_exported_table() {
        let loader = CachedLoader::new(TableLoader::new());
        let upload = Upload::new("data.csv", b"x\n1\n2\n".to_vec());
        let mut adapter = EditSessionAdapter::new(SplittingSurface);

        let first = run_pass(&loader, &upload, &mut adapter, &ExportPolicy::First, ExportFormat::Csv)
            .unwrap();
        assert_eq!(first.download.unwrap().bytes, b"x\n1\n2\n");
        assert_eq!(first.transcript.as_str(), "B = len(A)");

        let named = run_pass(
            &loader,
            &upload,
            &mut adapter,
            &ExportPolicy::Named("B".into()),
            ExportFormat::Csv,
        )
        .unwrap();
        assert_eq!(named.download.unwrap().bytes, b"rows\n2\n");
    }

    #[test]
    fn test_upload_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.CSV");
        fs::write(&path, "a\n1\n").unwrap();

        let upload = Upload::from_path(&path).unwrap();
        assert_eq!(upload.file_name, "report.CSV");
        assert_eq!(upload.bytes, b"a\n1\n");
    }
}
