//! tabedit - Load, edit and re-export tabular data

use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};
use tracing_subscriber::EnvFilter;

use tabedit::config::{Config, ReportFormat, DEFAULT_PREVIEW_ROWS};
use tabedit::export::{ExportFormat, ExportPolicy, DOWNLOAD_FILE_NAME};
use tabedit::loader::global_loader;
use tabedit::output::render_to_stdout;
use tabedit::pipeline::{run_pass, Upload};
use tabedit::session::{EditSessionAdapter, DEFAULT_TABLE_NAME};
use tabedit::TableError;

/// Load a CSV or Excel file, edit it, and save the result as CSV
#[derive(Parser, Debug)]
#[command(name = "tabedit")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// File to load (.csv, .xls or .xlsx)
    file: PathBuf,

    /// Command that edits the table; it receives the path of a CSV file
    #[arg(long, env = "TABEDIT_EDITOR")]
    editor: Option<String>,

    /// Name given to the table handed to the editor
    #[arg(long, default_value = DEFAULT_TABLE_NAME)]
    table_name: String,

    /// Where the edited table is saved
    #[arg(short, long, default_value = DOWNLOAD_FILE_NAME)]
    output: PathBuf,

    /// Download format
    #[arg(long, default_value = "csv")]
    format: String,

    /// Export this table instead of the first one the editor returns
    #[arg(long)]
    select: Option<ExportPolicy>,

    /// Print a JSON report instead of the terminal view
    #[arg(long)]
    json: bool,

    /// Print the JSON report on one line
    #[arg(long, requires = "json")]
    compact: bool,

    /// Rows of each table shown in the terminal view
    #[arg(long, default_value_t = DEFAULT_PREVIEW_ROWS)]
    max_rows: usize,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report_error(&e);
            ExitCode::from(exit_code(&e))
        }
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let format: ExportFormat = cli.format.parse()?;
    let mut config = Config::new(cli.file)
        .with_table_name(cli.table_name)
        .with_export_format(format)
        .with_output_path(cli.output)
        .with_preview_rows(cli.max_rows)
        .with_compact_json(cli.compact);
    if let Some(editor) = cli.editor {
        config = config.with_editor_command(editor);
    }
    if let Some(policy) = cli.select {
        config = config.with_export_policy(policy);
    }
    if cli.json {
        config = config.with_report_format(ReportFormat::Json);
    }

    let upload = Upload::from_path(&config.input_file)
        .with_context(|| format!("Failed to read {}", config.input_file.display()))?;

    let mut adapter = EditSessionAdapter::new(config.surface());
    let outcome = run_pass(
        global_loader(),
        &upload,
        &mut adapter,
        &config.export_policy,
        config.export_format,
    )?;

    render_to_stdout(&outcome, &upload.file_name, &config)?;

    if let Some(download) = &outcome.download {
        fs::write(&config.output_path, &download.bytes)
            .with_context(|| format!("Failed to write {}", config.output_path.display()))?;
        if config.report_format == ReportFormat::Terminal {
            println!("Saved {}", config.output_path.display());
        }
    }

    Ok(())
}

fn exit_code(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<TableError>() {
        Some(e) if e.is_user_correctable() => 2,
        Some(TableError::EditSurfaceError { .. }) => 3,
        _ => 1,
    }
}

fn report_error(err: &anyhow::Error) {
    let mut stderr = StandardStream::stderr(ColorChoice::Auto);
    let _ = stderr.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true));
    let _ = write!(stderr, "An error occurred while processing the file: {:#}", err);
    let _ = stderr.reset();
    let _ = writeln!(stderr);
}
