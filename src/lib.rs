//! tabedit - Load, edit and re-export tabular data
//!
//! A pass takes an uploaded CSV or Excel file, normalizes it into a
//! [`Table`], hands it to an editing surface, and serializes the edited
//! result back to CSV for download.

pub mod config;
pub mod error;
pub mod export;
pub mod loader;
pub mod model;
pub mod output;
pub mod pipeline;
pub mod session;

pub use config::Config;
pub use error::{Result, TableError};
pub use export::{Download, ExportFormat, ExportPolicy, TableExporter};
pub use loader::{load_cached, CachedLoader, TableLoader};
pub use model::{NamedTableSet, Table, Transcript};
pub use pipeline::{run_pass, PassOutcome, Upload};
pub use session::{EditSessionAdapter, EditSurface};
