//! Edit sessions: hand a table to an editing surface and collect its output
//!
//! The surface itself is opaque. [`EditSessionAdapter`] only marshals the
//! input table into the surface and validates what comes back into a
//! [`NamedTableSet`] plus [`Transcript`].

mod external;
mod passthrough;
mod transcript;

use tracing::{info, warn};

use crate::error::{Result, TableError};
use crate::model::{CellValue, NamedTableSet, Table, Transcript};

pub use external::ExternalEditorSurface;
pub use passthrough::PassthroughSurface;
pub use transcript::{describe_changes, TableChange};

/// Name given to the edited table when a surface has nothing better
pub const DEFAULT_TABLE_NAME: &str = "df1";

/// One table as handed back by a surface, before validation
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceSheet {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl SurfaceSheet {
    /// Flatten a table into a sheet
    pub fn from_table(name: impl Into<String>, table: &Table) -> Self {
        Self {
            name: name.into(),
            headers: table.column_names().map(str::to_string).collect(),
            rows: table.rows().iter().map(|r| r.cells.clone()).collect(),
        }
    }
}

/// Everything a surface produced for one pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SurfaceOutput {
    pub sheets: Vec<SurfaceSheet>,
    pub transcript: String,
}

/// An interactive editing surface.
///
/// `render` blocks until the user's session for this pass has produced
/// output, which may simply be the unedited input.
pub trait EditSurface {
    /// Short name used in logs and error messages
    fn name(&self) -> &str;

    fn render(&mut self, input: &Table) -> Result<SurfaceOutput>;
}

impl<S: EditSurface + ?Sized> EditSurface for Box<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn render(&mut self, input: &Table) -> Result<SurfaceOutput> {
        (**self).render(input)
    }
}

/// Boundary between the host and an editing surface
pub struct EditSessionAdapter<S> {
    surface: S,
}

impl<S: EditSurface> EditSessionAdapter<S> {
    pub fn new(surface: S) -> Self {
        Self { surface }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Run one edit pass over `table`.
    ///
    /// Any failure, including malformed surface output, is reported as
    /// [`TableError::EditSurfaceError`]. There are no retries.
    pub fn edit(&mut self, table: &Table) -> Result<(NamedTableSet, Transcript)> {
        let surface_name = self.surface.name().to_string();

        let output = self.surface.render(table).map_err(|e| {
            warn!(surface = %surface_name, error = %e, "edit surface failed");
            match e {
                e @ TableError::EditSurfaceError { .. } => e,
                other => TableError::surface_with_source(
                    surface_name.as_str(),
                    "surface returned an error",
                    other,
                ),
            }
        })?;

        let tables = unmarshal(&surface_name, output.sheets)?;
        info!(surface = %surface_name, tables = tables.len(), "edit session finished");

        Ok((tables, Transcript::new(output.transcript)))
    }
}

/// Validate surface sheets into a table set
fn unmarshal(surface: &str, sheets: Vec<SurfaceSheet>) -> Result<NamedTableSet> {
    let mut tables = NamedTableSet::new();

    for sheet in sheets {
        if tables.contains(&sheet.name) {
            return Err(TableError::surface(
                surface,
                format!("table '{}' returned more than once", sheet.name),
            ));
        }

        let table = Table::from_rows(sheet.headers, sheet.rows).map_err(|e| {
            TableError::surface_with_source(
                surface,
                format!("table '{}' is malformed", sheet.name),
                e,
            )
        })?;
        tables.insert(sheet.name, table);
    }

    Ok(tables)
}
