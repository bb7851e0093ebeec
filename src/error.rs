//! Error types shared by the loader, exporter and edit session

use thiserror::Error;

/// Boxed cause carried by parse and surface errors
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result alias for tabedit operations
pub type Result<T> = std::result::Result<T, TableError>;

/// Errors produced while loading, editing or exporting a table
#[derive(Debug, Error)]
pub enum TableError {
    /// File extension or export format is not one we handle
    #[error("Unsupported format: {extension}")]
    UnsupportedFormat { extension: String },

    /// Content does not match its declared format
    #[error("Failed to parse {format} data: {message}")]
    ParseError {
        format: &'static str,
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    /// The editing surface failed to produce output
    #[error("Edit surface '{surface}' failed: {message}")]
    EditSurfaceError {
        surface: String,
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl TableError {
    pub fn unsupported(extension: impl Into<String>) -> Self {
        TableError::UnsupportedFormat {
            extension: extension.into(),
        }
    }

    pub fn parse(format: &'static str, message: impl Into<String>) -> Self {
        TableError::ParseError {
            format,
            message: message.into(),
            source: None,
        }
    }

    pub fn parse_with_source(
        format: &'static str,
        message: impl Into<String>,
        source: impl Into<BoxError>,
    ) -> Self {
        TableError::ParseError {
            format,
            message: message.into(),
            source: Some(source.into()),
        }
    }

    pub fn surface(surface: impl Into<String>, message: impl Into<String>) -> Self {
        TableError::EditSurfaceError {
            surface: surface.into(),
            message: message.into(),
            source: None,
        }
    }

    pub fn surface_with_source(
        surface: impl Into<String>,
        message: impl Into<String>,
        source: impl Into<BoxError>,
    ) -> Self {
        TableError::EditSurfaceError {
            surface: surface.into(),
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Whether the user can fix this by supplying a different file or format
    pub fn is_user_correctable(&self) -> bool {
        matches!(
            self,
            TableError::UnsupportedFormat { .. } | TableError::ParseError { .. }
        )
    }
}
