//! Surface that returns its input unedited

use crate::error::Result;
use crate::model::Table;

use super::{EditSurface, SurfaceOutput, SurfaceSheet, DEFAULT_TABLE_NAME};

/// Hands the input straight back, as a widget does on its first render
pub struct PassthroughSurface {
    table_name: String,
}

impl PassthroughSurface {
    pub fn new() -> Self {
        Self {
            table_name: DEFAULT_TABLE_NAME.to_string(),
        }
    }

    pub fn with_table_name(mut self, name: impl Into<String>) -> Self {
        self.table_name = name.into();
        self
    }
}

impl Default for PassthroughSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl EditSurface for PassthroughSurface {
    fn name(&self) -> &str {
        "passthrough"
    }

    fn render(&mut self, input: &Table) -> Result<SurfaceOutput> {
        Ok(SurfaceOutput {
            sheets: vec![SurfaceSheet::from_table(self.table_name.as_str(), input)],
            transcript: String::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CellValue;

    #[test]
    fn test_returns_input_under_configured_name() {
        let table = Table::from_rows(
            vec!["a", "b"],
            vec![vec![CellValue::Int(1), CellValue::from("x")]],
        )
        .unwrap();

        let output = PassthroughSurface::new()
            .with_table_name("orders")
            .render(&table)
            .unwrap();

        assert_eq!(output.sheets, vec![SurfaceSheet::from_table("orders", &table)]);
        assert!(output.transcript.is_empty());
    }
}
