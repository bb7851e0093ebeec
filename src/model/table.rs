//! Table, Row, and Cell data structures

use std::borrow::Cow;

use chrono::{NaiveDate, NaiveDateTime};
use rustc_hash::FxHashSet;
use thiserror::Error;

use super::schema::{CellType, Column};

/// A cell value with type information
#[derive(Debug, Clone)]
pub enum CellValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(Cow<'static, str>),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

impl PartialEq for CellValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (CellValue::Null, CellValue::Null) => true,
            (CellValue::Bool(a), CellValue::Bool(b)) => a == b,
            (CellValue::Int(a), CellValue::Int(b)) => a == b,
            (CellValue::Float(a), CellValue::Float(b)) => {
                // Handle NaN comparison
                if a.is_nan() && b.is_nan() {
                    true
                } else {
                    a == b
                }
            }
            (CellValue::String(a), CellValue::String(b)) => a == b,
            (CellValue::Date(a), CellValue::Date(b)) => a == b,
            (CellValue::DateTime(a), CellValue::DateTime(b)) => a == b,
            // Cross-type numeric comparison
            (CellValue::Int(a), CellValue::Float(b)) => (*a as f64) == *b,
            (CellValue::Float(a), CellValue::Int(b)) => *a == (*b as f64),
            _ => false,
        }
    }
}

impl CellValue {
    /// Check if the value is null
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// The type this value contributes to column inference
    pub fn cell_type(&self) -> CellType {
        match self {
            CellValue::Null => CellType::Null,
            CellValue::Bool(_) => CellType::Bool,
            CellValue::Int(_) => CellType::Int,
            CellValue::Float(_) => CellType::Float,
            CellValue::String(_) => CellType::String,
            CellValue::Date(_) => CellType::Date,
            CellValue::DateTime(_) => CellType::DateTime,
        }
    }

    /// Convert to a display string
    pub fn display(&self) -> Cow<'_, str> {
        match self {
            CellValue::Null => Cow::Borrowed("NULL"),
            other => other.canonical_text(),
        }
    }

    /// Text written to exported files.
    ///
    /// Nulls and NaN become empty fields, floats always keep a decimal point
    /// (`3.0`) so they read back as floats.
    pub fn canonical_text(&self) -> Cow<'_, str> {
        match self {
            CellValue::Null => Cow::Borrowed(""),
            CellValue::Bool(b) => Cow::Borrowed(if *b { "true" } else { "false" }),
            CellValue::Int(i) => Cow::Owned(i.to_string()),
            CellValue::Float(f) if f.is_nan() => Cow::Borrowed(""),
            CellValue::Float(f) => Cow::Owned(format!("{:?}", f)),
            CellValue::String(s) => Cow::Borrowed(s.as_ref()),
            CellValue::Date(d) => Cow::Owned(d.format("%Y-%m-%d").to_string()),
            CellValue::DateTime(dt) => Cow::Owned(dt.format("%Y-%m-%d %H:%M:%S").to_string()),
        }
    }
}

impl std::fmt::Display for CellValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::String(Cow::Owned(s.to_string()))
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::String(Cow::Owned(s))
    }
}

impl From<i64> for CellValue {
    fn from(i: i64) -> Self {
        CellValue::Int(i)
    }
}

impl From<f64> for CellValue {
    fn from(f: f64) -> Self {
        CellValue::Float(f)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

/// A row in the table
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    /// Cell values in column order
    pub cells: Vec<CellValue>,
}

impl Row {
    pub fn new(cells: Vec<CellValue>) -> Self {
        Self { cells }
    }

    /// Get a cell value by column index
    pub fn get(&self, index: usize) -> Option<&CellValue> {
        self.cells.get(index)
    }
}

/// Reasons a set of columns and rows cannot form a table
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeError {
    #[error("duplicate column name '{0}'")]
    DuplicateColumn(String),

    #[error("row {row} has {found} values, expected {expected}")]
    RowWidth {
        row: usize,
        found: usize,
        expected: usize,
    },
}

/// A table containing columns and rows.
///
/// Column names are unique and every row is exactly as wide as the column
/// list; both are checked when the table is built.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
    rows: Vec<Row>,
}

impl Table {
    /// Build a table from column names and row cells, inferring column types
    pub fn from_rows<S>(names: Vec<S>, rows: Vec<Vec<CellValue>>) -> Result<Self, ShapeError>
    where
        S: Into<String>,
    {
        let columns = names
            .into_iter()
            .enumerate()
            .map(|(i, name)| Column::new(name, i))
            .collect();
        Self::try_new(columns, rows.into_iter().map(Row::new).collect())
    }

    /// Build a table from column definitions and rows
    pub fn try_new(columns: Vec<Column>, rows: Vec<Row>) -> Result<Self, ShapeError> {
        let mut names = FxHashSet::default();
        for col in &columns {
            if !names.insert(col.name.as_str()) {
                return Err(ShapeError::DuplicateColumn(col.name.clone()));
            }
        }

        for (i, row) in rows.iter().enumerate() {
            if row.cells.len() != columns.len() {
                return Err(ShapeError::RowWidth {
                    row: i,
                    found: row.cells.len(),
                    expected: columns.len(),
                });
            }
        }

        let mut table = Self { columns, rows };
        table.reindex_columns();
        table.infer_column_types();
        Ok(table)
    }

    /// Column definitions, in order
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// All rows, in order
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Column names, in order
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// Get column index by name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Get column by name
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Values of one column, top to bottom
    pub fn column_values(&self, name: &str) -> Option<Vec<&CellValue>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().filter_map(|r| r.get(idx)).collect())
    }

    /// Number of rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    fn reindex_columns(&mut self) {
        for (i, col) in self.columns.iter_mut().enumerate() {
            col.index = i;
        }
    }

    /// Infer column types from data
    fn infer_column_types(&mut self) {
        for (col_idx, col) in self.columns.iter_mut().enumerate() {
            col.inferred_type = self
                .rows
                .iter()
                .filter_map(|row| row.get(col_idx))
                .fold(CellType::Null, |acc, cell| acc.widen(cell.cell_type()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rows_infers_types() {
        let table = Table::from_rows(
            vec!["id", "score", "name"],
            vec![
                vec![1i64.into(), 1.5.into(), "a".into()],
                vec![2i64.into(), 2i64.into(), CellValue::Null],
            ],
        )
        .unwrap();

        assert_eq!(table.row_count(), 2);
        assert_eq!(table.column("id").unwrap().inferred_type, CellType::Int);
        assert_eq!(table.column("score").unwrap().inferred_type, CellType::Float);
        assert_eq!(table.column("name").unwrap().inferred_type, CellType::String);
        assert_eq!(
            table.column_values("id").unwrap(),
            vec![&CellValue::Int(1), &CellValue::Int(2)]
        );
    }

    #[test]
    fn test_rejects_duplicate_columns() {
        let err = Table::from_rows(vec!["a", "a"], vec![]).unwrap_err();
        assert_eq!(err, ShapeError::DuplicateColumn("a".into()));
    }

    #[test]
    fn test_rejects_ragged_rows() {
        let err = Table::from_rows(
            vec!["a", "b"],
            vec![vec![1i64.into(), 2i64.into()], vec![3i64.into()]],
        )
        .unwrap_err();
        assert_eq!(
            err,
            ShapeError::RowWidth {
                row: 1,
                found: 1,
                expected: 2
            }
        );
    }

    #[test]
    fn test_canonical_text() {
        assert_eq!(CellValue::Null.canonical_text(), "");
        assert_eq!(CellValue::Bool(true).canonical_text(), "true");
        assert_eq!(CellValue::Int(-7).canonical_text(), "-7");
        assert_eq!(CellValue::Float(3.0).canonical_text(), "3.0");
        assert_eq!(CellValue::Float(0.1).canonical_text(), "0.1");
        assert_eq!(CellValue::Float(f64::NAN).canonical_text(), "");
        assert_eq!(CellValue::from("x y").canonical_text(), "x y");

        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(CellValue::Date(date).canonical_text(), "2024-03-09");
        let dt = date.and_hms_opt(8, 5, 0).unwrap();
        assert_eq!(CellValue::DateTime(dt).canonical_text(), "2024-03-09 08:05:00");
    }

    #[test]
    fn test_display_marks_nulls() {
        assert_eq!(CellValue::Null.to_string(), "NULL");
        assert_eq!(CellValue::Int(4).to_string(), "4");
    }
}
