//! Describe the difference between a table before and after editing

use crate::model::{CellValue, Table};

/// A single observed edit
#[derive(Debug, Clone, PartialEq)]
pub enum TableChange {
    ColumnAdded { name: String, index: usize },
    ColumnRemoved { name: String, index: usize },
    ColumnMoved { name: String, from_index: usize, to_index: usize },
    RowsAppended { from: usize, to: usize },
    RowsRemoved { from: usize, to: usize },
    CellChanged { row: usize, column: String, old_value: CellValue, new_value: CellValue },
}

impl std::fmt::Display for TableChange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TableChange::ColumnAdded { name, index } => {
                write!(f, "add column '{}' at position {}", name, index)
            }
            TableChange::ColumnRemoved { name, index } => {
                write!(f, "remove column '{}' from position {}", name, index)
            }
            TableChange::ColumnMoved {
                name,
                from_index,
                to_index,
            } => write!(f, "move column '{}' from {} to {}", name, from_index, to_index),
            TableChange::RowsAppended { from, to } => {
                write!(f, "append rows {}..{}", from, to)
            }
            TableChange::RowsRemoved { from, to } => {
                write!(f, "remove rows {}..{}", from, to)
            }
            TableChange::CellChanged {
                row,
                column,
                old_value,
                new_value,
            } => write!(
                f,
                "set [{}, '{}']: {} -> {}",
                row, column, old_value, new_value
            ),
        }
    }
}

/// Compare two versions of a table.
///
/// Columns are matched by name and rows by position; cells are compared only
/// where both the column and the row exist in both versions.
pub fn table_changes(before: &Table, after: &Table) -> Vec<TableChange> {
    let mut changes = Vec::new();

    let old_names: Vec<&str> = before.column_names().collect();
    let new_names: Vec<&str> = after.column_names().collect();

    for (index, name) in old_names.iter().enumerate() {
        if !new_names.contains(name) {
            changes.push(TableChange::ColumnRemoved {
                name: name.to_string(),
                index,
            });
        }
    }

    for (index, name) in new_names.iter().enumerate() {
        if !old_names.contains(name) {
            changes.push(TableChange::ColumnAdded {
                name: name.to_string(),
                index,
            });
        }
    }

    for (from_index, name) in old_names.iter().enumerate() {
        if let Some(to_index) = new_names.iter().position(|n| n == name) {
            if from_index != to_index {
                changes.push(TableChange::ColumnMoved {
                    name: name.to_string(),
                    from_index,
                    to_index,
                });
            }
        }
    }

    let (old_rows, new_rows) = (before.row_count(), after.row_count());
    if new_rows > old_rows {
        changes.push(TableChange::RowsAppended {
            from: old_rows,
            to: new_rows,
        });
    } else if new_rows < old_rows {
        changes.push(TableChange::RowsRemoved {
            from: new_rows,
            to: old_rows,
        });
    }

    let shared: Vec<(usize, usize, &str)> = old_names
        .iter()
        .enumerate()
        .filter_map(|(old_idx, name)| {
            new_names
                .iter()
                .position(|n| n == name)
                .map(|new_idx| (old_idx, new_idx, *name))
        })
        .collect();

    for (row, (old_row, new_row)) in before.rows().iter().zip(after.rows()).enumerate() {
        for &(old_idx, new_idx, name) in &shared {
            let old_value = old_row.get(old_idx).cloned().unwrap_or(CellValue::Null);
            let new_value = new_row.get(new_idx).cloned().unwrap_or(CellValue::Null);

            // Int(3) and Float(3.0) compare equal but print differently
            if old_value != new_value || old_value.cell_type() != new_value.cell_type() {
                changes.push(TableChange::CellChanged {
                    row,
                    column: name.to_string(),
                    old_value,
                    new_value,
                });
            }
        }
    }

    changes
}

/// Transcript text for the edits that turned `before` into `after`, one per line
pub fn describe_changes(table_name: &str, before: &Table, after: &Table) -> String {
    table_changes(before, after)
        .iter()
        .map(|change| format!("{}: {}\n", table_name, change))
        .collect()
}
