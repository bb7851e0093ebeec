//! Column metadata and type information

use serde::{Deserialize, Serialize};

/// Inferred cell type for a column
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellType {
    #[default]
    Null,
    Bool,
    Int,
    Float,
    String,
    Date,
    DateTime,
    Mixed,
}

impl CellType {
    /// Widen the type to accommodate another type
    pub fn widen(self, other: CellType) -> CellType {
        if self == other {
            return self;
        }

        match (self, other) {
            (CellType::Null, t) | (t, CellType::Null) => t,
            (CellType::Int, CellType::Float) | (CellType::Float, CellType::Int) => CellType::Float,
            (CellType::Date, CellType::DateTime) | (CellType::DateTime, CellType::Date) => {
                CellType::DateTime
            }
            _ => CellType::Mixed,
        }
    }
}

impl std::fmt::Display for CellType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CellType::Null => write!(f, "null"),
            CellType::Bool => write!(f, "bool"),
            CellType::Int => write!(f, "int"),
            CellType::Float => write!(f, "float"),
            CellType::String => write!(f, "string"),
            CellType::Date => write!(f, "date"),
            CellType::DateTime => write!(f, "datetime"),
            CellType::Mixed => write!(f, "mixed"),
        }
    }
}

/// Column metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    /// Column name (from header)
    pub name: String,
    /// Column index (0-based position)
    pub index: usize,
    /// Inferred type from data
    pub inferred_type: CellType,
}

impl Column {
    /// Create a new column with name and index
    pub fn new(name: impl Into<String>, index: usize) -> Self {
        Self {
            name: name.into(),
            index,
            inferred_type: CellType::Null,
        }
    }
}

/// Make header names usable as column names.
///
/// Empty names become `Unnamed: {index}`; repeated names get `.1`, `.2`, ...
/// appended to each later occurrence until they no longer collide.
pub fn normalize_header_names<I, S>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let raw: Vec<String> = names
        .into_iter()
        .enumerate()
        .map(|(i, name)| {
            let name = name.as_ref();
            if name.trim().is_empty() {
                format!("Unnamed: {}", i)
            } else {
                name.to_string()
            }
        })
        .collect();

    let mut seen: rustc_hash::FxHashSet<String> = raw.iter().cloned().collect();
    let mut taken: rustc_hash::FxHashSet<String> = rustc_hash::FxHashSet::default();
    let mut out = Vec::with_capacity(raw.len());

    for name in raw {
        if taken.insert(name.clone()) {
            out.push(name);
            continue;
        }

        let mut suffix = 1;
        let unique = loop {
            let candidate = format!("{}.{}", name, suffix);
            if !seen.contains(&candidate) && !taken.contains(&candidate) {
                break candidate;
            }
            suffix += 1;
        };
        seen.insert(unique.clone());
        taken.insert(unique.clone());
        out.push(unique);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_widen() {
        assert_eq!(CellType::Null.widen(CellType::Int), CellType::Int);
        assert_eq!(CellType::Int.widen(CellType::Float), CellType::Float);
        assert_eq!(CellType::Date.widen(CellType::DateTime), CellType::DateTime);
        assert_eq!(CellType::Int.widen(CellType::String), CellType::Mixed);
    }

    #[test]
    fn test_normalize_header_names() {
        assert_eq!(normalize_header_names(["a", "b"]), vec!["a", "b"]);
        assert_eq!(normalize_header_names(["a", "", "c"]), vec!["a", "Unnamed: 1", "c"]);
        assert_eq!(
            normalize_header_names(["a", "a", "a"]),
            vec!["a", "a.1", "a.2"]
        );
        // An existing "a.1" forces the duplicate to skip ahead
        assert_eq!(
            normalize_header_names(["a", "a.1", "a"]),
            vec!["a", "a.1", "a.2"]
        );
    }
}
