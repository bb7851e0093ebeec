//! Named result tables and the edit transcript

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::table::Table;

/// Tables returned by an edit session, keyed by name in insertion order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NamedTableSet {
    tables: IndexMap<String, Table>,
}

impl NamedTableSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a table, returning the table it replaced.
    ///
    /// Replacing keeps the original position of the name.
    pub fn insert(&mut self, name: impl Into<String>, table: Table) -> Option<Table> {
        self.tables.insert(name.into(), table)
    }

    pub fn get(&self, name: &str) -> Option<&Table> {
        self.tables.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    /// First table in insertion order
    pub fn first(&self) -> Option<(&str, &Table)> {
        self.tables.first().map(|(name, table)| (name.as_str(), table))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Table)> {
        self.tables.iter().map(|(name, table)| (name.as_str(), table))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

/// Opaque description of the edits a surface performed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transcript(String);

impl Transcript {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for Transcript {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CellValue;

    fn single(value: i64) -> Table {
        Table::from_rows(vec!["v"], vec![vec![CellValue::Int(value)]]).unwrap()
    }

    #[test]
    fn test_insertion_order_is_kept() {
        let mut set = NamedTableSet::new();
        set.insert("B", single(2));
        set.insert("A", single(1));
        set.insert("C", single(3));

        assert_eq!(set.names().collect::<Vec<_>>(), vec!["B", "A", "C"]);
        assert_eq!(set.first().map(|(name, _)| name), Some("B"));
    }

    #[test]
    fn test_replace_keeps_position() {
        let mut set = NamedTableSet::new();
        set.insert("A", single(1));
        set.insert("B", single(2));
        let old = set.insert("A", single(9));

        assert_eq!(old, Some(single(1)));
        assert_eq!(set.len(), 2);
        assert_eq!(set.first(), Some(("A", &single(9))));
    }

    #[test]
    fn test_transcript_passes_text_through() {
        let text = "df1['x'] = 5\n# anything goes\n";
        let transcript = Transcript::new(text);
        assert_eq!(transcript.as_str(), text);
        assert_eq!(transcript.to_string(), text);
        assert!(Transcript::default().is_empty());
    }
}
