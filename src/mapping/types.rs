//! Paths, field maps and path maps

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Source field name -> destination field name, in processing order
pub type FieldMap = IndexMap<String, String>;

/// Ordered key sequence from a tree root to a field
///
/// An empty path means the field was not found; it never addresses the root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Path(Vec<String>);

impl Path {
    pub fn new(keys: Vec<String>) -> Self {
        Self(keys)
    }

    pub fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Nesting depth of the addressed field (1 for a top-level key)
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn keys(&self) -> &[String] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    /// Last key and the container steps leading to it
    pub fn split_last(&self) -> Option<(&String, &[String])> {
        self.0.split_last()
    }

    /// Path to the `n`-th step inclusive, used in error reports
    pub fn prefix(&self, n: usize) -> Path {
        Path(self.0[..n.min(self.0.len())].to_vec())
    }

    pub(crate) fn push(&mut self, key: impl Into<String>) {
        self.0.push(key.into());
    }

    pub(crate) fn pop(&mut self) -> Option<String> {
        self.0.pop()
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            write!(f, "<empty>")
        } else {
            write!(f, "{}", self.0.join("."))
        }
    }
}

impl<const N: usize> From<[&str; N]> for Path {
    fn from(keys: [&str; N]) -> Self {
        Self(keys.iter().map(|k| k.to_string()).collect())
    }
}

impl From<Vec<String>> for Path {
    fn from(keys: Vec<String>) -> Self {
        Self(keys)
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// One resolved field-map entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathMapEntry {
    /// Field name in the source schema
    pub source_field: String,
    /// Field name in the destination schema
    pub destination_field: String,
    /// Resolved path in the source schema
    pub source_path: Path,
    /// Resolved path in the destination schema
    pub destination_path: Path,
}

impl PathMapEntry {
    pub fn new(
        source_field: impl Into<String>,
        destination_field: impl Into<String>,
        source_path: Path,
        destination_path: Path,
    ) -> Self {
        Self {
            source_field: source_field.into(),
            destination_field: destination_field.into(),
            source_path,
            destination_path,
        }
    }
}

/// Source path -> destination path, one entry per field-map entry
///
/// Built once from a field map and reused read-only for every record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathMap {
    entries: Vec<PathMapEntry>,
}

impl PathMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, entry: PathMapEntry) {
        self.entries.push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in field-map order
    pub fn iter(&self) -> std::slice::Iter<'_, PathMapEntry> {
        self.entries.iter()
    }

    /// `(source path, destination path)` pairs in field-map order
    pub fn pairs(&self) -> impl Iterator<Item = (&Path, &Path)> + '_ {
        self.entries
            .iter()
            .map(|e| (&e.source_path, &e.destination_path))
    }

    /// Destination path for a source path, if mapped
    pub fn destination_for(&self, source: &Path) -> Option<&Path> {
        self.entries
            .iter()
            .find(|e| &e.source_path == source)
            .map(|e| &e.destination_path)
    }
}

impl<'a> IntoIterator for &'a PathMap {
    type Item = &'a PathMapEntry;
    type IntoIter = std::slice::Iter<'a, PathMapEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
