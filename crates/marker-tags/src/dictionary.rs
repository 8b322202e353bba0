//! Sorted tag dictionary backing autocomplete.

use marker_domain::Tag;

use crate::name::{compare_names, dedupe_names, fold_name, names_equal};

/// Every known tag name, de-duplicated and in display order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagDictionary {
    names: Vec<String>,
}

impl TagDictionary {
    /// Build a dictionary from raw names.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut names = dedupe_names(names);
        names.sort_by(|a, b| compare_names(a, b));
        Self { names }
    }

    /// Build a dictionary from the tag collection of a snapshot.
    pub fn from_tags(tags: &[Tag]) -> Self {
        Self::from_names(tags.iter().map(|t| t.name.as_str()))
    }

    /// All names in display order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Whether a name is known (case-insensitive).
    pub fn contains(&self, name: &str) -> bool {
        self.canonical(name).is_some()
    }

    /// The stored spelling of a name, if known.
    pub fn canonical(&self, name: &str) -> Option<&str> {
        self.names
            .iter()
            .find(|n| names_equal(n, name))
            .map(|n| n.as_str())
    }

    /// Names starting with `prefix` (case-insensitive), in display order.
    ///
    /// A blank prefix yields nothing so the dropdown stays closed.
    pub fn complete(&self, prefix: &str, limit: usize) -> Vec<&str> {
        let prefix = fold_name(prefix);
        if prefix.is_empty() {
            return Vec::new();
        }
        self.names
            .iter()
            .filter(|n| n.to_lowercase().starts_with(&prefix))
            .take(limit)
            .map(|n| n.as_str())
            .collect()
    }
}
