//! Expression label mapping
//!
//! Maps the emotion labels writers put in the sheet's expression column
//! (e.g. "화남") to the path-safe suffix token used in portrait file names
//! (e.g. "Angry").

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Suffix used when an expression label is empty or unmapped
pub const DEFAULT_EXPRESSION_SUFFIX: &str = "Default";

/// Label -> suffix mapping for portrait expressions
///
/// # Example
/// ```
/// use scenescript_domain::ExpressionMap;
///
/// let map = ExpressionMap::new()
///     .with_mapping("화남", "Angry")
///     .with_mapping("기쁨", "Happy");
///
/// assert_eq!(map.suffix_for("화남"), "Angry");
/// assert_eq!(map.suffix_for("놀람"), "Default");
/// assert_eq!(map.suffix_for(""), "Default");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpressionMap {
    mappings: BTreeMap<String, String>,
}

impl Default for ExpressionMap {
    fn default() -> Self {
        Self::standard()
    }
}

impl ExpressionMap {
    /// Create an empty map (use with builder methods)
    pub fn new() -> Self {
        Self {
            mappings: BTreeMap::new(),
        }
    }

    /// The label set shipped with the tool
    pub fn standard() -> Self {
        Self::new()
            .with_mapping("화남", "Angry")
            .with_mapping("슬픔", "Sad")
            .with_mapping("기쁨", "Happy")
            .with_mapping("고통", "Pain")
            .with_mapping("부끄", "Shy")
    }

    /// Builder: add a mapping
    pub fn with_mapping(mut self, label: impl Into<String>, suffix: impl Into<String>) -> Self {
        self.insert(label, suffix);
        self
    }

    /// Insert or replace a mapping. Blank labels are ignored.
    pub fn insert(&mut self, label: impl Into<String>, suffix: impl Into<String>) {
        let label = label.into().trim().to_string();
        if label.is_empty() {
            return;
        }
        self.mappings.insert(label, suffix.into().trim().to_string());
    }

    /// Remove a mapping, returning the old suffix
    pub fn remove(&mut self, label: &str) -> Option<String> {
        self.mappings.remove(label.trim())
    }

    /// Exact lookup of a label
    pub fn get(&self, label: &str) -> Option<&str> {
        self.mappings.get(label.trim()).map(String::as_str)
    }

    /// Suffix for a label, falling back to [`DEFAULT_EXPRESSION_SUFFIX`]
    pub fn suffix_for(&self, label: &str) -> &str {
        self.get(label)
            .filter(|suffix| !suffix.is_empty())
            .unwrap_or(DEFAULT_EXPRESSION_SUFFIX)
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.mappings.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl FromIterator<(String, String)> for ExpressionMap {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        let mut map = Self::new();
        for (label, suffix) in iter {
            map.insert(label, suffix);
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_map() {
        let map = ExpressionMap::standard();
        assert_eq!(map.len(), 5);
        assert_eq!(map.suffix_for("화남"), "Angry");
        assert_eq!(map.suffix_for("부끄"), "Shy");
    }

    #[test]
    fn test_unmapped_and_empty_labels_fall_back() {
        let map = ExpressionMap::standard();
        assert_eq!(map.suffix_for("unknown"), DEFAULT_EXPRESSION_SUFFIX);
        assert_eq!(map.suffix_for(""), DEFAULT_EXPRESSION_SUFFIX);
        assert_eq!(map.suffix_for("   "), DEFAULT_EXPRESSION_SUFFIX);
    }

    #[test]
    fn test_labels_are_trimmed() {
        let map = ExpressionMap::new().with_mapping(" 슬픔 ", " Sad ");
        assert_eq!(map.get("슬픔"), Some("Sad"));
        assert_eq!(map.suffix_for(" 슬픔"), "Sad");
    }

    #[test]
    fn test_blank_label_ignored() {
        let mut map = ExpressionMap::new();
        map.insert("  ", "Nothing");
        assert!(map.is_empty());
    }

    #[test]
    fn test_insert_replaces_existing() {
        let mut map = ExpressionMap::standard();
        map.insert("화남", "Furious");
        assert_eq!(map.suffix_for("화남"), "Furious");
        assert_eq!(map.len(), 5);
    }

    #[test]
    fn test_serializes_as_plain_object() {
        let map = ExpressionMap::new().with_mapping("기쁨", "Happy");
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"기쁨":"Happy"}"#);
    }
}
