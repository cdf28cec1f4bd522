//! Scenario rows
//!
//! A row is one line of scene data read from a sheet. Column names are
//! normalized once, when the row is built, so every later lookup (role fields,
//! template placeholders) goes through [`normalize_column`] and nothing else.

use serde::{Deserialize, Serialize};

/// Role column names expected by the conversion engine.
pub mod columns {
    pub const CHARACTER: &str = "character";
    pub const DIALOGUE: &str = "dialogue";
    pub const DIRECTIVE: &str = "directive";
    pub const STRING_ID: &str = "string_id";
    pub const EXPRESSION: &str = "expression";
    pub const SOUND_ADDRESS: &str = "sound_address";
    pub const SOUND_FILE: &str = "sound_file";
    pub const SCENE: &str = "scene";
}

/// Normalize a column name: trimmed and lower-cased.
///
/// # Example
/// ```
/// use scenescript_domain::value_objects::normalize_column;
///
/// assert_eq!(normalize_column("  String_ID "), "string_id");
/// assert_eq!(normalize_column("사운드 파일"), "사운드 파일");
/// ```
pub fn normalize_column(name: &str) -> String {
    name.trim().to_lowercase()
}

/// One row of scenario data with normalized column names.
///
/// Insertion order is preserved. When the same normalized column appears
/// twice, the first value wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    cells: Vec<(String, String)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a row from raw `(column, value)` pairs.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut row = Self::new();
        for (column, value) in pairs {
            row.insert(column.as_ref(), value);
        }
        row
    }

    /// Builder: add a cell
    pub fn with(mut self, column: &str, value: impl Into<String>) -> Self {
        self.insert(column, value);
        self
    }

    fn insert(&mut self, column: &str, value: impl Into<String>) {
        let column = normalize_column(column);
        if column.is_empty() || self.contains(&column) {
            return;
        }
        self.cells.push((column, value.into()));
    }

    /// Value of a column; missing columns read as `""`.
    pub fn get(&self, column: &str) -> &str {
        self.lookup(column).unwrap_or("")
    }

    /// Value of a column, or `None` when the column is absent.
    ///
    /// An empty cell is still `Some("")`: the column exists.
    pub fn lookup(&self, column: &str) -> Option<&str> {
        let column = normalize_column(column);
        self.cells
            .iter()
            .find(|(name, _)| *name == column)
            .map(|(_, value)| value.as_str())
    }

    pub fn contains(&self, column: &str) -> bool {
        self.lookup(column).is_some()
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.cells.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    // =========================================================================
    // Role accessors
    // =========================================================================

    pub fn character(&self) -> &str {
        self.get(columns::CHARACTER)
    }

    pub fn dialogue(&self) -> &str {
        self.get(columns::DIALOGUE)
    }

    /// Directive with surrounding whitespace removed
    pub fn directive(&self) -> &str {
        self.get(columns::DIRECTIVE).trim()
    }

    pub fn string_id(&self) -> &str {
        self.get(columns::STRING_ID)
    }

    pub fn expression(&self) -> &str {
        self.get(columns::EXPRESSION)
    }

    pub fn sound_address(&self) -> &str {
        self.get(columns::SOUND_ADDRESS)
    }

    pub fn sound_file(&self) -> &str {
        self.get(columns::SOUND_FILE)
    }

    /// Scene number, when the scene cell holds an integer
    pub fn scene_number(&self) -> Option<i64> {
        let raw = self.get(columns::SCENE).trim();
        raw.parse::<i64>()
            .ok()
            .or_else(|| raw.parse::<f64>().ok().filter(|f| f.fract() == 0.0).map(|f| f as i64))
    }
}
