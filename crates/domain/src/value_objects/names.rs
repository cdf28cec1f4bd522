//! Validated name newtypes for domain entities
//!
//! These newtypes ensure that names are valid by construction:
//! - Non-empty
//! - Within length limits
//! - Trimmed of leading/trailing whitespace

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DomainError;

/// Maximum length for name fields (display and localized character names)
const MAX_NAME_LENGTH: usize = 200;

/// Maximum length for a string identifier
const MAX_STRING_ID_LENGTH: usize = 64;

// ============================================================================
// CharacterName
// ============================================================================

/// A validated character name (non-empty, <=200 chars, trimmed)
///
/// Used for both the display name and the localized name of a character.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CharacterName(String);

impl CharacterName {
    /// Create a new validated character name.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if:
    /// - The name is empty after trimming
    /// - The name exceeds 200 characters after trimming
    pub fn new(name: impl Into<String>) -> Result<Self, DomainError> {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(DomainError::validation("Character name cannot be empty"));
        }
        if trimmed.chars().count() > MAX_NAME_LENGTH {
            return Err(DomainError::validation(format!(
                "Character name cannot exceed {} characters",
                MAX_NAME_LENGTH
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Returns the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-insensitive comparison against a raw name.
    pub fn matches_ignore_case(&self, other: &str) -> bool {
        self.0.to_lowercase() == other.trim().to_lowercase()
    }
}

impl fmt::Display for CharacterName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for CharacterName {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<CharacterName> for String {
    fn from(name: CharacterName) -> String {
        name.0
    }
}

// ============================================================================
// StringId
// ============================================================================

/// A character's stable string identifier.
///
/// Embedded literally into generated script text as `[@id]`, so the format is
/// restricted: lower-case ASCII letters, digits and `_`, starting with a letter.
///
/// # Example
///
/// ```
/// use scenescript_domain::value_objects::StringId;
///
/// let id = StringId::new("  Sam_01 ").unwrap();
/// assert_eq!(id.as_str(), "sam_01");
/// assert_eq!(id.converter_name(), "[@sam_01]");
/// assert!(StringId::new("1sam").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StringId(String);

impl StringId {
    /// Create a validated identifier. Input is trimmed and lower-cased.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidId` if the id is empty, too long, contains
    /// characters other than ASCII letters, digits and `_`, or does not start
    /// with a letter.
    pub fn new(id: impl Into<String>) -> Result<Self, DomainError> {
        let id = id.into();
        let id = id.trim().to_lowercase();
        if id.is_empty() {
            return Err(DomainError::invalid_id("String_ID cannot be empty"));
        }
        if id.len() > MAX_STRING_ID_LENGTH {
            return Err(DomainError::invalid_id(format!(
                "String_ID cannot exceed {} characters",
                MAX_STRING_ID_LENGTH
            )));
        }
        if !id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(DomainError::invalid_id(
                "String_ID may only contain letters, digits and underscores",
            ));
        }
        if !id.starts_with(|c: char| c.is_ascii_alphabetic()) {
            return Err(DomainError::invalid_id("String_ID must start with a letter"));
        }
        Ok(Self(id))
    }

    /// Derive an identifier from a display name.
    ///
    /// Everything other than ASCII letters, digits and `_` is dropped, then the
    /// rest is lower-cased. `"Sam Porter"` becomes `"samporter"`.
    pub fn derive_from_name(name: &str) -> Result<Self, DomainError> {
        let derived: String = name
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
            .collect();
        Self::new(derived).map_err(|_| {
            DomainError::invalid_id(format!(
                "cannot derive a String_ID from '{}'; supply one explicitly",
                name
            ))
        })
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The `[@id]` cross-reference token used in generated script text.
    pub fn converter_name(&self) -> String {
        format!("[@{}]", self.0)
    }

    /// Append a numeric suffix (`sam` -> `sam_2`), used to break ties when
    /// auto-generating identifiers.
    pub fn with_suffix(&self, n: u32) -> Self {
        Self(format!("{}_{}", self.0, n))
    }
}

impl fmt::Display for StringId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for StringId {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<StringId> for String {
    fn from(id: StringId) -> String {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn character_name_is_trimmed() {
        let name = CharacterName::new("  샘  ").unwrap();
        assert_eq!(name.as_str(), "샘");
    }

    #[test]
    fn character_name_rejects_blank() {
        assert!(CharacterName::new("   ").is_err());
    }

    #[test]
    fn character_name_length_counts_chars_not_bytes() {
        let long_korean = "가".repeat(MAX_NAME_LENGTH);
        assert!(CharacterName::new(long_korean).is_ok());
        assert!(CharacterName::new("a".repeat(MAX_NAME_LENGTH + 1)).is_err());
    }

    #[test]
    fn character_name_case_insensitive_match() {
        let name = CharacterName::new("Sam").unwrap();
        assert!(name.matches_ignore_case("SAM"));
        assert!(name.matches_ignore_case(" sam "));
        assert!(!name.matches_ignore_case("samuel"));
    }

    #[test]
    fn string_id_is_lowercased() {
        assert_eq!(StringId::new("Avin").unwrap().as_str(), "avin");
    }

    #[test]
    fn string_id_rejects_invalid_characters() {
        let err = StringId::new("sam-01").unwrap_err();
        assert!(matches!(err, DomainError::InvalidId(_)));
        assert!(StringId::new("샘").is_err());
        assert!(StringId::new("_sam").is_err());
        assert!(StringId::new("").is_err());
    }

    #[test]
    fn string_id_derived_from_name() {
        let id = StringId::derive_from_name("Sam Porter!").unwrap();
        assert_eq!(id.as_str(), "samporter");
    }

    #[test]
    fn string_id_cannot_be_derived_from_non_ascii_name() {
        let err = StringId::derive_from_name("샘").unwrap_err();
        assert!(err.to_string().contains("supply one explicitly"));
    }

    #[test]
    fn string_id_suffix() {
        let id = StringId::new("sam").unwrap();
        assert_eq!(id.with_suffix(2).as_str(), "sam_2");
    }

    #[test]
    fn string_id_serde_validates() {
        let parsed: Result<StringId, _> = serde_json::from_str("\"9lives\"");
        assert!(parsed.is_err());
        let parsed: StringId = serde_json::from_str("\"sam\"").unwrap();
        assert_eq!(parsed.as_str(), "sam");
    }
}
