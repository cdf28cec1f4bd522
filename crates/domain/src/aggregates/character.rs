//! Character aggregate - speakers registered for script conversion
//!
//! # Invariants
//!
//! - `string_id` is fixed at construction. It is embedded into generated
//!   script text as `[@id]`, so the only way to change it is the explicit
//!   migration in [`Character::migrate_string_id`], which the engine pairs with
//!   a rewrite of every stored rule that references the old id.
//! - Names are validated by `CharacterName`.

use serde::{Deserialize, Serialize};

use crate::value_objects::{CharacterName, StringId};

/// Where a character's portrait comes from
///
/// Stored as an optional string: absent means [`PortraitOverride::Derived`],
/// an empty string means [`PortraitOverride::Disabled`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "Option<String>")]
pub enum PortraitOverride {
    /// No override: `{id}/{id}_{Expression}.rux`
    #[default]
    Derived,
    /// Explicit "no portrait"
    Disabled,
    /// Path prefix, e.g. `avin/avin_`; the expression suffix and `.rux` are appended
    Path(String),
}

impl From<Option<String>> for PortraitOverride {
    fn from(value: Option<String>) -> Self {
        match value {
            None => Self::Derived,
            Some(path) if path.trim().is_empty() => Self::Disabled,
            Some(path) => Self::Path(path.trim().to_string()),
        }
    }
}

impl From<PortraitOverride> for Option<String> {
    fn from(value: PortraitOverride) -> Self {
        match value {
            PortraitOverride::Derived => None,
            PortraitOverride::Disabled => Some(String::new()),
            PortraitOverride::Path(path) => Some(path),
        }
    }
}

/// A character that may speak in a scenario sheet
///
/// # Example
///
/// ```
/// use scenescript_domain::aggregates::Character;
/// use scenescript_domain::value_objects::{CharacterName, StringId};
///
/// let sam = Character::new(
///     StringId::new("sam").unwrap(),
///     CharacterName::new("Sam").unwrap(),
///     CharacterName::new("샘").unwrap(),
/// );
///
/// assert_eq!(sam.converter_name(), "[@sam]");
/// assert!(sam.is_named("SAM"));
/// assert!(sam.is_named("샘"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    string_id: StringId,
    name: CharacterName,
    #[serde(rename = "kr")]
    localized_name: CharacterName,
    #[serde(default, rename = "portrait_path")]
    portrait: PortraitOverride,
}

impl Character {
    // =========================================================================
    // Constructor
    // =========================================================================

    pub fn new(string_id: StringId, name: CharacterName, localized_name: CharacterName) -> Self {
        Self {
            string_id,
            name,
            localized_name,
            portrait: PortraitOverride::Derived,
        }
    }

    /// Builder: set the portrait override
    pub fn with_portrait(mut self, portrait: PortraitOverride) -> Self {
        self.portrait = portrait;
        self
    }

    // =========================================================================
    // Accessors (read-only)
    // =========================================================================

    #[inline]
    pub fn string_id(&self) -> &StringId {
        &self.string_id
    }

    /// Display (English) name
    #[inline]
    pub fn name(&self) -> &CharacterName {
        &self.name
    }

    /// Localized (Korean) name, the one writers usually put in the sheet
    #[inline]
    pub fn localized_name(&self) -> &CharacterName {
        &self.localized_name
    }

    #[inline]
    pub fn portrait(&self) -> &PortraitOverride {
        &self.portrait
    }

    /// `[@id]` reference token
    pub fn converter_name(&self) -> String {
        self.string_id.converter_name()
    }

    // =========================================================================
    // Name matching
    // =========================================================================

    /// Exact localized-name match
    pub fn has_localized_name(&self, name: &str) -> bool {
        self.localized_name.as_str() == name.trim()
    }

    /// Case-insensitive display-name match
    pub fn has_display_name(&self, name: &str) -> bool {
        self.name.matches_ignore_case(name)
    }

    /// Whether `name` matches either name of this character, ignoring case
    pub fn is_named(&self, name: &str) -> bool {
        self.name.matches_ignore_case(name) || self.localized_name.matches_ignore_case(name)
    }

    /// Whether two characters would be ambiguous in a sheet: any name of one
    /// equals any name of the other, ignoring case.
    pub fn conflicts_with(&self, other: &Character) -> bool {
        self.is_named(other.name.as_str()) || self.is_named(other.localized_name.as_str())
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    pub fn rename(&mut self, name: CharacterName) {
        self.name = name;
    }

    pub fn set_localized_name(&mut self, localized_name: CharacterName) {
        self.localized_name = localized_name;
    }

    pub fn set_portrait(&mut self, portrait: PortraitOverride) {
        self.portrait = portrait;
    }

    /// Move this character to a new id.
    ///
    /// Only for id migration: callers must also rewrite every rule that
    /// interpolates the old `[@id]`.
    pub fn migrate_string_id(mut self, new_id: StringId) -> Self {
        self.string_id = new_id;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn character(id: &str, name: &str, kr: &str) -> Character {
        Character::new(
            StringId::new(id).unwrap(),
            CharacterName::new(name).unwrap(),
            CharacterName::new(kr).unwrap(),
        )
    }

    #[test]
    fn new_character_has_derived_portrait() {
        let sam = character("sam", "Sam", "샘");
        assert_eq!(sam.portrait(), &PortraitOverride::Derived);
    }

    #[test]
    fn display_name_match_ignores_case_localized_is_exact() {
        let sam = character("sam", "Sam", "샘");
        assert!(sam.has_display_name("sAm"));
        assert!(sam.has_localized_name(" 샘 "));
        assert!(!sam.has_localized_name("Sam"));
    }

    #[test]
    fn conflicts_across_name_fields() {
        let sam = character("sam", "Sam", "샘");
        let other = character("other", "Other", "SAM");
        assert!(sam.conflicts_with(&other));

        let distinct = character("avin", "Avin", "에이빈");
        assert!(!sam.conflicts_with(&distinct));
    }

    #[test]
    fn migrate_string_id_keeps_names() {
        let sam = character("sam", "Sam", "샘").migrate_string_id(StringId::new("samuel").unwrap());
        assert_eq!(sam.string_id().as_str(), "samuel");
        assert_eq!(sam.name().as_str(), "Sam");
    }

    #[test]
    fn portrait_override_serde_distinguishes_absent_and_empty() {
        let derived: Character =
            serde_json::from_str(r#"{"string_id":"sam","name":"Sam","kr":"샘"}"#).unwrap();
        assert_eq!(derived.portrait(), &PortraitOverride::Derived);

        let disabled: Character = serde_json::from_str(
            r#"{"string_id":"sam","name":"Sam","kr":"샘","portrait_path":""}"#,
        )
        .unwrap();
        assert_eq!(disabled.portrait(), &PortraitOverride::Disabled);

        let path: Character = serde_json::from_str(
            r#"{"string_id":"sam","name":"Sam","kr":"샘","portrait_path":"avin/avin_"}"#,
        )
        .unwrap();
        assert_eq!(
            path.portrait(),
            &PortraitOverride::Path("avin/avin_".to_string())
        );
    }

    #[test]
    fn serialized_character_uses_sheet_field_names() {
        let sam = character("sam", "Sam", "샘");
        let json = serde_json::to_value(&sam).unwrap();
        assert_eq!(json["string_id"], "sam");
        assert_eq!(json["kr"], "샘");
        assert!(json["portrait_path"].is_null());
    }
}
