//! Portrait and audio path resolution, plus the fallback line identifier.

use std::sync::Arc;

use scenescript_domain::common::is_blank;
use scenescript_domain::{Character, PortraitOverride, DEFAULT_EXPRESSION_SUFFIX};

use crate::infrastructure::ports::{ExpressionRepo, RepoError};

/// Prefix of identifiers generated from a sound file name
pub const FALLBACK_ID_PREFIX: &str = "cs_";

const PORTRAIT_EXTENSION: &str = ".rux";

/// Computes asset paths for generated script lines.
pub struct PathResolver {
    expressions: Arc<dyn ExpressionRepo>,
}

impl PathResolver {
    pub fn new(expressions: Arc<dyn ExpressionRepo>) -> Self {
        Self { expressions }
    }

    /// Portrait path for a character showing an expression.
    ///
    /// No character or an explicitly disabled portrait gives `""`. An override
    /// prefix gets the suffix and extension appended; otherwise the path is
    /// `{id}/{id}_{suffix}.rux`. Empty or unmapped labels use `Default`.
    pub fn portrait_path(
        &self,
        character: Option<&Character>,
        expression_label: &str,
    ) -> Result<String, RepoError> {
        let Some(character) = character else {
            return Ok(String::new());
        };

        let prefix = match character.portrait() {
            PortraitOverride::Disabled => return Ok(String::new()),
            PortraitOverride::Path(prefix) => prefix.clone(),
            PortraitOverride::Derived => {
                let id = character.string_id();
                format!("{}/{}_", id, id)
            }
        };

        let suffix = self.expression_suffix(expression_label)?;
        Ok(format!("{}{}{}", prefix, suffix, PORTRAIT_EXTENSION))
    }

    fn expression_suffix(&self, label: &str) -> Result<String, RepoError> {
        let label = label.trim();
        if label.is_empty() {
            return Ok(DEFAULT_EXPRESSION_SUFFIX.to_string());
        }
        let suffix = self
            .expressions
            .get(label)?
            .filter(|suffix| !suffix.trim().is_empty());
        Ok(suffix.unwrap_or_else(|| DEFAULT_EXPRESSION_SUFFIX.to_string()))
    }

    /// Address and file name joined as-is; `""` unless both are present.
    pub fn audio_path(address: &str, filename: &str) -> String {
        if address.is_empty() || filename.is_empty() {
            String::new()
        } else {
            format!("{}{}", address, filename)
        }
    }
}

/// Identifier for a line whose own string id is blank.
///
/// Returns `None` when there is no usable sound file name either. The file
/// name is used exactly as written, matching [`PathResolver::audio_path`].
///
/// ```
/// use scenescript_engine::use_cases::conversion::fallback_string_id;
///
/// assert_eq!(fallback_string_id("greet01").as_deref(), Some("cs_greet01"));
/// assert_eq!(fallback_string_id("  "), None);
/// ```
pub fn fallback_string_id(sound_file: &str) -> Option<String> {
    if is_blank(sound_file) {
        None
    } else {
        Some(format!("{}{}", FALLBACK_ID_PREFIX, sound_file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::MockExpressionRepo;
    use mockall::predicate::eq;
    use scenescript_domain::{CharacterName, StringId};

    fn sam() -> Character {
        Character::new(
            StringId::new("sam").unwrap(),
            CharacterName::new("Sam").unwrap(),
            CharacterName::new("샘").unwrap(),
        )
    }

    fn resolver_with_angry() -> PathResolver {
        let mut expressions = MockExpressionRepo::new();
        expressions
            .expect_get()
            .with(eq("화남"))
            .returning(|_| Ok(Some("Angry".to_string())));
        expressions.expect_get().returning(|_| Ok(None));
        PathResolver::new(Arc::new(expressions))
    }

    #[test]
    fn derived_portrait_uses_id_directory() {
        let resolver = resolver_with_angry();
        assert_eq!(
            resolver.portrait_path(Some(&sam()), "화남").unwrap(),
            "sam/sam_Angry.rux"
        );
    }

    #[test]
    fn blank_or_unmapped_expression_uses_default() {
        let resolver = resolver_with_angry();
        assert_eq!(resolver.portrait_path(Some(&sam()), "").unwrap(), "sam/sam_Default.rux");
        assert_eq!(
            resolver.portrait_path(Some(&sam()), "놀람").unwrap(),
            "sam/sam_Default.rux"
        );
    }

    #[test]
    fn override_prefix_and_disabled_portrait() {
        let resolver = resolver_with_angry();
        let avin = sam().with_portrait(PortraitOverride::Path("avin/avin_".into()));
        let hidden = sam().with_portrait(PortraitOverride::Disabled);

        assert_eq!(resolver.portrait_path(Some(&avin), "화남").unwrap(), "avin/avin_Angry.rux");
        assert_eq!(resolver.portrait_path(Some(&hidden), "화남").unwrap(), "");
        assert_eq!(resolver.portrait_path(None, "화남").unwrap(), "");
    }

    #[test]
    fn portrait_path_is_stable_across_calls() {
        let resolver = resolver_with_angry();
        let character = sam();
        let first = resolver.portrait_path(Some(&character), "화남").unwrap();
        let second = resolver.portrait_path(Some(&character), "화남").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn expression_lookup_failure_propagates() {
        let mut expressions = MockExpressionRepo::new();
        expressions
            .expect_get()
            .returning(|_| Err(RepoError::storage("expressions.get", "unreadable")));
        let resolver = PathResolver::new(Arc::new(expressions));

        assert!(resolver.portrait_path(Some(&sam()), "화남").is_err());
    }

    #[test]
    fn fallback_keeps_the_file_name_as_written() {
        assert_eq!(fallback_string_id(" f1").as_deref(), Some("cs_ f1"));
        assert_eq!(fallback_string_id("\t"), None);
    }

    #[test]
    fn audio_path_requires_both_parts() {
        assert_eq!(PathResolver::audio_path("event:/a/", "f1"), "event:/a/f1");
        assert_eq!(PathResolver::audio_path("", "f1"), "");
        assert_eq!(PathResolver::audio_path("event:/a/", ""), "");
    }
}
