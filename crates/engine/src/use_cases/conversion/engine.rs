//! Row-to-script conversion.
//!
//! Dispatch looks up the row's trimmed directive among user rules first,
//! then built-in handlers, and falls back to the default comment handler.
//! Nothing escapes [`ConversionEngine::convert`]: collaborator failures become
//! error results carrying the row ordinal.

use std::sync::Arc;

use scenescript_domain::common::none_if_blank;
use scenescript_domain::{
    BuiltinHandler, Character, ConversionResult, Row, RuleKind, FALLBACK_ID_WARNING,
    ID_GENERATION_FAILED_MESSAGE, MISSING_CHARACTER_MESSAGE, UNREGISTERED_CHARACTER_PREFIX,
};

use super::paths::{fallback_string_id, PathResolver};
use super::template::{render_fixed, render_template};
use crate::infrastructure::ports::{CharacterRepo, DirectiveRuleRepo, ExpressionRepo, RepoError};

// =============================================================================
// Script vocabulary
// =============================================================================

const SHOW_DIALOGUE_CALL: &str = "스토리_대화상자_추가";
const WAIT_CALL: &str = "대기()";
const NARRATION_CALL: &str = "나레이션_텍스트";
const DELAY_CALL: &str = "지연(0)";
const CAMERA_CALL: &str = "카메라_이동_옵셋()";
const LIGHTING_CALL: &str = "뷰포트_필터_블랙()";

const DEFAULT_HANDLER_MESSAGE: &str = "default comment passthrough";
const UNRESOLVED_PLACEHOLDERS_PREFIX: &str = "unresolved placeholders: ";

/// Failure of a collaborator while converting one row.
#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    #[error("{0}")]
    Repo(#[from] RepoError),
}

/// Handler selected for a row
#[derive(Debug, Clone, PartialEq, Eq)]
enum Dispatch {
    Rule(RuleKind),
    Default,
}

/// Line identifier of a dialogue or subtitle row
enum LineId {
    Explicit(String),
    Fallback(String),
}

impl LineId {
    fn as_str(&self) -> &str {
        match self {
            Self::Explicit(id) | Self::Fallback(id) => id,
        }
    }

    fn finish(&self, output: String) -> ConversionResult {
        match self {
            Self::Explicit(_) => ConversionResult::success(output),
            Self::Fallback(_) => ConversionResult::warning(output, FALLBACK_ID_WARNING),
        }
    }
}

pub struct ConversionEngine {
    characters: Arc<dyn CharacterRepo>,
    rules: Arc<dyn DirectiveRuleRepo>,
    paths: PathResolver,
    strict_placeholders: bool,
}

impl ConversionEngine {
    pub fn new(
        characters: Arc<dyn CharacterRepo>,
        rules: Arc<dyn DirectiveRuleRepo>,
        expressions: Arc<dyn ExpressionRepo>,
    ) -> Self {
        Self {
            characters,
            rules,
            paths: PathResolver::new(expressions),
            strict_placeholders: false,
        }
    }

    /// Report unresolved template placeholders as warnings.
    pub fn with_strict_placeholders(mut self, strict: bool) -> Self {
        self.strict_placeholders = strict;
        self
    }

    /// Convert one row. `ordinal` is the row's 1-based position in its batch
    /// and only appears in messages.
    pub fn convert(&self, ordinal: usize, row: &Row) -> ConversionResult {
        match self.try_convert(row) {
            Ok(result) => {
                if result.is_error() {
                    tracing::debug!(row = ordinal, message = %result.message(), "Row rejected");
                }
                result
            }
            Err(e) => {
                tracing::warn!(row = ordinal, error = %e, "Row conversion failed");
                ConversionResult::error(format!("row {}: {}", ordinal, e))
            }
        }
    }

    fn try_convert(&self, row: &Row) -> Result<ConversionResult, ConversionError> {
        match self.dispatch(row.directive())? {
            Dispatch::Rule(RuleKind::Builtin(handler)) => self.run_builtin(handler, row),
            Dispatch::Rule(RuleKind::Template(template)) => Ok(self.run_template(&template, row)),
            Dispatch::Rule(RuleKind::Fixed(text)) => Ok(ConversionResult::success(render_fixed(&text))),
            Dispatch::Default => Ok(Self::run_default(row)),
        }
    }

    fn dispatch(&self, directive: &str) -> Result<Dispatch, ConversionError> {
        let directive = directive.trim();
        if directive.is_empty() {
            return Ok(Dispatch::Default);
        }
        if let Some(rule) = self.rules.get(directive)? {
            return Ok(Dispatch::Rule(rule.kind().clone()));
        }
        Ok(BuiltinHandler::from_directive(directive)
            .map(|handler| Dispatch::Rule(RuleKind::Builtin(handler)))
            .unwrap_or(Dispatch::Default))
    }

    // =========================================================================
    // Handlers
    // =========================================================================

    fn run_builtin(
        &self,
        handler: BuiltinHandler,
        row: &Row,
    ) -> Result<ConversionResult, ConversionError> {
        match handler {
            BuiltinHandler::Dialogue => self.run_dialogue(row),
            BuiltinHandler::Subtitle => Ok(Self::run_subtitle(row)),
            BuiltinHandler::Camera => Ok(ConversionResult::success(CAMERA_CALL)),
            BuiltinHandler::Lighting => Ok(ConversionResult::success(LIGHTING_CALL)),
        }
    }

    fn run_dialogue(&self, row: &Row) -> Result<ConversionResult, ConversionError> {
        let raw_name = row.character();
        let name = raw_name.trim();
        if name.is_empty() {
            return Ok(ConversionResult::error(MISSING_CHARACTER_MESSAGE));
        }

        let Some(character) = self.find_character(name)? else {
            return Ok(ConversionResult::error(format!(
                "{}{}",
                UNREGISTERED_CHARACTER_PREFIX, raw_name
            )));
        };

        let Some(line_id) = Self::line_id(row) else {
            return Ok(ConversionResult::error(ID_GENERATION_FAILED_MESSAGE));
        };

        let portrait = self.paths.portrait_path(Some(&character), row.expression())?;
        let audio = PathResolver::audio_path(row.sound_address(), row.sound_file());

        let output = format!(
            "{}(\"{}\",\"[@{}]\",\"{}\",\"{}\")\n#{}\n{}",
            SHOW_DIALOGUE_CALL,
            character.converter_name(),
            line_id.as_str(),
            portrait,
            audio,
            row.dialogue(),
            WAIT_CALL
        );
        Ok(line_id.finish(output))
    }

    fn run_subtitle(row: &Row) -> ConversionResult {
        let Some(line_id) = Self::line_id(row) else {
            return ConversionResult::error(ID_GENERATION_FAILED_MESSAGE);
        };
        let audio = PathResolver::audio_path(row.sound_address(), row.sound_file());

        let output = format!(
            "{}(\"[@{}]\",\"\",\"\",\"\",\"{}\")\n#{}\n{}",
            NARRATION_CALL,
            line_id.as_str(),
            audio,
            row.dialogue(),
            DELAY_CALL
        );
        line_id.finish(output)
    }

    fn run_template(&self, template: &str, row: &Row) -> ConversionResult {
        let rendered = render_template(template, row);
        if rendered.is_complete() {
            return ConversionResult::success(rendered.text);
        }

        tracing::debug!(
            unresolved = %rendered.unresolved.join(", "),
            "Template placeholders left verbatim"
        );
        if self.strict_placeholders {
            let message = format!(
                "{}{}",
                UNRESOLVED_PLACEHOLDERS_PREFIX,
                rendered.unresolved.join(", ")
            );
            ConversionResult::warning(rendered.text, message)
        } else {
            ConversionResult::success(rendered.text)
        }
    }

    fn run_default(row: &Row) -> ConversionResult {
        ConversionResult::success_with_message(
            format!("#{}", row.dialogue()),
            DEFAULT_HANDLER_MESSAGE,
        )
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn find_character(&self, name: &str) -> Result<Option<Character>, RepoError> {
        if let Some(character) = self.characters.find_by_localized_name(name)? {
            return Ok(Some(character));
        }
        self.characters.find_by_display_name(name)
    }

    fn line_id(row: &Row) -> Option<LineId> {
        match none_if_blank(row.string_id()) {
            Some(explicit) => Some(LineId::Explicit(explicit.to_string())),
            None => fallback_string_id(row.sound_file()).map(LineId::Fallback),
        }
    }
}
