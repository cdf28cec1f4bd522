//! Per-row conversion outcome

use serde::{Deserialize, Serialize};
use std::fmt;

/// Message prefix for rows naming a character missing from the registry.
///
/// Scraped by the "register missing characters" flow; keep it stable.
pub const UNREGISTERED_CHARACTER_PREFIX: &str = "unregistered character: ";

/// Message for rows with an empty character cell.
pub const MISSING_CHARACTER_MESSAGE: &str = "missing required character field";

/// Message for rows where neither an explicit nor a fallback id is available.
pub const ID_GENERATION_FAILED_MESSAGE: &str = "cannot generate identifier: no filename available";

/// Warning attached when the line id was synthesized from the sound file.
pub const FALLBACK_ID_WARNING: &str = "string_id was blank; generated from sound file";

/// Message for clean conversions.
pub const SUCCESS_MESSAGE: &str = "success";

/// Row status. Only `Error` keeps the row's text out of the final script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversionStatus {
    Success,
    Warning,
    Error,
}

impl ConversionStatus {
    /// Whether the row's output belongs in the assembled script
    pub fn emits_output(&self) -> bool {
        !matches!(self, Self::Error)
    }

    /// Single-character marker for report tables
    pub fn marker(&self) -> &'static str {
        match self {
            Self::Success => "✅",
            Self::Warning => "⚠️",
            Self::Error => "❌",
        }
    }
}

impl fmt::Display for ConversionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Result of converting one row. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionResult {
    status: ConversionStatus,
    output: String,
    message: String,
}

impl ConversionResult {
    pub fn success(output: impl Into<String>) -> Self {
        Self {
            status: ConversionStatus::Success,
            output: output.into(),
            message: SUCCESS_MESSAGE.to_string(),
        }
    }

    pub fn success_with_message(output: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status: ConversionStatus::Success,
            output: output.into(),
            message: message.into(),
        }
    }

    /// Output is still emitted; the message explains what was papered over.
    pub fn warning(output: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status: ConversionStatus::Warning,
            output: output.into(),
            message: message.into(),
        }
    }

    /// Error rows carry a commented-out explanation as their output so a
    /// pasted script never contains half-converted calls.
    pub fn error(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            status: ConversionStatus::Error,
            output: format!("# [error] {}", message),
            message,
        }
    }

    pub fn status(&self) -> ConversionStatus {
        self.status
    }

    pub fn output(&self) -> &str {
        &self.output
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_success(&self) -> bool {
        self.status == ConversionStatus::Success
    }

    pub fn is_warning(&self) -> bool {
        self.status == ConversionStatus::Warning
    }

    pub fn is_error(&self) -> bool {
        self.status == ConversionStatus::Error
    }

    /// Character name from an unregistered-character error, if this is one
    pub fn unregistered_character(&self) -> Option<&str> {
        if !self.is_error() {
            return None;
        }
        self.message.strip_prefix(UNREGISTERED_CHARACTER_PREFIX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_output_is_commented() {
        let result = ConversionResult::error(MISSING_CHARACTER_MESSAGE);
        assert!(result.is_error());
        assert!(result.output().starts_with('#'));
        assert_eq!(result.message(), MISSING_CHARACTER_MESSAGE);
    }

    #[test]
    fn only_error_blocks_output() {
        assert!(ConversionStatus::Success.emits_output());
        assert!(ConversionStatus::Warning.emits_output());
        assert!(!ConversionStatus::Error.emits_output());
    }

    #[test]
    fn unregistered_character_is_scraped_from_message() {
        let result = ConversionResult::error(format!("{}샘", UNREGISTERED_CHARACTER_PREFIX));
        assert_eq!(result.unregistered_character(), Some("샘"));

        let other = ConversionResult::error(MISSING_CHARACTER_MESSAGE);
        assert_eq!(other.unregistered_character(), None);
    }
}
