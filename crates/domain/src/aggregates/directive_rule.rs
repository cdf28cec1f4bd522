//! Directive rules - how a row's directive turns into script text
//!
//! A rule is a tagged variant: a built-in handler, a template with
//! `{{column}}` placeholders, or fixed text. Rule names are the dispatch key:
//! case-sensitive, exact-match, trimmed of surrounding whitespace.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;

/// Built-in handlers shipped with the converter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuiltinHandler {
    /// `대사`: dialogue box call, comment, wait
    Dialogue,
    /// `자막`: narration text call, comment, delay
    Subtitle,
    /// `카메라`: fixed camera offset call
    Camera,
    /// `조명`: fixed viewport filter call
    Lighting,
}

impl BuiltinHandler {
    pub const ALL: [BuiltinHandler; 4] = [
        BuiltinHandler::Dialogue,
        BuiltinHandler::Subtitle,
        BuiltinHandler::Camera,
        BuiltinHandler::Lighting,
    ];

    /// Directive name writers use in the sheet
    pub fn directive_name(&self) -> &'static str {
        match self {
            Self::Dialogue => "대사",
            Self::Subtitle => "자막",
            Self::Camera => "카메라",
            Self::Lighting => "조명",
        }
    }

    /// Handler registered under an exact directive name
    pub fn from_directive(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|h| h.directive_name() == name)
    }
}

impl fmt::Display for BuiltinHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.directive_name())
    }
}

impl FromStr for BuiltinHandler {
    type Err = DomainError;

    /// Accepts the directive name (`대사`) or the handler key (`dialogue`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(handler) = Self::from_directive(s) {
            return Ok(handler);
        }
        match s.to_ascii_lowercase().as_str() {
            "dialogue" => Ok(Self::Dialogue),
            "subtitle" => Ok(Self::Subtitle),
            "camera" => Ok(Self::Camera),
            "lighting" => Ok(Self::Lighting),
            _ => Err(DomainError::parse(format!("Unknown built-in handler: {}", s))),
        }
    }
}

/// What a rule does with a row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleKind {
    Builtin(BuiltinHandler),
    /// Text with `{{column}}` / `#{{column}}` placeholders and `\n` markers
    Template(String),
    /// Text emitted as-is (`\n` markers still become line breaks)
    Fixed(String),
}

impl RuleKind {
    pub fn tag(&self) -> RuleKindTag {
        match self {
            Self::Builtin(_) => RuleKindTag::Builtin,
            Self::Template(_) => RuleKindTag::Template,
            Self::Fixed(_) => RuleKindTag::Simple,
        }
    }

    /// Template or fixed text; built-ins have none
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Builtin(_) => None,
            Self::Template(text) | Self::Fixed(text) => Some(text),
        }
    }
}

/// Kind names used in storage and on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKindTag {
    Builtin,
    Template,
    Simple,
}

impl fmt::Display for RuleKindTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Builtin => write!(f, "builtin"),
            Self::Template => write!(f, "template"),
            Self::Simple => write!(f, "simple"),
        }
    }
}

impl FromStr for RuleKindTag {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "builtin" => Ok(Self::Builtin),
            "template" => Ok(Self::Template),
            "simple" | "fixed" => Ok(Self::Simple),
            _ => Err(DomainError::parse(format!("Unknown rule kind: {}", s))),
        }
    }
}

/// A named directive rule
///
/// # Example
///
/// ```
/// use scenescript_domain::aggregates::{DirectiveRule, RuleKind};
///
/// let rule = DirectiveRule::template("효과음", r#"효과음_재생("0.1", "{{사운드 주소}}{{사운드 파일}}")"#).unwrap();
/// assert_eq!(rule.name(), "효과음");
/// assert!(matches!(rule.kind(), RuleKind::Template(_)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "DirectiveRuleRecord", into = "DirectiveRuleRecord")]
pub struct DirectiveRule {
    name: String,
    kind: RuleKind,
}

impl DirectiveRule {
    /// Create a rule.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the name is blank.
    pub fn new(name: impl Into<String>, kind: RuleKind) -> Result<Self, DomainError> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(DomainError::validation("Directive name cannot be empty"));
        }
        Ok(Self { name, kind })
    }

    pub fn template(name: impl Into<String>, text: impl Into<String>) -> Result<Self, DomainError> {
        Self::new(name, RuleKind::Template(text.into()))
    }

    pub fn fixed(name: impl Into<String>, text: impl Into<String>) -> Result<Self, DomainError> {
        Self::new(name, RuleKind::Fixed(text.into()))
    }

    pub fn builtin(name: impl Into<String>, handler: BuiltinHandler) -> Result<Self, DomainError> {
        Self::new(name, RuleKind::Builtin(handler))
    }

    /// Build from the stored triple `(name, type, template)`.
    ///
    /// For `builtin`, the text names the handler.
    pub fn from_parts(name: &str, tag: RuleKindTag, text: &str) -> Result<Self, DomainError> {
        let kind = match tag {
            RuleKindTag::Builtin => RuleKind::Builtin(text.parse()?),
            RuleKindTag::Template => RuleKind::Template(text.to_string()),
            RuleKindTag::Simple => RuleKind::Fixed(text.to_string()),
        };
        Self::new(name, kind)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &RuleKind {
        &self.kind
    }

    /// Replace `from` with `to` in template/fixed text. Returns whether the
    /// text changed.
    pub fn rewrite_text(&mut self, from: &str, to: &str) -> bool {
        match &mut self.kind {
            RuleKind::Template(text) | RuleKind::Fixed(text) if text.contains(from) => {
                *text = text.replace(from, to);
                true
            }
            _ => false,
        }
    }
}

/// Storage shape: `{"name": ..., "type": ..., "template": ...}`
#[derive(Debug, Clone, Serialize, Deserialize)]
struct DirectiveRuleRecord {
    name: String,
    #[serde(rename = "type")]
    kind: RuleKindTag,
    #[serde(default)]
    template: String,
}

impl TryFrom<DirectiveRuleRecord> for DirectiveRule {
    type Error = DomainError;

    fn try_from(record: DirectiveRuleRecord) -> Result<Self, Self::Error> {
        Self::from_parts(&record.name, record.kind, &record.template)
    }
}

impl From<DirectiveRule> for DirectiveRuleRecord {
    fn from(rule: DirectiveRule) -> Self {
        let kind = rule.kind.tag();
        let template = match rule.kind {
            RuleKind::Builtin(handler) => handler.directive_name().to_string(),
            RuleKind::Template(text) | RuleKind::Fixed(text) => text,
        };
        Self {
            name: rule.name,
            kind,
            template,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_lookup_is_exact() {
        assert_eq!(
            BuiltinHandler::from_directive("카메라"),
            Some(BuiltinHandler::Camera)
        );
        assert_eq!(BuiltinHandler::from_directive(" 카메라"), None);
        assert_eq!(BuiltinHandler::from_directive("장면"), None);
    }

    #[test]
    fn builtin_parses_from_key_or_directive() {
        assert_eq!("대사".parse::<BuiltinHandler>().unwrap(), BuiltinHandler::Dialogue);
        assert_eq!("Lighting".parse::<BuiltinHandler>().unwrap(), BuiltinHandler::Lighting);
        assert!("fade".parse::<BuiltinHandler>().is_err());
    }

    #[test]
    fn rule_name_is_trimmed_and_required() {
        let rule = DirectiveRule::fixed("  장면 ", "장면_묘사()").unwrap();
        assert_eq!(rule.name(), "장면");
        assert!(DirectiveRule::fixed("   ", "x").is_err());
    }

    #[test]
    fn from_parts_builds_each_kind() {
        let builtin = DirectiveRule::from_parts("dialogue", RuleKindTag::Builtin, "대사").unwrap();
        assert_eq!(builtin.kind(), &RuleKind::Builtin(BuiltinHandler::Dialogue));

        let simple = DirectiveRule::from_parts("장면", RuleKindTag::Simple, "장면_묘사()").unwrap();
        assert_eq!(simple.kind().text(), Some("장면_묘사()"));

        assert!(DirectiveRule::from_parts("x", RuleKindTag::Builtin, "nope").is_err());
    }

    #[test]
    fn rewrite_text_only_touches_matching_text() {
        let mut rule = DirectiveRule::template("인사", "인사(\"[@sam]\")").unwrap();
        assert!(rule.rewrite_text("[@sam]", "[@samuel]"));
        assert_eq!(rule.kind().text(), Some("인사(\"[@samuel]\")"));
        assert!(!rule.rewrite_text("[@avin]", "[@x]"));

        let mut builtin = DirectiveRule::builtin("talk", BuiltinHandler::Dialogue).unwrap();
        assert!(!builtin.rewrite_text("[@sam]", "[@x]"));
    }

    #[test]
    fn serde_uses_stored_record_shape() {
        let rule = DirectiveRule::template("효과음", "효과음_재생(\"{{사운드 파일}}\")").unwrap();
        let json = serde_json::to_value(&rule).unwrap();
        assert_eq!(json["type"], "template");
        assert_eq!(json["template"], "효과음_재생(\"{{사운드 파일}}\")");

        let back: DirectiveRule = serde_json::from_value(json).unwrap();
        assert_eq!(back, rule);
    }

    #[test]
    fn serde_rejects_blank_name() {
        let parsed: Result<DirectiveRule, _> =
            serde_json::from_str(r#"{"name":" ","type":"simple","template":"x"}"#);
        assert!(parsed.is_err());
    }
}
