//! Aggregates - entities with invariants enforced through private fields.

pub mod character;
pub mod directive_rule;

pub use character::{Character, PortraitOverride};
pub use directive_rule::{BuiltinHandler, DirectiveRule, RuleKind, RuleKindTag};
