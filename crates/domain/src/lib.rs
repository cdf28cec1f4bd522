//! Scenescript domain: characters, directive rules, scenario rows and
//! conversion results. Pure types, no I/O.

extern crate self as scenescript_domain;

pub mod aggregates;
pub mod common;
pub mod error;
pub mod value_objects;

pub use error::DomainError;

pub use aggregates::{
    BuiltinHandler, Character, DirectiveRule, PortraitOverride, RuleKind, RuleKindTag,
};

pub use value_objects::{
    columns, normalize_column, CharacterName, ColumnMapping, ColumnRole, ConversionResult,
    ConversionStatus, ExpressionMap, Row, StringId, DEFAULT_EXPRESSION_SUFFIX,
    FALLBACK_ID_WARNING, ID_GENERATION_FAILED_MESSAGE, MISSING_CHARACTER_MESSAGE,
    SUCCESS_MESSAGE, UNREGISTERED_CHARACTER_PREFIX,
};
