//! Repository port traits for registry and settings access.
//!
//! All ports are synchronous: conversion is record-at-a-time and the stores
//! are local files held in memory.

use scenescript_domain::{Character, ColumnMapping, DirectiveRule, ExpressionMap, StringId};

use super::error::RepoError;
use super::types::{LastAccess, SheetData};

// =============================================================================
// Character registry
// =============================================================================

#[cfg_attr(test, mockall::automock)]
pub trait CharacterRepo: Send + Sync {
    fn get(&self, id: &StringId) -> Result<Option<Character>, RepoError>;

    /// Exact match on the localized name
    fn find_by_localized_name(&self, name: &str) -> Result<Option<Character>, RepoError>;

    /// Case-insensitive match on the display name
    fn find_by_display_name(&self, name: &str) -> Result<Option<Character>, RepoError>;

    fn list(&self) -> Result<Vec<Character>, RepoError>;

    /// Insert or replace by string id
    fn save(&self, character: &Character) -> Result<(), RepoError>;

    /// Insert or replace several characters, persisting once
    fn save_all(&self, characters: &[Character]) -> Result<(), RepoError>;

    /// Returns whether a character was removed
    fn delete(&self, id: &StringId) -> Result<bool, RepoError>;
}

// =============================================================================
// Directive rule set
// =============================================================================

#[cfg_attr(test, mockall::automock)]
pub trait DirectiveRuleRepo: Send + Sync {
    /// Exact, case-sensitive name lookup
    fn get(&self, name: &str) -> Result<Option<DirectiveRule>, RepoError>;

    /// All rules in registration order
    fn list(&self) -> Result<Vec<DirectiveRule>, RepoError>;

    /// Insert or replace by name (replacement keeps the original position)
    fn save(&self, rule: &DirectiveRule) -> Result<(), RepoError>;

    /// Returns whether a rule was removed
    fn delete(&self, name: &str) -> Result<bool, RepoError>;
}

// =============================================================================
// Expression map
// =============================================================================

#[cfg_attr(test, mockall::automock)]
pub trait ExpressionRepo: Send + Sync {
    /// Suffix for a label, if mapped
    fn get(&self, label: &str) -> Result<Option<String>, RepoError>;

    fn load(&self) -> Result<ExpressionMap, RepoError>;

    /// Overwrite the whole map
    fn replace(&self, map: &ExpressionMap) -> Result<(), RepoError>;
}

// =============================================================================
// Scenario sheets
// =============================================================================

/// A workbook of scenario sheets (one CSV/TSV export per sheet).
#[cfg_attr(test, mockall::automock)]
pub trait SheetSource: Send + Sync {
    /// Identifier used to key saved column mappings (path or URL)
    fn source_id(&self) -> String;

    fn sheet_names(&self) -> Result<Vec<String>, RepoError>;

    fn read_sheet(&self, name: &str) -> Result<SheetData, RepoError>;
}

/// Remembered sheet access and per-sheet column mappings.
#[cfg_attr(test, mockall::automock)]
pub trait SheetConfigRepo: Send + Sync {
    fn record_access(&self, access: &LastAccess) -> Result<(), RepoError>;

    fn last_access(&self) -> Result<Option<LastAccess>, RepoError>;

    /// Most recent first
    fn recent_sources(&self) -> Result<Vec<String>, RepoError>;

    fn column_mapping(&self, sheet_key: &str) -> Result<Option<ColumnMapping>, RepoError>;

    fn save_column_mapping(&self, sheet_key: &str, mapping: &ColumnMapping) -> Result<(), RepoError>;

    fn clear(&self) -> Result<(), RepoError>;
}
