//! Sheet column -> role column mapping
//!
//! Writers name their sheet columns freely (often in Korean). A mapping tells
//! the converter which sheet column plays which role. Mapped rows keep their
//! original cells too, so template placeholders can still name the sheet's
//! own headers.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::row::{columns, normalize_column, Row};
use crate::error::DomainError;

/// A column role understood by the conversion engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnRole {
    Character,
    Dialogue,
    Directive,
    StringId,
    Expression,
    SoundAddress,
    SoundFile,
    Scene,
}

impl ColumnRole {
    pub const ALL: [ColumnRole; 8] = [
        ColumnRole::Character,
        ColumnRole::Dialogue,
        ColumnRole::Directive,
        ColumnRole::StringId,
        ColumnRole::Expression,
        ColumnRole::SoundAddress,
        ColumnRole::SoundFile,
        ColumnRole::Scene,
    ];

    /// Normalized row column this role is written to
    pub fn column(&self) -> &'static str {
        match self {
            Self::Character => columns::CHARACTER,
            Self::Dialogue => columns::DIALOGUE,
            Self::Directive => columns::DIRECTIVE,
            Self::StringId => columns::STRING_ID,
            Self::Expression => columns::EXPRESSION,
            Self::SoundAddress => columns::SOUND_ADDRESS,
            Self::SoundFile => columns::SOUND_FILE,
            Self::Scene => columns::SCENE,
        }
    }

    pub fn is_required(&self) -> bool {
        matches!(self, Self::Character | Self::Dialogue)
    }

    /// Sheet headers recognized for this role without an explicit mapping
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            Self::Character => &["캐릭터"],
            Self::Dialogue => &["대사"],
            Self::Directive => &["지시문"],
            Self::StringId => &["string id", "stringid"],
            Self::Expression => &["표정"],
            Self::SoundAddress => &["사운드 주소"],
            Self::SoundFile => &["사운드 파일", "사운드 파일명"],
            Self::Scene => &["씬 번호", "scene number"],
        }
    }

    /// Role whose canonical column or alias matches a sheet header
    pub fn detect(header: &str) -> Option<Self> {
        let header = normalize_column(header);
        Self::ALL
            .into_iter()
            .find(|role| role.column() == header || role.aliases().contains(&header.as_str()))
    }
}

impl fmt::Display for ColumnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.column())
    }
}

impl FromStr for ColumnRole {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::detect(s).ok_or_else(|| DomainError::parse(format!("Unknown column role: {}", s)))
    }
}

/// Mapping from (normalized) sheet column to role
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnMapping {
    columns: BTreeMap<String, ColumnRole>,
}

impl ColumnMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a mapping by recognizing role names and aliases among headers
    pub fn detect<S: AsRef<str>>(headers: &[S]) -> Self {
        let mut mapping = Self::new();
        for header in headers {
            if let Some(role) = ColumnRole::detect(header.as_ref()) {
                if mapping.column_for(role).is_none() {
                    mapping.map(header.as_ref(), role);
                }
            }
        }
        mapping
    }

    /// Builder: map a sheet column to a role
    pub fn with(mut self, sheet_column: &str, role: ColumnRole) -> Self {
        self.map(sheet_column, role);
        self
    }

    /// Map a sheet column to a role, replacing any column previously mapped
    /// to the same role.
    pub fn map(&mut self, sheet_column: &str, role: ColumnRole) {
        self.columns.retain(|_, existing| *existing != role);
        self.columns.insert(normalize_column(sheet_column), role);
    }

    /// Sheet column currently mapped to a role
    pub fn column_for(&self, role: ColumnRole) -> Option<&str> {
        self.columns
            .iter()
            .find(|(_, r)| **r == role)
            .map(|(column, _)| column.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, ColumnRole)> {
        self.columns.iter().map(|(c, r)| (c.as_str(), *r))
    }

    /// Check that every required role is mapped.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` naming the unmapped required roles.
    pub fn validate(&self) -> Result<(), DomainError> {
        let missing: Vec<&str> = ColumnRole::ALL
            .iter()
            .filter(|role| role.is_required() && self.column_for(**role).is_none())
            .map(|role| role.column())
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(DomainError::validation(format!(
                "required roles are not mapped: {}",
                missing.join(", ")
            )))
        }
    }

    /// Rewrite a sheet row into a role row.
    ///
    /// Role cells come first; every role is present (empty when unmapped or
    /// absent from the sheet). The sheet's own cells follow unchanged.
    pub fn apply(&self, row: &Row) -> Row {
        let roles = ColumnRole::ALL.iter().map(|role| {
            let value = self
                .column_for(*role)
                .map(|column| row.get(column))
                .unwrap_or_else(|| row.get(role.column()));
            (role.column().to_string(), value.to_string())
        });
        let originals = row.iter().map(|(c, v)| (c.to_string(), v.to_string()));
        Row::from_pairs(roles.chain(originals))
    }
}
