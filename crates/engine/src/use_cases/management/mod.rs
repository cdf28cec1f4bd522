//! Management use cases for CRUD-style operations on the registries.

mod character;
mod directive;
mod expression;

pub use character::{
    BatchAddOutcome, CharacterCrud, CharacterUpdate, IdMigration, ImportSummary, NewCharacter,
    MAX_REPORTED_IMPORT_ERRORS,
};
pub use directive::DirectiveCrud;
pub use expression::ExpressionCrud;

use scenescript_domain::DomainError;

use crate::infrastructure::ports::RepoError;
use crate::use_cases::validation::ValidationError;

/// Shared error type for management use cases.
#[derive(Debug, thiserror::Error)]
pub enum ManagementError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),
}

impl From<ValidationError> for ManagementError {
    fn from(err: ValidationError) -> Self {
        Self::InvalidInput(err.to_string())
    }
}

/// Container for management use cases.
pub struct ManagementUseCases {
    pub character: CharacterCrud,
    pub directive: DirectiveCrud,
    pub expression: ExpressionCrud,
}

impl ManagementUseCases {
    pub fn new(character: CharacterCrud, directive: DirectiveCrud, expression: ExpressionCrud) -> Self {
        Self {
            character,
            directive,
            expression,
        }
    }
}
