//! Port traits for infrastructure boundaries.
//!
//! These are the ONLY abstractions in the engine. Everything else is concrete types.
//! Ports exist for:
//! - Registries (characters, directive rules, expressions)
//! - Scenario sheets and their remembered configuration
//! - Clock (for testing)

mod error;
mod repos;
mod testing;
pub mod types;

// =============================================================================
// Repository Ports
// =============================================================================
pub use repos::{
    CharacterRepo, DirectiveRuleRepo, ExpressionRepo, SheetConfigRepo, SheetSource,
};

pub use types::{LastAccess, SheetData};

// =============================================================================
// Test-Only Mock Repositories (only available during test builds)
// =============================================================================
#[cfg(test)]
pub use repos::{
    MockCharacterRepo, MockDirectiveRuleRepo, MockExpressionRepo, MockSheetConfigRepo,
    MockSheetSource,
};

#[cfg(test)]
pub use testing::MockClockPort;

// =============================================================================
// Testing Ports
// =============================================================================
pub use testing::ClockPort;

// =============================================================================
// Error Types
// =============================================================================
pub use error::RepoError;
