//! Use cases - user story orchestration across the registries.
//!
//! - `conversion` turns scenario rows into script text
//! - `scenario` reads sheets and applies column mappings
//! - `management` edits characters, directive rules and expressions

pub mod conversion;
pub mod management;
pub mod scenario;
pub mod validation;

pub use conversion::{BatchConverter, BatchReport, ConversionEngine, ConversionUseCases};
pub use management::{ManagementError, ManagementUseCases};
pub use scenario::{LoadScenario, Scenario, ScenarioError};
