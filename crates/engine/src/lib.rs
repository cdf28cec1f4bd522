//! Scenescript engine library.
//!
//! Converts scenario spreadsheet rows into engine script text.
//!
//! ## Structure
//!
//! - `use_cases/` - Conversion, scenario loading and registry management
//! - `infrastructure/` - Port traits and their file-backed implementations
//! - `cli` - Command-line entry point
//! - `app` - Application composition

pub mod app;
pub mod cli;
pub mod infrastructure;
pub mod use_cases;

/// End-to-end tests over a composed App and temp files.
#[cfg(test)]
mod e2e_tests;

pub use app::App;
