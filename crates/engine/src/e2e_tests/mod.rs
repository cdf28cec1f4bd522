//! End-to-end tests over a fully composed [`App`](crate::App).
//!
//! Each test gets its own temp data directory; stores are real JSON files and
//! scenario sheets are real CSV/TSV files.

mod e2e_helpers;

pub use e2e_helpers::*;
