//! Infrastructure implementations.
//!
//! Contains port trait implementations for files on disk.

pub mod clock;
pub mod config;
pub mod json_store;
pub mod ports;
pub mod sheets;
