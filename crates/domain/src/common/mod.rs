//! Common utility functions shared across the domain and engine crates.
//!
//! - **Pure functions only** - no side effects, no I/O

pub mod string;

pub use string::{
    collapse_line_breaks, expand_line_break_markers, is_blank, none_if_blank, none_if_empty,
};
