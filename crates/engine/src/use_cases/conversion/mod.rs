//! Conversion use cases: rows in, script text out.

mod batch;
mod engine;
mod paths;
mod template;

pub use batch::{BatchConverter, BatchReport, SCRIPT_SEPARATOR};
pub use engine::{ConversionEngine, ConversionError};
pub use paths::{fallback_string_id, PathResolver, FALLBACK_ID_PREFIX};
pub use template::{render_fixed, render_template, RenderedTemplate};

use std::sync::Arc;

/// Container for conversion use cases.
pub struct ConversionUseCases {
    pub engine: Arc<ConversionEngine>,
    pub batch: BatchConverter,
}

impl ConversionUseCases {
    pub fn new(engine: Arc<ConversionEngine>) -> Self {
        Self {
            batch: BatchConverter::new(engine.clone()),
            engine,
        }
    }
}
