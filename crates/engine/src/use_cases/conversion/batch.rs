//! Sequential batch conversion and script assembly.

use std::sync::Arc;

use scenescript_domain::{ConversionResult, ConversionStatus, Row};

use super::engine::ConversionEngine;

/// Separator between row outputs in an assembled script
pub const SCRIPT_SEPARATOR: &str = "\n\n";

/// Converts rows in order, one at a time.
pub struct BatchConverter {
    engine: Arc<ConversionEngine>,
}

impl BatchConverter {
    pub fn new(engine: Arc<ConversionEngine>) -> Self {
        Self { engine }
    }

    pub fn convert(&self, rows: &[Row]) -> BatchReport {
        self.convert_with_progress(rows, |_| {})
    }

    /// Convert `rows`, reporting the completed fraction after each row.
    ///
    /// Fractions increase monotonically and the last one is exactly `1.0`.
    /// An empty batch reports nothing.
    pub fn convert_with_progress(
        &self,
        rows: &[Row],
        mut on_progress: impl FnMut(f64),
    ) -> BatchReport {
        let total = rows.len();
        let mut results = Vec::with_capacity(total);

        for (index, row) in rows.iter().enumerate() {
            results.push(self.engine.convert(index + 1, row));
            on_progress(((index + 1) as f64 / total as f64).min(1.0));
        }

        let report = BatchReport::new(results);
        tracing::info!(
            rows = report.total(),
            success = report.success_count(),
            warnings = report.warning_count(),
            errors = report.error_count(),
            "Batch converted"
        );
        report
    }
}

/// Results of a batch, parallel to its input rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    results: Vec<ConversionResult>,
    success_count: usize,
    warning_count: usize,
    error_count: usize,
}

impl BatchReport {
    pub fn new(results: Vec<ConversionResult>) -> Self {
        let count = |status: ConversionStatus| results.iter().filter(|r| r.status() == status).count();
        let success_count = count(ConversionStatus::Success);
        let warning_count = count(ConversionStatus::Warning);
        let error_count = count(ConversionStatus::Error);
        Self {
            results,
            success_count,
            warning_count,
            error_count,
        }
    }

    pub fn results(&self) -> &[ConversionResult] {
        &self.results
    }

    pub fn total(&self) -> usize {
        self.results.len()
    }

    pub fn success_count(&self) -> usize {
        self.success_count
    }

    pub fn warning_count(&self) -> usize {
        self.warning_count
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }

    /// Error rows with their 1-based ordinals
    pub fn errors(&self) -> impl Iterator<Item = (usize, &ConversionResult)> {
        self.with_status(ConversionStatus::Error)
    }

    /// Warning rows with their 1-based ordinals
    pub fn warnings(&self) -> impl Iterator<Item = (usize, &ConversionResult)> {
        self.with_status(ConversionStatus::Warning)
    }

    fn with_status(
        &self,
        status: ConversionStatus,
    ) -> impl Iterator<Item = (usize, &ConversionResult)> {
        self.results
            .iter()
            .enumerate()
            .filter(move |(_, r)| r.status() == status)
            .map(|(i, r)| (i + 1, r))
    }

    /// Outputs of success and warning rows joined by a blank line.
    pub fn script(&self) -> String {
        self.results
            .iter()
            .filter(|r| r.status().emits_output())
            .map(ConversionResult::output)
            .collect::<Vec<_>>()
            .join(SCRIPT_SEPARATOR)
    }

    /// Speakers that failed lookup, deduplicated in first-seen order.
    pub fn unregistered_characters(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for name in self.results.iter().filter_map(ConversionResult::unregistered_character) {
            if !names.iter().any(|seen| seen == name) {
                names.push(name.to_string());
            }
        }
        names
    }

    pub fn summary(&self) -> String {
        format!(
            "{} rows: {} {} success, {} {} warning, {} {} error",
            self.total(),
            ConversionStatus::Success.marker(),
            self.success_count,
            ConversionStatus::Warning.marker(),
            self.warning_count,
            ConversionStatus::Error.marker(),
            self.error_count
        )
    }
}
