//! Scenario loading: read a sheet, map its columns to roles, group scenes.

use std::collections::BTreeSet;
use std::sync::Arc;

use scenescript_domain::{ColumnMapping, DomainError, Row};

use crate::infrastructure::json_store::sheet_key;
use crate::infrastructure::ports::{
    ClockPort, LastAccess, RepoError, SheetConfigRepo, SheetSource,
};

#[derive(Debug, thiserror::Error)]
pub enum ScenarioError {
    #[error("Workbook has no sheets")]
    NoSheets,
    #[error("Invalid column mapping: {0}")]
    Mapping(#[from] DomainError),
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}

/// Rows of one sheet, rewritten to role columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scenario {
    sheet_name: String,
    mapping: ColumnMapping,
    rows: Vec<Row>,
}

impl Scenario {
    pub fn new(sheet_name: impl Into<String>, mapping: ColumnMapping, rows: Vec<Row>) -> Self {
        Self {
            sheet_name: sheet_name.into(),
            mapping,
            rows,
        }
    }

    pub fn sheet_name(&self) -> &str {
        &self.sheet_name
    }

    pub fn mapping(&self) -> &ColumnMapping {
        &self.mapping
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Distinct scene numbers, ascending. Rows without a number are ignored.
    pub fn scene_numbers(&self) -> Vec<i64> {
        self.rows
            .iter()
            .filter_map(Row::scene_number)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Rows of one scene in sheet order
    pub fn scene_rows(&self, scene: i64) -> Vec<Row> {
        self.rows
            .iter()
            .filter(|row| row.scene_number() == Some(scene))
            .cloned()
            .collect()
    }
}

pub struct LoadScenario {
    sheet_config: Arc<dyn SheetConfigRepo>,
    clock: Arc<dyn ClockPort>,
}

impl LoadScenario {
    pub fn new(sheet_config: Arc<dyn SheetConfigRepo>, clock: Arc<dyn ClockPort>) -> Self {
        Self {
            sheet_config,
            clock,
        }
    }

    /// Load a sheet (the first one when `sheet` is `None`).
    ///
    /// The saved mapping for the source is used when there is one, otherwise
    /// roles are detected from the headers. The access is remembered.
    pub fn execute(
        &self,
        source: &dyn SheetSource,
        sheet: Option<&str>,
    ) -> Result<Scenario, ScenarioError> {
        let sheet_name = match sheet {
            Some(name) => name.to_string(),
            None => source
                .sheet_names()?
                .into_iter()
                .next()
                .ok_or(ScenarioError::NoSheets)?,
        };

        let data = source.read_sheet(&sheet_name)?;
        let source_id = source.source_id();
        let mapping = match self.sheet_config.column_mapping(&sheet_key(&source_id))? {
            Some(saved) => saved,
            None => ColumnMapping::detect(&data.headers),
        };
        mapping.validate()?;

        let rows: Vec<Row> = data.rows.iter().map(|row| mapping.apply(row)).collect();
        tracing::info!(
            source = %source_id,
            sheet = %sheet_name,
            rows = rows.len(),
            "Loaded scenario sheet"
        );

        self.sheet_config.record_access(&LastAccess {
            source: source_id,
            sheet_name: sheet_name.clone(),
            accessed_at: self.clock.now(),
        })?;

        Ok(Scenario::new(sheet_name, mapping, rows))
    }

    /// Remember a column mapping for every sheet of `source`.
    pub fn save_mapping(
        &self,
        source: &dyn SheetSource,
        mapping: &ColumnMapping,
    ) -> Result<(), ScenarioError> {
        mapping.validate()?;
        self.sheet_config
            .save_column_mapping(&sheet_key(&source.source_id()), mapping)?;
        Ok(())
    }

    pub fn recent_sources(&self) -> Result<Vec<String>, ScenarioError> {
        Ok(self.sheet_config.recent_sources()?)
    }

    pub fn last_access(&self) -> Result<Option<LastAccess>, ScenarioError> {
        Ok(self.sheet_config.last_access()?)
    }
}
