//! Remembered scenario sources and per-sheet column mappings.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{LazyLock, RwLock};

use regex_lite::Regex;
use serde::{Deserialize, Serialize};

use scenescript_domain::ColumnMapping;

use super::{commit, load_or_default, read_lock};
use crate::infrastructure::ports::{LastAccess, RepoError, SheetConfigRepo};

pub const MAX_RECENT_SOURCES: usize = 5;

static SPREADSHEET_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/spreadsheets/d/([a-zA-Z0-9_-]+)").expect("valid regex"));

/// Key under which a source's column mapping is stored.
///
/// Spreadsheet URLs collapse to their document id so that different tabs or
/// query strings of the same document share one mapping. Anything else (a
/// local path) is used as-is.
pub fn sheet_key(source: &str) -> String {
    SPREADSHEET_ID_RE
        .captures(source)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| source.trim().to_string())
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct SheetConfigDocument {
    #[serde(default)]
    last_access: Option<LastAccess>,
    #[serde(default)]
    recent_sources: Vec<String>,
    #[serde(default)]
    column_mappings: BTreeMap<String, ColumnMapping>,
}

pub struct JsonSheetConfigStore {
    path: Option<PathBuf>,
    document: RwLock<SheetConfigDocument>,
}

impl JsonSheetConfigStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, RepoError> {
        let path = path.as_ref().to_path_buf();
        let document = load_or_default(&path)?;
        Ok(Self {
            path: Some(path),
            document: RwLock::new(document),
        })
    }

    pub fn in_memory() -> Self {
        Self {
            path: None,
            document: RwLock::new(SheetConfigDocument::default()),
        }
    }

    fn commit(
        &self,
        operation: &'static str,
        change: impl FnOnce(&mut SheetConfigDocument),
    ) -> Result<(), RepoError> {
        commit(&self.document, self.path.as_deref(), operation, |document| {
            change(document);
            true
        })?;
        Ok(())
    }
}

impl SheetConfigRepo for JsonSheetConfigStore {
    fn record_access(&self, access: &LastAccess) -> Result<(), RepoError> {
        self.commit("sheet_config.record_access", |document| {
            document.recent_sources.retain(|s| s != &access.source);
            document.recent_sources.insert(0, access.source.clone());
            document.recent_sources.truncate(MAX_RECENT_SOURCES);
            document.last_access = Some(access.clone());
        })
    }

    fn last_access(&self) -> Result<Option<LastAccess>, RepoError> {
        let document = read_lock(&self.document, "sheet_config.last_access")?;
        Ok(document.last_access.clone())
    }

    fn recent_sources(&self) -> Result<Vec<String>, RepoError> {
        let document = read_lock(&self.document, "sheet_config.recent_sources")?;
        Ok(document.recent_sources.clone())
    }

    fn column_mapping(&self, sheet_key: &str) -> Result<Option<ColumnMapping>, RepoError> {
        let document = read_lock(&self.document, "sheet_config.column_mapping")?;
        Ok(document.column_mappings.get(sheet_key).cloned())
    }

    fn save_column_mapping(
        &self,
        sheet_key: &str,
        mapping: &ColumnMapping,
    ) -> Result<(), RepoError> {
        self.commit("sheet_config.save_column_mapping", |document| {
            document
                .column_mappings
                .insert(sheet_key.to_string(), mapping.clone());
        })
    }

    fn clear(&self) -> Result<(), RepoError> {
        self.commit("sheet_config.clear", |document| {
            *document = SheetConfigDocument::default();
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use scenescript_domain::ColumnRole;

    fn access(source: &str) -> LastAccess {
        LastAccess {
            source: source.to_string(),
            sheet_name: "Sheet1".to_string(),
            accessed_at: Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap(),
        }
    }

    #[test]
    fn spreadsheet_urls_collapse_to_document_id() {
        assert_eq!(
            sheet_key("https://docs.google.com/spreadsheets/d/1AbC-d_E/edit#gid=0"),
            "1AbC-d_E"
        );
        assert_eq!(sheet_key(" scenes/ch1.csv "), "scenes/ch1.csv");
    }

    #[test]
    fn recent_sources_are_newest_first_and_bounded() {
        let store = JsonSheetConfigStore::in_memory();
        for i in 0..7 {
            store.record_access(&access(&format!("s{}", i))).unwrap();
        }
        store.record_access(&access("s3")).unwrap();

        let recent = store.recent_sources().unwrap();
        assert_eq!(recent.len(), MAX_RECENT_SOURCES);
        assert_eq!(recent[0], "s3");
        assert_eq!(recent[1], "s6");
        assert_eq!(recent.iter().filter(|s| *s == "s3").count(), 1);
        assert_eq!(store.last_access().unwrap().unwrap().source, "s3");
    }

    #[test]
    fn mappings_persist_per_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sheet_config.json");
        let mapping = ColumnMapping::new()
            .with("화자", ColumnRole::Character)
            .with("대사", ColumnRole::Dialogue);

        let store = JsonSheetConfigStore::open(&path).unwrap();
        store.save_column_mapping("doc1", &mapping).unwrap();
        store.record_access(&access("doc1")).unwrap();
        drop(store);

        let reopened = JsonSheetConfigStore::open(&path).unwrap();
        assert_eq!(reopened.column_mapping("doc1").unwrap(), Some(mapping));
        assert_eq!(reopened.column_mapping("doc2").unwrap(), None);
        assert_eq!(reopened.last_access().unwrap(), Some(access("doc1")));
    }

    #[test]
    fn failed_write_does_not_record_the_access() {
        let dir = tempfile::tempdir().unwrap();
        let store =
            JsonSheetConfigStore::open(dir.path().join("blocker").join("sheet_config.json"))
                .unwrap();
        std::fs::write(dir.path().join("blocker"), "").unwrap();

        assert!(store.record_access(&access("doc1")).is_err());
        assert!(store.recent_sources().unwrap().is_empty());
        assert!(store.last_access().unwrap().is_none());
    }

    #[test]
    fn clear_forgets_everything() {
        let store = JsonSheetConfigStore::in_memory();
        store.record_access(&access("doc1")).unwrap();
        store.clear().unwrap();

        assert!(store.recent_sources().unwrap().is_empty());
        assert!(store.last_access().unwrap().is_none());
    }
}
