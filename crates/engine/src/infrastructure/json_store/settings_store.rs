//! Expression map and directive rules persisted in one settings document.

use std::path::{Path, PathBuf};
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

use scenescript_domain::{DirectiveRule, ExpressionMap};

use super::{commit, load_or_default, read_lock};
use crate::infrastructure::ports::{DirectiveRuleRepo, ExpressionRepo, RepoError};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct SettingsDocument {
    #[serde(default)]
    expressions: ExpressionMap,
    #[serde(default)]
    directives: Vec<DirectiveRule>,
}

pub struct JsonSettingsStore {
    path: Option<PathBuf>,
    document: RwLock<SettingsDocument>,
}

impl JsonSettingsStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, RepoError> {
        let path = path.as_ref().to_path_buf();
        let document: SettingsDocument = load_or_default(&path)?;
        tracing::debug!(
            path = %path.display(),
            expressions = document.expressions.len(),
            directives = document.directives.len(),
            "Loaded conversion settings"
        );
        Ok(Self {
            path: Some(path),
            document: RwLock::new(document),
        })
    }

    /// In-memory settings seeded with the standard expression map and no rules.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            document: RwLock::new(SettingsDocument::default()),
        }
    }

    #[cfg(test)]
    pub fn with_rules(self, rules: impl IntoIterator<Item = DirectiveRule>) -> Self {
        let mut document = self
            .document
            .into_inner()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        document.directives.extend(rules);
        Self {
            path: self.path,
            document: RwLock::new(document),
        }
    }

    fn commit(
        &self,
        operation: &'static str,
        change: impl FnOnce(&mut SettingsDocument) -> bool,
    ) -> Result<bool, RepoError> {
        commit(&self.document, self.path.as_deref(), operation, change)
    }
}

impl ExpressionRepo for JsonSettingsStore {
    fn get(&self, label: &str) -> Result<Option<String>, RepoError> {
        let document = read_lock(&self.document, "expressions.get")?;
        Ok(document.expressions.get(label).map(str::to_string))
    }

    fn load(&self) -> Result<ExpressionMap, RepoError> {
        let document = read_lock(&self.document, "expressions.load")?;
        Ok(document.expressions.clone())
    }

    fn replace(&self, map: &ExpressionMap) -> Result<(), RepoError> {
        self.commit("expressions.replace", |document| {
            document.expressions = map.clone();
            true
        })?;
        Ok(())
    }
}

impl DirectiveRuleRepo for JsonSettingsStore {
    fn get(&self, name: &str) -> Result<Option<DirectiveRule>, RepoError> {
        let document = read_lock(&self.document, "directives.get")?;
        Ok(document
            .directives
            .iter()
            .find(|rule| rule.name() == name)
            .cloned())
    }

    fn list(&self) -> Result<Vec<DirectiveRule>, RepoError> {
        let document = read_lock(&self.document, "directives.list")?;
        Ok(document.directives.clone())
    }

    fn save(&self, rule: &DirectiveRule) -> Result<(), RepoError> {
        self.commit("directives.save", |document| {
            match document
                .directives
                .iter_mut()
                .find(|existing| existing.name() == rule.name())
            {
                Some(existing) => *existing = rule.clone(),
                None => document.directives.push(rule.clone()),
            }
            true
        })?;
        Ok(())
    }

    fn delete(&self, name: &str) -> Result<bool, RepoError> {
        self.commit("directives.delete", |document| {
            let before = document.directives.len();
            document.directives.retain(|rule| rule.name() != name);
            document.directives.len() != before
        })
    }
}
