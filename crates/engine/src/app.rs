//! Application state and composition.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::infrastructure::{
    clock::SystemClock,
    config::AppConfig,
    json_store::{JsonCharacterStore, JsonSettingsStore, JsonSheetConfigStore},
    ports::{
        CharacterRepo, ClockPort, DirectiveRuleRepo, ExpressionRepo, RepoError, SheetConfigRepo,
    },
};
use crate::use_cases;
use crate::use_cases::conversion::ConversionEngine;
use crate::use_cases::management::{CharacterCrud, DirectiveCrud, ExpressionCrud};

/// A store could not be loaded; nothing has been converted.
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    #[error("Failed to load {store} from {path}: {source}")]
    Store {
        store: &'static str,
        path: PathBuf,
        #[source]
        source: RepoError,
    },
}

/// Main application state.
///
/// Holds the registries and the use cases wired over them.
pub struct App {
    pub config: AppConfig,
    pub repositories: Repositories,
    pub use_cases: UseCases,
}

/// Container for all port handles.
pub struct Repositories {
    pub character: Arc<dyn CharacterRepo>,
    pub directive: Arc<dyn DirectiveRuleRepo>,
    pub expression: Arc<dyn ExpressionRepo>,
    pub sheet_config: Arc<dyn SheetConfigRepo>,
    pub clock: Arc<dyn ClockPort>,
}

/// Container for all use cases.
pub struct UseCases {
    pub conversion: use_cases::ConversionUseCases,
    pub scenario: use_cases::LoadScenario,
    pub management: use_cases::ManagementUseCases,
}

impl App {
    /// Load every store named in `config`.
    ///
    /// Missing files start empty; unreadable or corrupted files abort here.
    pub fn open(config: AppConfig) -> Result<Self, SetupError> {
        let characters = Arc::new(open_store("characters", &config.characters_file, |p| {
            JsonCharacterStore::open(p)
        })?);
        let settings = Arc::new(open_store("settings", &config.settings_file, |p| {
            JsonSettingsStore::open(p)
        })?);
        let sheet_config = Arc::new(open_store("sheet config", &config.sheet_config_file, |p| {
            JsonSheetConfigStore::open(p)
        })?);

        tracing::info!(
            characters = %config.characters_file.display(),
            settings = %config.settings_file.display(),
            strict_placeholders = config.strict_placeholders,
            "Stores loaded"
        );

        let repositories = Repositories {
            character: characters,
            directive: settings.clone(),
            expression: settings,
            sheet_config,
            clock: Arc::new(SystemClock::new()),
        };
        Ok(Self::new(config, repositories))
    }

    /// Create a new App with all dependencies wired up.
    pub fn new(config: AppConfig, repositories: Repositories) -> Self {
        let engine = Arc::new(
            ConversionEngine::new(
                repositories.character.clone(),
                repositories.directive.clone(),
                repositories.expression.clone(),
            )
            .with_strict_placeholders(config.strict_placeholders),
        );

        let use_cases = UseCases {
            conversion: use_cases::ConversionUseCases::new(engine),
            scenario: use_cases::LoadScenario::new(
                repositories.sheet_config.clone(),
                repositories.clock.clone(),
            ),
            management: use_cases::ManagementUseCases::new(
                CharacterCrud::new(repositories.character.clone(), repositories.directive.clone()),
                DirectiveCrud::new(repositories.directive.clone()),
                ExpressionCrud::new(repositories.expression.clone()),
            ),
        };

        Self {
            config,
            repositories,
            use_cases,
        }
    }
}

fn open_store<T>(
    store: &'static str,
    path: &Path,
    open: impl FnOnce(&Path) -> Result<T, RepoError>,
) -> Result<T, SetupError> {
    open(path).map_err(|source| {
        tracing::warn!(store, path = %path.display(), error = %source, "Store load failed");
        SetupError::Store {
            store,
            path: path.to_path_buf(),
            source,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn corrupted_store_aborts_setup() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::in_dir(dir.path());
        fs::write(&config.characters_file, "[not, valid").unwrap();

        let err = App::open(config).err().unwrap();
        assert!(err.to_string().starts_with("Failed to load characters from"));
    }

    #[test]
    fn empty_data_dir_opens_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let app = App::open(AppConfig::in_dir(dir.path())).unwrap();

        assert!(app.repositories.character.list().unwrap().is_empty());
        assert_eq!(
            app.repositories.expression.get("슬픔").unwrap().as_deref(),
            Some("Sad")
        );
    }
}
