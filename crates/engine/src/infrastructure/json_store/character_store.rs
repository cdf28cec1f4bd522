//! Character registry persisted as a JSON object keyed by string id.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use scenescript_domain::{Character, StringId};

use super::{commit, load_or_default, read_lock};
use crate::infrastructure::ports::{CharacterRepo, RepoError};

type Registry = BTreeMap<StringId, Character>;

pub struct JsonCharacterStore {
    path: Option<PathBuf>,
    characters: RwLock<Registry>,
}

impl JsonCharacterStore {
    /// Open the registry at `path`; a missing file is an empty registry.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, RepoError> {
        let path = path.as_ref().to_path_buf();
        let characters: Registry = load_or_default(&path)?;
        tracing::debug!(
            path = %path.display(),
            count = characters.len(),
            "Loaded character registry"
        );
        Ok(Self {
            path: Some(path),
            characters: RwLock::new(characters),
        })
    }

    pub fn in_memory() -> Self {
        Self {
            path: None,
            characters: RwLock::new(Registry::new()),
        }
    }

    pub fn with_characters(characters: impl IntoIterator<Item = Character>) -> Self {
        let registry = characters
            .into_iter()
            .map(|c| (c.string_id().clone(), c))
            .collect();
        Self {
            path: None,
            characters: RwLock::new(registry),
        }
    }

    fn find(&self, predicate: impl Fn(&Character) -> bool) -> Result<Option<Character>, RepoError> {
        let registry = read_lock(&self.characters, "characters.find")?;
        Ok(registry.values().find(|c| predicate(c)).cloned())
    }
}

impl CharacterRepo for JsonCharacterStore {
    fn get(&self, id: &StringId) -> Result<Option<Character>, RepoError> {
        let registry = read_lock(&self.characters, "characters.get")?;
        Ok(registry.get(id).cloned())
    }

    fn find_by_localized_name(&self, name: &str) -> Result<Option<Character>, RepoError> {
        self.find(|c| c.has_localized_name(name))
    }

    fn find_by_display_name(&self, name: &str) -> Result<Option<Character>, RepoError> {
        self.find(|c| c.has_display_name(name))
    }

    fn list(&self) -> Result<Vec<Character>, RepoError> {
        let registry = read_lock(&self.characters, "characters.list")?;
        Ok(registry.values().cloned().collect())
    }

    fn save(&self, character: &Character) -> Result<(), RepoError> {
        self.save_all(std::slice::from_ref(character))
    }

    fn save_all(&self, characters: &[Character]) -> Result<(), RepoError> {
        commit(
            &self.characters,
            self.path.as_deref(),
            "characters.save",
            |registry| {
                for character in characters {
                    registry.insert(character.string_id().clone(), character.clone());
                }
                true
            },
        )?;
        Ok(())
    }

    fn delete(&self, id: &StringId) -> Result<bool, RepoError> {
        commit(
            &self.characters,
            self.path.as_deref(),
            "characters.delete",
            |registry| registry.remove(id).is_some(),
        )
    }
}
