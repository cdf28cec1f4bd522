//! JSON file-backed stores.
//!
//! Each store keeps its state in memory behind a lock and rewrites its file
//! after every mutation. The in-memory state only changes once the file write
//! has succeeded. A store opened without a path is purely in-memory.

mod character_store;
mod settings_store;
mod sheet_config_store;

pub use character_store::JsonCharacterStore;
pub use settings_store::JsonSettingsStore;
pub use sheet_config_store::{sheet_key, JsonSheetConfigStore, MAX_RECENT_SOURCES};

use std::fs;
use std::path::Path;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::infrastructure::ports::RepoError;

/// Read a JSON document, falling back to `T::default()` when the file is absent.
pub(crate) fn load_or_default<T>(path: &Path) -> Result<T, RepoError>
where
    T: DeserializeOwned + Default,
{
    if !path.exists() {
        tracing::debug!(path = %path.display(), "Store file missing, starting empty");
        return Ok(T::default());
    }

    let text = fs::read_to_string(path)
        .map_err(|e| RepoError::storage("json_store.load", format!("{}: {}", path.display(), e)))?;
    if text.trim().is_empty() {
        return Ok(T::default());
    }

    serde_json::from_str(&text)
        .map_err(|e| RepoError::serialization(format!("{}: {}", path.display(), e)))
}

/// Write a JSON document with pretty formatting, creating parent directories.
pub(crate) fn write_pretty<T>(path: &Path, value: &T) -> Result<(), RepoError>
where
    T: Serialize + ?Sized,
{
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            RepoError::storage("json_store.save", format!("{}: {}", parent.display(), e))
        })?;
    }

    let json = serde_json::to_string_pretty(value).map_err(RepoError::serialization)?;
    fs::write(path, json)
        .map_err(|e| RepoError::storage("json_store.save", format!("{}: {}", path.display(), e)))
}

/// Apply `change` to a copy of the locked state, write the copy to `path`,
/// then install it.
///
/// `change` reports whether it modified anything; an unmodified copy is
/// dropped without touching the file. On a failed write the locked state is
/// left as it was.
pub(crate) fn commit<T>(
    lock: &RwLock<T>,
    path: Option<&Path>,
    operation: &'static str,
    change: impl FnOnce(&mut T) -> bool,
) -> Result<bool, RepoError>
where
    T: Clone + Serialize,
{
    let mut current = write_lock(lock, operation)?;
    let mut next = current.clone();
    if !change(&mut next) {
        return Ok(false);
    }
    if let Some(path) = path {
        write_pretty(path, &next)?;
    }
    *current = next;
    Ok(true)
}

pub(crate) fn read_lock<'a, T>(
    lock: &'a RwLock<T>,
    operation: &'static str,
) -> Result<RwLockReadGuard<'a, T>, RepoError> {
    lock.read()
        .map_err(|_| RepoError::storage(operation, "store lock poisoned"))
}

pub(crate) fn write_lock<'a, T>(
    lock: &'a RwLock<T>,
    operation: &'static str,
) -> Result<RwLockWriteGuard<'a, T>, RepoError> {
    lock.write()
        .map_err(|_| RepoError::storage(operation, "store lock poisoned"))
}
