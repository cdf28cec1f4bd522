//! Runtime configuration read from the environment.
//!
//! | Variable | Default |
//! |---|---|
//! | `SCENESCRIPT_DATA_DIR` | `./data` |
//! | `SCENESCRIPT_CHARACTERS_FILE` | `<data dir>/characters.json` |
//! | `SCENESCRIPT_SETTINGS_FILE` | `<data dir>/settings.json` |
//! | `SCENESCRIPT_SHEET_CONFIG_FILE` | `<data dir>/sheet_config.json` |
//! | `SCENESCRIPT_STRICT_PLACEHOLDERS` | `false` |

use std::path::{Path, PathBuf};

pub const DATA_DIR_ENV: &str = "SCENESCRIPT_DATA_DIR";
pub const CHARACTERS_FILE_ENV: &str = "SCENESCRIPT_CHARACTERS_FILE";
pub const SETTINGS_FILE_ENV: &str = "SCENESCRIPT_SETTINGS_FILE";
pub const SHEET_CONFIG_FILE_ENV: &str = "SCENESCRIPT_SHEET_CONFIG_FILE";
pub const STRICT_PLACEHOLDERS_ENV: &str = "SCENESCRIPT_STRICT_PLACEHOLDERS";

const DEFAULT_DATA_DIR: &str = "data";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub characters_file: PathBuf,
    pub settings_file: PathBuf,
    pub sheet_config_file: PathBuf,
    /// Report template placeholders with no matching column as warnings
    pub strict_placeholders: bool,
}

impl AppConfig {
    /// All stores under one directory with default file names.
    pub fn in_dir(data_dir: impl AsRef<Path>) -> Self {
        let dir = data_dir.as_ref();
        Self {
            characters_file: dir.join("characters.json"),
            settings_file: dir.join("settings.json"),
            sheet_config_file: dir.join("sheet_config.json"),
            strict_placeholders: false,
        }
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup (the environment in production).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let data_dir = lookup(DATA_DIR_ENV)
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DATA_DIR.into());
        let defaults = Self::in_dir(&data_dir);
        let file = |key: &str, default: PathBuf| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or(default)
        };

        Self {
            characters_file: file(CHARACTERS_FILE_ENV, defaults.characters_file),
            settings_file: file(SETTINGS_FILE_ENV, defaults.settings_file),
            sheet_config_file: file(SHEET_CONFIG_FILE_ENV, defaults.sheet_config_file),
            strict_placeholders: lookup(STRICT_PLACEHOLDERS_ENV)
                .map(|v| parse_flag(&v))
                .unwrap_or(false),
        }
    }

    pub fn with_strict_placeholders(mut self, strict: bool) -> Self {
        self.strict_placeholders = strict;
        self
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_live_under_data_dir() {
        let config = AppConfig::from_lookup(lookup(&[]));
        assert_eq!(config.characters_file, Path::new("data").join("characters.json"));
        assert!(!config.strict_placeholders);
    }

    #[test]
    fn explicit_files_override_data_dir() {
        let config = AppConfig::from_lookup(lookup(&[
            (DATA_DIR_ENV, "/srv/scripts"),
            (SETTINGS_FILE_ENV, "/etc/scenescript/settings.json"),
            (STRICT_PLACEHOLDERS_ENV, "TRUE"),
        ]));

        assert_eq!(config.characters_file, Path::new("/srv/scripts/characters.json"));
        assert_eq!(config.settings_file, Path::new("/etc/scenescript/settings.json"));
        assert!(config.strict_placeholders);
    }

    #[test]
    fn unrecognized_flag_values_are_false() {
        let config = AppConfig::from_lookup(lookup(&[(STRICT_PLACEHOLDERS_ENV, "maybe")]));
        assert!(!config.strict_placeholders);
    }
}
