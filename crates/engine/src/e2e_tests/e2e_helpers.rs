//! Helpers for building an App over a temp data directory.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::{TimeZone, Utc};
use clap::Parser;
use tempfile::TempDir;

use crate::app::{App, Repositories};
use crate::cli::{self, Cli};
use crate::infrastructure::clock::FixedClock;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::json_store::{JsonCharacterStore, JsonSettingsStore, JsonSheetConfigStore};

/// A data directory plus a place for scenario sheets.
pub struct TestWorkspace {
    pub dir: TempDir,
}

impl TestWorkspace {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("temp dir"),
        }
    }

    pub fn config(&self) -> AppConfig {
        AppConfig::in_dir(self.dir.path().join("data"))
    }

    /// Compose an App over the workspace stores with a fixed clock.
    pub fn app(&self) -> App {
        self.app_with(self.config())
    }

    pub fn app_with(&self, config: AppConfig) -> App {
        let settings = Arc::new(JsonSettingsStore::open(&config.settings_file).expect("settings"));
        let repositories = Repositories {
            character: Arc::new(
                JsonCharacterStore::open(&config.characters_file).expect("characters"),
            ),
            directive: settings.clone(),
            expression: settings,
            sheet_config: Arc::new(
                JsonSheetConfigStore::open(&config.sheet_config_file).expect("sheet config"),
            ),
            clock: Arc::new(FixedClock(
                Utc.with_ymd_and_hms(2026, 10, 1, 12, 0, 0).unwrap(),
            )),
        };
        App::new(config, repositories)
    }

    /// Write a scenario sheet next to the data directory.
    pub fn write_sheet(&self, file_name: &str, contents: &str) -> PathBuf {
        let dir = self.dir.path().join("sheets");
        fs::create_dir_all(&dir).expect("sheets dir");
        let path = dir.join(file_name);
        fs::write(&path, contents).expect("write sheet");
        path
    }

    /// Run a CLI command against a fresh App and return its stdout.
    pub fn run(&self, args: &[&str]) -> anyhow::Result<String> {
        let mut argv = vec!["scenescript"];
        argv.extend_from_slice(args);
        let parsed = Cli::try_parse_from(argv)?;

        let app = self.app();
        let mut out = Vec::new();
        cli::run(&app, parsed.command, &mut out)?;
        Ok(String::from_utf8(out)?)
    }

    pub fn path_str(path: &std::path::Path) -> String {
        path.to_string_lossy().into_owned()
    }
}

/// A chapter in the layout writers use: scene number, directive, speaker,
/// line, string id, expression, sound address, sound file.
pub const CHAPTER_ONE_CSV: &str = "\
씬 번호,지시문,캐릭터,대사,STRING_ID,표정,사운드 주소,사운드 파일
1,대사,Sam,Hello,greet01,화남,event:/a/,f1
1,카메라,,,,,,
1,장면,,The sun sets,,,,
2,대사,샘,\"Wait,
please\",,슬픔,event:/a/,f2
2,대사,Mina,Who?,who01,,,
2,자막,,Years later,sub01,,event:/n/,n1
2,대사,Sam,...,,,,
";
