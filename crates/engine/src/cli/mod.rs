//! Command-line interface for converting sheets and managing registries.

mod commands;

pub use commands::run;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use scenescript_domain::{ColumnRole, RuleKindTag};

use crate::infrastructure::config::{AppConfig, DATA_DIR_ENV};

#[derive(Debug, Parser)]
#[command(name = "scenescript")]
#[command(about = "Convert scenario sheets into engine script text", long_about = None)]
pub struct Cli {
    /// Directory holding characters.json, settings.json and sheet_config.json
    #[arg(long, global = true, env = DATA_DIR_ENV)]
    pub data_dir: Option<PathBuf>,

    /// Report template placeholders with no matching column as warnings
    #[arg(long, global = true)]
    pub strict_placeholders: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Environment configuration with command-line overrides applied.
    pub fn config(&self) -> AppConfig {
        let data_dir = self
            .data_dir
            .as_ref()
            .map(|dir| dir.to_string_lossy().into_owned());
        let mut config = AppConfig::from_lookup(|key| {
            if key == DATA_DIR_ENV {
                if let Some(dir) = &data_dir {
                    return Some(dir.clone());
                }
            }
            std::env::var(key).ok()
        });
        if self.strict_placeholders {
            config.strict_placeholders = true;
        }
        config
    }
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Convert a scenario sheet (or one of its scenes) into script text
    Convert {
        /// A .csv/.tsv export, or a directory of them
        source: PathBuf,
        /// Sheet name (file stem); defaults to the first sheet
        #[arg(long)]
        sheet: Option<String>,
        /// Only convert rows of this scene number
        #[arg(long)]
        scene: Option<i64>,
        /// Write the script here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List the sheets of a workbook
    Sheets {
        source: PathBuf,
    },

    /// List the scene numbers of a sheet
    Scenes {
        source: PathBuf,
        #[arg(long)]
        sheet: Option<String>,
    },

    /// Save the column mapping used for a workbook
    Mapping {
        source: PathBuf,
        /// `COLUMN=ROLE`, e.g. `화자=character`; repeatable
        #[arg(long = "map", value_parser = parse_column_role, required = true)]
        columns: Vec<(String, ColumnRole)>,
    },

    /// Show recently opened sources
    Recent,

    /// Manage registered characters
    Characters {
        #[command(subcommand)]
        action: CharacterCommand,
    },

    /// Manage directive rules
    Directives {
        #[command(subcommand)]
        action: DirectiveCommand,
    },

    /// Manage the expression map
    Expressions {
        #[command(subcommand)]
        action: ExpressionCommand,
    },
}

#[derive(Debug, Subcommand)]
pub enum CharacterCommand {
    List,
    Add {
        /// Display name
        name: String,
        /// Localized name as written in sheets
        localized_name: String,
        /// String_ID; generated from the display name when omitted
        #[arg(long)]
        id: Option<String>,
        /// Portrait path prefix, e.g. `avin/avin_`; empty for no portrait
        #[arg(long)]
        portrait: Option<String>,
    },
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        localized_name: Option<String>,
        /// Portrait path prefix
        #[arg(long, conflicts_with_all = ["no_portrait", "derived_portrait"])]
        portrait: Option<String>,
        /// Show no portrait for this character
        #[arg(long, conflicts_with = "derived_portrait")]
        no_portrait: bool,
        /// Go back to the `{id}/{id}_{Expression}.rux` portrait
        #[arg(long)]
        derived_portrait: bool,
    },
    Delete {
        id: String,
    },
    /// Change a String_ID and rewrite references in directive rules
    RenameId {
        old_id: String,
        new_id: String,
    },
    /// Import a tab-separated sheet (String_ID, KR, Converter_Name, Name)
    Import {
        file: PathBuf,
    },
    /// Export in the import format
    Export {
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RuleKindArg {
    Template,
    Simple,
    Builtin,
}

impl From<RuleKindArg> for RuleKindTag {
    fn from(kind: RuleKindArg) -> Self {
        match kind {
            RuleKindArg::Template => RuleKindTag::Template,
            RuleKindArg::Simple => RuleKindTag::Simple,
            RuleKindArg::Builtin => RuleKindTag::Builtin,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum DirectiveCommand {
    List,
    Add {
        name: String,
        /// Rule text; `\n` becomes a line break, `{{column}}` a cell value
        text: String,
        #[arg(long, value_enum, default_value_t = RuleKindArg::Template)]
        kind: RuleKindArg,
    },
    Delete {
        name: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum ExpressionCommand {
    List,
    Set { label: String, suffix: String },
    Remove { label: String },
}

fn parse_column_role(value: &str) -> Result<(String, ColumnRole), String> {
    let (column, role) = value
        .split_once('=')
        .ok_or_else(|| format!("expected COLUMN=ROLE, got '{}'", value))?;
    if column.trim().is_empty() {
        return Err(format!("missing column name in '{}'", value));
    }
    let role = role.parse::<ColumnRole>().map_err(|e| e.to_string())?;
    Ok((column.trim().to_string(), role))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_convert_with_scene() {
        let cli = Cli::try_parse_from([
            "scenescript",
            "convert",
            "ch1.csv",
            "--scene",
            "3",
            "-o",
            "out.txt",
        ])
        .unwrap();

        match cli.command {
            Commands::Convert { source, scene, output, sheet } => {
                assert_eq!(source, PathBuf::from("ch1.csv"));
                assert_eq!(scene, Some(3));
                assert_eq!(output, Some(PathBuf::from("out.txt")));
                assert_eq!(sheet, None);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn parses_mapping_pairs() {
        let cli = Cli::try_parse_from([
            "scenescript",
            "mapping",
            "ch1.csv",
            "--map",
            "화자=character",
            "--map",
            "줄=dialogue",
        ])
        .unwrap();

        let Commands::Mapping { columns, .. } = cli.command else {
            panic!("expected mapping command");
        };
        assert_eq!(columns[0], ("화자".to_string(), ColumnRole::Character));
        assert_eq!(columns[1].1, ColumnRole::Dialogue);
    }

    #[test]
    fn rejects_malformed_mapping() {
        assert!(parse_column_role("character").is_err());
        assert!(parse_column_role("=dialogue").is_err());
        assert!(parse_column_role("a=not_a_role").is_err());
    }

    #[test]
    fn portrait_flags_conflict() {
        let result = Cli::try_parse_from([
            "scenescript",
            "characters",
            "update",
            "sam",
            "--no-portrait",
            "--derived-portrait",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn directive_kind_defaults_to_template() {
        let cli =
            Cli::try_parse_from(["scenescript", "directives", "add", "장면", "#{{dialogue}}"]).unwrap();
        let Commands::Directives {
            action: DirectiveCommand::Add { kind, .. },
        } = cli.command
        else {
            panic!("expected directives add");
        };
        assert_eq!(kind, RuleKindArg::Template);
    }

    #[test]
    fn data_dir_flag_overrides_config_location() {
        let cli = Cli::try_parse_from([
            "scenescript",
            "--data-dir",
            "/tmp/scenes",
            "--strict-placeholders",
            "recent",
        ])
        .unwrap();
        let config = cli.config();

        assert!(config.strict_placeholders);
        assert!(config.settings_file.starts_with("/tmp/scenes"));
    }
}
