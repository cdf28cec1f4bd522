//! Command execution against a composed [`App`].

use std::fs;
use std::io::Write;

use anyhow::Context;

use scenescript_domain::{Character, ColumnMapping, PortraitOverride};

use super::{CharacterCommand, Commands, DirectiveCommand, ExpressionCommand};
use crate::app::App;
use crate::infrastructure::sheets::CsvWorkbook;
use crate::infrastructure::ports::SheetSource;
use crate::use_cases::conversion::BatchReport;
use crate::use_cases::management::{CharacterUpdate, NewCharacter};

/// Run one command, writing human-readable output to `out`.
pub fn run(app: &App, command: Commands, out: &mut dyn Write) -> anyhow::Result<()> {
    match command {
        Commands::Convert {
            source,
            sheet,
            scene,
            output,
        } => {
            let workbook = CsvWorkbook::open(&source)
                .with_context(|| format!("opening {}", source.display()))?;
            let scenario = app.use_cases.scenario.execute(&workbook, sheet.as_deref())?;
            let rows = match scene {
                Some(number) => scenario.scene_rows(number),
                None => scenario.rows().to_vec(),
            };

            let report = app
                .use_cases
                .conversion
                .batch
                .convert_with_progress(&rows, |fraction| {
                    tracing::trace!(progress = fraction, "Converting");
                });

            match output {
                Some(path) => {
                    fs::write(&path, report.script())
                        .with_context(|| format!("writing {}", path.display()))?;
                    writeln!(out, "Wrote {}", path.display())?;
                    write_report(&report, out)?;
                }
                None => {
                    writeln!(out, "{}", report.script())?;
                    log_problems(&report);
                }
            }
        }

        Commands::Sheets { source } => {
            let workbook = CsvWorkbook::open(&source)?;
            for name in workbook.sheet_names()? {
                writeln!(out, "{}", name)?;
            }
        }

        Commands::Scenes { source, sheet } => {
            let workbook = CsvWorkbook::open(&source)?;
            let scenario = app.use_cases.scenario.execute(&workbook, sheet.as_deref())?;
            for number in scenario.scene_numbers() {
                writeln!(out, "{}\t{} rows", number, scenario.scene_rows(number).len())?;
            }
        }

        Commands::Mapping { source, columns } => {
            let workbook = CsvWorkbook::open(&source)?;
            let mapping = columns
                .iter()
                .fold(ColumnMapping::new(), |mapping, (column, role)| {
                    mapping.with(column, *role)
                });
            app.use_cases.scenario.save_mapping(&workbook, &mapping)?;
            for (column, role) in mapping.iter() {
                writeln!(out, "{} -> {}", column, role)?;
            }
        }

        Commands::Recent => {
            if let Some(last) = app.use_cases.scenario.last_access()? {
                writeln!(
                    out,
                    "Last: {} [{}] at {}",
                    last.source,
                    last.sheet_name,
                    last.accessed_at.to_rfc3339()
                )?;
            }
            for source in app.use_cases.scenario.recent_sources()? {
                writeln!(out, "{}", source)?;
            }
        }

        Commands::Characters { action } => run_characters(app, action, out)?,
        Commands::Directives { action } => run_directives(app, action, out)?,
        Commands::Expressions { action } => run_expressions(app, action, out)?,
    }
    Ok(())
}

fn run_characters(app: &App, action: CharacterCommand, out: &mut dyn Write) -> anyhow::Result<()> {
    let crud = &app.use_cases.management.character;
    match action {
        CharacterCommand::List => {
            for character in crud.list()? {
                writeln!(out, "{}", describe(&character))?;
            }
        }
        CharacterCommand::Add {
            name,
            localized_name,
            id,
            portrait,
        } => {
            let character = crud.create(NewCharacter {
                name,
                localized_name,
                string_id: id,
                portrait,
            })?;
            writeln!(out, "Added {}", describe(&character))?;
        }
        CharacterCommand::Update {
            id,
            name,
            localized_name,
            portrait,
            no_portrait,
            derived_portrait,
        } => {
            let portrait = if no_portrait {
                Some(PortraitOverride::Disabled)
            } else if derived_portrait {
                Some(PortraitOverride::Derived)
            } else {
                portrait.map(|p| PortraitOverride::from(Some(p)))
            };
            let character = crud.update(
                &id,
                CharacterUpdate {
                    name,
                    localized_name,
                    portrait,
                },
            )?;
            writeln!(out, "Updated {}", describe(&character))?;
        }
        CharacterCommand::Delete { id } => {
            crud.delete(&id)?;
            writeln!(out, "Deleted {}", id)?;
        }
        CharacterCommand::RenameId { old_id, new_id } => {
            let migration = crud.rename_string_id(&old_id, &new_id)?;
            writeln!(
                out,
                "Renamed {} -> {} ({} rules rewritten)",
                old_id,
                migration.character.string_id(),
                migration.rules_rewritten
            )?;
        }
        CharacterCommand::Import { file } => {
            let text = fs::read_to_string(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            let summary = crud.import_sheet(&text)?;
            writeln!(out, "{}", summary.message())?;
        }
        CharacterCommand::Export { output } => {
            let sheet = crud.export_sheet()?;
            match output {
                Some(path) => {
                    fs::write(&path, sheet)
                        .with_context(|| format!("writing {}", path.display()))?;
                    writeln!(out, "Wrote {}", path.display())?;
                }
                None => writeln!(out, "{}", sheet)?,
            }
        }
    }
    Ok(())
}

fn run_directives(app: &App, action: DirectiveCommand, out: &mut dyn Write) -> anyhow::Result<()> {
    let crud = &app.use_cases.management.directive;
    match action {
        DirectiveCommand::List => {
            for rule in crud.list()? {
                writeln!(
                    out,
                    "{}\t{}\t{}",
                    rule.name(),
                    rule.kind().tag(),
                    rule.kind().text().unwrap_or_default()
                )?;
            }
            writeln!(out, "built-in: {}", crud.builtin_names().join(", "))?;
        }
        DirectiveCommand::Add { name, text, kind } => {
            let rule = crud.add(&name, kind.into(), &text)?;
            writeln!(out, "Added {} rule '{}'", rule.kind().tag(), rule.name())?;
        }
        DirectiveCommand::Delete { name } => {
            crud.delete(&name)?;
            writeln!(out, "Deleted '{}'", name)?;
        }
    }
    Ok(())
}

fn run_expressions(
    app: &App,
    action: ExpressionCommand,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    let crud = &app.use_cases.management.expression;
    let map = match action {
        ExpressionCommand::List => crud.list()?,
        ExpressionCommand::Set { label, suffix } => crud.set(&label, &suffix)?,
        ExpressionCommand::Remove { label } => crud.remove(&label)?,
    };
    for (label, suffix) in map.iter() {
        writeln!(out, "{}\t{}", label, suffix)?;
    }
    Ok(())
}

fn describe(character: &Character) -> String {
    let portrait = match character.portrait() {
        PortraitOverride::Derived => String::new(),
        PortraitOverride::Disabled => "\t(no portrait)".to_string(),
        PortraitOverride::Path(prefix) => format!("\t{}", prefix),
    };
    format!(
        "{}\t{}\t{}{}",
        character.converter_name(),
        character.name(),
        character.localized_name(),
        portrait
    )
}

fn write_report(report: &BatchReport, out: &mut dyn Write) -> anyhow::Result<()> {
    writeln!(out, "{}", report.summary())?;
    for (ordinal, result) in report.errors().chain(report.warnings()) {
        writeln!(
            out,
            "{} row {}: {}",
            result.status().marker(),
            ordinal,
            result.message()
        )?;
    }
    let unregistered = report.unregistered_characters();
    if !unregistered.is_empty() {
        writeln!(out, "Unregistered characters: {}", unregistered.join(", "))?;
    }
    Ok(())
}

fn log_problems(report: &BatchReport) {
    for (ordinal, result) in report.errors() {
        tracing::warn!(row = ordinal, message = %result.message(), "Row not converted");
    }
    for (ordinal, result) in report.warnings() {
        tracing::info!(row = ordinal, message = %result.message(), "Row converted with warning");
    }
    let unregistered = report.unregistered_characters();
    if !unregistered.is_empty() {
        tracing::warn!(characters = %unregistered.join(", "), "Unregistered characters");
    }
}
