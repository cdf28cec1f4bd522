//! Character registry management: CRUD, id migration, sheet import/export.

use std::sync::Arc;

use scenescript_domain::common::none_if_blank;
use scenescript_domain::{Character, CharacterName, DirectiveRule, PortraitOverride, StringId};

use crate::infrastructure::ports::{CharacterRepo, DirectiveRuleRepo};
use crate::use_cases::validation::{
    require_min_columns, require_non_empty, require_non_empty_if_present,
};

use super::ManagementError;

/// Import summaries list at most this many error lines
pub const MAX_REPORTED_IMPORT_ERRORS: usize = 5;

const SHEET_HEADER: &str = "String_ID\tKR\tConverter_Name\tName";

/// Input for registering a character
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewCharacter {
    pub name: String,
    pub localized_name: String,
    /// Generated from `name` when absent or blank
    pub string_id: Option<String>,
    /// `None` derives the portrait from the id, `Some("")` disables it
    pub portrait: Option<String>,
}

/// Fields to change on an existing character. The id is not among them; see
/// [`CharacterCrud::rename_string_id`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CharacterUpdate {
    pub name: Option<String>,
    pub localized_name: Option<String>,
    pub portrait: Option<PortraitOverride>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchAddOutcome {
    pub added: Vec<Character>,
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdMigration {
    pub character: Character,
    /// Directive rules whose text referenced the old id
    pub rules_rewritten: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub imported: usize,
    pub skipped: usize,
    pub errors: Vec<String>,
}

impl ImportSummary {
    /// Human-readable summary with a bounded error list.
    pub fn message(&self) -> String {
        let mut message = format!("Imported {} characters", self.imported);
        if self.skipped > 0 {
            message.push_str(&format!(" ({} skipped)", self.skipped));
        }
        if !self.errors.is_empty() {
            message.push_str("\n\nErrors:");
            for error in self.errors.iter().take(MAX_REPORTED_IMPORT_ERRORS) {
                message.push('\n');
                message.push_str(error);
            }
            if self.errors.len() > MAX_REPORTED_IMPORT_ERRORS {
                message.push_str(&format!(
                    "\n... and {} more",
                    self.errors.len() - MAX_REPORTED_IMPORT_ERRORS
                ));
            }
        }
        message
    }
}

pub struct CharacterCrud {
    characters: Arc<dyn CharacterRepo>,
    rules: Arc<dyn DirectiveRuleRepo>,
}

impl CharacterCrud {
    pub fn new(characters: Arc<dyn CharacterRepo>, rules: Arc<dyn DirectiveRuleRepo>) -> Self {
        Self { characters, rules }
    }

    /// All characters sorted by display name
    pub fn list(&self) -> Result<Vec<Character>, ManagementError> {
        let mut characters = self.characters.list()?;
        characters.sort_by(|a, b| a.name().as_str().cmp(b.name().as_str()));
        Ok(characters)
    }

    pub fn get(&self, string_id: &str) -> Result<Option<Character>, ManagementError> {
        let id = StringId::new(string_id)?;
        Ok(self.characters.get(&id)?)
    }

    pub fn create(&self, input: NewCharacter) -> Result<Character, ManagementError> {
        let existing = self.characters.list()?;
        let character = prepare(input, &existing)?;
        self.characters.save(&character)?;
        tracing::info!(string_id = %character.string_id(), name = %character.name(), "Character registered");
        Ok(character)
    }

    /// Register several characters. Each entry is validated on its own,
    /// including against entries accepted earlier in the same batch.
    pub fn create_batch(&self, inputs: Vec<NewCharacter>) -> Result<BatchAddOutcome, ManagementError> {
        let mut known = self.characters.list()?;
        let mut outcome = BatchAddOutcome::default();

        for input in inputs {
            let label = if input.name.trim().is_empty() {
                input.localized_name.clone()
            } else {
                input.name.clone()
            };
            match prepare(input, &known) {
                Ok(character) => {
                    known.push(character.clone());
                    outcome.added.push(character);
                }
                Err(e) => outcome.errors.push(format!("{}: {}", label, e)),
            }
        }

        if !outcome.added.is_empty() {
            self.characters.save_all(&outcome.added)?;
        }
        tracing::info!(
            added = outcome.added.len(),
            failed = outcome.errors.len(),
            "Character batch registered"
        );
        Ok(outcome)
    }

    pub fn update(
        &self,
        string_id: &str,
        update: CharacterUpdate,
    ) -> Result<Character, ManagementError> {
        require_non_empty_if_present(&update.name, "name")?;
        require_non_empty_if_present(&update.localized_name, "localized name")?;

        let id = StringId::new(string_id)?;
        let mut character = self
            .characters
            .get(&id)?
            .ok_or_else(|| ManagementError::NotFound(format!("character '{}'", id)))?;

        if let Some(name) = update.name {
            character.rename(CharacterName::new(name)?);
        }
        if let Some(localized_name) = update.localized_name {
            character.set_localized_name(CharacterName::new(localized_name)?);
        }
        if let Some(portrait) = update.portrait {
            character.set_portrait(portrait);
        }

        let others: Vec<Character> = self
            .characters
            .list()?
            .into_iter()
            .filter(|other| other.string_id() != &id)
            .collect();
        ensure_unambiguous(&character, &others)?;

        self.characters.save(&character)?;
        Ok(character)
    }

    /// Move a character to a new string id and rewrite `[@old]` references
    /// in stored directive rules.
    ///
    /// Rules are rewritten before the character moves. If any step fails,
    /// the rules already saved and the new character record are rolled back
    /// so the old id stays usable.
    pub fn rename_string_id(
        &self,
        old_id: &str,
        new_id: &str,
    ) -> Result<IdMigration, ManagementError> {
        let old = StringId::new(old_id)?;
        let new = StringId::new(new_id)?;
        if old == new {
            return Err(ManagementError::InvalidInput(format!(
                "'{}' is already the character's String_ID",
                new
            )));
        }

        let character = self
            .characters
            .get(&old)?
            .ok_or_else(|| ManagementError::NotFound(format!("character '{}'", old)))?;
        if self.characters.get(&new)?.is_some() {
            return Err(ManagementError::Conflict(format!(
                "String_ID '{}' is already in use",
                new
            )));
        }

        let (from, to) = (old.converter_name(), new.converter_name());
        let rewrites: Vec<(DirectiveRule, DirectiveRule)> = self
            .rules
            .list()?
            .into_iter()
            .filter_map(|original| {
                let mut rewritten = original.clone();
                rewritten
                    .rewrite_text(&from, &to)
                    .then_some((original, rewritten))
            })
            .collect();

        let mut saved = Vec::with_capacity(rewrites.len());
        for (original, rewritten) in &rewrites {
            if let Err(e) = self.rules.save(rewritten) {
                self.restore_rules(&saved);
                return Err(e.into());
            }
            saved.push(original.clone());
        }

        let migrated = character.migrate_string_id(new.clone());
        if let Err(e) = self.characters.save(&migrated) {
            self.restore_rules(&saved);
            return Err(e.into());
        }
        if let Err(e) = self.characters.delete(&old) {
            if let Err(undo) = self.characters.delete(&new) {
                tracing::warn!(string_id = %new, error = %undo, "Could not remove migrated character");
            }
            self.restore_rules(&saved);
            return Err(e.into());
        }
        let rules_rewritten = rewrites.len();

        tracing::info!(
            old_id = %old,
            new_id = %new,
            rules_rewritten,
            "Character String_ID migrated"
        );
        Ok(IdMigration {
            character: migrated,
            rules_rewritten,
        })
    }

    pub fn delete(&self, string_id: &str) -> Result<(), ManagementError> {
        let id = StringId::new(string_id)?;
        if !self.characters.delete(&id)? {
            return Err(ManagementError::NotFound(format!("character '{}'", id)));
        }
        tracing::info!(string_id = %id, "Character deleted");
        Ok(())
    }

    fn restore_rules(&self, originals: &[DirectiveRule]) {
        for rule in originals {
            if let Err(e) = self.rules.save(rule) {
                tracing::warn!(directive = %rule.name(), error = %e, "Could not restore directive rule");
            }
        }
    }

    // =========================================================================
    // Sheet exchange
    // =========================================================================

    /// Import tab-separated rows of `String_ID, KR, Converter_Name, Name`.
    ///
    /// Rows with a blank id or localized name, and marker rows whose id starts
    /// with `[@` or `⬇`, are skipped. A missing Name is derived from the id.
    /// Rows that fail validation are skipped and reported.
    pub fn import_sheet(&self, text: &str) -> Result<ImportSummary, ManagementError> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(true)
            .flexible(true)
            .quoting(false)
            .from_reader(text.as_bytes());

        let headers = reader
            .headers()
            .map_err(|e| ManagementError::InvalidInput(e.to_string()))?;
        require_min_columns(headers.len(), 2, "character sheet")?;

        let mut known = self.characters.list()?;
        let mut summary = ImportSummary::default();
        let mut imported = Vec::new();

        for record in reader.records() {
            let record = record.map_err(|e| ManagementError::InvalidInput(e.to_string()))?;
            let string_id = record.get(0).unwrap_or_default().trim();
            let localized_name = record.get(1).unwrap_or_default().trim();

            if string_id.is_empty()
                || localized_name.is_empty()
                || string_id.starts_with("[@")
                || string_id.starts_with('⬇')
            {
                summary.skipped += 1;
                continue;
            }

            let name = record
                .get(3)
                .and_then(none_if_blank)
                .map(str::to_string)
                .unwrap_or_else(|| display_name_from_id(string_id));

            let input = NewCharacter {
                name,
                localized_name: localized_name.to_string(),
                string_id: Some(string_id.to_string()),
                portrait: None,
            };
            match prepare(input, &known) {
                Ok(character) => {
                    known.push(character.clone());
                    imported.push(character);
                }
                Err(e) => {
                    summary.errors.push(format!("'{}' - {}", string_id, e));
                    summary.skipped += 1;
                }
            }
        }

        if !imported.is_empty() {
            self.characters.save_all(&imported)?;
        }
        summary.imported = imported.len();
        tracing::info!(
            imported = summary.imported,
            skipped = summary.skipped,
            "Character sheet imported"
        );
        Ok(summary)
    }

    /// Export in the import format, sorted by display name.
    pub fn export_sheet(&self) -> Result<String, ManagementError> {
        let mut lines = vec![SHEET_HEADER.to_string()];
        for character in self.list()? {
            lines.push(format!(
                "{}\t{}\t{}\t{}",
                character.string_id(),
                character.localized_name(),
                character.converter_name(),
                character.name()
            ));
        }
        Ok(lines.join("\n"))
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Validate input against the current registry and build the character.
fn prepare(input: NewCharacter, existing: &[Character]) -> Result<Character, ManagementError> {
    require_non_empty(&input.name, "name")?;
    require_non_empty(&input.localized_name, "localized name")?;

    let name = CharacterName::new(input.name)?;
    let localized_name = CharacterName::new(input.localized_name)?;
    let id_taken = |id: &StringId| existing.iter().any(|c| c.string_id() == id);

    let string_id = match input.string_id.filter(|id| !id.trim().is_empty()) {
        Some(custom) => {
            let id = StringId::new(custom)?;
            if id_taken(&id) {
                return Err(ManagementError::Conflict(format!(
                    "String_ID '{}' is already in use",
                    id
                )));
            }
            id
        }
        None => {
            let base = StringId::derive_from_name(name.as_str())?;
            let mut candidate = base.clone();
            let mut n = 1;
            while id_taken(&candidate) {
                candidate = base.with_suffix(n);
                n += 1;
            }
            candidate
        }
    };

    let character = Character::new(string_id, name, localized_name)
        .with_portrait(PortraitOverride::from(input.portrait));
    ensure_unambiguous(&character, existing)?;
    Ok(character)
}

fn ensure_unambiguous(character: &Character, others: &[Character]) -> Result<(), ManagementError> {
    match others.iter().find(|other| character.conflicts_with(other)) {
        Some(other) => Err(ManagementError::Conflict(format!(
            "name '{}' / '{}' clashes with existing character '{}'",
            character.name(),
            character.localized_name(),
            other.string_id()
        ))),
        None => Ok(()),
    }
}

/// `avin_kim` -> `Avin Kim`
fn display_name_from_id(string_id: &str) -> String {
    string_id
        .replace('_', " ")
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
