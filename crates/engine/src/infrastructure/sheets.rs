//! Scenario sheets read from CSV/TSV exports.
//!
//! A workbook is either a single export file (one sheet named after the file
//! stem) or a directory whose `.csv`/`.tsv` files are its sheets.

use std::fs;
use std::path::{Path, PathBuf};

use scenescript_domain::common::is_blank;
use scenescript_domain::Row;

use crate::infrastructure::ports::{RepoError, SheetData, SheetSource};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetFormat {
    Csv,
    Tsv,
}

impl SheetFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" => Some(Self::Csv),
            "tsv" | "tab" => Some(Self::Tsv),
            _ => None,
        }
    }

    pub fn delimiter(&self) -> u8 {
        match self {
            Self::Csv => b',',
            Self::Tsv => b'\t',
        }
    }
}

/// Parse an exported sheet. Fully blank lines are skipped; short lines are
/// padded with empty cells.
pub fn parse_sheet(name: &str, text: &str, format: SheetFormat) -> Result<SheetData, RepoError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(format.delimiter())
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| RepoError::serialization(format!("sheet '{}': {}", name, e)))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record =
            record.map_err(|e| RepoError::serialization(format!("sheet '{}': {}", name, e)))?;
        if record.iter().all(is_blank) {
            continue;
        }
        let cells = headers
            .iter()
            .enumerate()
            .map(|(i, header)| (header.as_str(), record.get(i).unwrap_or_default()));
        rows.push(Row::from_pairs(cells));
    }

    Ok(SheetData {
        name: name.to_string(),
        headers,
        rows,
    })
}

pub struct CsvWorkbook {
    root: PathBuf,
    sheets: Vec<(String, PathBuf)>,
}

impl CsvWorkbook {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, RepoError> {
        let root = path.as_ref().to_path_buf();
        let mut sheets = Vec::new();

        if root.is_dir() {
            let entries = fs::read_dir(&root).map_err(|e| {
                RepoError::storage("workbook.open", format!("{}: {}", root.display(), e))
            })?;
            for entry in entries {
                let entry = entry.map_err(|e| RepoError::storage("workbook.open", e))?;
                let file = entry.path();
                if file.is_file() && SheetFormat::from_path(&file).is_some() {
                    sheets.push((sheet_name(&file), file));
                }
            }
            sheets.sort_by(|a, b| a.0.cmp(&b.0));
        } else if root.is_file() {
            if SheetFormat::from_path(&root).is_none() {
                return Err(RepoError::constraint(format!(
                    "{} is not a .csv or .tsv export",
                    root.display()
                )));
            }
            sheets.push((sheet_name(&root), root.clone()));
        } else {
            return Err(RepoError::not_found("Workbook", root.display()));
        }

        tracing::debug!(path = %root.display(), sheets = sheets.len(), "Opened workbook");
        Ok(Self { root, sheets })
    }
}

fn sheet_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

impl SheetSource for CsvWorkbook {
    fn source_id(&self) -> String {
        self.root.display().to_string()
    }

    fn sheet_names(&self) -> Result<Vec<String>, RepoError> {
        Ok(self.sheets.iter().map(|(name, _)| name.clone()).collect())
    }

    fn read_sheet(&self, name: &str) -> Result<SheetData, RepoError> {
        let (_, path) = self
            .sheets
            .iter()
            .find(|(sheet, _)| sheet == name)
            .ok_or_else(|| RepoError::not_found("Sheet", name))?;
        let format = SheetFormat::from_path(path)
            .ok_or_else(|| RepoError::constraint(format!("unsupported sheet file {}", path.display())))?;
        let text = fs::read_to_string(path).map_err(|e| {
            RepoError::storage("workbook.read_sheet", format!("{}: {}", path.display(), e))
        })?;
        parse_sheet(name, &text, format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_csv_with_quoted_multiline_cells() {
        let text = "캐릭터,대사,지시문\nSam,\"Hello,\nthere\",대사\n,,\n";
        let sheet = parse_sheet("ch1", text, SheetFormat::Csv).unwrap();

        assert_eq!(sheet.headers, vec!["캐릭터", "대사", "지시문"]);
        assert_eq!(sheet.rows.len(), 1);
        assert_eq!(sheet.rows[0].get("대사"), "Hello,\nthere");
    }

    #[test]
    fn short_tsv_lines_are_padded() {
        let text = "\u{feff}캐릭터\t대사\t표정\nSam\tHi\n";
        let sheet = parse_sheet("ch1", text, SheetFormat::Tsv).unwrap();

        assert_eq!(sheet.headers[0], "캐릭터");
        assert_eq!(sheet.rows[0].get("표정"), "");
        assert!(sheet.rows[0].contains("표정"));
    }

    #[test]
    fn directory_workbook_lists_sheets_by_stem() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b_scene.csv"), "캐릭터,대사\nSam,Hi\n").unwrap();
        fs::write(dir.path().join("a_scene.tsv"), "캐릭터\t대사\n").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let workbook = CsvWorkbook::open(dir.path()).unwrap();
        assert_eq!(workbook.sheet_names().unwrap(), vec!["a_scene", "b_scene"]);

        let sheet = workbook.read_sheet("b_scene").unwrap();
        assert_eq!(sheet.rows[0].get("캐릭터"), "Sam");
        assert!(workbook.read_sheet("missing").unwrap_err().is_not_found());
    }

    #[test]
    fn missing_workbook_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = CsvWorkbook::open(dir.path().join("nope.csv")).err().unwrap();
        assert!(err.is_not_found());
    }
}
