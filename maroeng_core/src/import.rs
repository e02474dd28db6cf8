//! Catalog import from the phrase spreadsheet (Excel or CSV)

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use csv::ReaderBuilder;

use crate::catalog::{Frame, COURSE_THRESHOLD};
use crate::error::{CoreError, Result};

/// Rows beyond this count go to the Level 2 course.
pub const CORE_ROWS: usize = 500;
const WRONG_ANSWER_COLUMNS: std::ops::RangeInclusive<usize> = 2..=7;
const UNVERIFIED_MARKER: &str = "уточнить";

/// Frames split by course, in spreadsheet order
#[derive(Debug, Clone, Default)]
pub struct ImportedCatalog {
    pub core: Vec<Frame>,
    pub level2: Vec<Frame>,
}

impl ImportedCatalog {
    pub fn len(&self) -> usize {
        self.core.len() + self.level2.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Parse a spreadsheet into both course lists, dispatching on extension.
pub fn parse_catalog_file(file_path: impl AsRef<Path>) -> Result<ImportedCatalog> {
    let path = file_path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    let rows = match extension.as_str() {
        "xlsx" | "xls" => read_excel_rows(path)?,
        "csv" => read_csv_rows(path)?,
        _ => return Err(CoreError::UnsupportedFileType(extension)),
    };

    let catalog = frames_from_rows(rows);
    tracing::info!(
        file = %path.display(),
        core = catalog.core.len(),
        level2 = catalog.level2.len(),
        "Catalog imported"
    );
    Ok(catalog)
}

/// Replace fill-in blanks with an ellipsis.
pub fn normalize_blanks(text: &str) -> String {
    text.replace("____ing", "...").replace("____", "...")
}

/// Turn data rows (header already removed) into frames.
/// Ids follow the raw row position, so a skipped row still consumes its id.
pub fn frames_from_rows(rows: Vec<Vec<String>>) -> ImportedCatalog {
    let mut out = ImportedCatalog::default();

    for (index, row) in rows.into_iter().enumerate() {
        let text_en = row.first().map(|s| s.trim()).unwrap_or_default();
        let hint_ru = row.get(1).map(|s| s.trim()).unwrap_or_default();
        if text_en.is_empty() || hint_ru.is_empty() {
            continue;
        }
        let text_en = normalize_blanks(text_en);
        let hint_ru = normalize_blanks(hint_ru);

        let distractors: Vec<String> = WRONG_ANSWER_COLUMNS
            .filter_map(|col| row.get(col))
            .map(|cell| normalize_blanks(cell.trim()))
            .filter(|cell| !cell.is_empty() && *cell != hint_ru)
            .collect();

        let (id, block, list) = if index < CORE_ROWS {
            (index as i64 + 1, "Core", &mut out.core)
        } else {
            (COURSE_THRESHOLD + (index - CORE_ROWS) as i64, "Level 2", &mut out.level2)
        };

        list.push(Frame {
            id,
            block: block.to_string(),
            text_en,
            hint_ru,
            distractors: Some(distractors),
        });
    }

    out
}

/// Overwrite translations by position. Empty or unverified overrides are ignored.
pub fn merge_translations(frames: &mut [Frame], overrides: &[String]) -> usize {
    let mut changed = 0;
    for (frame, hint) in frames.iter_mut().zip(overrides) {
        let hint = hint.trim();
        if hint.is_empty() || hint.to_lowercase().contains(UNVERIFIED_MARKER) {
            continue;
        }
        if frame.hint_ru != hint {
            frame.hint_ru = hint.to_string();
            changed += 1;
        }
    }
    changed
}

pub fn write_catalog_json(frames: &[Frame], path: impl AsRef<Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(frames)?;
    std::fs::write(path.as_ref(), json)?;
    tracing::info!(file = %path.as_ref().display(), frames = frames.len(), "Catalog written");
    Ok(())
}

fn read_excel_rows(path: &Path) -> Result<Vec<Vec<String>>> {
    let mut workbook = open_workbook_auto(path)?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| CoreError::Import("No sheets found in Excel file".to_string()))?;

    let range = workbook.worksheet_range(&sheet_name)?;

    Ok(range
        .rows()
        .skip(1)
        .map(|row| row.iter().map(get_cell_string).collect())
        .collect())
}

fn read_csv_rows(path: &Path) -> Result<Vec<Vec<String>>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(|s| s.trim().to_string()).collect());
    }
    Ok(rows)
}

/// Helper to extract string from Excel cell
fn get_cell_string(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.trim().to_string(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt.to_string(),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
        Data::Error(_) => String::new(),
        Data::Empty => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn first_rows_are_core_rest_level2() {
        let rows: Vec<Vec<String>> = (0..CORE_ROWS + 2)
            .map(|i| row(&[&format!("phrase {i}"), &format!("фраза {i}")]))
            .collect();
        let catalog = frames_from_rows(rows);

        assert_eq!(catalog.core.len(), CORE_ROWS);
        assert_eq!(catalog.core[0].id, 1);
        assert_eq!(catalog.core[CORE_ROWS - 1].id, CORE_ROWS as i64);
        assert_eq!(catalog.level2.iter().map(|f| f.id).collect::<Vec<_>>(), vec![1000, 1001]);
        assert_eq!(catalog.level2[0].block, "Level 2");
    }

    #[test]
    fn skips_incomplete_rows_and_cleans_wrong_answers() {
        let rows = vec![
            row(&["", "пусто"]),
            row(&["I'm ____ing", "Я ____", "Я сплю", "", "Я ____", "Я ем"]),
        ];
        let catalog = frames_from_rows(rows);

        assert_eq!(catalog.core.len(), 1);
        let frame = &catalog.core[0];
        assert_eq!(frame.id, 2);
        assert_eq!(frame.text_en, "I'm ...");
        assert_eq!(frame.hint_ru, "Я ...");
        assert_eq!(frame.distractors.as_deref(), Some(&["Я сплю".to_string(), "Я ем".to_string()][..]));
    }

    #[test]
    fn skipped_rows_keep_their_ids() {
        let rows = vec![row(&["", ""]), row(&["a", "а"]), row(&["b", "б"])];
        let catalog = frames_from_rows(rows);

        assert_eq!(catalog.core.iter().map(|f| f.id).collect::<Vec<_>>(), vec![2, 3]);
    }

    #[test]
    fn course_cutoff_counts_skipped_rows() {
        let mut rows: Vec<Vec<String>> = vec![row(&["", "пусто"])];
        rows.extend((1..CORE_ROWS + 1).map(|i| row(&[&format!("phrase {i}"), &format!("фраза {i}")])));
        let catalog = frames_from_rows(rows);

        assert_eq!(catalog.core.len(), CORE_ROWS - 1);
        assert_eq!(catalog.core.last().map(|f| f.id), Some(CORE_ROWS as i64));
        assert_eq!(catalog.level2.iter().map(|f| f.id).collect::<Vec<_>>(), vec![1000]);
    }

    #[test]
    fn merge_skips_unverified_translations() {
        let mut frames = frames_from_rows(vec![row(&["a", "старый"]), row(&["b", "старый"])]).core;
        let changed = merge_translations(&mut frames, &["новый".to_string(), "Уточнить перевод".to_string()]);

        assert_eq!(changed, 1);
        assert_eq!(frames[0].hint_ru, "новый");
        assert_eq!(frames[1].hint_ru, "старый");
    }

    #[test]
    fn reads_csv_file() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "text_en,hint_ru,w1,w2,w3").unwrap();
        writeln!(file, "Sounds good,Звучит хорошо,Звучит плохо,Выглядит хорошо,Пахнет хорошо").unwrap();
        writeln!(file, "No worries,Не беспокойся").unwrap();

        let catalog = parse_catalog_file(file.path()).unwrap();
        assert_eq!(catalog.core.len(), 2);
        assert_eq!(catalog.core[0].curated_distractors(3).map(|d| d.len()), Some(3));
        assert_eq!(catalog.core[1].distractors.as_deref().map(|d| d.len()), Some(0));
    }

    #[test]
    fn written_json_loads_as_catalog() {
        let rows: Vec<Vec<String>> = (0..CORE_ROWS + 3)
            .map(|i| row(&[&format!("phrase {i}"), &format!("фраза {i}"), "ошибка"]))
            .collect();
        let imported = frames_from_rows(rows);
        let dir = tempfile::tempdir().unwrap();
        let core_path = dir.path().join("frames.json");
        let level2_path = dir.path().join("frames2.json");

        write_catalog_json(&imported.core, &core_path).unwrap();
        write_catalog_json(&imported.level2, &level2_path).unwrap();
        let catalog = crate::catalog::Catalog::from_json_files(&core_path, &level2_path).unwrap();

        assert_eq!(catalog.len(), imported.len());
        assert_eq!(catalog.course_len(crate::catalog::Course::Level2), 3);
    }

    #[test]
    fn rejects_unknown_extension() {
        let err = parse_catalog_file("phrases.txt");
        assert!(matches!(err, Err(CoreError::UnsupportedFileType(ext)) if ext == "txt"));
    }
}
