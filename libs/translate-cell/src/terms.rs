use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::language::LanguageChoice;

/// Glossary of official healthcare terms, one row per term with a column per
/// language (`ENGLISH`, `CHINESE`, `MALAY`, `TAMIL`).
#[derive(Debug, Clone, Default)]
pub struct OfficialTerms {
    rows: Vec<BTreeMap<String, String>>,
}

impl OfficialTerms {
    pub fn new(rows: Vec<BTreeMap<String, String>>) -> Self {
        Self { rows }
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading official terms from {}", path.display()))?;
        let rows: Vec<BTreeMap<String, String>> = serde_json::from_str(&raw)
            .with_context(|| format!("parsing official terms in {}", path.display()))?;
        info!(terms = rows.len(), "Loaded official terms glossary");
        Ok(Self { rows })
    }

    /// Loads the glossary, or an empty one when the file is missing or invalid.
    pub fn load_or_empty(path: &str) -> Self {
        if path.is_empty() {
            return Self::default();
        }
        Self::from_json_file(path).unwrap_or_else(|e| {
            warn!("Official terms unavailable: {:#}", e);
            Self::default()
        })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Renders the source and target columns as a markdown pipe table.
    /// `Unknown` languages contribute no column.
    pub fn pipe_table(&self, source: LanguageChoice, target: LanguageChoice) -> String {
        let mut columns: Vec<String> = Vec::new();
        for language in [source, target] {
            let column = language.column();
            if language != LanguageChoice::Unknown && !columns.contains(&column) {
                columns.push(column);
            }
        }
        if columns.is_empty() {
            return String::new();
        }

        let mut table = format!("| {} |\n", columns.join(" | "));
        table.push_str(&format!("|{}\n", ":---|".repeat(columns.len())));
        for row in &self.rows {
            let cells: Vec<&str> = columns
                .iter()
                .map(|c| row.get(c).map(String::as_str).unwrap_or(""))
                .collect();
            table.push_str(&format!("| {} |\n", cells.join(" | ")));
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn glossary() -> OfficialTerms {
        let row = |en: &str, zh: &str, ms: &str| {
            BTreeMap::from([
                ("ENGLISH".to_string(), en.to_string()),
                ("CHINESE".to_string(), zh.to_string()),
                ("MALAY".to_string(), ms.to_string()),
            ])
        };
        OfficialTerms::new(vec![
            row("Polyclinic", "综合诊疗所", "Poliklinik"),
            row("Influenza", "流感", "Influenza"),
        ])
    }

    #[test]
    fn renders_two_columns() {
        let table = glossary().pipe_table(LanguageChoice::English, LanguageChoice::Chinese);
        assert_eq!(
            table,
            "| ENGLISH | CHINESE |\n|:---|:---|\n| Polyclinic | 综合诊疗所 |\n| Influenza | 流感 |\n"
        );
    }

    #[test]
    fn same_language_collapses_to_one_column() {
        let table = glossary().pipe_table(LanguageChoice::Malay, LanguageChoice::Malay);
        assert!(table.starts_with("| MALAY |\n|:---|\n"));
    }

    #[test]
    fn missing_column_renders_blank_cells() {
        let table = glossary().pipe_table(LanguageChoice::English, LanguageChoice::Tamil);
        assert!(table.contains("| Polyclinic |  |"));
    }

    #[test]
    fn loads_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[{{"ENGLISH": "Vaccine", "MALAY": "Vaksin"}}]"#).unwrap();

        let terms = OfficialTerms::from_json_file(file.path()).unwrap();
        assert_eq!(terms.len(), 1);
        assert!(OfficialTerms::load_or_empty("/nonexistent/terms.json").is_empty());
    }
}
