//! Curated Content Catalog: skill name → learning resources.
//!
//! Reference data, loaded once at startup and shared read-only behind an `Arc`.
//! The embedded JSON is used unless `CATALOG_PATH` points somewhere else.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::models::learning_path::StepType;

const EMBEDDED_CATALOG: &str = include_str!("../data/curated_content.json");

/// A single learning resource for a skill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CuratedContentEntry {
    /// Filled from the catalog key at load time.
    #[serde(default)]
    pub skill_name: String,
    /// reading | course | project | ... (free text, compared case-insensitively)
    #[serde(rename = "type", default)]
    pub content_type: String,
    #[serde(default)]
    pub provider: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ContentCatalog {
    entries: HashMap<String, Vec<CuratedContentEntry>>,
}

impl ContentCatalog {
    /// Parses the `{ "<skill>": [ {type, provider, url}, ... ] }` document.
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let mut entries: HashMap<String, Vec<CuratedContentEntry>> =
            serde_json::from_str(raw).context("Curated content catalog is not valid JSON")?;
        for (skill, items) in entries.iter_mut() {
            for item in items.iter_mut() {
                item.skill_name = skill.clone();
            }
        }
        Ok(ContentCatalog { entries })
    }

    pub fn embedded() -> Result<Self> {
        Self::from_json_str(EMBEDDED_CATALOG)
    }

    /// Loads the catalog from `path`, or the embedded copy when no path is given.
    /// A configured path that does not exist yields an empty catalog.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let catalog = match path {
            None => Self::embedded()?,
            Some(p) if !p.exists() => {
                warn!(
                    "Catalog file {} not found, generating paths without curated content",
                    p.display()
                );
                Self::default()
            }
            Some(p) => {
                let raw = std::fs::read_to_string(p)
                    .with_context(|| format!("Failed to read catalog file {}", p.display()))?;
                Self::from_json_str(&raw)?
            }
        };
        info!("Curated content catalog loaded: {} skills", catalog.skill_count());
        Ok(catalog)
    }

    /// All entries for a skill. Empty for unknown skills.
    pub fn entries_for(&self, skill_name: &str) -> &[CuratedContentEntry] {
        self.entries
            .get(skill_name)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// First entry whose type matches `step_type`, else the first entry for the skill.
    pub fn pick(&self, skill_name: &str, step_type: StepType) -> Option<&CuratedContentEntry> {
        let items = self.entries_for(skill_name);
        items
            .iter()
            .find(|e| e.content_type.eq_ignore_ascii_case(step_type.as_str()))
            .or_else(|| items.first())
    }

    pub fn skill_count(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"{
        "SQL": [
            {"type": "course", "provider": "khan", "url": "https://khan/sql"},
            {"type": "Reading", "provider": "pg", "url": "https://pg/tutorial"}
        ],
        "Go": [
            {"type": "video", "provider": "youtube", "url": "https://yt/go"}
        ]
    }"#;

    #[test]
    fn test_pick_prefers_matching_type_case_insensitive() {
        let catalog = ContentCatalog::from_json_str(SAMPLE).unwrap();
        let entry = catalog.pick("SQL", StepType::Reading).unwrap();
        assert_eq!(entry.provider.as_deref(), Some("pg"));
        assert_eq!(entry.skill_name, "SQL");
    }

    #[test]
    fn test_pick_falls_back_to_first_entry() {
        let catalog = ContentCatalog::from_json_str(SAMPLE).unwrap();
        let entry = catalog.pick("Go", StepType::Course).unwrap();
        assert_eq!(entry.provider.as_deref(), Some("youtube"));
    }

    #[test]
    fn test_unknown_skill_has_no_entries() {
        let catalog = ContentCatalog::from_json_str(SAMPLE).unwrap();
        assert!(catalog.entries_for("COBOL").is_empty());
        assert!(catalog.pick("COBOL", StepType::Reading).is_none());
    }

    #[test]
    fn test_embedded_catalog_parses() {
        let catalog = ContentCatalog::embedded().unwrap();
        assert!(catalog.skill_count() > 0);
        assert!(!catalog.entries_for("Python").is_empty());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        let catalog = ContentCatalog::load(Some(file.path())).unwrap();
        assert_eq!(catalog.skill_count(), 2);
    }

    #[test]
    fn test_missing_file_yields_empty_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = ContentCatalog::load(Some(dir.path().join("absent.json").as_path())).unwrap();
        assert_eq!(catalog.skill_count(), 0);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"[not a map]").unwrap();
        assert!(ContentCatalog::load(Some(file.path())).is_err());
    }
}
