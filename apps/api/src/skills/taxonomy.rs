//! Skill Taxonomy Matcher: finds canonical skill names inside free text.
//!
//! Matching is case-insensitive substring containment with no word-boundary
//! check, so "Java" also matches inside "JavaScript".

use std::collections::HashSet;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Serialize;
use serde_json::Value;
use tracing::info;

const EMBEDDED_TAXONOMY: &str = include_str!("../../data/skills_taxonomy.json");

/// One recognised skill with its place in the taxonomy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractedSkill {
    pub skill_name: String,
    pub category: String,
    pub subcategory: String,
}

/// Flattened `category → subcategory → [name]` hierarchy, in document order.
#[derive(Debug, Clone, Default)]
pub struct SkillTaxonomy {
    entries: Vec<ExtractedSkill>,
}

impl SkillTaxonomy {
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let doc: Value = serde_json::from_str(raw).context("Skill taxonomy is not valid JSON")?;
        let Some(categories) = doc.as_object() else {
            bail!("Skill taxonomy must be an object of categories");
        };

        let mut entries = Vec::new();
        for (category, subs) in categories {
            let Some(subs) = subs.as_object() else {
                bail!("Category '{category}' must map subcategories to skill lists");
            };
            for (subcategory, names) in subs {
                let Some(names) = names.as_array() else {
                    bail!("Subcategory '{category}/{subcategory}' must be a list of names");
                };
                for name in names.iter().filter_map(Value::as_str) {
                    let name = name.trim();
                    if name.is_empty() {
                        continue;
                    }
                    entries.push(ExtractedSkill {
                        skill_name: name.to_string(),
                        category: category.clone(),
                        subcategory: subcategory.clone(),
                    });
                }
            }
        }
        Ok(SkillTaxonomy { entries })
    }

    pub fn embedded() -> Result<Self> {
        Self::from_json_str(EMBEDDED_TAXONOMY)
    }

    /// Loads the taxonomy from `path`, or the embedded copy when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let taxonomy = match path {
            None => Self::embedded()?,
            Some(p) => {
                let raw = std::fs::read_to_string(p)
                    .with_context(|| format!("Failed to read taxonomy file {}", p.display()))?;
                Self::from_json_str(&raw)?
            }
        };
        info!("Skill taxonomy loaded: {} skills", taxonomy.len());
        Ok(taxonomy)
    }

    /// Returns every taxonomy skill whose lowercase name occurs in `text`,
    /// deduplicated by lowercase name, in taxonomy order.
    pub fn extract_skills(&self, text: &str) -> Vec<ExtractedSkill> {
        if text.is_empty() {
            return Vec::new();
        }
        let haystack = text.to_lowercase();
        let mut seen = HashSet::new();

        self.entries
            .iter()
            .filter(|entry| {
                let needle = entry.skill_name.to_lowercase();
                haystack.contains(&needle) && seen.insert(needle)
            })
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "technical": {
            "languages": ["Python", "Java", "JavaScript", "  "],
            "data": ["SQL", "python"]
        },
        "soft": {
            "communication": ["Public Speaking"]
        }
    }"#;

    fn taxonomy() -> SkillTaxonomy {
        SkillTaxonomy::from_json_str(SAMPLE).unwrap()
    }

    fn names(skills: &[ExtractedSkill]) -> Vec<&str> {
        skills.iter().map(|s| s.skill_name.as_str()).collect()
    }

    #[test]
    fn test_empty_text_yields_nothing() {
        assert!(taxonomy().extract_skills("").is_empty());
    }

    #[test]
    fn test_case_insensitive_containment() {
        let found = taxonomy().extract_skills("Wrote ETL jobs in PYTHON and sql");
        assert_eq!(names(&found), vec!["Python", "SQL"]);
        assert_eq!(found[1].category, "technical");
        assert_eq!(found[1].subcategory, "data");
    }

    #[test]
    fn test_results_follow_taxonomy_order_not_text_order() {
        let found = taxonomy().extract_skills("public speaking, sql, python");
        assert_eq!(names(&found), vec!["Python", "SQL", "Public Speaking"]);
    }

    #[test]
    fn test_duplicates_collapse_to_first_taxonomy_position() {
        let found = taxonomy().extract_skills("python python");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].subcategory, "languages");
    }

    #[test]
    fn test_substring_match_has_no_word_boundary() {
        // "Java" is reported for a JavaScript-only resume.
        let found = taxonomy().extract_skills("Frontend work in JavaScript");
        assert_eq!(names(&found), vec!["Java", "JavaScript"]);
    }

    #[test]
    fn test_blank_names_are_skipped() {
        let taxonomy = taxonomy();
        // Python, Java, JavaScript, SQL, python, Public Speaking
        assert_eq!(taxonomy.len(), 6);
        assert!(taxonomy.entries.iter().all(|e| !e.skill_name.trim().is_empty()));
        assert!(taxonomy.extract_skills("   ").is_empty());
    }

    #[test]
    fn test_embedded_taxonomy_parses() {
        let taxonomy = SkillTaxonomy::embedded().unwrap();
        assert!(!taxonomy.is_empty());
        assert!(!taxonomy.extract_skills("Kubernetes operator").is_empty());
    }

    #[test]
    fn test_rejects_non_object_document() {
        assert!(SkillTaxonomy::from_json_str(r#"["Python"]"#).is_err());
    }
}
