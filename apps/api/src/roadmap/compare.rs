//! Path Comparator: title-based diff of two learning paths.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::learning_path::LearningPath;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathBrief {
    pub id: Uuid,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub steps_count: usize,
}

impl From<&LearningPath> for PathBrief {
    fn from(path: &LearningPath) -> Self {
        PathBrief {
            id: path.id,
            title: path.title.clone(),
            created_at: path.created_at,
            steps_count: path.steps.len(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathComparison {
    pub a: PathBrief,
    pub b: PathBrief,
    pub overlap_titles: Vec<String>,
    pub only_a_titles: Vec<String>,
    pub only_b_titles: Vec<String>,
}

/// Diffs the step titles of two paths. Titles are trimmed and lowercased;
/// every list comes back sorted.
pub fn compare_paths(a: &LearningPath, b: &LearningPath) -> PathComparison {
    let a_titles = normalized_titles(a);
    let b_titles = normalized_titles(b);

    PathComparison {
        a: PathBrief::from(a),
        b: PathBrief::from(b),
        overlap_titles: a_titles.intersection(&b_titles).cloned().collect(),
        only_a_titles: a_titles.difference(&b_titles).cloned().collect(),
        only_b_titles: b_titles.difference(&a_titles).cloned().collect(),
    }
}

fn normalized_titles(path: &LearningPath) -> BTreeSet<String> {
    path.steps
        .iter()
        .map(|s| s.title.trim().to_lowercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ContentCatalog;
    use crate::models::skill::SkillAssessment;
    use crate::roadmap::generator::{generate_path, PathOptions};

    fn path_titled(titles: &[&str]) -> LearningPath {
        let skill = SkillAssessment::detected(Uuid::nil(), "SQL", "technical", "data");
        let mut path = generate_path(
            Uuid::new_v4(),
            &[skill],
            &ContentCatalog::default(),
            &PathOptions::default(),
        );
        path.steps.truncate(titles.len());
        for (step, title) in path.steps.iter_mut().zip(titles) {
            step.title = title.to_string();
        }
        path
    }

    #[test]
    fn test_title_diff_is_normalized_and_sorted() {
        let a = path_titled(&["Primer: SQL", "Course: SQL fundamentals"]);
        let b = path_titled(&["primer: sql ", "Project: Build with SQL"]);

        let diff = compare_paths(&a, &b);

        assert_eq!(diff.overlap_titles, vec!["primer: sql"]);
        assert_eq!(diff.only_a_titles, vec!["course: sql fundamentals"]);
        assert_eq!(diff.only_b_titles, vec!["project: build with sql"]);
        assert_eq!(diff.a.steps_count, 2);
        assert_eq!(diff.b.id, b.id);
    }

    #[test]
    fn test_identical_paths_fully_overlap() {
        let a = path_titled(&["Zeta", "alpha", "Mid"]);
        let diff = compare_paths(&a, &a);
        assert_eq!(diff.overlap_titles, vec!["alpha", "mid", "zeta"]);
        assert!(diff.only_a_titles.is_empty());
        assert!(diff.only_b_titles.is_empty());
    }

    #[test]
    fn test_empty_paths_produce_empty_lists() {
        let a = path_titled(&[]);
        let diff = compare_paths(&a, &a);
        assert!(diff.overlap_titles.is_empty());
        assert_eq!(diff.a.steps_count, 0);
    }
}
