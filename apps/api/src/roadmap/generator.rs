//! Path Generator: turns skill assessments into an ordered draft of steps.
//!
//! Pure and synchronous: the lifecycle manager owns persistence and the
//! archive-then-insert transaction.

use chrono::Utc;
use uuid::Uuid;

use crate::catalog::ContentCatalog;
use crate::models::learning_path::{
    LearningPath, LearningPathStep, PathStatus, StepStatus, StepType,
};
use crate::models::skill::SkillAssessment;

/// Hard cap on steps per generated path, independent of skill count.
pub const MAX_PATH_STEPS: usize = 12;

const READING_HOURS: f64 = 2.0;
const COURSE_HOURS: f64 = 6.0;
const PROJECT_HOURS: f64 = 8.0;

const DEFAULT_GOAL: &str = "Grow in current role";
const DEFAULT_TITLE: &str = "Personal learning roadmap";
const PATH_DESCRIPTION: &str = "A tailored learning path based on your current skills and goals.";
const DIFFICULTY_LEVEL: &str = "intermediate";
const ESTIMATED_DURATION_WEEKS: i32 = 6;
const PATH_CATEGORY: &str = "skill_upgrade";

/// Caller-supplied personalisation for a new path.
#[derive(Debug, Clone, Default)]
pub struct PathOptions {
    pub display_name: Option<String>,
    pub career_goal: Option<String>,
}

/// Orders assessments weakest-and-most-urgent first.
///
/// Priority rank ascending, then proficiency ascending. Stable, so equal
/// (priority, proficiency) pairs keep their input order.
pub fn order_assessments(assessments: &[SkillAssessment]) -> Vec<&SkillAssessment> {
    let mut ordered: Vec<&SkillAssessment> = assessments.iter().collect();
    ordered.sort_by(|a, b| {
        a.priority()
            .rank()
            .cmp(&b.priority().rank())
            .then_with(|| {
                a.proficiency_level
                    .partial_cmp(&b.proficiency_level)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
    });
    ordered
}

/// Drafts the step sequence for a path: reading → course → project per skill,
/// numbered from 1 across the whole path, stopping at `MAX_PATH_STEPS`.
pub fn draft_steps(
    learning_path_id: Uuid,
    assessments: &[SkillAssessment],
    catalog: &ContentCatalog,
) -> Vec<LearningPathStep> {
    let mut steps = Vec::with_capacity(MAX_PATH_STEPS);

    'skills: for assessment in order_assessments(assessments) {
        let name = assessment.skill_name.as_str();
        for step_type in [StepType::Reading, StepType::Course, StepType::Project] {
            if steps.len() >= MAX_PATH_STEPS {
                break 'skills;
            }
            let step_number = steps.len() as i32 + 1;
            steps.push(draft_step(learning_path_id, step_number, name, step_type, catalog));
        }
    }

    steps
}

fn draft_step(
    learning_path_id: Uuid,
    step_number: i32,
    name: &str,
    step_type: StepType,
    catalog: &ContentCatalog,
) -> LearningPathStep {
    let (title, description, objective, hours) = match step_type {
        StepType::Reading => (
            format!("Primer: {name}"),
            format!("Introductory concepts and foundations for {name}."),
            format!("Understand basics of {name}"),
            READING_HOURS,
        ),
        StepType::Course => (
            format!("Course: {name} fundamentals"),
            format!("A guided course to solidify {name} fundamentals."),
            format!("Apply {name} in simple projects"),
            COURSE_HOURS,
        ),
        StepType::Project => (
            format!("Project: Build with {name}"),
            format!("Hands-on mini project to practice {name}."),
            format!("Create a small project using {name}"),
            PROJECT_HOURS,
        ),
    };

    let (content_url, content_provider) = resolve_content(name, step_type, catalog);

    LearningPathStep {
        id: Uuid::new_v4(),
        learning_path_id,
        title,
        description: Some(description),
        step_number,
        step_type: step_type.as_str().to_string(),
        content_url,
        content_provider,
        estimated_duration_hours: hours,
        status: StepStatus::NotStarted.as_str().to_string(),
        progress_percentage: None,
        learning_objectives: vec![objective],
        skills_gained: vec![name.to_string()],
    }
}

/// Project steps are self-guided and never consult the catalog.
fn resolve_content(
    name: &str,
    step_type: StepType,
    catalog: &ContentCatalog,
) -> (Option<String>, String) {
    let default_provider = match step_type {
        StepType::Reading => "curated",
        StepType::Course => "web",
        StepType::Project => return (None, "self-guided".to_string()),
    };

    match catalog.pick(name, step_type) {
        Some(entry) => (
            entry.url.clone(),
            entry
                .provider
                .clone()
                .unwrap_or_else(|| default_provider.to_string()),
        ),
        None => (None, default_provider.to_string()),
    }
}

/// Builds a new active path with its steps. Does not touch storage.
pub fn generate_path(
    user_id: Uuid,
    assessments: &[SkillAssessment],
    catalog: &ContentCatalog,
    options: &PathOptions,
) -> LearningPath {
    let id = Uuid::new_v4();
    let now = Utc::now();

    let title = options
        .display_name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(|n| format!("Roadmap for {n}"))
        .unwrap_or_else(|| DEFAULT_TITLE.to_string());
    let goal = options
        .career_goal
        .as_deref()
        .map(str::trim)
        .filter(|g| !g.is_empty())
        .unwrap_or(DEFAULT_GOAL)
        .to_string();

    LearningPath {
        id,
        user_id,
        title,
        description: Some(PATH_DESCRIPTION.to_string()),
        goal: Some(goal),
        difficulty_level: DIFFICULTY_LEVEL.to_string(),
        estimated_duration_weeks: ESTIMATED_DURATION_WEEKS,
        category: PATH_CATEGORY.to_string(),
        status: PathStatus::Active.as_str().to_string(),
        progress_percentage: 0.0,
        created_at: now,
        updated_at: now,
        steps: draft_steps(id, assessments, catalog),
    }
}
