use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathStatus {
    Active,
    Archived,
    Completed,
    Paused,
}

impl PathStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PathStatus::Active => "active",
            PathStatus::Archived => "archived",
            PathStatus::Completed => "completed",
            PathStatus::Paused => "paused",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    NotStarted,
    InProgress,
    Completed,
    Skipped,
}

impl StepStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            StepStatus::NotStarted => "not_started",
            StepStatus::InProgress => "in_progress",
            StepStatus::Completed => "completed",
            StepStatus::Skipped => "skipped",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepType {
    Reading,
    Course,
    Project,
}

impl StepType {
    pub fn as_str(self) -> &'static str {
        match self {
            StepType::Reading => "reading",
            StepType::Course => "course",
            StepType::Project => "project",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LearningPath {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub goal: Option<String>,
    pub difficulty_level: String,
    pub estimated_duration_weeks: i32,
    pub category: String,
    pub status: String,
    /// Derived from the steps; only the progress aggregator writes it.
    pub progress_percentage: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Ordered by `step_number`. Loaded separately from the path row.
    #[sqlx(skip)]
    #[serde(default)]
    pub steps: Vec<LearningPathStep>,
}

impl LearningPath {
    pub fn is_active(&self) -> bool {
        self.status == PathStatus::Active.as_str()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LearningPathStep {
    pub id: Uuid,
    pub learning_path_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub step_number: i32,
    pub step_type: String,
    pub content_url: Option<String>,
    pub content_provider: String,
    pub estimated_duration_hours: f64,
    pub status: String,
    /// `None` until a caller reports progress explicitly.
    pub progress_percentage: Option<f64>,
    pub learning_objectives: Vec<String>,
    pub skills_gained: Vec<String>,
}

/// Lightweight history row, no steps.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PathSummary {
    pub id: Uuid,
    pub title: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub progress_percentage: f64,
    pub estimated_duration_weeks: i32,
}

impl From<&LearningPath> for PathSummary {
    fn from(path: &LearningPath) -> Self {
        PathSummary {
            id: path.id,
            title: path.title.clone(),
            status: path.status.clone(),
            created_at: path.created_at,
            progress_percentage: path.progress_percentage,
            estimated_duration_weeks: path.estimated_duration_weeks,
        }
    }
}
