//! Persistence seam for the learning path engine.
//!
//! Every engine operation runs inside one `StoreTx`. Writes become visible only
//! on `commit`; dropping a transaction discards them. Two backends:
//! `PgStore` (PostgreSQL via sqlx) and `MemoryStore` (tests, database-less runs).

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::learning_path::{LearningPath, LearningPathStep, PathStatus, PathSummary};
use crate::models::skill::SkillAssessment;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Carried in `AppState` as `Arc<dyn RoadmapStore>`.
#[async_trait]
pub trait RoadmapStore: Send + Sync {
    async fn begin(&self) -> Result<Box<dyn StoreTx>, AppError>;
}

/// A unit of work. All lookups that take a `user_id` are ownership-scoped and
/// return `None` for rows that belong to someone else.
#[async_trait]
pub trait StoreTx: Send {
    // ── skill assessments ───────────────────────────────────────────────────

    async fn skill_assessments(&mut self, user_id: Uuid) -> Result<Vec<SkillAssessment>, AppError>;

    /// Inserts, or refreshes category/subcategory of the existing row with the
    /// same (user, lowercase name). Returns the stored row.
    async fn upsert_skill_assessment(
        &mut self,
        assessment: &SkillAssessment,
    ) -> Result<SkillAssessment, AppError>;

    async fn find_skill_assessment(
        &mut self,
        user_id: Uuid,
        assessment_id: Uuid,
    ) -> Result<Option<SkillAssessment>, AppError>;

    async fn update_skill_assessment(&mut self, assessment: &SkillAssessment) -> Result<(), AppError>;

    /// Returns `false` when nothing owned by the user matched.
    async fn delete_skill_assessment(
        &mut self,
        user_id: Uuid,
        assessment_id: Uuid,
    ) -> Result<bool, AppError>;

    // ── learning paths ──────────────────────────────────────────────────────

    /// Moves every active path of the user to `archived`. Returns the count.
    async fn archive_active_paths(&mut self, user_id: Uuid) -> Result<u64, AppError>;

    async fn count_active_paths(&mut self, user_id: Uuid) -> Result<i64, AppError>;

    /// Inserts the path row and all of its steps.
    async fn insert_path(&mut self, path: &LearningPath) -> Result<(), AppError>;

    /// Path with steps ordered by `step_number`.
    async fn find_path(
        &mut self,
        user_id: Uuid,
        path_id: Uuid,
    ) -> Result<Option<LearningPath>, AppError>;

    /// Most recently created active path, with steps.
    async fn current_path(&mut self, user_id: Uuid) -> Result<Option<LearningPath>, AppError>;

    /// Newest first.
    async fn list_paths(&mut self, user_id: Uuid) -> Result<Vec<PathSummary>, AppError>;

    async fn set_path_status(&mut self, path_id: Uuid, status: PathStatus) -> Result<(), AppError>;

    async fn set_path_progress(&mut self, path_id: Uuid, progress: f64) -> Result<(), AppError>;

    /// Ownership join step → path → user.
    async fn find_owned_step(
        &mut self,
        user_id: Uuid,
        step_id: Uuid,
    ) -> Result<Option<LearningPathStep>, AppError>;

    /// Persists `status` and `progress_percentage` of an existing step.
    async fn update_step(&mut self, step: &LearningPathStep) -> Result<(), AppError>;

    async fn commit(self: Box<Self>) -> Result<(), AppError>;
}
