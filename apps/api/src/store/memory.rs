//! In-memory store. Transactions are serialized: `begin` takes the store lock
//! for the lifetime of the transaction and works on a copy that `commit` swaps in.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::learning_path::{LearningPath, LearningPathStep, PathStatus, PathSummary};
use crate::models::skill::SkillAssessment;
use crate::store::{RoadmapStore, StoreTx};

#[derive(Debug, Clone, Default)]
struct MemoryState {
    skills: Vec<SkillAssessment>,
    paths: Vec<LearningPath>,
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RoadmapStore for MemoryStore {
    async fn begin(&self) -> Result<Box<dyn StoreTx>, AppError> {
        let guard = self.state.clone().lock_owned().await;
        let working = guard.clone();
        Ok(Box::new(MemoryTx { guard, working }))
    }
}

pub struct MemoryTx {
    guard: OwnedMutexGuard<MemoryState>,
    working: MemoryState,
}

impl MemoryTx {
    fn path_mut(&mut self, path_id: Uuid) -> Result<&mut LearningPath, AppError> {
        self.working
            .paths
            .iter_mut()
            .find(|p| p.id == path_id)
            .ok_or_else(|| AppError::NotFound(format!("Learning path {path_id} not found")))
    }

    fn with_sorted_steps(path: &LearningPath) -> LearningPath {
        let mut path = path.clone();
        path.steps.sort_by_key(|s| s.step_number);
        path
    }
}

#[async_trait]
impl StoreTx for MemoryTx {
    async fn skill_assessments(&mut self, user_id: Uuid) -> Result<Vec<SkillAssessment>, AppError> {
        Ok(self
            .working
            .skills
            .iter()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn upsert_skill_assessment(
        &mut self,
        assessment: &SkillAssessment,
    ) -> Result<SkillAssessment, AppError> {
        let key = assessment.skill_key();
        let existing = self
            .working
            .skills
            .iter_mut()
            .find(|s| s.user_id == assessment.user_id && s.skill_key() == key);

        match existing {
            Some(row) => {
                row.category = assessment.category.clone();
                row.subcategory = assessment.subcategory.clone();
                row.updated_at = Utc::now();
                Ok(row.clone())
            }
            None => {
                self.working.skills.push(assessment.clone());
                Ok(assessment.clone())
            }
        }
    }

    async fn find_skill_assessment(
        &mut self,
        user_id: Uuid,
        assessment_id: Uuid,
    ) -> Result<Option<SkillAssessment>, AppError> {
        Ok(self
            .working
            .skills
            .iter()
            .find(|s| s.id == assessment_id && s.user_id == user_id)
            .cloned())
    }

    async fn update_skill_assessment(&mut self, assessment: &SkillAssessment) -> Result<(), AppError> {
        let row = self
            .working
            .skills
            .iter_mut()
            .find(|s| s.id == assessment.id)
            .ok_or_else(|| AppError::NotFound(format!("Skill {} not found", assessment.id)))?;
        *row = assessment.clone();
        Ok(())
    }

    async fn delete_skill_assessment(
        &mut self,
        user_id: Uuid,
        assessment_id: Uuid,
    ) -> Result<bool, AppError> {
        let before = self.working.skills.len();
        self.working
            .skills
            .retain(|s| !(s.id == assessment_id && s.user_id == user_id));
        Ok(self.working.skills.len() < before)
    }

    async fn archive_active_paths(&mut self, user_id: Uuid) -> Result<u64, AppError> {
        let now = Utc::now();
        let mut archived = 0;
        for path in self
            .working
            .paths
            .iter_mut()
            .filter(|p| p.user_id == user_id && p.is_active())
        {
            path.status = PathStatus::Archived.as_str().to_string();
            path.updated_at = now;
            archived += 1;
        }
        Ok(archived)
    }

    async fn count_active_paths(&mut self, user_id: Uuid) -> Result<i64, AppError> {
        Ok(self
            .working
            .paths
            .iter()
            .filter(|p| p.user_id == user_id && p.is_active())
            .count() as i64)
    }

    async fn insert_path(&mut self, path: &LearningPath) -> Result<(), AppError> {
        self.working.paths.push(path.clone());
        Ok(())
    }

    async fn find_path(
        &mut self,
        user_id: Uuid,
        path_id: Uuid,
    ) -> Result<Option<LearningPath>, AppError> {
        Ok(self
            .working
            .paths
            .iter()
            .find(|p| p.id == path_id && p.user_id == user_id)
            .map(Self::with_sorted_steps))
    }

    async fn current_path(&mut self, user_id: Uuid) -> Result<Option<LearningPath>, AppError> {
        Ok(self
            .working
            .paths
            .iter()
            .filter(|p| p.user_id == user_id && p.is_active())
            .max_by_key(|p| p.created_at)
            .map(Self::with_sorted_steps))
    }

    async fn list_paths(&mut self, user_id: Uuid) -> Result<Vec<PathSummary>, AppError> {
        let mut rows: Vec<PathSummary> = self
            .working
            .paths
            .iter()
            .rev()
            .filter(|p| p.user_id == user_id)
            .map(PathSummary::from)
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn set_path_status(&mut self, path_id: Uuid, status: PathStatus) -> Result<(), AppError> {
        let path = self.path_mut(path_id)?;
        path.status = status.as_str().to_string();
        path.updated_at = Utc::now();
        Ok(())
    }

    async fn set_path_progress(&mut self, path_id: Uuid, progress: f64) -> Result<(), AppError> {
        let path = self.path_mut(path_id)?;
        path.progress_percentage = progress;
        path.updated_at = Utc::now();
        Ok(())
    }

    async fn find_owned_step(
        &mut self,
        user_id: Uuid,
        step_id: Uuid,
    ) -> Result<Option<LearningPathStep>, AppError> {
        Ok(self
            .working
            .paths
            .iter()
            .filter(|p| p.user_id == user_id)
            .flat_map(|p| p.steps.iter())
            .find(|s| s.id == step_id)
            .cloned())
    }

    async fn update_step(&mut self, step: &LearningPathStep) -> Result<(), AppError> {
        let path = self.path_mut(step.learning_path_id)?;
        let row = path
            .steps
            .iter_mut()
            .find(|s| s.id == step.id)
            .ok_or_else(|| AppError::NotFound(format!("Step {} not found", step.id)))?;
        row.status = step.status.clone();
        row.progress_percentage = step.progress_percentage;
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), AppError> {
        let MemoryTx { mut guard, working } = *self;
        *guard = working;
        Ok(())
    }
}
