//! Lifecycle Manager: at most one active learning path per user.
//!
//! Every operation runs in a single store transaction; multi-entity writes
//! (archive + insert, archive + activate, step + path progress) commit together
//! or not at all.

use std::sync::Arc;

use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::catalog::ContentCatalog;
use crate::errors::AppError;
use crate::models::learning_path::{LearningPath, PathStatus, PathSummary, StepStatus};
use crate::roadmap::compare::{compare_paths, PathComparison};
use crate::roadmap::generator::{generate_path, PathOptions};
use crate::roadmap::progress::recompute_progress;
use crate::store::{RoadmapStore, StoreTx};

/// Partial step update. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StepUpdate {
    pub status: Option<StepStatus>,
    pub progress_percentage: Option<f64>,
}

#[derive(Clone)]
pub struct LifecycleManager {
    store: Arc<dyn RoadmapStore>,
    catalog: Arc<ContentCatalog>,
}

impl LifecycleManager {
    pub fn new(store: Arc<dyn RoadmapStore>, catalog: Arc<ContentCatalog>) -> Self {
        Self { store, catalog }
    }

    /// Archives the user's active path(s) and creates a fresh active path from
    /// their current skill assessments. Re-running always creates a new path.
    pub async fn generate(
        &self,
        user_id: Uuid,
        options: &PathOptions,
    ) -> Result<LearningPath, AppError> {
        let mut tx = self.store.begin().await?;

        let assessments = tx.skill_assessments(user_id).await?;
        let archived = tx.archive_active_paths(user_id).await?;

        let path = generate_path(user_id, &assessments, &self.catalog, options);
        tx.insert_path(&path).await?;
        ensure_single_active(tx.as_mut(), user_id).await?;
        tx.commit().await?;

        info!(
            "Generated learning path {} ({} steps from {} skills) for user {user_id}; archived {archived}",
            path.id,
            path.steps.len(),
            assessments.len()
        );
        Ok(path)
    }

    /// Active path with the latest `created_at`, or `None` before the first generate.
    pub async fn current(&self, user_id: Uuid) -> Result<Option<LearningPath>, AppError> {
        let mut tx = self.store.begin().await?;
        tx.current_path(user_id).await
    }

    pub async fn history(&self, user_id: Uuid) -> Result<Vec<PathSummary>, AppError> {
        let mut tx = self.store.begin().await?;
        tx.list_paths(user_id).await
    }

    pub async fn get(&self, user_id: Uuid, path_id: Uuid) -> Result<LearningPath, AppError> {
        let mut tx = self.store.begin().await?;
        owned_path(tx.as_mut(), user_id, path_id).await
    }

    /// Reactivates a previously generated path; the active one is archived.
    /// Step states and progress are kept as they were.
    pub async fn restore(&self, user_id: Uuid, path_id: Uuid) -> Result<LearningPath, AppError> {
        let mut tx = self.store.begin().await?;

        owned_path(tx.as_mut(), user_id, path_id).await?;
        let archived = tx.archive_active_paths(user_id).await?;
        tx.set_path_status(path_id, PathStatus::Active).await?;
        ensure_single_active(tx.as_mut(), user_id).await?;
        let restored = owned_path(tx.as_mut(), user_id, path_id).await?;
        tx.commit().await?;

        info!("Restored learning path {path_id} for user {user_id}; archived {archived}");
        Ok(restored)
    }

    /// Applies a step update and recomputes the parent path's progress.
    /// Progress is clamped into [0, 100]. Returns the parent path with steps.
    pub async fn update_step(
        &self,
        user_id: Uuid,
        step_id: Uuid,
        update: &StepUpdate,
    ) -> Result<LearningPath, AppError> {
        if let Some(p) = update.progress_percentage {
            if !p.is_finite() {
                return Err(AppError::Validation(
                    "progress_percentage must be a finite number".to_string(),
                ));
            }
        }

        let mut tx = self.store.begin().await?;

        let mut step = tx
            .find_owned_step(user_id, step_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Step {step_id} not found")))?;

        if let Some(status) = update.status {
            step.status = status.as_str().to_string();
        }
        if let Some(p) = update.progress_percentage {
            step.progress_percentage = Some(p.clamp(0.0, 100.0));
        }
        tx.update_step(&step).await?;

        let mut path = owned_path(tx.as_mut(), user_id, step.learning_path_id).await?;
        let progress = recompute_progress(&mut path);
        tx.set_path_progress(path.id, progress).await?;
        tx.commit().await?;

        info!(
            "Updated step {step_id} (status={}, progress={:?}); path {} now at {progress}%",
            step.status, step.progress_percentage, path.id
        );
        Ok(path)
    }

    pub async fn compare(
        &self,
        user_id: Uuid,
        a_id: Uuid,
        b_id: Uuid,
    ) -> Result<PathComparison, AppError> {
        let mut tx = self.store.begin().await?;
        let a = owned_path(tx.as_mut(), user_id, a_id).await?;
        let b = owned_path(tx.as_mut(), user_id, b_id).await?;
        Ok(compare_paths(&a, &b))
    }
}

async fn owned_path(
    tx: &mut dyn StoreTx,
    user_id: Uuid,
    path_id: Uuid,
) -> Result<LearningPath, AppError> {
    tx.find_path(user_id, path_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Learning path {path_id} not found")))
}

/// Aborts the surrounding transaction unless exactly one path is active.
async fn ensure_single_active(tx: &mut dyn StoreTx, user_id: Uuid) -> Result<(), AppError> {
    let active = tx.count_active_paths(user_id).await?;
    if active != 1 {
        warn!("User {user_id} would have {active} active learning paths, rolling back");
        return Err(AppError::InvariantViolation(format!(
            "user {user_id} has {active} active learning paths"
        )));
    }
    Ok(())
}
