//! Axum route handlers for the Roadmap API.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::{AppError, AppJson, AppQuery};
use crate::models::learning_path::{LearningPath, PathSummary};
use crate::roadmap::compare::PathComparison;
use crate::roadmap::generator::PathOptions;
use crate::roadmap::lifecycle::StepUpdate;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub user_id: Uuid,
    pub display_name: Option<String>,
    pub career_goal: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StepUpdateRequest {
    pub user_id: Uuid,
    #[serde(flatten)]
    pub update: StepUpdate,
}

#[derive(Deserialize)]
pub struct CompareQuery {
    pub user_id: Uuid,
    pub a_id: Uuid,
    pub b_id: Uuid,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/roadmap/generate
///
/// Archives the current path and generates a new one from the user's skills.
pub async fn handle_generate(
    State(state): State<AppState>,
    AppJson(req): AppJson<GenerateRequest>,
) -> Result<Json<LearningPath>, AppError> {
    let options = PathOptions {
        display_name: req.display_name,
        career_goal: req.career_goal,
    };
    let path = state.roadmap.generate(req.user_id, &options).await?;
    Ok(Json(path))
}

/// GET /api/v1/roadmap/current
///
/// Returns `null` when the user has never generated a path.
pub async fn handle_current(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<UserIdQuery>,
) -> Result<Json<Option<LearningPath>>, AppError> {
    Ok(Json(state.roadmap.current(params.user_id).await?))
}

/// GET /api/v1/roadmap/history
pub async fn handle_history(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<UserIdQuery>,
) -> Result<Json<Vec<PathSummary>>, AppError> {
    Ok(Json(state.roadmap.history(params.user_id).await?))
}

/// GET /api/v1/roadmap/:id
pub async fn handle_get_path(
    State(state): State<AppState>,
    Path(path_id): Path<Uuid>,
    AppQuery(params): AppQuery<UserIdQuery>,
) -> Result<Json<LearningPath>, AppError> {
    Ok(Json(state.roadmap.get(params.user_id, path_id).await?))
}

/// POST /api/v1/roadmap/:id/restore
pub async fn handle_restore(
    State(state): State<AppState>,
    Path(path_id): Path<Uuid>,
    AppQuery(params): AppQuery<UserIdQuery>,
) -> Result<Json<LearningPath>, AppError> {
    Ok(Json(state.roadmap.restore(params.user_id, path_id).await?))
}

/// PATCH /api/v1/roadmap/steps/:step_id
pub async fn handle_update_step(
    State(state): State<AppState>,
    Path(step_id): Path<Uuid>,
    AppJson(req): AppJson<StepUpdateRequest>,
) -> Result<Json<LearningPath>, AppError> {
    let path = state
        .roadmap
        .update_step(req.user_id, step_id, &req.update)
        .await?;
    Ok(Json(path))
}

/// GET /api/v1/roadmap/compare
pub async fn handle_compare(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<CompareQuery>,
) -> Result<Json<PathComparison>, AppError> {
    let diff = state
        .roadmap
        .compare(params.user_id, params.a_id, params.b_id)
        .await?;
    Ok(Json(diff))
}
