//! Axum route handlers for the Skills API.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::{AppError, AppJson, AppQuery};
use crate::models::skill::SkillAssessment;
use crate::skills::ingest::{
    delete_skill, ingest_resume_text, update_skill, IngestRequest, IngestResponse, SkillUpdate,
};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct SkillUpdateRequest {
    pub user_id: Uuid,
    #[serde(flatten)]
    pub update: SkillUpdate,
}

/// POST /api/v1/skills/extract
pub async fn handle_extract(
    State(state): State<AppState>,
    AppJson(req): AppJson<IngestRequest>,
) -> Result<Json<IngestResponse>, AppError> {
    let response =
        ingest_resume_text(state.store.as_ref(), &state.taxonomy, req.user_id, &req.resume_text)
            .await?;
    Ok(Json(response))
}

/// GET /api/v1/skills
pub async fn handle_list_skills(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<UserIdQuery>,
) -> Result<Json<Vec<SkillAssessment>>, AppError> {
    let mut tx = state.store.begin().await?;
    Ok(Json(tx.skill_assessments(params.user_id).await?))
}

/// PATCH /api/v1/skills/:id
pub async fn handle_update_skill(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    AppJson(req): AppJson<SkillUpdateRequest>,
) -> Result<Json<SkillAssessment>, AppError> {
    let updated = update_skill(state.store.as_ref(), req.user_id, id, &req.update).await?;
    Ok(Json(updated))
}

/// DELETE /api/v1/skills/:id
pub async fn handle_delete_skill(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    AppQuery(params): AppQuery<UserIdQuery>,
) -> Result<StatusCode, AppError> {
    delete_skill(state.store.as_ref(), params.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
