pub mod health;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::roadmap::handlers as roadmap;
use crate::skills::handlers as skills;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Skills API
        .route("/api/v1/skills", get(skills::handle_list_skills))
        .route("/api/v1/skills/extract", post(skills::handle_extract))
        .route(
            "/api/v1/skills/:id",
            patch(skills::handle_update_skill).delete(skills::handle_delete_skill),
        )
        // Roadmap API
        .route("/api/v1/roadmap/generate", post(roadmap::handle_generate))
        .route("/api/v1/roadmap/current", get(roadmap::handle_current))
        .route("/api/v1/roadmap/history", get(roadmap::handle_history))
        .route("/api/v1/roadmap/compare", get(roadmap::handle_compare))
        .route(
            "/api/v1/roadmap/steps/:step_id",
            patch(roadmap::handle_update_step),
        )
        .route("/api/v1/roadmap/:id", get(roadmap::handle_get_path))
        .route("/api/v1/roadmap/:id/restore", post(roadmap::handle_restore))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::util::ServiceExt;
    use uuid::Uuid;

    use super::*;
    use crate::catalog::ContentCatalog;
    use crate::skills::taxonomy::SkillTaxonomy;
    use crate::store::MemoryStore;

    fn test_app() -> Router {
        let state = AppState::new(
            Arc::new(MemoryStore::new()),
            Arc::new(ContentCatalog::embedded().unwrap()),
            Arc::new(SkillTaxonomy::embedded().unwrap()),
        );
        build_router(state)
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = test_app();
        let (status, body) = send(&app, "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_extract_then_generate_roadmap() {
        let app = test_app();
        let user = Uuid::new_v4();

        let (status, body) = send(
            &app,
            "POST",
            "/api/v1/skills/extract",
            Some(json!({ "user_id": user, "resume_text": "Analyst using SQL and Python daily" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["extracted"], 2);

        let sql_id = body["skills"]
            .as_array()
            .unwrap()
            .iter()
            .find(|s| s["skill_name"] == "SQL")
            .unwrap()["id"]
            .as_str()
            .unwrap()
            .to_string();
        let (status, _) = send(
            &app,
            "PATCH",
            &format!("/api/v1/skills/{sql_id}"),
            Some(json!({ "user_id": user, "priority": "critical" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, path) = send(
            &app,
            "POST",
            "/api/v1/roadmap/generate",
            Some(json!({ "user_id": user, "display_name": "Sam" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(path["title"], "Roadmap for Sam");
        assert_eq!(path["status"], "active");
        assert_eq!(path["steps"].as_array().unwrap().len(), 6);
        assert_eq!(path["steps"][0]["title"], "Primer: SQL");

        let (status, current) =
            send(&app, "GET", &format!("/api/v1/roadmap/current?user_id={user}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(current["id"], path["id"]);
    }

    #[tokio::test]
    async fn test_current_is_null_without_paths() {
        let app = test_app();
        let uri = format!("/api/v1/roadmap/current?user_id={}", Uuid::new_v4());
        let (status, body) = send(&app, "GET", &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.is_null());
    }

    #[tokio::test]
    async fn test_step_update_clamps_and_recomputes() {
        let app = test_app();
        let user = Uuid::new_v4();
        send(
            &app,
            "POST",
            "/api/v1/skills/extract",
            Some(json!({ "user_id": user, "resume_text": "Docker" })),
        )
        .await;
        let (_, path) = send(
            &app,
            "POST",
            "/api/v1/roadmap/generate",
            Some(json!({ "user_id": user })),
        )
        .await;
        let step_id = path["steps"][0]["id"].as_str().unwrap().to_string();

        let (status, updated) = send(
            &app,
            "PATCH",
            &format!("/api/v1/roadmap/steps/{step_id}"),
            Some(json!({ "user_id": user, "status": "in_progress", "progress_percentage": 150 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["steps"][0]["progress_percentage"], 100.0);
        assert_eq!(updated["steps"][0]["status"], "in_progress");
        assert_eq!(updated["progress_percentage"], 33.33);
    }

    #[tokio::test]
    async fn test_unknown_step_status_uses_error_envelope() {
        let app = test_app();
        let user = Uuid::new_v4();
        let uri = format!("/api/v1/roadmap/steps/{}", Uuid::new_v4());
        let (status, body) = send(
            &app,
            "PATCH",
            &uri,
            Some(json!({ "user_id": user, "status": "half_done" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

        let (status, body) = send(&app, "GET", "/api/v1/roadmap/current?user_id=nope", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_foreign_path_is_404() {
        let app = test_app();
        let owner = Uuid::new_v4();
        let (_, path) = send(
            &app,
            "POST",
            "/api/v1/roadmap/generate",
            Some(json!({ "user_id": owner })),
        )
        .await;
        let path_id = path["id"].as_str().unwrap();

        let uri = format!("/api/v1/roadmap/{path_id}?user_id={}", Uuid::new_v4());
        let (status, body) = send(&app, "GET", &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");

        let uri = format!("/api/v1/roadmap/{path_id}/restore?user_id={}", Uuid::new_v4());
        let (status, _) = send(&app, "POST", &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_history_and_compare_routes() {
        let app = test_app();
        let user = Uuid::new_v4();
        let (_, a) = send(
            &app,
            "POST",
            "/api/v1/roadmap/generate",
            Some(json!({ "user_id": user })),
        )
        .await;
        let (_, b) = send(
            &app,
            "POST",
            "/api/v1/roadmap/generate",
            Some(json!({ "user_id": user })),
        )
        .await;

        let (status, history) =
            send(&app, "GET", &format!("/api/v1/roadmap/history?user_id={user}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(history.as_array().unwrap().len(), 2);

        let uri = format!(
            "/api/v1/roadmap/compare?user_id={user}&a_id={}&b_id={}",
            a["id"].as_str().unwrap(),
            b["id"].as_str().unwrap()
        );
        let (status, diff) = send(&app, "GET", &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(diff["overlap_titles"].as_array().unwrap().is_empty());
        assert_eq!(diff["a"]["id"], a["id"]);
    }
}
