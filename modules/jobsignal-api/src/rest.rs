use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::Deserialize;
use tracing::warn;

use crate::AppState;

#[derive(Deserialize)]
pub struct SubmitQuery {
    pub minutes: Option<i64>,
}

/// `POST /jobs?minutes=N` — fire-and-forget submission.
pub async fn submit_run(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SubmitQuery>,
) -> impl IntoResponse {
    match state.runs.submit(params.minutes).await {
        Ok(job_id) => (
            StatusCode::ACCEPTED,
            Json(serde_json::json!({ "status": "queued", "job_id": job_id })),
        )
            .into_response(),
        Err(e) => {
            warn!(error = %e, "Failed to submit run");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": "failed to queue job" })),
            )
                .into_response()
        }
    }
}

/// `GET /jobs/{id}` — status polling. 404 for unknown or expired runs.
pub async fn run_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match state.runs.status(&id).await {
        Ok(Some(run)) => Json(serde_json::json!({
            "job_id": run.job_id,
            "status": run.status,
            "progress": format!("{}%", run.progress),
            "result": run.result,
        }))
        .into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "error": "job not found" })),
        )
            .into_response(),
        Err(e) => {
            warn!(error = %e, job_id = %id, "Failed to read run state");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": "state store unavailable" })),
            )
                .into_response()
        }
    }
}

/// `GET /health` — static liveness payload, no side effects.
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "message": "alive" }))
}
