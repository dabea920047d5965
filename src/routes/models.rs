//! Model registry routes.

use std::time::Instant;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};

use crate::routes::auth::AuthUser;
use crate::services::model::{self, MetadataUpdate, ModelRow, ModelStats};
use crate::services::profile;
use crate::state::AppState;

const DEFAULT_POPULAR_LIMIT: i64 = 5;
const DEFAULT_INFERENCE_DELAY_MS: u64 = 1500;
const ARTIFACT_CHUNK_SIZE: usize = 64 * 1024;
const INPUT_ECHO_LIMIT: usize = 50;

fn inference_delay_ms() -> u64 {
    std::env::var("INFERENCE_DELAY_MS")
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(DEFAULT_INFERENCE_DELAY_MS)
}

pub(crate) fn model_error_to_response(err: model::ModelError) -> (StatusCode, String) {
    match err {
        model::ModelError::NotFound(_) => (StatusCode::NOT_FOUND, err.to_string()),
        model::ModelError::Forbidden(_) => (StatusCode::FORBIDDEN, err.to_string()),
        model::ModelError::Invalid(_) => (StatusCode::BAD_REQUEST, err.to_string()),
        model::ModelError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "database error".into()),
    }
}

async fn ensure_admin(state: &AppState, auth: &AuthUser) -> Result<(), (StatusCode, String)> {
    let is_admin = profile::is_admin(&state.pool, auth.user.id)
        .await
        .map_err(|_| (StatusCode::INTERNAL_SERVER_ERROR, "database error".to_owned()))?;
    if is_admin {
        Ok(())
    } else {
        Err((StatusCode::FORBIDDEN, "admin role required".into()))
    }
}

// =============================================================================
// LISTING + LOOKUP
// =============================================================================

/// `GET /api/models/mine` — list the caller's models.
pub async fn list_mine(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<ModelRow>>, (StatusCode, String)> {
    let rows = model::list_my_models(&state.pool, auth.user.id)
        .await
        .map_err(model_error_to_response)?;
    Ok(Json(rows))
}

/// `GET /api/models/available` — list every registered model.
pub async fn list_available(
    State(state): State<AppState>,
) -> Result<Json<Vec<ModelRow>>, (StatusCode, String)> {
    let rows = model::list_all_models(&state.pool)
        .await
        .map_err(model_error_to_response)?;
    Ok(Json(rows))
}

/// `GET /api/models/:id` — fetch one model, JSON `null` when absent.
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Option<ModelRow>>, (StatusCode, String)> {
    let row = model::get_model(&state.pool, &id)
        .await
        .map_err(model_error_to_response)?;
    Ok(Json(row))
}

#[derive(Deserialize)]
pub struct PopularQuery {
    pub limit: Option<i64>,
}

/// `GET /api/models/popular?limit=N` — most-used models.
pub async fn most_popular(
    State(state): State<AppState>,
    Query(query): Query<PopularQuery>,
) -> Result<Json<Vec<ModelRow>>, (StatusCode, String)> {
    let limit = query.limit.unwrap_or(DEFAULT_POPULAR_LIMIT);
    if limit <= 0 {
        return Err((StatusCode::BAD_REQUEST, "limit must be positive".into()));
    }
    let rows = model::most_popular(&state.pool, limit)
        .await
        .map_err(model_error_to_response)?;
    Ok(Json(rows))
}

/// `GET /api/stats` — registry-wide aggregates.
pub async fn stats(State(state): State<AppState>) -> Result<Json<ModelStats>, (StatusCode, String)> {
    let stats = model::get_stats(&state.pool)
        .await
        .map_err(model_error_to_response)?;
    Ok(Json(stats))
}

/// `GET /api/admin/models` — full registry listing, admins only.
pub async fn list_admin(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<ModelRow>>, (StatusCode, String)> {
    ensure_admin(&state, &auth).await?;
    let rows = model::list_all_models(&state.pool)
        .await
        .map_err(model_error_to_response)?;
    Ok(Json(rows))
}

// =============================================================================
// MUTATIONS
// =============================================================================

#[derive(Deserialize)]
pub struct UpsertModelBody {
    pub id: Option<String>,
    pub name: String,
    pub artifact: Option<Vec<u8>>,
    pub payload_size: i64,
}

/// `PUT /api/models` — register or update model metadata (idempotent upsert).
pub async fn upsert_metadata(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<UpsertModelBody>,
) -> Result<Json<ModelRow>, (StatusCode, String)> {
    let row = model::upsert_metadata(
        &state.pool,
        auth.user.id,
        MetadataUpdate {
            id: body.id,
            name: body.name,
            artifact: body.artifact,
            payload_size: body.payload_size,
        },
    )
    .await
    .map_err(model_error_to_response)?;
    Ok(Json(row))
}

/// `DELETE /api/models/:id` — delete a model (owner or admin).
pub async fn delete_model(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, (StatusCode, String)> {
    let caller_is_admin = profile::is_admin(&state.pool, auth.user.id)
        .await
        .map_err(|_| (StatusCode::INTERNAL_SERVER_ERROR, "database error".to_owned()))?;
    model::delete_model(&state.pool, &id, auth.user.id, caller_is_admin)
        .await
        .map_err(model_error_to_response)?;
    Ok(Json(serde_json::json!({ "ok": true })))
}

// =============================================================================
// ARTIFACT DOWNLOAD
// =============================================================================

/// `GET /api/models/:id/artifact` — stream the stored artifact bytes.
pub async fn download_artifact(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, (StatusCode, String)> {
    let artifact = model::get_artifact(&state.pool, &id)
        .await
        .map_err(model_error_to_response)?;
    let Some(bytes) = artifact else {
        return Err((StatusCode::NOT_FOUND, format!("model {id} has no stored artifact")));
    };

    let chunks: Vec<axum::body::Bytes> = bytes
        .chunks(ARTIFACT_CHUNK_SIZE)
        .map(axum::body::Bytes::copy_from_slice)
        .collect();
    let stream = futures::stream::iter(chunks.into_iter().map(Ok::<_, std::convert::Infallible>));
    let body = axum::body::Body::from_stream(stream);
    let filename = format!("{id}.bin");

    Ok((
        [
            (CONTENT_TYPE, "application/octet-stream"),
            (CONTENT_DISPOSITION, &format!("attachment; filename=\"{filename}\"")),
        ],
        body,
    )
        .into_response())
}

// =============================================================================
// MOCK INFERENCE
// =============================================================================

#[derive(Deserialize)]
pub struct InferenceBody {
    pub input: String,
}

#[derive(Debug, Serialize)]
pub struct InferenceResponse {
    pub model: String,
    pub input: String,
    pub output: String,
    pub confidence: f64,
    pub processing_time_ms: u64,
    pub note: String,
}

/// Echo at most the first `INPUT_ECHO_LIMIT` characters of the input back.
pub(crate) fn truncate_input(input: &str) -> String {
    let mut echo: String = input.chars().take(INPUT_ECHO_LIMIT).collect();
    if input.chars().count() > INPUT_ECHO_LIMIT {
        echo.push_str("...");
    }
    echo
}

pub(crate) fn mock_inference_response(model_name: &str, input: &str, processing_time_ms: u64) -> InferenceResponse {
    InferenceResponse {
        model: model_name.to_owned(),
        input: truncate_input(input),
        output: "Mock inference result: classification completed".into(),
        confidence: 0.87,
        processing_time_ms,
        note: "Simulated response; actual execution requires a model-specific runtime.".into(),
    }
}

/// `POST /api/models/:id/infer` — simulated inference run.
///
/// No model is executed: the handler waits a configurable delay, bumps the
/// model's usage counters, and returns a canned result.
pub async fn run_inference(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    Json(body): Json<InferenceBody>,
) -> Result<Json<InferenceResponse>, (StatusCode, String)> {
    if body.input.trim().is_empty() {
        return Err((StatusCode::BAD_REQUEST, "input data must not be empty".into()));
    }
    state
        .rate_limiter
        .check_and_record(auth.user.id)
        .map_err(|e| (StatusCode::TOO_MANY_REQUESTS, e.to_string()))?;

    // Reject unknown models before burning the simulated compute delay.
    model::get_model(&state.pool, &id)
        .await
        .map_err(model_error_to_response)?
        .ok_or_else(|| (StatusCode::NOT_FOUND, format!("model not found: {id}")))?;

    let started = Instant::now();
    tokio::time::sleep(std::time::Duration::from_millis(inference_delay_ms())).await;

    let row = model::record_inference(&state.pool, &id)
        .await
        .map_err(model_error_to_response)?;

    let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    Ok(Json(mock_inference_response(&row.name, &body.input, elapsed_ms)))
}

#[cfg(test)]
#[path = "models_test.rs"]
mod tests;
