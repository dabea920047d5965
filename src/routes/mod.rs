//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! This module stitches the JSON API under `/api` together with a static
//! informational site served at `/`. Every remote operation the frontend
//! consumes maps to exactly one route here; there is no websocket surface.

pub mod auth;
pub mod estimate;
pub mod funding;
pub mod models;
pub mod profile;

use std::path::PathBuf;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Resolve the path to the static informational site.
fn website_dir() -> PathBuf {
    std::env::var("WEBSITE_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("website"))
}

/// Full application router: JSON API + static site fallback.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let website = ServeDir::new(website_dir()).append_index_html_on_directories(true);

    Router::new()
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/me", get(auth::me))
        .route("/api/models", put(models::upsert_metadata))
        .route("/api/models/mine", get(models::list_mine))
        .route("/api/models/available", get(models::list_available))
        .route("/api/models/popular", get(models::most_popular))
        .route(
            "/api/models/{id}",
            get(models::get_by_id).delete(models::delete_model),
        )
        .route("/api/models/{id}/artifact", get(models::download_artifact))
        .route("/api/models/{id}/infer", post(models::run_inference))
        .route("/api/stats", get(models::stats))
        .route("/api/admin", get(profile::is_admin))
        .route("/api/admin/models", get(models::list_admin))
        .route("/api/admin/roles", post(profile::assign_role))
        .route("/api/profile", get(profile::get_profile).post(profile::save_profile))
        .route("/api/users/{principal}/profile", get(profile::user_profile))
        .route("/api/role", get(profile::get_role))
        .route("/api/funding", get(funding::funding_status))
        .route("/api/estimate", get(estimate::estimate))
        .route("/healthz", get(healthz))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
        .fallback_service(website)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
