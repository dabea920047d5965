//! User profile and role routes.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::Deserialize;

use crate::routes::auth::{AuthUser, MaybeAuthUser};
use crate::services::profile::{self, UserProfile, UserRole};
use crate::state::AppState;

pub(crate) fn profile_error_to_response(err: profile::ProfileError) -> (StatusCode, String) {
    match err {
        profile::ProfileError::UnknownPrincipal(_) => (StatusCode::NOT_FOUND, err.to_string()),
        profile::ProfileError::Invalid(_) => (StatusCode::BAD_REQUEST, err.to_string()),
        profile::ProfileError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "database error".into()),
    }
}

/// `GET /api/profile` — caller's profile, JSON `null` until one is saved.
pub async fn get_profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Option<UserProfile>>, (StatusCode, String)> {
    let profile = profile::get_profile(&state.pool, auth.user.id)
        .await
        .map_err(profile_error_to_response)?;
    Ok(Json(profile))
}

/// `POST /api/profile` — save the caller's profile name.
pub async fn save_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<UserProfile>,
) -> Result<Json<serde_json::Value>, (StatusCode, String)> {
    profile::save_profile(&state.pool, auth.user.id, &body)
        .await
        .map_err(profile_error_to_response)?;
    Ok(Json(serde_json::json!({ "ok": true })))
}

/// `GET /api/users/:principal/profile` — another user's public profile.
pub async fn user_profile(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(principal): Path<String>,
) -> Result<Json<Option<UserProfile>>, (StatusCode, String)> {
    let profile = profile::get_profile_by_principal(&state.pool, &principal)
        .await
        .map_err(profile_error_to_response)?;
    Ok(Json(profile))
}

/// `GET /api/role` — caller's role; anonymous callers are guests.
pub async fn get_role(
    State(state): State<AppState>,
    maybe_auth: MaybeAuthUser,
) -> Result<Json<serde_json::Value>, (StatusCode, String)> {
    let role = match maybe_auth.0 {
        None => UserRole::Guest,
        Some(user) => profile::get_role(&state.pool, user.id)
            .await
            .map_err(profile_error_to_response)?,
    };
    Ok(Json(serde_json::json!({ "role": role.as_str() })))
}

/// `GET /api/admin` — whether the caller holds the admin role.
pub async fn is_admin(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<serde_json::Value>, (StatusCode, String)> {
    let admin = profile::is_admin(&state.pool, auth.user.id)
        .await
        .map_err(profile_error_to_response)?;
    Ok(Json(serde_json::json!({ "admin": admin })))
}

#[derive(Deserialize)]
pub struct AssignRoleBody {
    pub principal: String,
    pub role: String,
}

/// `POST /api/admin/roles` — assign a role to a principal, admins only.
pub async fn assign_role(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<AssignRoleBody>,
) -> Result<Json<serde_json::Value>, (StatusCode, String)> {
    let caller_is_admin = profile::is_admin(&state.pool, auth.user.id)
        .await
        .map_err(profile_error_to_response)?;
    if !caller_is_admin {
        return Err((StatusCode::FORBIDDEN, "admin role required".into()));
    }

    let Some(role) = UserRole::from_str(&body.role) else {
        return Err((StatusCode::BAD_REQUEST, format!("unknown role: {}", body.role)));
    };

    profile::assign_role(&state.pool, body.principal.trim(), role)
        .await
        .map_err(profile_error_to_response)?;
    Ok(Json(serde_json::json!({ "ok": true })))
}

#[cfg(test)]
#[path = "profile_test.rs"]
mod tests;
