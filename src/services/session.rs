//! Session management and the demo identity provider.
//!
//! ARCHITECTURE
//! ============
//! The real deployment fronts an external identity provider, so all this
//! service knows about a caller is an opaque principal string. Logging in
//! upserts the user row for that principal and issues a long-lived session
//! token, stored in an HttpOnly cookie and validated on every request.
//!
//! Principals listed in `ADMIN_PRINCIPALS` are promoted to admin on login;
//! everything else about roles lives in the profile service.

use std::fmt::Write;

use rand::Rng;
use sqlx::{PgPool, Row};
use uuid::Uuid;

pub(crate) fn bytes_to_hex(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(s, "{b:02x}");
    }
    s
}

/// Generate a cryptographically random 32-byte hex token.
#[must_use]
pub fn generate_token() -> String {
    let bytes: [u8; 32] = rand::rng().random();
    bytes_to_hex(&bytes)
}

/// User row returned from session validation.
#[derive(Debug, Clone, serde::Serialize)]
pub struct SessionUser {
    /// Unique user identifier.
    pub id: Uuid,
    /// Opaque caller identity from the identity provider.
    pub principal: String,
    /// Display name; `None` until a profile has been saved.
    pub name: Option<String>,
    /// Stored role (`"admin"` or `"user"`).
    pub role: String,
}

/// Parse the comma-separated `ADMIN_PRINCIPALS` bootstrap list.
#[must_use]
pub fn bootstrap_admins() -> Vec<String> {
    parse_admin_principals(&std::env::var("ADMIN_PRINCIPALS").unwrap_or_default())
}

pub(crate) fn parse_admin_principals(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Find or create the user row for a caller principal.
///
/// Principals on the bootstrap admin list are promoted on every login, so a
/// freshly configured deployment always has at least one admin. A promotion
/// is never reverted here; demotion goes through role assignment.
///
/// # Errors
///
/// Returns a database error if the upsert fails.
pub async fn login_principal(
    pool: &PgPool,
    principal: &str,
    bootstrap_admins: &[String],
) -> Result<SessionUser, sqlx::Error> {
    let role = if bootstrap_admins.iter().any(|p| p == principal) { "admin" } else { "user" };
    let row = sqlx::query(
        "INSERT INTO users (id, principal, role) VALUES ($1, $2, $3)
         ON CONFLICT (principal) DO UPDATE
             SET role = CASE WHEN EXCLUDED.role = 'admin' THEN 'admin' ELSE users.role END
         RETURNING id, principal, name, role",
    )
    .bind(Uuid::new_v4())
    .bind(principal)
    .bind(role)
    .fetch_one(pool)
    .await?;

    Ok(SessionUser {
        id: row.get("id"),
        principal: row.get("principal"),
        name: row.get("name"),
        role: row.get("role"),
    })
}

/// Create a session for the given user, returning the token.
///
/// # Errors
///
/// Returns a database error if the insert fails.
pub async fn create_session(pool: &PgPool, user_id: Uuid) -> Result<String, sqlx::Error> {
    let token = generate_token();
    sqlx::query("INSERT INTO sessions (token, user_id) VALUES ($1, $2)")
        .bind(&token)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(token)
}

/// Validate a session token and return the associated user.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn validate_session(pool: &PgPool, token: &str) -> Result<Option<SessionUser>, sqlx::Error> {
    let row = sqlx::query(
        "SELECT u.id, u.principal, u.name, u.role
         FROM sessions s
         JOIN users u ON u.id = s.user_id
         WHERE s.token = $1 AND s.expires_at > now()",
    )
    .bind(token)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|r| SessionUser {
        id: r.get("id"),
        principal: r.get("principal"),
        name: r.get("name"),
        role: r.get("role"),
    }))
}

/// Delete a session by token.
///
/// # Errors
///
/// Returns a database error if the delete fails.
pub async fn delete_session(pool: &PgPool, token: &str) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM sessions WHERE token = $1")
        .bind(token)
        .execute(pool)
        .await?;
    Ok(())
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
