//! User profile and role service.
//!
//! A profile is just a display name, absent until the caller saves one; the
//! frontend uses that absence to decide whether to prompt for setup. Roles
//! are flat strings on the user row; `guest` is what a caller without a
//! session (or with an unparseable stored role) resolves to and is never
//! stored.

use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("unknown principal: {0}")]
    UnknownPrincipal(String),
    #[error("{0}")]
    Invalid(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct UserProfile {
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserRole {
    Admin,
    User,
    Guest,
}

impl UserRole {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
            Self::Guest => "guest",
        }
    }

    #[must_use]
    pub fn from_str(raw: &str) -> Option<Self> {
        match raw {
            "admin" => Some(Self::Admin),
            "user" => Some(Self::User),
            "guest" => Some(Self::Guest),
            _ => None,
        }
    }
}

pub(crate) fn validate_profile(profile: &UserProfile) -> Result<(), ProfileError> {
    if profile.name.trim().is_empty() {
        return Err(ProfileError::Invalid("profile name must not be empty".into()));
    }
    Ok(())
}

/// Fetch the caller's profile, `None` if no name has been saved yet.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn get_profile(pool: &PgPool, user_id: Uuid) -> Result<Option<UserProfile>, ProfileError> {
    let name: Option<Option<String>> = sqlx::query_scalar("SELECT name FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

    Ok(name.flatten().map(|name| UserProfile { name }))
}

/// Save the caller's profile name.
///
/// # Errors
///
/// Returns `Invalid` for an empty name, `UnknownPrincipal` if the user row
/// has disappeared, or a database error.
pub async fn save_profile(pool: &PgPool, user_id: Uuid, profile: &UserProfile) -> Result<(), ProfileError> {
    validate_profile(profile)?;

    let result = sqlx::query("UPDATE users SET name = $2 WHERE id = $1")
        .bind(user_id)
        .bind(profile.name.trim())
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(ProfileError::UnknownPrincipal(user_id.to_string()));
    }
    Ok(())
}

/// Fetch another user's profile by principal, `None` if the principal is
/// unknown or has no saved name.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn get_profile_by_principal(pool: &PgPool, principal: &str) -> Result<Option<UserProfile>, ProfileError> {
    let name: Option<Option<String>> = sqlx::query_scalar("SELECT name FROM users WHERE principal = $1")
        .bind(principal)
        .fetch_optional(pool)
        .await?;

    Ok(name.flatten().map(|name| UserProfile { name }))
}

/// Resolve the caller's role. Unknown users and unparseable rows are guests.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn get_role(pool: &PgPool, user_id: Uuid) -> Result<UserRole, ProfileError> {
    let role: Option<String> = sqlx::query_scalar("SELECT role FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

    Ok(role
        .as_deref()
        .and_then(UserRole::from_str)
        .unwrap_or(UserRole::Guest))
}

/// # Errors
///
/// Returns a database error if the query fails.
pub async fn is_admin(pool: &PgPool, user_id: Uuid) -> Result<bool, ProfileError> {
    Ok(get_role(pool, user_id).await? == UserRole::Admin)
}

/// Assign a role to the user behind a principal (admin-gated at the route).
///
/// # Errors
///
/// Returns `Invalid` for the guest role, `UnknownPrincipal` if no user row
/// matches, or a database error.
pub async fn assign_role(pool: &PgPool, principal: &str, role: UserRole) -> Result<(), ProfileError> {
    if role == UserRole::Guest {
        return Err(ProfileError::Invalid("guest is not an assignable role".into()));
    }

    let result = sqlx::query("UPDATE users SET role = $2 WHERE principal = $1")
        .bind(principal)
        .bind(role.as_str())
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(ProfileError::UnknownPrincipal(principal.to_owned()));
    }
    Ok(())
}

#[cfg(test)]
#[path = "profile_test.rs"]
mod tests;
