//! Model registry service — metadata CRUD, artifacts, and usage counters.
//!
//! DESIGN
//! ======
//! Model records are keyed by an opaque string id; writes are idempotent
//! upserts so a client can retry a registration without creating duplicates.
//! Artifacts are small opaque byte payloads stored inline (bounded by
//! `MAX_PAYLOAD_SIZE`); anything bigger belongs in chunked or external
//! storage, which this demo deliberately does not implement.
//!
//! ERROR HANDLING
//! ==============
//! Validation failures carry user-facing messages and map to 400 at the
//! route layer; ownership violations map to 403. Database errors bubble up
//! via `#[from]` and are never retried here — the caller re-triggers.

use rand::Rng;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

/// Artifact ceiling for the demo (2 MiB). Larger models need chunked
/// storage or external hosting.
pub const MAX_PAYLOAD_SIZE: usize = 2 * 1024 * 1024;

const MODEL_ID_SUFFIX_LEN: usize = 9;
const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("model not found: {0}")]
    NotFound(String),
    #[error("model {0} belongs to another user")]
    Forbidden(String),
    #[error("{0}")]
    Invalid(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Model metadata row as returned to clients. The artifact bytes themselves
/// are served separately; listings only carry their presence and size.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ModelRow {
    pub id: String,
    /// Principal of the owning user.
    pub owner: String,
    pub name: String,
    pub payload_size: i64,
    pub has_artifact: bool,
    pub total_inference_count: i64,
    pub last_inference_ms: i64,
    pub created_ms: i64,
}

/// Incoming metadata write. `id` absent means "register new".
#[derive(Debug, Clone)]
pub struct MetadataUpdate {
    pub id: Option<String>,
    pub name: String,
    pub artifact: Option<Vec<u8>>,
    pub payload_size: i64,
}

/// Registry-wide aggregates for the admin dashboard.
#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct ModelStats {
    pub total_inference_count: i64,
    pub total_storage_used: i64,
    pub total_models: i64,
    pub total_users: i64,
}

// =============================================================================
// HELPERS
// =============================================================================

pub(crate) fn now_ms() -> i64 {
    let Ok(duration) = std::time::SystemTime::now().duration_since(std::time::UNIX_EPOCH) else {
        return 0;
    };
    i64::try_from(duration.as_millis()).unwrap_or(0)
}

/// Generate an opaque model id: `model_<epoch-ms>_<base36 suffix>`.
#[must_use]
pub fn generate_model_id() -> String {
    let mut rng = rand::rng();
    let suffix: String = (0..MODEL_ID_SUFFIX_LEN)
        .map(|_| ID_ALPHABET[rng.random_range(0..ID_ALPHABET.len())] as char)
        .collect();
    format!("model_{}_{suffix}", now_ms())
}

pub(crate) fn validate_metadata(update: &MetadataUpdate) -> Result<(), ModelError> {
    if update.name.trim().is_empty() {
        return Err(ModelError::Invalid("model name must not be empty".into()));
    }
    if let Some(artifact) = &update.artifact {
        if artifact.len() > MAX_PAYLOAD_SIZE {
            return Err(ModelError::Invalid(format!(
                "artifact too large: {} bytes exceeds the {MAX_PAYLOAD_SIZE} byte limit",
                artifact.len()
            )));
        }
        if i64::try_from(artifact.len()).map_or(true, |len| len != update.payload_size) {
            return Err(ModelError::Invalid(
                "payload size does not match artifact length".into(),
            ));
        }
    } else if update.payload_size < 0 {
        return Err(ModelError::Invalid("payload size must be non-negative".into()));
    }
    Ok(())
}

fn row_to_model(row: &PgRow) -> ModelRow {
    ModelRow {
        id: row.get("id"),
        owner: row.get("owner"),
        name: row.get("name"),
        payload_size: row.get("payload_size"),
        has_artifact: row.get("has_artifact"),
        total_inference_count: row.get("total_inference_count"),
        last_inference_ms: row.get("last_inference_ms"),
        created_ms: row.get("created_ms"),
    }
}

const MODEL_COLUMNS: &str = "m.id, u.principal AS owner, m.name, m.payload_size,
     m.artifact IS NOT NULL AS has_artifact,
     m.total_inference_count, m.last_inference_ms, m.created_ms";

// =============================================================================
// QUERIES
// =============================================================================

/// List the caller's own models, newest first.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn list_my_models(pool: &PgPool, owner_id: Uuid) -> Result<Vec<ModelRow>, ModelError> {
    let rows = sqlx::query(&format!(
        "SELECT {MODEL_COLUMNS}
         FROM models m JOIN users u ON u.id = m.owner_id
         WHERE m.owner_id = $1
         ORDER BY m.created_ms DESC"
    ))
    .bind(owner_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(row_to_model).collect())
}

/// List every registered model, newest first.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn list_all_models(pool: &PgPool) -> Result<Vec<ModelRow>, ModelError> {
    let rows = sqlx::query(&format!(
        "SELECT {MODEL_COLUMNS}
         FROM models m JOIN users u ON u.id = m.owner_id
         ORDER BY m.created_ms DESC"
    ))
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(row_to_model).collect())
}

/// Fetch one model by id.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn get_model(pool: &PgPool, id: &str) -> Result<Option<ModelRow>, ModelError> {
    let row = sqlx::query(&format!(
        "SELECT {MODEL_COLUMNS}
         FROM models m JOIN users u ON u.id = m.owner_id
         WHERE m.id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.as_ref().map(row_to_model))
}

/// Fetch a model's stored artifact bytes, `None` when the record is
/// metadata-only.
///
/// # Errors
///
/// Returns `NotFound` if no model matches, or a database error.
pub async fn get_artifact(pool: &PgPool, id: &str) -> Result<Option<Vec<u8>>, ModelError> {
    let row = sqlx::query("SELECT artifact FROM models WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| ModelError::NotFound(id.to_owned()))?;

    Ok(row.get("artifact"))
}

/// The most-used models, ordered by inference count.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn most_popular(pool: &PgPool, limit: i64) -> Result<Vec<ModelRow>, ModelError> {
    let rows = sqlx::query(&format!(
        "SELECT {MODEL_COLUMNS}
         FROM models m JOIN users u ON u.id = m.owner_id
         ORDER BY m.total_inference_count DESC, m.created_ms ASC
         LIMIT $1"
    ))
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(row_to_model).collect())
}

/// Registry-wide aggregates.
///
/// # Errors
///
/// Returns a database error if a query fails.
pub async fn get_stats(pool: &PgPool) -> Result<ModelStats, ModelError> {
    let row = sqlx::query(
        "SELECT COALESCE(SUM(total_inference_count), 0)::BIGINT AS total_inference_count,
                COALESCE(SUM(payload_size), 0)::BIGINT AS total_storage_used,
                COUNT(*) AS total_models
         FROM models",
    )
    .fetch_one(pool)
    .await?;
    let total_users: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;

    Ok(ModelStats {
        total_inference_count: row.get("total_inference_count"),
        total_storage_used: row.get("total_storage_used"),
        total_models: row.get("total_models"),
        total_users,
    })
}

// =============================================================================
// MUTATIONS
// =============================================================================

/// Idempotent metadata upsert keyed by model id.
///
/// Creates the record when the id is unknown (generating an id if the update
/// carries none). On update, an omitted artifact keeps the stored bytes and
/// their recorded size, so the size-matches-artifact invariant survives
/// metadata-only renames.
///
/// # Errors
///
/// Returns `Invalid` for bad metadata, `Forbidden` when the id belongs to
/// another user, or a database error.
pub async fn upsert_metadata(
    pool: &PgPool,
    owner_id: Uuid,
    update: MetadataUpdate,
) -> Result<ModelRow, ModelError> {
    validate_metadata(&update)?;

    let id = update
        .id
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(generate_model_id);
    let name = update.name.trim();

    let existing_owner: Option<Uuid> = sqlx::query_scalar("SELECT owner_id FROM models WHERE id = $1")
        .bind(&id)
        .fetch_optional(pool)
        .await?;

    match existing_owner {
        Some(owner) if owner != owner_id => return Err(ModelError::Forbidden(id)),
        Some(_) => {
            if let Some(artifact) = &update.artifact {
                sqlx::query("UPDATE models SET name = $2, artifact = $3, payload_size = $4 WHERE id = $1")
                    .bind(&id)
                    .bind(name)
                    .bind(artifact)
                    .bind(update.payload_size)
                    .execute(pool)
                    .await?;
            } else {
                sqlx::query(
                    "UPDATE models
                     SET name = $2,
                         payload_size = CASE WHEN artifact IS NULL THEN $3 ELSE payload_size END
                     WHERE id = $1",
                )
                .bind(&id)
                .bind(name)
                .bind(update.payload_size)
                .execute(pool)
                .await?;
            }
        }
        None => {
            sqlx::query(
                "INSERT INTO models (id, owner_id, name, artifact, payload_size, created_ms)
                 VALUES ($1, $2, $3, $4, $5, $6)",
            )
            .bind(&id)
            .bind(owner_id)
            .bind(name)
            .bind(update.artifact.as_deref())
            .bind(update.payload_size)
            .bind(now_ms())
            .execute(pool)
            .await?;
        }
    }

    get_model(pool, &id)
        .await?
        .ok_or(ModelError::NotFound(id))
}

/// Delete a model. Owners and admins only.
///
/// # Errors
///
/// Returns `NotFound` for an unknown id, `Forbidden` for someone else's
/// model, or a database error.
pub async fn delete_model(
    pool: &PgPool,
    id: &str,
    caller_id: Uuid,
    caller_is_admin: bool,
) -> Result<(), ModelError> {
    let owner: Uuid = sqlx::query_scalar("SELECT owner_id FROM models WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| ModelError::NotFound(id.to_owned()))?;

    if owner != caller_id && !caller_is_admin {
        return Err(ModelError::Forbidden(id.to_owned()));
    }

    sqlx::query("DELETE FROM models WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Bump usage counters after a (simulated) inference call.
///
/// # Errors
///
/// Returns `NotFound` for an unknown id, or a database error.
pub async fn record_inference(pool: &PgPool, id: &str) -> Result<ModelRow, ModelError> {
    let result = sqlx::query(
        "UPDATE models
         SET total_inference_count = total_inference_count + 1, last_inference_ms = $2
         WHERE id = $1",
    )
    .bind(id)
    .bind(now_ms())
    .execute(pool)
    .await?;
    if result.rows_affected() == 0 {
        return Err(ModelError::NotFound(id.to_owned()));
    }

    get_model(pool, id)
        .await?
        .ok_or_else(|| ModelError::NotFound(id.to_owned()))
}

#[cfg(test)]
#[path = "model_test.rs"]
mod tests;
