//! Database query functions for the `roadmaps` table.

use anyhow::{Context, Result};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::Roadmap;

/// Insert a new roadmap row. Returns the inserted row with
/// server-generated defaults (id, created_at).
///
/// Callers must only reach this with a complete, non-empty generated
/// text; partial results are never persisted.
pub async fn insert_roadmap(
    pool: &PgPool,
    user_id: Uuid,
    topic: &str,
    roadmap: &str,
    is_premium: bool,
) -> Result<Roadmap> {
    let row = sqlx::query_as::<_, Roadmap>(
        "INSERT INTO roadmaps (user_id, topic, roadmap, is_premium) \
         VALUES ($1, $2, $3, $4) \
         RETURNING *",
    )
    .bind(user_id)
    .bind(topic)
    .bind(roadmap)
    .bind(is_premium)
    .fetch_one(pool)
    .await
    .context("failed to insert roadmap")?;

    Ok(row)
}

/// Fetch a roadmap by its ID.
pub async fn get_roadmap(pool: &PgPool, id: Uuid) -> Result<Option<Roadmap>> {
    let row = sqlx::query_as::<_, Roadmap>("SELECT * FROM roadmaps WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("failed to fetch roadmap")?;

    Ok(row)
}

/// List all roadmaps for a user, newest first.
pub async fn list_for_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<Roadmap>> {
    let rows = sqlx::query_as::<_, Roadmap>(
        "SELECT * FROM roadmaps WHERE user_id = $1 ORDER BY created_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
    .context("failed to list roadmaps")?;

    Ok(rows)
}
