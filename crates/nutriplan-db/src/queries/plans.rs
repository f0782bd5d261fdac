//! Database query functions for the `plans` table.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::types::Json;
use uuid::Uuid;

use crate::models::PlanRow;

/// Insert a plan row. The id and `created_at` come from the caller's record.
pub async fn insert_plan(
    pool: &PgPool,
    id: Uuid,
    owner_id: Uuid,
    meals: &serde_json::Value,
    created_at: DateTime<Utc>,
) -> Result<PlanRow> {
    let row = sqlx::query_as::<_, PlanRow>(
        "INSERT INTO plans (id, owner_id, meals, created_at) \
         VALUES ($1, $2, $3, $4) \
         RETURNING *",
    )
    .bind(id)
    .bind(owner_id)
    .bind(Json(meals))
    .bind(created_at)
    .fetch_one(pool)
    .await
    .context("failed to insert plan")?;

    Ok(row)
}

/// Fetch a plan by its ID.
pub async fn get_plan(pool: &PgPool, id: Uuid) -> Result<Option<PlanRow>> {
    let row = sqlx::query_as::<_, PlanRow>("SELECT * FROM plans WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("failed to fetch plan")?;

    Ok(row)
}

/// List all plans belonging to an owner, newest first.
pub async fn list_plans_for_owner(pool: &PgPool, owner_id: Uuid) -> Result<Vec<PlanRow>> {
    let rows = sqlx::query_as::<_, PlanRow>(
        "SELECT * FROM plans WHERE owner_id = $1 ORDER BY created_at DESC, id",
    )
    .bind(owner_id)
    .fetch_all(pool)
    .await
    .context("failed to list plans")?;

    Ok(rows)
}
