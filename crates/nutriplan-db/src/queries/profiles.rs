//! Database query functions for the `profiles` table.

use anyhow::{Context, Result};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{NewProfile, ProfileRow};

/// Insert or replace the profile for an owner. Returns the stored row.
pub async fn upsert_profile(
    pool: &PgPool,
    owner_id: Uuid,
    profile: &NewProfile<'_>,
) -> Result<ProfileRow> {
    let row = sqlx::query_as::<_, ProfileRow>(
        "INSERT INTO profiles \
           (owner_id, name, age, gender, weight_kg, height_cm, activity_level, diet_preference) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
         ON CONFLICT (owner_id) DO UPDATE SET \
           name = EXCLUDED.name, \
           age = EXCLUDED.age, \
           gender = EXCLUDED.gender, \
           weight_kg = EXCLUDED.weight_kg, \
           height_cm = EXCLUDED.height_cm, \
           activity_level = EXCLUDED.activity_level, \
           diet_preference = EXCLUDED.diet_preference, \
           updated_at = now() \
         RETURNING *",
    )
    .bind(owner_id)
    .bind(profile.name)
    .bind(profile.age)
    .bind(profile.gender)
    .bind(profile.weight_kg)
    .bind(profile.height_cm)
    .bind(profile.activity_level)
    .bind(profile.diet_preference)
    .fetch_one(pool)
    .await
    .with_context(|| format!("failed to upsert profile for owner {owner_id}"))?;

    Ok(row)
}

/// Fetch the profile for an owner.
pub async fn get_profile(pool: &PgPool, owner_id: Uuid) -> Result<Option<ProfileRow>> {
    let row = sqlx::query_as::<_, ProfileRow>("SELECT * FROM profiles WHERE owner_id = $1")
        .bind(owner_id)
        .fetch_optional(pool)
        .await
        .context("failed to fetch profile")?;

    Ok(row)
}
