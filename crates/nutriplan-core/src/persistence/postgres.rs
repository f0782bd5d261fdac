use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::warn;
use uuid::Uuid;

use nutriplan_db::models::{NewProfile, PlanRow};
use nutriplan_db::queries::{plans, profiles};

use super::PlanRepository;
use crate::plan::{StoredPlanRecord, normalize_value};
use crate::profile::Profile;

/// [`PlanRepository`] over the `nutriplan-db` tables.
#[derive(Debug, Clone)]
pub struct PgRepository {
    pool: PgPool,
}

impl PgRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Convert a row, re-normalizing the stored meals. Unreadable rows are skipped.
fn record_from_row(row: PlanRow) -> Option<StoredPlanRecord> {
    match normalize_value(&row.meals.0) {
        Ok(meals) => Some(StoredPlanRecord {
            id: row.id,
            owner_id: row.owner_id,
            meals,
            created_at: row.created_at,
        }),
        Err(e) => {
            warn!(id = %row.id, error = %e, "skipping unreadable saved plan");
            None
        }
    }
}

#[async_trait]
impl PlanRepository for PgRepository {
    async fn select(&self, owner_id: Uuid) -> Result<Vec<StoredPlanRecord>> {
        let rows = plans::list_plans_for_owner(&self.pool, owner_id).await?;
        Ok(rows.into_iter().filter_map(record_from_row).collect())
    }

    async fn insert(&self, record: &StoredPlanRecord) -> Result<()> {
        plans::insert_plan(
            &self.pool,
            record.id,
            record.owner_id,
            &record.meals.to_json_value(),
            record.created_at,
        )
        .await?;
        Ok(())
    }

    async fn update_profile(&self, owner_id: Uuid, profile: &Profile) -> Result<()> {
        let age = i32::try_from(profile.age()).context("age out of range")?;
        let gender = profile.gender().to_string();
        let activity = profile.activity_level().to_string();
        let diet = profile.diet_preference().to_string();
        profiles::upsert_profile(
            &self.pool,
            owner_id,
            &NewProfile {
                name: profile.name(),
                age,
                gender: &gender,
                weight_kg: profile.weight_kg(),
                height_cm: profile.height_cm(),
                activity_level: &activity,
                diet_preference: &diet,
            },
        )
        .await?;
        Ok(())
    }
}
