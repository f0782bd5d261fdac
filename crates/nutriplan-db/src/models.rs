use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sqlx::types::Json;
use uuid::Uuid;

/// A row in the `plans` table.
///
/// `meals` is stored as JSONB exactly as the core crate serialized it; the
/// database layer does not interpret its shape.
#[derive(Debug, Clone, FromRow)]
pub struct PlanRow {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub meals: Json<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

/// A row in the `profiles` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ProfileRow {
    pub owner_id: Uuid,
    pub name: String,
    pub age: i32,
    pub gender: String,
    pub weight_kg: f64,
    pub height_cm: f64,
    pub activity_level: String,
    pub diet_preference: String,
    pub updated_at: DateTime<Utc>,
}

/// Fields written by [`crate::queries::profiles::upsert_profile`].
#[derive(Debug, Clone, PartialEq)]
pub struct NewProfile<'a> {
    pub name: &'a str,
    pub age: i32,
    pub gender: &'a str,
    pub weight_kg: f64,
    pub height_cm: f64,
    pub activity_level: &'a str,
    pub diet_preference: &'a str,
}
