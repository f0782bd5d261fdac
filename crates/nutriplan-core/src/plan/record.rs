use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::types::WeeklyPlan;

/// A plan as held by the persistence collaborator.
///
/// Always read and written whole.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredPlanRecord {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub meals: WeeklyPlan,
    pub created_at: DateTime<Utc>,
}

impl StoredPlanRecord {
    /// A fresh record for `meals`, stamped now.
    pub fn new(owner_id: Uuid, meals: WeeklyPlan) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner_id,
            meals,
            created_at: Utc::now(),
        }
    }
}
