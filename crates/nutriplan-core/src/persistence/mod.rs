//! The remote persistence collaborator for saved plans and profiles.
//!
//! The core only reads and writes whole records. Profile and plan writes are
//! independent: [`persist_generation`] attempts both and reports each
//! outcome separately.

mod postgres;

pub use postgres::PgRepository;

use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::Result;
use async_trait::async_trait;
use tracing::{info, warn};
use uuid::Uuid;

use crate::plan::{StoredPlanRecord, WeeklyPlan};
use crate::profile::Profile;

/// Record storage keyed by an owner identifier.
#[async_trait]
pub trait PlanRepository: Send + Sync {
    /// All records for `owner_id`, most recent first.
    async fn select(&self, owner_id: Uuid) -> Result<Vec<StoredPlanRecord>>;

    async fn insert(&self, record: &StoredPlanRecord) -> Result<()>;

    /// Create or replace the owner's profile.
    async fn update_profile(&self, owner_id: Uuid, profile: &Profile) -> Result<()>;
}

// Compile-time assertion: usable as `dyn PlanRepository`.
const _: () = {
    fn _assert_object_safe(_: &dyn PlanRepository) {}
};

/// Result of [`persist_generation`].
#[derive(Debug, Clone, PartialEq)]
pub struct PersistOutcome {
    /// The inserted record, if the plan write succeeded.
    pub record: Option<StoredPlanRecord>,
    pub profile_saved: bool,
}

/// Save the profile and the freshly generated plan for `owner_id`.
///
/// Both writes are attempted whatever the other's result; failures are
/// logged, not returned.
pub async fn persist_generation(
    repo: &dyn PlanRepository,
    owner_id: Uuid,
    profile: &Profile,
    plan: &WeeklyPlan,
) -> PersistOutcome {
    let profile_saved = match repo.update_profile(owner_id, profile).await {
        Ok(()) => true,
        Err(e) => {
            warn!(%owner_id, error = %format!("{e:#}"), "failed to save profile");
            false
        }
    };

    let record = StoredPlanRecord::new(owner_id, plan.clone());
    let record = match repo.insert(&record).await {
        Ok(()) => {
            info!(%owner_id, id = %record.id, "plan saved");
            Some(record)
        }
        Err(e) => {
            warn!(%owner_id, error = %format!("{e:#}"), "failed to save plan");
            None
        }
    };

    PersistOutcome {
        record,
        profile_saved,
    }
}

// ---------------------------------------------------------------------------
// MemoryRepository
// ---------------------------------------------------------------------------

/// In-process repository.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    records: Mutex<Vec<StoredPlanRecord>>,
    profiles: Mutex<HashMap<Uuid, Profile>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn profile(&self, owner_id: Uuid) -> Option<Profile> {
        self.profiles
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(&owner_id)
            .cloned()
    }
}

#[async_trait]
impl PlanRepository for MemoryRepository {
    async fn select(&self, owner_id: Uuid) -> Result<Vec<StoredPlanRecord>> {
        let mut records: Vec<StoredPlanRecord> = self
            .records
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .filter(|r| r.owner_id == owner_id)
            .cloned()
            .collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }

    async fn insert(&self, record: &StoredPlanRecord) -> Result<()> {
        let mut records = self.records.lock().unwrap_or_else(|e| e.into_inner());
        if records.iter().any(|r| r.id == record.id) {
            anyhow::bail!("plan {} already exists", record.id);
        }
        records.push(record.clone());
        Ok(())
    }

    async fn update_profile(&self, owner_id: Uuid, profile: &Profile) -> Result<()> {
        self.profiles
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(owner_id, profile.clone());
        Ok(())
    }
}
