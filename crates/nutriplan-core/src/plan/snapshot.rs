//! Offline copy of the last active plan in the local store.

use tracing::warn;

use crate::store::{KeyValueStore, StoreError};

use super::normalize::normalize;
use super::types::WeeklyPlan;

/// Store key holding the last generated or selected plan.
pub const SNAPSHOT_KEY: &str = "generatedDietPlan";

/// Overwrite the snapshot with `plan`.
pub fn save_snapshot(store: &dyn KeyValueStore, plan: &WeeklyPlan) -> Result<(), StoreError> {
    store.set(SNAPSHOT_KEY, &plan.to_json_value().to_string())
}

/// Load and re-normalize the snapshot.
///
/// Returns `None` when there is no snapshot, or when it cannot be read or
/// no longer normalizes (the failure is logged).
pub fn load_snapshot(store: &dyn KeyValueStore) -> Option<WeeklyPlan> {
    let raw = match store.get(SNAPSHOT_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            warn!(error = %e, "failed to read cached plan");
            return None;
        }
    };
    match normalize(&raw) {
        Ok(plan) => Some(plan),
        Err(e) => {
            warn!(error = %e, "discarding unreadable cached plan");
            None
        }
    }
}
