//! Profile in, active plan out.
//!
//! [`PlanPipeline::acquire`] runs prompt → generation → extraction →
//! normalization. [`PlanPipeline::generate`] additionally installs the plan
//! in a [`PlanCache`] and refreshes the offline snapshot. On any failure
//! the cache is left as it was.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{info, warn};

use crate::credential::CredentialStore;
use crate::error::PipelineError;
use crate::generation::TextGenerator;
use crate::plan::{
    PlanCache, WeeklyPlan, build_prompt, extract_json, load_snapshot, normalize, save_snapshot,
};
use crate::profile::Profile;
use crate::store::KeyValueStore;

/// Releases the single-flight flag on drop.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct PlanPipeline {
    generator: Arc<dyn TextGenerator>,
    store: Arc<dyn KeyValueStore>,
    credentials: CredentialStore,
    in_flight: AtomicBool,
}

impl PlanPipeline {
    pub fn new(generator: Arc<dyn TextGenerator>, store: Arc<dyn KeyValueStore>) -> Self {
        let credentials = CredentialStore::new(Arc::clone(&store));
        Self {
            generator,
            store,
            credentials,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    /// Whether a generation request is outstanding.
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Produce a normalized plan for `profile` without touching any cache.
    ///
    /// Only one call may be outstanding; a concurrent call fails with
    /// [`PipelineError::Busy`] and sends nothing.
    pub async fn acquire(&self, profile: &Profile) -> Result<WeeklyPlan, PipelineError> {
        let _guard = InFlight::acquire(&self.in_flight).ok_or(PipelineError::Busy)?;

        let credential = self
            .credentials
            .get()?
            .filter(|c| !c.trim().is_empty())
            .ok_or(PipelineError::CredentialMissing)?;

        let prompt = build_prompt(profile);
        let raw = self.generator.generate(&prompt, &credential).await?;

        let json = extract_json(&raw).inspect_err(|e| {
            warn!(error = %e, raw = %raw, "could not find JSON in model response");
        })?;
        let plan = normalize(json).inspect_err(|e| {
            warn!(error = %e, json = %json, "model response did not normalize");
        })?;

        info!(days = plan.len(), "plan generated");
        Ok(plan)
    }

    /// [`Self::acquire`], then make the plan active in `cache` and snapshot it.
    ///
    /// A snapshot write failure is logged; the plan is still returned.
    pub async fn generate(
        &self,
        profile: &Profile,
        cache: &mut PlanCache,
    ) -> Result<WeeklyPlan, PipelineError> {
        let plan = self.acquire(profile).await?;
        cache.set_active_plan(plan.clone());
        self.remember(&plan);
        Ok(plan)
    }

    /// Best-effort write of `plan` as the offline snapshot.
    pub fn remember(&self, plan: &WeeklyPlan) {
        if let Err(e) = save_snapshot(self.store.as_ref(), plan) {
            warn!(error = %e, "failed to cache plan locally");
        }
    }

    /// Load the offline snapshot into `cache`. Returns false when there is none.
    pub fn restore(&self, cache: &mut PlanCache) -> bool {
        match load_snapshot(self.store.as_ref()) {
            Some(plan) => {
                cache.set_active_plan(plan);
                true
            }
            None => false,
        }
    }
}
