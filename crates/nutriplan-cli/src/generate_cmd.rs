//! CLI handler for `nutriplan generate`.

use std::sync::Arc;

use anyhow::{Context, Result, bail};
use tracing::warn;

use nutriplan_core::PlanPipeline;
use nutriplan_core::generation::GeminiClient;
use nutriplan_core::persistence::{PgRepository, persist_generation};
use nutriplan_core::plan::PlanCache;
use nutriplan_core::profile::Profile;
use nutriplan_core::store::{JsonFileStore, KeyValueStore};
use nutriplan_db::pool;

use crate::ProfileArgs;
use crate::config::NutriplanConfig;
use crate::show_cmd::render_plan;

impl ProfileArgs {
    pub fn to_profile(&self) -> Result<Profile> {
        let profile = Profile::new(
            &self.name,
            self.age,
            self.gender,
            self.weight,
            self.height,
            self.activity,
            self.diet,
        )?;
        Ok(profile)
    }
}

/// Generate a plan, cache it locally, print it, and optionally save it remotely.
pub async fn run_generate(config: &NutriplanConfig, args: &ProfileArgs, save: bool) -> Result<()> {
    let profile = args.to_profile().context("invalid profile")?;

    // Resolve the owner before spending a generation request on a plan we can't save.
    let owner_id = if save {
        Some(config.require_owner()?)
    } else {
        None
    };

    let store: Arc<dyn KeyValueStore> = Arc::new(JsonFileStore::in_dir(&config.data_dir));
    let client = GeminiClient::new(
        config.generation.base_url.as_str(),
        config.generation.model.as_str(),
        config.generation.timeout,
    )
    .context("failed to build HTTP client")?;
    let pipeline = PlanPipeline::new(Arc::new(client), store);

    println!(
        "Generating a plan for {} with {}...",
        profile.name(),
        config.generation.model
    );

    let mut cache = PlanCache::new();
    let plan = match pipeline.generate(&profile, &mut cache).await {
        Ok(plan) => plan,
        Err(e) => {
            warn!(error = %e, "plan generation failed");
            bail!("{}", e.user_message());
        }
    };

    println!();
    print!("{}", render_plan(&plan));

    let Some(owner_id) = owner_id else {
        return Ok(());
    };

    let db_pool = pool::create_pool(&config.db_config)
        .await
        .context("plan generated and cached locally, but the database is unreachable")?;
    let repo = PgRepository::new(db_pool.clone());
    let outcome = persist_generation(&repo, owner_id, &profile, &plan).await;
    db_pool.close().await;

    println!();
    match &outcome.record {
        Some(record) => println!("Plan saved: {}", record.id),
        None => println!("Plan could not be saved (see log)."),
    }
    if !outcome.profile_saved {
        println!("Profile could not be saved (see log).");
    }
    Ok(())
}
