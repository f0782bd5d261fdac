//! CLI handler for `nutriplan history`.
//!
//! Lists the owner's saved plans, newest first. With `--select <ID>` the
//! chosen plan becomes the active (locally cached) plan.

use anyhow::{Context, Result, bail};
use uuid::Uuid;

use nutriplan_core::persistence::PlanRepository;
use nutriplan_core::plan::{PlanCache, StoredPlanRecord, save_snapshot};
use nutriplan_core::store::KeyValueStore;

use crate::show_cmd::render_plan;

pub async fn run_history(
    repo: &dyn PlanRepository,
    owner_id: Uuid,
    store: &dyn KeyValueStore,
    select: Option<&str>,
) -> Result<()> {
    let records = repo
        .select(owner_id)
        .await
        .context("failed to load saved plans")?;

    match select {
        Some(id) => cmd_select(records, id, store),
        None => {
            print_table(&records);
            Ok(())
        }
    }
}

fn cmd_select(records: Vec<StoredPlanRecord>, id: &str, store: &dyn KeyValueStore) -> Result<()> {
    let id = Uuid::parse_str(id).with_context(|| format!("invalid plan ID: {id}"))?;

    let mut cache = PlanCache::new();
    cache.load_saved(records);
    if !cache.select_saved(id) {
        bail!("no saved plan with ID {id}");
    }
    save_snapshot(store, cache.active_plan()).context("failed to cache selected plan")?;

    println!("Plan {id} is now the active plan.");
    println!();
    print!("{}", render_plan(cache.active_plan()));
    Ok(())
}

fn print_table(records: &[StoredPlanRecord]) {
    if records.is_empty() {
        println!("No saved plans. Use `nutriplan generate ... --save` to save one.");
        return;
    }

    // ID is always 36 chars (UUID).
    let id_w = 36;
    let created_w = 16;
    let days_w = 4;

    println!(
        "{:<id_w$}  {:<created_w$}  {:>days_w$}  AVG KCAL",
        "ID", "CREATED", "DAYS",
    );
    for record in records {
        let avg = record
            .meals
            .daily_average()
            .map(|t| t.calories.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<id_w$}  {:<created_w$}  {:>days_w$}  {}",
            record.id,
            record.created_at.format("%Y-%m-%d %H:%M").to_string(),
            record.meals.len(),
            avg,
        );
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use nutriplan_core::persistence::MemoryRepository;
    use nutriplan_core::plan::{Weekday, load_snapshot, normalize};
    use nutriplan_core::store::MemoryStore;

    use super::*;

    async fn seeded() -> (MemoryRepository, Uuid, StoredPlanRecord) {
        let repo = MemoryRepository::new();
        let owner = Uuid::new_v4();
        let mut old = StoredPlanRecord::new(
            owner,
            normalize(r#"{"Sunday": {"lunch": {"dishName": "Veg Biryani"}}}"#).unwrap(),
        );
        old.created_at -= Duration::days(3);
        repo.insert(&old).await.unwrap();
        repo.insert(&StoredPlanRecord::new(
            owner,
            normalize(r#"{"Monday": {}}"#).unwrap(),
        ))
        .await
        .unwrap();
        (repo, owner, old)
    }

    #[tokio::test]
    async fn select_makes_record_active() {
        let (repo, owner, old) = seeded().await;
        let store = MemoryStore::new();

        let id = old.id.to_string();
        run_history(&repo, owner, &store, Some(&id)).await.unwrap();

        let cached = load_snapshot(&store).unwrap();
        assert_eq!(cached, old.meals);
        assert!(cached.contains(Weekday::Sunday));
    }

    #[tokio::test]
    async fn unknown_or_malformed_id_fails_without_caching() {
        let (repo, owner, _) = seeded().await;
        let store = MemoryStore::new();

        let unknown = Uuid::new_v4().to_string();
        assert!(run_history(&repo, owner, &store, Some(&unknown)).await.is_err());
        assert!(run_history(&repo, owner, &store, Some("not-a-uuid")).await.is_err());
        assert!(load_snapshot(&store).is_none());
    }

    #[tokio::test]
    async fn listing_succeeds_with_and_without_records() {
        let (repo, owner, _) = seeded().await;
        let store = MemoryStore::new();
        run_history(&repo, owner, &store, None).await.unwrap();
        run_history(&repo, Uuid::new_v4(), &store, None).await.unwrap();
    }
}
