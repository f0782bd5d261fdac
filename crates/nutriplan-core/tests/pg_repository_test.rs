//! Integration tests for `PgRepository` against a real PostgreSQL database.
//!
//! Needs Docker or a server URL in `NUTRIPLAN_TEST_PG_URL`.

use chrono::{Duration, Utc};
use uuid::Uuid;

use nutriplan_core::persistence::{PgRepository, PlanRepository, persist_generation};
use nutriplan_core::plan::{PlanCache, WeeklyPlan, Weekday, normalize};
use nutriplan_core::profile::{ActivityLevel, DietPreference, Gender, Profile};
use nutriplan_db::queries::{plans, profiles};
use nutriplan_test_utils::{create_test_db, drop_test_db};

fn profile() -> Profile {
    Profile::new(
        "Farah",
        45,
        Gender::Other,
        81.0,
        170.0,
        ActivityLevel::Sedentary,
        DietPreference::GlutenFree,
    )
    .unwrap()
}

fn plan(text: &str) -> WeeklyPlan {
    normalize(text).unwrap()
}

#[tokio::test]
async fn saved_plans_load_into_cache_newest_first() {
    let (pool, db_name) = create_test_db().await;
    let repo = PgRepository::new(pool.clone());
    let owner = Uuid::new_v4();

    let older = persist_generation(
        &repo,
        owner,
        &profile(),
        &plan(r#"{"Monday": {"lunch": {"dishName": "Idli", "calories": 300}}}"#),
    )
    .await;
    let older = older.record.expect("plan saved");

    // Push the first record back in time so ordering is unambiguous.
    sqlx::query("UPDATE plans SET created_at = $1 WHERE id = $2")
        .bind(Utc::now() - Duration::days(1))
        .bind(older.id)
        .execute(&pool)
        .await
        .unwrap();

    let newer = persist_generation(
        &repo,
        owner,
        &profile(),
        &plan(r#"{"Saturday": {"dinner": {"dishName": "Upma"}}}"#),
    )
    .await
    .record
    .expect("plan saved");

    let records = repo.select(owner).await.unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].id, newer.id);
    assert_eq!(records[1].meals, older.meals);

    let mut cache = PlanCache::new();
    cache.load_saved(records);
    assert!(cache.select_saved(older.id));
    assert_eq!(cache.selected_day(), Some(Weekday::Monday));
    assert_eq!(cache.selected_meals().unwrap().lunch.dish_name, "Idli");

    assert!(repo.select(Uuid::new_v4()).await.unwrap().is_empty());

    pool.close().await;
    drop_test_db(&db_name).await;
}

#[tokio::test]
async fn profile_is_upserted_with_wire_values() {
    let (pool, db_name) = create_test_db().await;
    let repo = PgRepository::new(pool.clone());
    let owner = Uuid::new_v4();

    repo.update_profile(owner, &profile()).await.unwrap();
    repo.update_profile(owner, &profile()).await.unwrap();

    let row = profiles::get_profile(&pool, owner)
        .await
        .unwrap()
        .expect("profile exists");
    assert_eq!(row.name, "Farah");
    assert_eq!(row.gender, "other");
    assert_eq!(row.activity_level, "sedentary");
    assert_eq!(row.diet_preference, "glutenFree");

    pool.close().await;
    drop_test_db(&db_name).await;
}

#[tokio::test]
async fn unreadable_rows_are_skipped() {
    let (pool, db_name) = create_test_db().await;
    let repo = PgRepository::new(pool.clone());
    let owner = Uuid::new_v4();

    plans::insert_plan(
        &pool,
        Uuid::new_v4(),
        owner,
        &serde_json::json!({"notes": "no days here"}),
        Utc::now(),
    )
    .await
    .unwrap();

    assert!(repo.select(owner).await.unwrap().is_empty());

    pool.close().await;
    drop_test_db(&db_name).await;
}
