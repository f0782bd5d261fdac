//! End-to-end tests for plan generation: profile → prompt → endpoint →
//! extraction → normalization → cache.
//!
//! The generation endpoint is stood in for by wiremock or by scripted
//! generators; the local store is in-memory or a temp directory.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use tokio::sync::Notify;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use nutriplan_core::PipelineError;
use nutriplan_core::PlanPipeline;
use nutriplan_core::generation::{GeminiClient, GenerationError, TextGenerator};
use nutriplan_core::plan::{
    DayPlan, MealEntry, MealSlot, PlanCache, WeeklyPlan, Weekday, load_snapshot,
};
use nutriplan_core::profile::{ActivityLevel, DietPreference, Gender, Profile};
use nutriplan_core::store::{JsonFileStore, KeyValueStore, MemoryStore};

const POHA_REPLY: &str = "Here you go:\n```json\n{\"Monday\":{\"breakfast\":{\"dishName\":\"Poha\",\"calories\":250,\"protein\":5,\"carbs\":40,\"fat\":6,\"ingredients\":[\"Flattened rice\",\"Peanuts\"]}}}\n```\nEnjoy!";

fn profile() -> Profile {
    Profile::new(
        "Ravi",
        34,
        Gender::Male,
        72.5,
        175.0,
        ActivityLevel::Active,
        DietPreference::Vegetarian,
    )
    .unwrap()
}

fn gemini_reply(text: &str) -> serde_json::Value {
    json!({ "candidates": [{ "content": { "parts": [{ "text": text }] } }] })
}

fn assert_poha_plan(plan: &WeeklyPlan) {
    assert_eq!(plan.len(), 1);
    let monday = plan.day(Weekday::Monday).expect("Monday present");

    let breakfast = &monday.breakfast;
    assert_eq!(breakfast.dish_name, "Poha");
    assert_eq!(breakfast.calories, 250);
    assert_eq!(breakfast.protein, 5.0);
    assert_eq!(breakfast.carbs, 40.0);
    assert_eq!(breakfast.fat, 6.0);
    assert_eq!(breakfast.ingredients, vec!["Flattened rice", "Peanuts"]);

    for slot in [MealSlot::Lunch, MealSlot::Dinner, MealSlot::Snack] {
        let meal = monday.meal(slot);
        assert_eq!(meal, &MealEntry::placeholder(slot));
        assert_eq!(meal.calories, 0);
        assert!(meal.ingredients.is_empty());
    }
}

/// Returns one fixed reply and counts calls.
struct Scripted {
    reply: Result<String, u16>,
    calls: AtomicUsize,
}

impl Scripted {
    fn ok(text: &str) -> Self {
        Self {
            reply: Ok(text.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    fn rejected(status: u16) -> Self {
        Self {
            reply: Err(status),
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl TextGenerator for Scripted {
    async fn generate(&self, _prompt: &str, _credential: &str) -> Result<String, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.reply {
            Ok(text) => Ok(text.clone()),
            Err(status) => Err(GenerationError::RemoteRejected {
                status: *status,
                message: "rejected".to_string(),
            }),
        }
    }
}

/// Blocks inside `generate` until released.
struct Gated {
    started: Notify,
    release: Notify,
}

#[async_trait]
impl TextGenerator for Gated {
    async fn generate(&self, _prompt: &str, _credential: &str) -> Result<String, GenerationError> {
        self.started.notify_one();
        self.release.notified().await;
        Ok(POHA_REPLY.to_string())
    }
}

fn pipeline_with(generator: Arc<dyn TextGenerator>) -> (PlanPipeline, Arc<dyn KeyValueStore>) {
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let pipeline = PlanPipeline::new(generator, Arc::clone(&store));
    pipeline.credentials().set("AIza-test-key").unwrap();
    (pipeline, store)
}

// -----------------------------------------------------------------------
// Against a mock endpoint
// -----------------------------------------------------------------------

#[tokio::test]
async fn fenced_reply_becomes_active_plan() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.0-flash:generateContent"))
        .and(header("x-goog-api-key", "AIza-test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_reply(POHA_REPLY)))
        .expect(1)
        .mount(&server)
        .await;

    let client =
        GeminiClient::new(server.uri(), "gemini-2.0-flash", Duration::from_secs(5)).unwrap();
    let (pipeline, store) = pipeline_with(Arc::new(client));

    let mut cache = PlanCache::new();
    let changes = cache.subscribe();
    let plan = pipeline.generate(&profile(), &mut cache).await.unwrap();

    assert_poha_plan(&plan);
    assert_eq!(cache.active_plan(), &plan);
    assert_eq!(cache.selected_day(), Some(Weekday::Monday));
    assert!(changes.has_changed().unwrap());
    assert_eq!(load_snapshot(store.as_ref()), Some(plan));
}

#[tokio::test]
async fn rejected_key_leaves_cache_untouched() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "error": { "code": 403, "message": "Permission denied" }
        })))
        .mount(&server)
        .await;

    let client =
        GeminiClient::new(server.uri(), "gemini-2.0-flash", Duration::from_secs(5)).unwrap();
    let (pipeline, store) = pipeline_with(Arc::new(client));

    let mut cache = PlanCache::new();
    let mut previous = WeeklyPlan::new();
    previous.insert(Weekday::Sunday, DayPlan::placeholder());
    cache.set_active_plan(previous.clone());
    let revision = cache.revision();

    let err = pipeline.generate(&profile(), &mut cache).await.unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Generation(GenerationError::RemoteRejected { status: 403, .. })
    ));
    assert!(err.user_message().contains("Permission denied"));
    assert_eq!(cache.active_plan(), &previous);
    assert_eq!(cache.revision(), revision);
    assert!(load_snapshot(store.as_ref()).is_none());
}

// -----------------------------------------------------------------------
// Scripted generators
// -----------------------------------------------------------------------

#[tokio::test]
async fn missing_credential_sends_nothing() {
    let generator = Arc::new(Scripted::ok(POHA_REPLY));
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let pipeline = PlanPipeline::new(generator.clone(), store);

    let mut cache = PlanCache::new();
    let err = pipeline.generate(&profile(), &mut cache).await.unwrap_err();
    assert!(matches!(err, PipelineError::CredentialMissing));
    assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
    assert!(cache.active_plan().is_empty());
}

#[tokio::test]
async fn prose_without_json_is_extraction_error() {
    let (pipeline, store) = pipeline_with(Arc::new(Scripted::ok(
        "Sorry, I cannot help with meal planning today.",
    )));

    let mut cache = PlanCache::new();
    let err = pipeline.generate(&profile(), &mut cache).await.unwrap_err();
    assert!(matches!(err, PipelineError::Extraction(_)));
    assert!(!err.user_message().contains("Sorry"));
    assert!(cache.active_plan().is_empty());
    assert!(load_snapshot(store.as_ref()).is_none());
}

#[tokio::test]
async fn reply_without_weekdays_is_validation_error() {
    let (pipeline, _store) =
        pipeline_with(Arc::new(Scripted::ok("```json\n{\"Day 1\": {}}\n```")));

    let err = pipeline.acquire(&profile()).await.unwrap_err();
    assert!(matches!(err, PipelineError::Validation(_)));
}

#[tokio::test]
async fn rejection_passes_through() {
    let generator = Arc::new(Scripted::rejected(429));
    let (pipeline, _store) = pipeline_with(generator.clone());

    let err = pipeline.acquire(&profile()).await.unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Generation(GenerationError::RemoteRejected { status: 429, .. })
    ));
    assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
    assert!(!pipeline.is_busy());
}

#[tokio::test]
async fn second_request_while_outstanding_is_busy() {
    let generator = Arc::new(Gated {
        started: Notify::new(),
        release: Notify::new(),
    });
    let (pipeline, _store) = pipeline_with(generator.clone());
    let p = profile();

    let (first, second) = tokio::join!(pipeline.acquire(&p), async {
        generator.started.notified().await;
        assert!(pipeline.is_busy());
        let result = pipeline.acquire(&p).await;
        generator.release.notify_one();
        result
    });

    assert_poha_plan(&first.unwrap());
    assert!(matches!(second, Err(PipelineError::Busy)));
    assert!(!pipeline.is_busy());

    // Guard released: a new request goes through.
    generator.release.notify_one();
    assert!(pipeline.acquire(&p).await.is_ok());
}

#[tokio::test]
async fn newer_plan_supersedes_older() {
    let (first, _) = pipeline_with(Arc::new(Scripted::ok(POHA_REPLY)));
    let (second, _) = pipeline_with(Arc::new(Scripted::ok(
        r#"{"Thursday": {"dinner": {"dishName": "Khichdi", "calories": 380}}}"#,
    )));

    let mut cache = PlanCache::new();
    first.generate(&profile(), &mut cache).await.unwrap();
    second.generate(&profile(), &mut cache).await.unwrap();

    assert!(!cache.active_plan().contains(Weekday::Monday));
    assert_eq!(cache.selected_day(), Some(Weekday::Thursday));
    assert_eq!(cache.selected_meals().unwrap().dinner.dish_name, "Khichdi");
}

#[tokio::test]
async fn snapshot_survives_restart() {
    let tmp = tempfile::TempDir::new().unwrap();

    {
        let store: Arc<dyn KeyValueStore> = Arc::new(JsonFileStore::in_dir(tmp.path()));
        let pipeline = PlanPipeline::new(Arc::new(Scripted::ok(POHA_REPLY)), store);
        pipeline.credentials().set("AIza-file-key").unwrap();
        let mut cache = PlanCache::new();
        pipeline.generate(&profile(), &mut cache).await.unwrap();
    }

    let store: Arc<dyn KeyValueStore> = Arc::new(JsonFileStore::in_dir(tmp.path()));
    let pipeline = PlanPipeline::new(Arc::new(Scripted::ok("")), store);
    assert!(pipeline.credentials().is_present());

    let mut cache = PlanCache::new();
    assert!(pipeline.restore(&mut cache));
    assert_poha_plan(cache.active_plan());
}
