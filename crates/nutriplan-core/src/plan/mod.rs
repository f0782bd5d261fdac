//! Weekly plans: types, prompt, extraction, normalization, cache and snapshot.

pub mod cache;
pub mod extract;
pub mod normalize;
pub mod prompt;
pub mod record;
pub mod snapshot;
pub mod types;

pub use cache::PlanCache;
pub use extract::{ExtractionError, extract_json};
pub use normalize::{ValidationError, normalize, normalize_value};
pub use prompt::build_prompt;
pub use record::StoredPlanRecord;
pub use snapshot::{SNAPSHOT_KEY, load_snapshot, save_snapshot};
pub use types::{
    DayPlan, MAX_INGREDIENTS, MealEntry, MealSlot, NutritionTotals, WeeklyPlan, Weekday,
    WeekdayParseError,
};
