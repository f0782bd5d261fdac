//! Parse extracted JSON into a fully populated [`WeeklyPlan`].
//!
//! Normalization is total over well-formed JSON: unrecognized top-level keys
//! are dropped, missing or non-object slots become placeholders, and
//! non-numeric or out-of-range macros become 0. The only failures are
//! unparseable text and a result with no recognized day.

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

use super::types::{DayPlan, MAX_INGREDIENTS, MealEntry, MealSlot, WeeklyPlan, Weekday};

/// Errors from [`normalize`] and [`normalize_value`].
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("plan is not valid JSON: {0}")]
    MalformedJson(#[source] serde_json::Error),

    #[error("plan contains no recognized weekday")]
    EmptyPlan,
}

/// Parse `json_text` and normalize it.
pub fn normalize(json_text: &str) -> Result<WeeklyPlan, ValidationError> {
    let value: Value = serde_json::from_str(json_text).map_err(ValidationError::MalformedJson)?;
    normalize_value(&value)
}

/// Normalize an already-parsed JSON value.
///
/// Used both for fresh model output and for plans read back from storage.
pub fn normalize_value(value: &Value) -> Result<WeeklyPlan, ValidationError> {
    let mut plan = WeeklyPlan::new();

    if let Some(days) = value.as_object() {
        for (key, day_value) in days {
            match key.parse::<Weekday>() {
                Ok(day) => plan.insert(day, normalize_day(day_value)),
                Err(_) => debug!(key = key.as_str(), "dropping unrecognized plan key"),
            }
        }
    }

    if plan.is_empty() {
        return Err(ValidationError::EmptyPlan);
    }
    Ok(plan)
}

fn normalize_day(value: &Value) -> DayPlan {
    let mut day = DayPlan::placeholder();
    let Some(slots) = value.as_object() else {
        return day;
    };
    for slot in MealSlot::ALL {
        if let Some(meal) = slots.get(slot.key()).and_then(Value::as_object) {
            *day.meal_mut(slot) = normalize_meal(slot, meal);
        }
    }
    day
}

fn normalize_meal(slot: MealSlot, meal: &Map<String, Value>) -> MealEntry {
    let dish_name = meal
        .get("dishName")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or(slot.placeholder_name())
        .to_string();

    let ingredients = meal
        .get("ingredients")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .take(MAX_INGREDIENTS)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    MealEntry {
        dish_name,
        // `as` saturates, so oversized values clamp to u32::MAX.
        calories: quantity(meal.get("calories")).round() as u32,
        protein: quantity(meal.get("protein")),
        carbs: quantity(meal.get("carbs")),
        fat: quantity(meal.get("fat")),
        ingredients,
    }
}

/// A non-negative finite number from a JSON number or numeric string; else 0.
fn quantity(value: Option<&Value>) -> f64 {
    let n = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match n {
        Some(n) if n.is_finite() && n > 0.0 => n,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn fills_missing_slots_with_placeholders() {
        let text = r#"{"Monday": {"lunch": {"dishName": "Rajma Chawal", "calories": 520,
            "protein": 18, "carbs": 80, "fat": 12, "ingredients": ["Kidney beans", "Rice"]}}}"#;
        let plan = normalize(text).unwrap();
        let monday = plan.day(Weekday::Monday).unwrap();

        assert_eq!(monday.lunch.dish_name, "Rajma Chawal");
        assert_eq!(monday.lunch.calories, 520);
        assert_eq!(monday.lunch.ingredients, vec!["Kidney beans", "Rice"]);

        for slot in [MealSlot::Breakfast, MealSlot::Dinner, MealSlot::Snack] {
            let meal = monday.meal(slot);
            assert_eq!(meal, &MealEntry::placeholder(slot));
            assert_eq!(meal.calories, 0);
            assert!(meal.ingredients.is_empty());
        }
    }

    #[test]
    fn drops_unrecognized_keys() {
        let text = r#"{"Monday": {}, "monday": {}, "notes": "eat well", "Funday": {}}"#;
        let plan = normalize(text).unwrap();
        assert_eq!(plan.days().collect::<Vec<_>>(), vec![Weekday::Monday]);
    }

    #[test]
    fn out_of_range_number_literals_become_zero() {
        let text = r#"{"Monday": {"breakfast": {"dishName": "X", "calories": 1e400,
            "protein": -1e999, "carbs": 12, "fat": "1e400"}}}"#;
        let plan = normalize(text).unwrap();
        let breakfast = &plan.day(Weekday::Monday).unwrap().breakfast;

        assert_eq!(breakfast.dish_name, "X");
        assert_eq!(breakfast.calories, 0);
        assert_eq!(breakfast.protein, 0.0);
        assert_eq!(breakfast.carbs, 12.0);
        assert_eq!(breakfast.fat, 0.0);
    }

    #[test]
    fn coerces_odd_field_types() {
        let value = json!({
            "Tuesday": {
                "breakfast": {
                    "dishName": 42,
                    "calories": "310.6",
                    "protein": "lots",
                    "carbs": null,
                    "fat": -3,
                    "ingredients": "oats, milk"
                },
                "lunch": "Dal",
                "dinner": {
                    "dishName": "  Paneer Tikka  ",
                    "calories": 455.4,
                    "ingredients": ["Paneer", 7, "", " Curd ", "a", "b", "c", "d"]
                }
            }
        });
        let plan = normalize_value(&value).unwrap();
        let day = plan.day(Weekday::Tuesday).unwrap();

        assert_eq!(day.breakfast.dish_name, "Sample Breakfast");
        assert_eq!(day.breakfast.calories, 311);
        assert_eq!(day.breakfast.protein, 0.0);
        assert_eq!(day.breakfast.carbs, 0.0);
        assert_eq!(day.breakfast.fat, 0.0);
        assert!(day.breakfast.ingredients.is_empty());

        assert_eq!(day.lunch, MealEntry::placeholder(MealSlot::Lunch));

        assert_eq!(day.dinner.dish_name, "Paneer Tikka");
        assert_eq!(day.dinner.calories, 455);
        assert_eq!(
            day.dinner.ingredients,
            vec!["Paneer", "Curd", "a", "b", "c", "d"]
        );
    }

    #[test]
    fn non_object_day_becomes_placeholder_day() {
        let plan = normalize(r#"{"Sunday": []}"#).unwrap();
        assert_eq!(plan.day(Weekday::Sunday), Some(&DayPlan::placeholder()));
    }

    #[test]
    fn empty_plan_errors() {
        assert!(matches!(normalize("{}"), Err(ValidationError::EmptyPlan)));
        assert!(matches!(
            normalize(r#"{"meals": {"Monday": {}}}"#),
            Err(ValidationError::EmptyPlan)
        ));
        assert!(matches!(normalize("[1, 2]"), Err(ValidationError::EmptyPlan)));
        assert!(matches!(normalize("\"Monday\""), Err(ValidationError::EmptyPlan)));
    }

    #[test]
    fn malformed_json_errors() {
        assert!(matches!(
            normalize("{\"Monday\": {"),
            Err(ValidationError::MalformedJson(_))
        ));
        assert!(matches!(normalize(""), Err(ValidationError::MalformedJson(_))));
    }

    #[test]
    fn renormalizing_is_idempotent() {
        let text = r#"{
            "Wednesday": {"breakfast": {"dishName": "Upma", "calories": 280.7, "protein": 6.25,
                          "carbs": "41", "fat": 7.1, "ingredients": ["Semolina", "Mustard seeds"]}},
            "Monday": {"snack": {"dishName": "Sprouts chaat", "calories": 150}},
            "extra": 1
        }"#;
        let first = normalize(text).unwrap();
        let reserialized = serde_json::to_string(&first.to_json_value()).unwrap();
        let second = normalize(&reserialized).unwrap();
        assert_eq!(first, second);
    }
}
