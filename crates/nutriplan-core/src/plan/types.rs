//! Canonical weekly plan shape.
//!
//! These types are what the normalizer produces and what every consumer
//! reads. Wire names follow the generation contract (`dishName`, `Monday`,
//! `breakfast`, ...).

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Keys
// ---------------------------------------------------------------------------

/// A day of the week. Ordered Monday first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Self::Monday,
        Self::Tuesday,
        Self::Wednesday,
        Self::Thursday,
        Self::Friday,
        Self::Saturday,
        Self::Sunday,
    ];

    /// The exact key used in plan JSON (`"Monday"`, ...).
    pub fn name(self) -> &'static str {
        match self {
            Self::Monday => "Monday",
            Self::Tuesday => "Tuesday",
            Self::Wednesday => "Wednesday",
            Self::Thursday => "Thursday",
            Self::Friday => "Friday",
            Self::Saturday => "Saturday",
            Self::Sunday => "Sunday",
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unrecognized weekday name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized weekday: {0:?}")]
pub struct WeekdayParseError(pub String);

impl FromStr for Weekday {
    type Err = WeekdayParseError;

    /// Case-sensitive: only the exact names in [`Weekday::name`] match.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|day| day.name() == s)
            .ok_or_else(|| WeekdayParseError(s.to_owned()))
    }
}

/// One of the four fixed meal categories of a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealSlot {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealSlot {
    pub const ALL: [MealSlot; 4] = [Self::Breakfast, Self::Lunch, Self::Dinner, Self::Snack];

    /// The key used in plan JSON.
    pub fn key(self) -> &'static str {
        match self {
            Self::Breakfast => "breakfast",
            Self::Lunch => "lunch",
            Self::Dinner => "dinner",
            Self::Snack => "snack",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Breakfast => "Breakfast",
            Self::Lunch => "Lunch",
            Self::Dinner => "Dinner",
            Self::Snack => "Snack",
        }
    }

    /// Dish name given to a slot the model left out.
    pub fn placeholder_name(self) -> &'static str {
        match self {
            Self::Breakfast => "Sample Breakfast",
            Self::Lunch => "Sample Lunch",
            Self::Dinner => "Sample Dinner",
            Self::Snack => "Sample Snack",
        }
    }
}

impl fmt::Display for MealSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

// ---------------------------------------------------------------------------
// Values
// ---------------------------------------------------------------------------

/// Maximum number of ingredients kept per meal.
pub const MAX_INGREDIENTS: usize = 6;

/// A single dish with its macros.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealEntry {
    pub dish_name: String,
    /// Kilocalories.
    pub calories: u32,
    /// Grams.
    pub protein: f64,
    /// Grams.
    pub carbs: f64,
    /// Grams.
    pub fat: f64,
    /// At most [`MAX_INGREDIENTS`] entries.
    pub ingredients: Vec<String>,
}

impl MealEntry {
    /// Zero-valued stand-in for a slot missing from the model's answer.
    pub fn placeholder(slot: MealSlot) -> Self {
        Self {
            dish_name: slot.placeholder_name().to_string(),
            calories: 0,
            protein: 0.0,
            carbs: 0.0,
            fat: 0.0,
            ingredients: Vec::new(),
        }
    }
}

/// The four meals of one day. Every slot is always populated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayPlan {
    pub breakfast: MealEntry,
    pub lunch: MealEntry,
    pub dinner: MealEntry,
    pub snack: MealEntry,
}

impl DayPlan {
    /// A day where every slot is a placeholder.
    pub fn placeholder() -> Self {
        Self {
            breakfast: MealEntry::placeholder(MealSlot::Breakfast),
            lunch: MealEntry::placeholder(MealSlot::Lunch),
            dinner: MealEntry::placeholder(MealSlot::Dinner),
            snack: MealEntry::placeholder(MealSlot::Snack),
        }
    }

    pub fn meal(&self, slot: MealSlot) -> &MealEntry {
        match slot {
            MealSlot::Breakfast => &self.breakfast,
            MealSlot::Lunch => &self.lunch,
            MealSlot::Dinner => &self.dinner,
            MealSlot::Snack => &self.snack,
        }
    }

    pub fn meal_mut(&mut self, slot: MealSlot) -> &mut MealEntry {
        match slot {
            MealSlot::Breakfast => &mut self.breakfast,
            MealSlot::Lunch => &mut self.lunch,
            MealSlot::Dinner => &mut self.dinner,
            MealSlot::Snack => &mut self.snack,
        }
    }

    /// Meals in slot order.
    pub fn meals(&self) -> impl Iterator<Item = (MealSlot, &MealEntry)> {
        MealSlot::ALL.into_iter().map(move |slot| (slot, self.meal(slot)))
    }

    /// Sum of the four meals.
    pub fn totals(&self) -> NutritionTotals {
        self.meals()
            .fold(NutritionTotals::default(), |acc, (_, meal)| acc.add_meal(meal))
    }
}

/// Summed macros over some set of meals.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NutritionTotals {
    pub calories: u32,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

impl NutritionTotals {
    fn add_meal(self, meal: &MealEntry) -> Self {
        Self {
            calories: self.calories.saturating_add(meal.calories),
            protein: self.protein + meal.protein,
            carbs: self.carbs + meal.carbs,
            fat: self.fat + meal.fat,
        }
    }
}

// ---------------------------------------------------------------------------
// Weekly plan
// ---------------------------------------------------------------------------

/// Up to seven days of meals, keyed by weekday.
///
/// Iteration is always in calendar order (Monday first), so the "first day"
/// of a plan is deterministic regardless of the order the model emitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeeklyPlan {
    days: BTreeMap<Weekday, DayPlan>,
}

impl WeeklyPlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a day.
    pub fn insert(&mut self, day: Weekday, plan: DayPlan) {
        self.days.insert(day, plan);
    }

    pub fn day(&self, day: Weekday) -> Option<&DayPlan> {
        self.days.get(&day)
    }

    pub fn contains(&self, day: Weekday) -> bool {
        self.days.contains_key(&day)
    }

    /// Days present, in calendar order.
    pub fn days(&self) -> impl Iterator<Item = Weekday> + '_ {
        self.days.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Weekday, &DayPlan)> {
        self.days.iter().map(|(day, plan)| (*day, plan))
    }

    /// The earliest weekday present.
    pub fn first_day(&self) -> Option<Weekday> {
        self.days.keys().next().copied()
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Per-day average of [`DayPlan::totals`]; `None` for an empty plan.
    pub fn daily_average(&self) -> Option<NutritionTotals> {
        if self.days.is_empty() {
            return None;
        }
        let n = self.days.len() as f64;
        let sum = self
            .days
            .values()
            .map(DayPlan::totals)
            .fold((0u64, 0.0, 0.0, 0.0), |acc, t| {
                (
                    acc.0 + u64::from(t.calories),
                    acc.1 + t.protein,
                    acc.2 + t.carbs,
                    acc.3 + t.fat,
                )
            });
        Some(NutritionTotals {
            calories: (sum.0 as f64 / n).round() as u32,
            protein: sum.1 / n,
            carbs: sum.2 / n,
            fat: sum.3 / n,
        })
    }

    /// Serialize to the wire shape (`{"Monday": {"breakfast": {...}}}`).
    pub fn to_json_value(&self) -> serde_json::Value {
        let mut days = serde_json::Map::new();
        for (day, plan) in self.iter() {
            let mut slots = serde_json::Map::new();
            for (slot, meal) in plan.meals() {
                slots.insert(slot.key().to_string(), meal_to_value(meal));
            }
            days.insert(day.name().to_string(), serde_json::Value::Object(slots));
        }
        serde_json::Value::Object(days)
    }
}

fn meal_to_value(meal: &MealEntry) -> serde_json::Value {
    serde_json::json!({
        "dishName": meal.dish_name,
        "calories": meal.calories,
        "protein": meal.protein,
        "carbs": meal.carbs,
        "fat": meal.fat,
        "ingredients": meal.ingredients,
    })
}
