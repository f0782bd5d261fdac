//! Generation prompt construction.
//!
//! Pure logic: renders a [`Profile`] into the instruction text sent to the
//! text-generation endpoint. The output contract spelled out here (a single
//! JSON object keyed by weekday, no prose) is what
//! [`super::extract::extract_json`] and [`super::normalize::normalize`]
//! rely on.

use crate::profile::Profile;

use super::types::{MAX_INGREDIENTS, MealSlot, Weekday};

/// Fields every meal object must carry, with their meaning.
const MEAL_FIELDS: [(&str, &str); 6] = [
    ("dishName", "authentic Indian dish name (string)"),
    ("calories", "caloric content in kcal (integer)"),
    ("protein", "protein in grams (number)"),
    ("carbs", "carbohydrates in grams (number)"),
    ("fat", "fat in grams (number)"),
    ("ingredients", "list of 4-6 key ingredients (array of strings)"),
];

/// Build the generation prompt for a profile.
///
/// Deterministic: the same profile always yields the same bytes.
pub fn build_prompt(profile: &Profile) -> String {
    let mut prompt = String::with_capacity(2048);

    prompt.push_str(
        "Generate a 7-day Indian food diet plan for a person with the following details:\n",
    );
    prompt.push_str(&format!("- Age: {}\n", profile.age()));
    prompt.push_str(&format!("- Gender: {}\n", profile.gender()));
    prompt.push_str(&format!("- Weight: {} kg\n", profile.weight_kg()));
    prompt.push_str(&format!("- Height: {} cm\n", profile.height_cm()));
    prompt.push_str(&format!(
        "- Activity Level: {}\n",
        profile.activity_level().description()
    ));
    prompt.push_str(&format!(
        "- Diet Preference: {}\n\n",
        profile.diet_preference().label()
    ));

    let slot_list: Vec<&str> = MealSlot::ALL.iter().map(|s| s.key()).collect();
    prompt.push_str(&format!(
        "For each day, provide {} meals ({}) that are authentic Indian dishes.\n\n",
        MealSlot::ALL.len(),
        slot_list.join(", ")
    ));

    prompt.push_str("Each meal must include:\n");
    for (field, meaning) in MEAL_FIELDS {
        prompt.push_str(&format!("- \"{field}\": {meaning}\n"));
    }
    prompt.push('\n');

    prompt.push_str(
        "Create a nutritionally balanced plan that follows Indian culinary traditions \
         and respects the diet preference above. Focus ONLY on Indian cuisine.\n\n",
    );

    let day_list: Vec<&str> = Weekday::ALL.iter().map(|d| d.name()).collect();
    prompt.push_str(&format!(
        "Return a single JSON object whose top-level keys are exactly these day names: {}.\n",
        day_list.join(", ")
    ));
    prompt.push_str(&format!(
        "Each day maps to an object with exactly the keys {}; each of those maps to a meal \
         object with exactly the fields listed above (at most {MAX_INGREDIENTS} ingredients).\n\n",
        slot_list.join(", ")
    ));

    prompt.push_str("Use this exact structure:\n");
    prompt.push_str(&schema_example());
    prompt.push('\n');

    prompt.push_str(
        "Respond with valid JSON only. Do not include any explanations, \
         commentary or text outside the JSON object.",
    );

    prompt
}

/// Example skeleton: the first day spelled out, the rest abbreviated.
fn schema_example() -> String {
    let mut out = String::from("{\n");
    let first = Weekday::ALL[0];
    out.push_str(&format!("  \"{first}\": {{\n"));
    for (i, slot) in MealSlot::ALL.iter().enumerate() {
        out.push_str(&format!("    \"{}\": {{\n", slot.key()));
        out.push_str("      \"dishName\": \"dish name\",\n");
        out.push_str("      \"calories\": 0,\n");
        out.push_str("      \"protein\": 0,\n");
        out.push_str("      \"carbs\": 0,\n");
        out.push_str("      \"fat\": 0,\n");
        out.push_str(
            "      \"ingredients\": [\"ingredient1\", \"ingredient2\", \"ingredient3\", \"ingredient4\"]\n",
        );
        let sep = if i + 1 == MealSlot::ALL.len() { "" } else { "," };
        out.push_str(&format!("    }}{sep}\n"));
    }
    out.push_str("  },\n");
    let rest = &Weekday::ALL[1..];
    for (i, day) in rest.iter().enumerate() {
        let sep = if i + 1 == rest.len() { "" } else { "," };
        out.push_str(&format!("  \"{day}\": {{ ...same four meals... }}{sep}\n"));
    }
    out.push_str("}\n");
    out
}
