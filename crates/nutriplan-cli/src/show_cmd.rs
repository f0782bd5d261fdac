//! CLI handler for `nutriplan show` and the plain-text plan renderer shared
//! by `generate` and `history`.

use std::fmt::Write as _;

use anyhow::{Context, Result, bail};

use nutriplan_core::plan::{DayPlan, NutritionTotals, WeeklyPlan, Weekday, load_snapshot};
use nutriplan_core::store::KeyValueStore;

const LABEL_W: usize = 10;
const DISH_W: usize = 32;

fn macros(calories: u32, protein: f64, carbs: f64, fat: f64) -> String {
    format!("{calories:>5} kcal  P {protein:>5.1}g  C {carbs:>5.1}g  F {fat:>5.1}g")
}

fn totals_line(label: &str, t: &NutritionTotals) -> String {
    format!(
        "  {label:<LABEL_W$} {:<DISH_W$} {}",
        "",
        macros(t.calories, t.protein, t.carbs, t.fat)
    )
}

/// Render one day: a line per meal, its ingredients, then the day total.
pub fn render_day(day: Weekday, plan: &DayPlan) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{day}");
    for (slot, meal) in plan.meals() {
        let _ = writeln!(
            out,
            "  {:<LABEL_W$} {:<DISH_W$} {}",
            slot.label(),
            truncate(&meal.dish_name, DISH_W),
            macros(meal.calories, meal.protein, meal.carbs, meal.fat),
        );
        if !meal.ingredients.is_empty() {
            let _ = writeln!(out, "  {:<LABEL_W$} {}", "", meal.ingredients.join(", "));
        }
    }
    let _ = writeln!(out, "{}", totals_line("Total", &plan.totals()));
    out
}

/// Render every day in calendar order, followed by the daily average.
pub fn render_plan(plan: &WeeklyPlan) -> String {
    let mut out = String::new();
    for (day, day_plan) in plan.iter() {
        out.push_str(&render_day(day, day_plan));
        out.push('\n');
    }
    if let Some(avg) = plan.daily_average() {
        let label = format!("Avg/{}d", plan.len());
        let _ = writeln!(out, "{}", totals_line(&label, &avg));
    }
    out
}

/// Print the cached plan, or one day of it.
pub fn run_show(store: &dyn KeyValueStore, day: Option<Weekday>, json: bool) -> Result<()> {
    let Some(plan) = load_snapshot(store) else {
        println!("No plan cached. Use `nutriplan generate ...` to create one.");
        return Ok(());
    };

    if json {
        let text = serde_json::to_string_pretty(&plan.to_json_value())
            .context("failed to serialize plan")?;
        println!("{text}");
        return Ok(());
    }

    match day {
        Some(day) => match plan.day(day) {
            Some(day_plan) => print!("{}", render_day(day, day_plan)),
            None => {
                let available: Vec<&str> = plan.days().map(Weekday::name).collect();
                bail!(
                    "the cached plan has no {day}; available: {}",
                    available.join(", ")
                );
            }
        },
        None => print!("{}", render_plan(&plan)),
    }
    Ok(())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{head}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nutriplan_core::plan::normalize;

    fn plan() -> WeeklyPlan {
        normalize(
            r#"{
                "Tuesday": {"breakfast": {"dishName": "Besan Chilla", "calories": 320,
                    "protein": 14, "carbs": 30, "fat": 9, "ingredients": ["Gram flour", "Onion"]}},
                "Monday": {"dinner": {"dishName": "Palak Paneer", "calories": 480,
                    "protein": 22, "carbs": 18, "fat": 30}}
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn day_lists_every_slot_and_total() {
        let p = plan();
        let text = render_day(Weekday::Tuesday, p.day(Weekday::Tuesday).unwrap());
        assert!(text.starts_with("Tuesday\n"));
        for label in ["Breakfast", "Lunch", "Dinner", "Snack", "Total"] {
            assert!(text.contains(label), "missing {label}: {text}");
        }
        assert!(text.contains("Besan Chilla"));
        assert!(text.contains("Gram flour, Onion"));
        assert!(text.contains("320 kcal"));
    }

    #[test]
    fn plan_is_in_calendar_order_with_average() {
        let text = render_plan(&plan());
        let monday = text.find("Monday").unwrap();
        let tuesday = text.find("Tuesday").unwrap();
        assert!(monday < tuesday);
        assert!(text.contains("Avg/2d"));
        assert!(text.contains("400 kcal"));
    }

    #[test]
    fn long_names_are_truncated() {
        let name = "x".repeat(50);
        let short = truncate(&name, 10);
        assert_eq!(short.chars().count(), 10);
        assert!(short.ends_with("..."));
        assert_eq!(truncate("Poha", 10), "Poha");
    }
}
