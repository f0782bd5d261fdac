//! TUI rendering using ratatui.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, Tabs, Wrap};

use nutriplan_core::plan::{DayPlan, MealEntry, MealSlot, NutritionTotals};

use super::app::{App, View};

/// Render the current view.
pub fn render(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),    // main content
            Constraint::Length(1), // status bar
        ])
        .split(f.area());

    match app.current_view {
        View::Week => render_week(f, app, chunks[0]),
        View::Saved => render_saved(f, app, chunks[0]),
        View::Help => render_help(f, chunks[0]),
    }

    render_status_bar(f, app, chunks[1]);
}

fn render_week(f: &mut Frame, app: &App, area: Rect) {
    let plan = app.cache.active_plan();
    if plan.is_empty() {
        let empty = Paragraph::new(vec![
            Line::from(""),
            Line::from("  No plan yet."),
            Line::from("  Run `nutriplan generate ...` and open the viewer again."),
        ])
        .block(Block::default().borders(Borders::ALL).title(" Weekly Plan "));
        f.render_widget(empty, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // day tabs
            Constraint::Min(8),    // meal cards
            Constraint::Length(3), // totals
        ])
        .split(area);

    let days: Vec<_> = plan.days().collect();
    let selected = app
        .cache
        .selected_day()
        .and_then(|d| days.iter().position(|x| *x == d))
        .unwrap_or(0);
    let tabs = Tabs::new(days.iter().map(|d| d.name()).collect::<Vec<_>>())
        .select(selected)
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .block(Block::default().borders(Borders::ALL).title(" Weekly Plan "));
    f.render_widget(tabs, chunks[0]);

    let Some(day) = app.cache.selected_meals() else {
        return;
    };
    render_meal_grid(f, day, chunks[1]);

    let totals = Paragraph::new(totals_line("Day total", &day.totals())).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Nutrition "),
    );
    f.render_widget(totals, chunks[2]);
}

fn render_meal_grid(f: &mut Frame, day: &DayPlan, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let mut cells = Vec::with_capacity(4);
    for row in rows.iter() {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(*row);
        cells.extend(cols.iter().copied());
    }

    for (slot, cell) in MealSlot::ALL.into_iter().zip(cells) {
        render_meal_card(f, slot, day.meal(slot), cell);
    }
}

fn render_meal_card(f: &mut Frame, slot: MealSlot, meal: &MealEntry, area: Rect) {
    let label = Style::default().fg(Color::Yellow);
    let mut lines = vec![
        Line::from(Span::styled(
            meal.dish_name.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::styled(format!("{} kcal", meal.calories), Style::default().fg(Color::Cyan)),
            Span::raw(format!(
                "  P {:.1}g  C {:.1}g  F {:.1}g",
                meal.protein, meal.carbs, meal.fat
            )),
        ]),
        Line::from(""),
    ];
    if meal.ingredients.is_empty() {
        lines.push(Line::from(Span::styled(
            "no ingredients listed",
            Style::default().fg(Color::DarkGray),
        )));
    } else {
        lines.push(Line::from(Span::styled("Ingredients", label)));
        lines.extend(meal.ingredients.iter().map(|i| Line::from(format!("  - {i}"))));
    }

    let card = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", slot.label())),
        );
    f.render_widget(card, area);
}

fn render_saved(f: &mut Frame, app: &App, area: Rect) {
    let header_cells = ["Created", "Days", "Avg kcal", "ID"]
        .iter()
        .map(|h| Cell::from(*h).style(Style::default().fg(Color::Yellow)));
    let header = Row::new(header_cells).height(1);

    let active = app.cache.active_record_id();
    let rows = app.cache.saved().iter().enumerate().map(|(i, record)| {
        let mut style = if i == app.selected_saved {
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        if active == Some(record.id) {
            style = style.fg(Color::Green);
        }
        let avg = record
            .meals
            .daily_average()
            .map(|t| t.calories.to_string())
            .unwrap_or_else(|| "-".to_string());

        Row::new(vec![
            Cell::from(record.created_at.format("%Y-%m-%d %H:%M").to_string()),
            Cell::from(record.meals.len().to_string()),
            Cell::from(avg),
            Cell::from(record.id.to_string()),
        ])
        .style(style)
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(18),
            Constraint::Length(6),
            Constraint::Length(10),
            Constraint::Min(36),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" Saved Plans ({}) ", app.cache.saved().len())),
    );

    f.render_widget(table, area);
}

fn render_help(f: &mut Frame, area: Rect) {
    let heading = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);
    let text = vec![
        Line::from(""),
        Line::from(Span::styled("  Week", heading)),
        Line::from("    Left/h    Previous day"),
        Line::from("    Right/l   Next day"),
        Line::from("    Tab       Next day"),
        Line::from(""),
        Line::from(Span::styled("  Saved plans", heading)),
        Line::from("    s         Toggle saved plan list"),
        Line::from("    j/Down    Move down"),
        Line::from("    k/Up      Move up"),
        Line::from("    Enter     Make selected plan active"),
        Line::from(""),
        Line::from(Span::styled("  Other", heading)),
        Line::from("    Esc/q     Back / Quit"),
        Line::from("    ?         Show this help"),
        Line::from(""),
    ];

    let help = Paragraph::new(text).block(Block::default().borders(Borders::ALL).title(" Help "));
    f.render_widget(help, area);
}

fn render_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let view_name = match app.current_view {
        View::Week => "Week",
        View::Saved => "Saved",
        View::Help => "Help",
    };

    let average = app
        .cache
        .active_plan()
        .daily_average()
        .map(|t| format!("avg {} kcal/day", t.calories))
        .unwrap_or_default();

    let status_msg = app.status_message.as_deref().unwrap_or("");

    let bar = Line::from(vec![
        Span::styled(
            format!(" {view_name} "),
            Style::default().bg(Color::Blue).fg(Color::White),
        ),
        Span::raw("  "),
        Span::styled(average, Style::default().fg(Color::Cyan)),
        Span::raw("  "),
        Span::styled(status_msg, Style::default().fg(Color::Green)),
        Span::raw("  q:quit  ?:help  s:saved"),
    ]);

    f.render_widget(Paragraph::new(bar), area);
}

// -- Helpers --

fn totals_line(label: &str, t: &NutritionTotals) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!(" {label}: "), Style::default().fg(Color::Yellow)),
        Span::styled(format!("{} kcal", t.calories), Style::default().fg(Color::Cyan)),
        Span::raw(format!(
            "  protein {:.1}g  carbs {:.1}g  fat {:.1}g",
            t.protein, t.carbs, t.fat
        )),
    ])
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use nutriplan_core::plan::{PlanCache, normalize};
    use nutriplan_core::store::{KeyValueStore, MemoryStore};

    use super::*;

    fn screen(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|f| render(f, app)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn week_view_shows_tabs_cards_and_totals() {
        let mut cache = PlanCache::new();
        cache.set_active_plan(
            normalize(
                r#"{"Monday": {"breakfast": {"dishName": "Poha", "calories": 250,
                    "ingredients": ["Flattened rice"]}}, "Thursday": {}}"#,
            )
            .unwrap(),
        );
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let app = App::new(cache, store);

        let text = screen(&app);
        assert!(text.contains("Monday"));
        assert!(text.contains("Thursday"));
        assert!(text.contains("Poha"));
        assert!(text.contains("Flattened rice"));
        assert!(text.contains("Sample Dinner"));
        assert!(text.contains("Day total"));
    }

    #[test]
    fn empty_cache_shows_hint() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let app = App::new(PlanCache::new(), store);
        assert!(screen(&app).contains("No plan yet."));
    }
}
