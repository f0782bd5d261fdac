//! Interactive weekly plan viewer.

pub mod app;
mod ui;

use std::io;
use std::sync::Arc;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use nutriplan_core::plan::PlanCache;
use nutriplan_core::store::KeyValueStore;

use app::{App, View};

/// Launch the viewer over a prepared cache.
pub fn run_viewer(cache: PlanCache, store: Arc<dyn KeyValueStore>) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(cache, store);
    let result = run_event_loop(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    let tick_rate = app.tick_rate;

    loop {
        if app.take_redraw() {
            terminal.draw(|f| ui::render(f, app))?;
        }

        if !event::poll(tick_rate)? {
            continue;
        }
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                app.status_message = None;
                app.mark_dirty();

                match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => app.navigate_back(),
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        app.should_quit = true;
                    }
                    KeyCode::Left | KeyCode::Char('h') => app.previous_day(),
                    KeyCode::Right | KeyCode::Char('l') | KeyCode::Tab => app.next_day(),
                    KeyCode::Char('j') | KeyCode::Down => app.move_down(),
                    KeyCode::Char('k') | KeyCode::Up => app.move_up(),
                    KeyCode::Char('s') => app.toggle_saved(),
                    KeyCode::Enter if app.current_view == View::Saved => {
                        if let Err(e) = app.activate_selected() {
                            app.status_message = Some(format!("Select failed: {e:#}"));
                        }
                    }
                    KeyCode::Char('?') => app.show_help(),
                    _ => {}
                }
            }
            Event::Resize(_, _) => app.mark_dirty(),
            _ => {}
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
