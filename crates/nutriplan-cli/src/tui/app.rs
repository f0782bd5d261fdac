//! TUI application state for the weekly viewer.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::sync::watch;

use nutriplan_core::plan::{PlanCache, StoredPlanRecord, save_snapshot};
use nutriplan_core::store::KeyValueStore;

/// Which panel the viewer is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Week,
    Saved,
    Help,
}

/// Application state for the TUI.
pub struct App {
    pub cache: PlanCache,
    pub current_view: View,
    pub selected_saved: usize,
    pub tick_rate: Duration,
    pub should_quit: bool,
    pub status_message: Option<String>,
    store: Arc<dyn KeyValueStore>,
    changes: watch::Receiver<u64>,
    needs_redraw: bool,
}

impl App {
    pub fn new(cache: PlanCache, store: Arc<dyn KeyValueStore>) -> Self {
        let changes = cache.subscribe();
        Self {
            cache,
            current_view: View::Week,
            selected_saved: 0,
            tick_rate: Duration::from_millis(250),
            should_quit: false,
            status_message: None,
            store,
            changes,
            needs_redraw: true,
        }
    }

    pub fn has_saved(&self) -> bool {
        !self.cache.saved().is_empty()
    }

    /// Whether the screen is stale: the cache changed or input arrived.
    ///
    /// Consumes the pending cache notification.
    pub fn take_redraw(&mut self) -> bool {
        let changed = self.changes.has_changed().unwrap_or(false);
        if changed {
            self.changes.mark_unchanged();
        }
        std::mem::take(&mut self.needs_redraw) || changed
    }

    pub fn mark_dirty(&mut self) {
        self.needs_redraw = true;
    }

    pub fn selected_record(&self) -> Option<&StoredPlanRecord> {
        self.cache.saved().get(self.selected_saved)
    }

    // -- Navigation --

    pub fn navigate_back(&mut self) {
        match self.current_view {
            View::Week => self.should_quit = true,
            View::Saved | View::Help => self.current_view = View::Week,
        }
    }

    pub fn next_day(&mut self) {
        self.cache.select_next_day();
    }

    pub fn previous_day(&mut self) {
        self.cache.select_previous_day();
    }

    pub fn move_up(&mut self) {
        if self.current_view == View::Saved && self.selected_saved > 0 {
            self.selected_saved -= 1;
        }
    }

    pub fn move_down(&mut self) {
        let len = self.cache.saved().len();
        if self.current_view == View::Saved && len > 0 && self.selected_saved < len - 1 {
            self.selected_saved += 1;
        }
    }

    /// Toggle between the week and the saved-plan list.
    pub fn toggle_saved(&mut self) {
        self.current_view = match self.current_view {
            View::Week if self.has_saved() => View::Saved,
            View::Week => {
                self.status_message = Some("No saved plans loaded (use --saved)".to_string());
                View::Week
            }
            View::Saved | View::Help => View::Week,
        };
    }

    pub fn show_help(&mut self) {
        self.current_view = View::Help;
    }

    // -- Actions --

    /// Make the highlighted saved plan active and cache it locally.
    pub fn activate_selected(&mut self) -> Result<()> {
        let Some(id) = self.selected_record().map(|r| r.id) else {
            return Ok(());
        };
        if self.cache.select_saved(id) {
            save_snapshot(self.store.as_ref(), self.cache.active_plan())
                .context("failed to cache selected plan")?;
            self.current_view = View::Week;
            self.status_message = Some(format!("Plan {id} active"));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
