//! Active plan, selected day and saved-plan history.
//!
//! [`PlanCache`] is the only thing the weekly viewer reads. Every mutation
//! bumps a revision counter published on a [`tokio::sync::watch`] channel so
//! subscribers can redraw without polling. Calls that change nothing (an
//! unknown day, an unknown record id) do not notify.

use tokio::sync::watch;
use tracing::debug;
use uuid::Uuid;

use super::record::StoredPlanRecord;
use super::types::{DayPlan, WeeklyPlan, Weekday};

pub struct PlanCache {
    active: WeeklyPlan,
    selected_day: Option<Weekday>,
    saved: Vec<StoredPlanRecord>,
    active_record: Option<Uuid>,
    revision: watch::Sender<u64>,
}

impl PlanCache {
    pub fn new() -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            active: WeeklyPlan::new(),
            selected_day: None,
            saved: Vec::new(),
            active_record: None,
            revision,
        }
    }

    /// Receive the revision counter; it changes after every mutation.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    /// Number of mutations so far.
    pub fn revision(&self) -> u64 {
        *self.revision.borrow()
    }

    fn notify(&self) {
        self.revision.send_modify(|rev| *rev += 1);
    }

    // -- Reads --

    pub fn active_plan(&self) -> &WeeklyPlan {
        &self.active
    }

    pub fn selected_day(&self) -> Option<Weekday> {
        self.selected_day
    }

    /// Meals of the selected day, if any.
    pub fn selected_meals(&self) -> Option<&DayPlan> {
        self.selected_day.and_then(|day| self.active.day(day))
    }

    /// Saved records, most recent first.
    pub fn saved(&self) -> &[StoredPlanRecord] {
        &self.saved
    }

    /// Id of the saved record currently shown, if the active plan came from one.
    pub fn active_record_id(&self) -> Option<Uuid> {
        self.active_record
    }

    // -- Mutations --

    /// Replace the active plan and select its first day.
    pub fn set_active_plan(&mut self, plan: WeeklyPlan) {
        self.selected_day = plan.first_day();
        self.active = plan;
        self.active_record = None;
        debug!(days = self.active.len(), "active plan replaced");
        self.notify();
    }

    /// Select `day` if the active plan has it. Returns whether the selection changed.
    pub fn select_day(&mut self, day: Weekday) -> bool {
        if !self.active.contains(day) || self.selected_day == Some(day) {
            return false;
        }
        self.selected_day = Some(day);
        self.notify();
        true
    }

    /// Select the next day present in the active plan, wrapping around.
    pub fn select_next_day(&mut self) -> bool {
        let days: Vec<Weekday> = self.active.days().collect();
        match neighbour(&days, self.selected_day, 1) {
            Some(day) => self.select_day(day),
            None => false,
        }
    }

    /// Select the previous day present in the active plan, wrapping around.
    pub fn select_previous_day(&mut self) -> bool {
        let days: Vec<Weekday> = self.active.days().collect();
        match neighbour(&days, self.selected_day, days.len().saturating_sub(1)) {
            Some(day) => self.select_day(day),
            None => false,
        }
    }

    /// Replace the saved-plan history. Records are kept most recent first.
    pub fn load_saved(&mut self, mut records: Vec<StoredPlanRecord>) {
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        self.saved = records;
        self.notify();
    }

    /// Make a saved record's meals the active plan. Returns false for an unknown id.
    pub fn select_saved(&mut self, id: Uuid) -> bool {
        let Some(record) = self.saved.iter().find(|r| r.id == id) else {
            return false;
        };
        self.active = record.meals.clone();
        self.selected_day = self.active.first_day();
        self.active_record = Some(id);
        debug!(%id, "saved plan selected");
        self.notify();
        true
    }
}

impl Default for PlanCache {
    fn default() -> Self {
        Self::new()
    }
}

/// The day `step` positions after `current` in `days`, wrapping.
fn neighbour(days: &[Weekday], current: Option<Weekday>, step: usize) -> Option<Weekday> {
    if days.is_empty() {
        return None;
    }
    let idx = current
        .and_then(|c| days.iter().position(|d| *d == c))
        .unwrap_or(0);
    Some(days[(idx + step) % days.len()])
}
