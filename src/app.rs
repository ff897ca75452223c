use crate::domain::{normalize_duration, now_millis, Filter, InputField, TaskFlag, TimePatch, UiMode};
use crate::persistence::ChangeFeed;
use crate::store::TaskStore;
use crate::ticker::RefreshTimer;
use anyhow::Result;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Longest accepted minutes/seconds input
const MAX_DIGITS: usize = 4;

/// Input form state for adding tasks
#[derive(Debug, Clone, Default)]
pub struct InputFormState {
    pub label: String,
    pub minutes: String,
    pub seconds: String,
    pub field: InputField,
}

impl InputFormState {
    /// Duration typed into the form; empty fields count as zero and
    /// seconds past 59 carry into minutes
    pub fn duration(&self) -> (u32, u32) {
        normalize_duration(
            self.minutes.parse().unwrap_or(0),
            self.seconds.parse().unwrap_or(0),
        )
    }
}

/// Inline label edit of one task
#[derive(Debug, Clone)]
pub struct EditState {
    pub task_id: String,
    pub buffer: String,
}

/// Main application state
pub struct AppState {
    pub store: TaskStore,
    feed: Box<dyn ChangeFeed>,
    pub selected_index: usize,
    pub ui_mode: UiMode,
    pub input_form: Option<InputFormState>,
    pub edit: Option<EditState>,
    refresh: RefreshTimer,
    /// Wall clock in epoch milliseconds
    clock: fn() -> i64,
}

impl AppState {
    pub fn new(store: TaskStore, feed: Box<dyn ChangeFeed>, refresh_interval: Duration) -> Self {
        let now = Instant::now();
        Self {
            store,
            feed,
            selected_index: 0,
            ui_mode: UiMode::Normal,
            input_form: None,
            edit: None,
            refresh: RefreshTimer::new(refresh_interval, now),
            clock: now_millis,
        }
    }

    /// Ids of the tasks currently shown, in list order
    pub fn visible_ids(&self) -> Vec<String> {
        self.store.visible().iter().map(|task| task.id.clone()).collect()
    }

    /// Id of the highlighted task
    pub fn selected_id(&self) -> Option<String> {
        self.visible_ids().get(self.selected_index).cloned()
    }

    /// Move selection up
    pub fn move_selection_up(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
        }
    }

    /// Move selection down
    pub fn move_selection_down(&mut self) {
        if self.selected_index + 1 < self.store.visible().len() {
            self.selected_index += 1;
        }
    }

    /// Keep the selection inside the visible list
    fn clamp_selection(&mut self) {
        let len = self.store.visible().len();
        if len == 0 {
            self.selected_index = 0;
        } else if self.selected_index >= len {
            self.selected_index = len - 1;
        }
    }

    pub fn toggle_done_selected(&mut self) {
        if let Some(id) = self.selected_id() {
            self.store.toggle_field(&id, TaskFlag::Done);
            // Under active/completed the task may have left the view
            self.clamp_selection();
        }
    }

    pub fn delete_selected(&mut self) {
        if let Some(id) = self.selected_id() {
            self.store.delete_task(&id);
            self.clamp_selection();
        }
    }

    /// Put the selected task into edit mode and open the label buffer
    pub fn begin_edit_selected(&mut self) {
        let Some(id) = self.selected_id() else {
            return;
        };
        let Some(task) = self.store.find(&id) else {
            return;
        };

        let buffer = task.label.clone();
        // Tasks loaded in edit mode are already there
        if !task.is_editing() {
            self.store.toggle_field(&id, TaskFlag::Editing);
        }

        self.edit = Some(EditState {
            task_id: id,
            buffer,
        });
        self.ui_mode = UiMode::EditingLabel;
    }

    pub fn edit_add_char(&mut self, c: char) {
        if let Some(edit) = &mut self.edit {
            edit.buffer.push(c);
        }
    }

    pub fn edit_backspace(&mut self) {
        if let Some(edit) = &mut self.edit {
            edit.buffer.pop();
        }
    }

    /// Apply the edited label and leave edit mode; a blank label keeps the old one
    pub fn commit_edit(&mut self) {
        if let Some(edit) = self.edit.take() {
            let label = edit.buffer.trim();
            let label = if label.is_empty() {
                self.store
                    .find(&edit.task_id)
                    .map(|task| task.label.clone())
                    .unwrap_or_default()
            } else {
                label.to_string()
            };
            self.store.rename_and_close_edit(&edit.task_id, &label);
        }
        self.ui_mode = UiMode::Normal;
    }

    /// Leave edit mode keeping the current label
    pub fn cancel_edit(&mut self) {
        if let Some(edit) = &mut self.edit {
            edit.buffer.clear();
        }
        self.commit_edit();
    }

    /// Change the selected task's minutes by `delta` (never below zero)
    pub fn adjust_minutes(&mut self, delta: i64) {
        let Some(id) = self.selected_id() else {
            return;
        };
        let Some(task) = self.store.find(&id) else {
            return;
        };

        let min = (task.time.min as i64 + delta).clamp(0, u32::MAX as i64) as u32;
        self.store.update_duration(
            &id,
            TimePatch {
                min: Some(min),
                ..TimePatch::default()
            },
        );
    }

    /// Start or stop the countdown on the selected task
    pub fn toggle_countdown_selected(&mut self) {
        let Some(id) = self.selected_id() else {
            return;
        };
        self.store.toggle_countdown(&id, (self.clock)());
    }

    pub fn set_filter(&mut self, filter: Filter) {
        self.store.set_filter(filter);
        self.clamp_selection();
    }

    pub fn cycle_filter(&mut self) {
        self.set_filter(self.store.filter().next());
    }

    pub fn clear_completed(&mut self) {
        self.store.clear_completed();
        self.clamp_selection();
    }

    /// Start adding a new task (opens input form)
    pub fn start_add_task(&mut self) {
        self.input_form = Some(InputFormState::default());
        self.ui_mode = UiMode::AddingTask;
    }

    /// Move to the next form field (label -> minutes -> seconds)
    pub fn input_form_toggle_field(&mut self) {
        if let Some(form) = &mut self.input_form {
            form.field = form.field.next();
        }
    }

    /// Add character to the focused field; duration fields take digits only
    pub fn input_form_add_char(&mut self, c: char) {
        if let Some(form) = &mut self.input_form {
            match form.field {
                InputField::Label => form.label.push(c),
                InputField::Minutes if c.is_ascii_digit() && form.minutes.len() < MAX_DIGITS => {
                    form.minutes.push(c)
                }
                InputField::Seconds if c.is_ascii_digit() && form.seconds.len() < MAX_DIGITS => {
                    form.seconds.push(c)
                }
                _ => {}
            }
        }
    }

    /// Backspace in input form (current field)
    pub fn input_form_backspace(&mut self) {
        if let Some(form) = &mut self.input_form {
            match form.field {
                InputField::Label => form.label.pop(),
                InputField::Minutes => form.minutes.pop(),
                InputField::Seconds => form.seconds.pop(),
            };
        }
    }

    /// Create the task if the label is not blank; otherwise keep the form open
    pub fn submit_input_form(&mut self) {
        let Some(form) = &self.input_form else {
            return;
        };

        let label = form.label.trim().to_string();
        if label.is_empty() {
            return;
        }

        let (min, sec) = form.duration();
        self.store.create_task(&label, min, sec);
        self.input_form = None;
        self.ui_mode = UiMode::Normal;
        self.selected_index = 0;
    }

    /// Cancel input form
    pub fn cancel_input_form(&mut self) {
        self.input_form = None;
        self.ui_mode = UiMode::Normal;
    }

    /// Drive timers and pick up changes made by other instances
    pub fn tick(&mut self, now: Instant) {
        match self.feed.poll_changes() {
            Ok(keys) => {
                if self.store.apply_external_changes(&keys) {
                    self.reconcile_after_reload();
                }
            }
            Err(e) => warn!(error = ?e, "Failed to poll for external changes"),
        }

        let now_ms = (self.clock)();
        if self.refresh.fire_if_due(now) {
            self.store.refresh_relative_times(now_ms);
        }
        self.store.advance_countdowns(now_ms);
    }

    /// Drop UI state that no longer matches a reloaded store
    fn reconcile_after_reload(&mut self) {
        if let Some(edit) = &self.edit {
            let still_editing = self
                .store
                .find(&edit.task_id)
                .map(|task| task.is_editing())
                .unwrap_or(false);
            if !still_editing {
                debug!(id = %edit.task_id, "Edited task changed elsewhere, leaving edit mode");
                self.edit = None;
                self.ui_mode = UiMode::Normal;
            }
        }
        self.clamp_selection();
    }

    /// Save state to the slot
    pub fn save(&mut self) -> Result<()> {
        self.store.flush()
    }

    /// Stop the refresh timer and write the final state
    pub fn shutdown(&mut self) -> Result<()> {
        self.refresh.cancel();
        self.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{MemorySlots, Snapshot};

    fn create_test_app() -> (MemorySlots, AppState) {
        let slots = MemorySlots::with_slot(
            "todo",
            &Snapshot::new(Vec::new(), Filter::All).encode().unwrap(),
        );
        let mut store = TaskStore::open(Box::new(slots.clone()), "todo");
        store.create_task("Task 2", 10, 0);
        store.create_task("Task 1", 5, 0);
        let app = AppState::new(store, Box::new(slots.clone()), Duration::from_secs(4));
        (slots, app)
    }

    fn label_at(app: &AppState, index: usize) -> String {
        app.store.visible()[index].label.clone()
    }

    #[test]
    fn test_app_state_new() {
        let (_slots, app) = create_test_app();
        assert_eq!(app.store.tasks().len(), 2);
        assert_eq!(app.selected_index, 0);
        assert_eq!(app.ui_mode, UiMode::Normal);
        assert!(app.input_form.is_none());
    }

    #[test]
    fn test_move_selection() {
        let (_slots, mut app) = create_test_app();

        app.move_selection_down();
        assert_eq!(app.selected_index, 1);

        // Can't go past the end
        app.move_selection_down();
        assert_eq!(app.selected_index, 1);

        app.move_selection_up();
        app.move_selection_up();
        assert_eq!(app.selected_index, 0);
    }

    #[test]
    fn test_add_task_through_form() {
        let (_slots, mut app) = create_test_app();

        app.start_add_task();
        for c in "Buy milk".chars() {
            app.input_form_add_char(c);
        }
        app.input_form_toggle_field();
        app.input_form_add_char('5');
        app.input_form_add_char('x');
        app.submit_input_form();

        assert_eq!(app.ui_mode, UiMode::Normal);
        assert_eq!(app.store.tasks().len(), 3);
        let task = &app.store.tasks()[0];
        assert_eq!(task.label, "Buy milk");
        assert_eq!((task.time.min, task.time.sec), (5, 0));
    }

    #[test]
    fn test_blank_label_keeps_form_open() {
        let (_slots, mut app) = create_test_app();

        app.start_add_task();
        app.input_form_add_char(' ');
        app.submit_input_form();

        assert_eq!(app.ui_mode, UiMode::AddingTask);
        assert!(app.input_form.is_some());
        assert_eq!(app.store.tasks().len(), 2);
    }

    #[test]
    fn test_form_duration_carries_seconds() {
        let form = InputFormState {
            minutes: "1".to_string(),
            seconds: "90".to_string(),
            ..InputFormState::default()
        };
        assert_eq!(form.duration(), (2, 30));
        assert_eq!(InputFormState::default().duration(), (0, 0));
    }

    #[test]
    fn test_edit_label_flow() {
        let (_slots, mut app) = create_test_app();

        app.begin_edit_selected();
        assert_eq!(app.ui_mode, UiMode::EditingLabel);
        assert!(app.store.tasks()[0].is_editing());

        for _ in 0.."Task 1".len() {
            app.edit_backspace();
        }
        for c in "Renamed".chars() {
            app.edit_add_char(c);
        }
        app.commit_edit();

        assert_eq!(app.ui_mode, UiMode::Normal);
        assert_eq!(app.store.tasks()[0].label, "Renamed");
        assert!(!app.store.tasks()[0].is_editing());
    }

    #[test]
    fn test_cancel_edit_keeps_label() {
        let (_slots, mut app) = create_test_app();

        app.begin_edit_selected();
        app.edit_add_char('!');
        app.cancel_edit();

        assert_eq!(app.store.tasks()[0].label, "Task 1");
        assert!(!app.store.tasks()[0].is_editing());
    }

    #[test]
    fn test_toggle_done_under_active_filter_clamps() {
        let (_slots, mut app) = create_test_app();
        app.set_filter(Filter::Active);
        app.move_selection_down();

        app.toggle_done_selected();
        assert_eq!(app.store.visible().len(), 1);
        assert_eq!(app.selected_index, 0);
        assert_eq!(label_at(&app, 0), "Task 1");
    }

    #[test]
    fn test_delete_and_clear_completed() {
        let (_slots, mut app) = create_test_app();

        app.toggle_done_selected();
        app.clear_completed();
        assert_eq!(app.store.tasks().len(), 1);
        assert_eq!(label_at(&app, 0), "Task 2");

        app.delete_selected();
        assert!(app.store.tasks().is_empty());
        assert!(app.selected_id().is_none());
    }

    #[test]
    fn test_adjust_minutes() {
        let (_slots, mut app) = create_test_app();

        app.adjust_minutes(1);
        assert_eq!(app.store.tasks()[0].time.min, 6);

        app.adjust_minutes(-10);
        assert_eq!(app.store.tasks()[0].time.min, 0);
    }

    const START_MS: i64 = 1_700_000_000_000;

    #[test]
    fn test_countdown_runs_on_tick() {
        let (_slots, mut app) = create_test_app();
        let now = Instant::now();

        // Started half a second into a wall-clock second
        app.clock = || START_MS + 500;
        app.toggle_countdown_selected();
        assert!(app.store.tasks()[0].time.work);

        app.clock = || START_MS + 1_400;
        app.tick(now);
        assert_eq!(app.store.tasks()[0].time.duration_formatted(), "05:00");

        app.clock = || START_MS + 3_500;
        app.tick(now);
        assert_eq!(app.store.tasks()[0].time.duration_formatted(), "04:57");

        app.toggle_countdown_selected();
        app.clock = || START_MS + 60_000;
        app.tick(now);
        assert_eq!(app.store.tasks()[0].time.duration_formatted(), "04:57");
        assert!(!app.store.tasks()[0].time.work);
    }

    #[test]
    fn test_tick_refreshes_relative_times() {
        let (_slots, mut app) = create_test_app();

        app.tick(Instant::now());
        assert_eq!(app.store.tasks()[0].time.time_to_now, "less than 5 seconds");
    }

    #[test]
    fn test_tick_picks_up_external_change() {
        let (slots, mut app) = create_test_app();
        app.save().unwrap();
        app.begin_edit_selected();

        let other = Snapshot::new(Vec::new(), Filter::Completed);
        slots.external_write("todo", &other.encode().unwrap());
        app.tick(Instant::now());

        assert!(app.store.tasks().is_empty());
        assert_eq!(app.store.filter(), Filter::Completed);
        assert_eq!(app.ui_mode, UiMode::Normal);
        assert!(app.edit.is_none());
    }

    #[test]
    fn test_shutdown_cancels_refresh_and_saves() {
        let (slots, mut app) = create_test_app();

        app.shutdown().unwrap();
        assert!(app.refresh.is_cancelled());
        let saved = Snapshot::decode(&slots.get("todo").unwrap()).unwrap();
        assert_eq!(saved.todo_data.len(), 2);
    }
}
