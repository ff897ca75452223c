use crate::domain::{filtered_view, remaining_count, Filter, Task, TaskFlag, TimePatch};
use crate::persistence::{Snapshot, SnapshotError, SnapshotPort};
use anyhow::{Context, Result};
use tracing::{debug, info, warn};

/// Owner of the task list and the active filter.
///
/// Every mutation marks the store dirty; [`TaskStore::flush`] writes the whole
/// state to the persisted slot. Snapshots are compared by their encoded form,
/// so a flush with nothing new to say does not touch the slot.
pub struct TaskStore {
    tasks: Vec<Task>,
    filter: Filter,
    slot: String,
    port: Box<dyn SnapshotPort>,
    /// Encoded form of the last snapshot written to or read from the slot
    last_synced: Option<String>,
    dirty: bool,
}

impl TaskStore {
    /// Load the store from `slot`, falling back to the seed list when the slot
    /// is empty or unreadable
    pub fn open(port: Box<dyn SnapshotPort>, slot: &str) -> Self {
        let (snapshot, last_synced) = match load_snapshot(port.as_ref(), slot) {
            Some(snapshot) => {
                info!(slot, tasks = snapshot.todo_data.len(), "Loaded snapshot");
                let encoded = snapshot.encode().ok();
                (snapshot, encoded)
            }
            None => {
                info!(slot, "No usable snapshot, starting from seed list");
                (Snapshot::seed(), None)
            }
        };

        // A seeded store has never been written
        let dirty = last_synced.is_none();

        Self {
            tasks: snapshot.todo_data,
            filter: snapshot.filter,
            slot: slot.to_string(),
            port,
            last_synced,
            dirty,
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn filter(&self) -> Filter {
        self.filter
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn find(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    /// Tasks visible under the active filter
    pub fn visible(&self) -> Vec<&Task> {
        filtered_view(&self.tasks, self.filter)
    }

    /// Number of tasks not yet done
    pub fn remaining_count(&self) -> String {
        remaining_count(&self.tasks)
    }

    /// Create a task and put it at the top of the list
    pub fn create_task(&mut self, label: &str, min: u32, sec: u32) -> String {
        let task = Task::new(label.to_string(), min, sec);
        let id = task.id.clone();
        debug!(id = %id, label, min, sec, "Creating task");
        self.tasks.insert(0, task);
        self.dirty = true;
        id
    }

    pub fn delete_task(&mut self, id: &str) {
        let before = self.tasks.len();
        self.tasks.retain(|task| task.id != id);
        if self.tasks.len() != before {
            debug!(id, "Deleted task");
            self.dirty = true;
        }
    }

    /// Flip `flag` on the task with `id`; other tasks are left untouched
    pub fn toggle_field(&mut self, id: &str, flag: TaskFlag) {
        self.modify(id, |task| task.toggle(flag));
    }

    pub fn rename_and_close_edit(&mut self, id: &str, label: &str) {
        self.modify(id, |task| task.rename_and_close_edit(label.to_string()));
    }

    pub fn set_filter(&mut self, filter: Filter) {
        if self.filter != filter {
            self.filter = filter;
            self.dirty = true;
        }
    }

    /// Remove every done task
    pub fn clear_completed(&mut self) {
        let before = self.tasks.len();
        self.tasks.retain(|task| !task.done);
        let removed = before - self.tasks.len();
        if removed > 0 {
            debug!(removed, "Cleared completed tasks");
            self.dirty = true;
        }
    }

    /// Merge the given time fields into the task's time block
    pub fn update_duration(&mut self, id: &str, patch: TimePatch) {
        self.modify(id, |task| task.update_time(&patch));
    }

    /// Recompute every task's relative-time label against `now_ms`
    pub fn refresh_relative_times(&mut self, now_ms: i64) {
        let mut changed = false;
        for task in &mut self.tasks {
            changed |= task.refresh_time_to_now(now_ms);
        }
        if changed {
            self.dirty = true;
        }
    }

    /// Start the countdown on a task, or stop it keeping the time left.
    ///
    /// Done tasks and tasks with a zero duration do not start.
    pub fn toggle_countdown(&mut self, id: &str, now_ms: i64) {
        self.modify(id, |task| {
            if task.time.work {
                task.time.stop_countdown(now_ms);
            } else if !task.done && task.time.total_seconds() > 0 {
                task.time.start_countdown(now_ms);
            }
        });
    }

    /// Bring every running countdown in line with the wall clock.
    ///
    /// Remaining time is derived from each task's deadline, so instances that
    /// adopt each other's snapshots agree instead of each taking a second off.
    /// A countdown stops at zero; a done task's countdown is stopped where it is.
    pub fn advance_countdowns(&mut self, now_ms: i64) {
        let mut changed = false;
        for task in self.tasks.iter_mut().filter(|task| task.time.work) {
            if task.done {
                task.time.stop_countdown(now_ms);
                changed = true;
                continue;
            }
            if task.time.sync_countdown(now_ms) {
                changed = true;
                if !task.time.work {
                    debug!(id = %task.id, "Countdown finished");
                }
            }
        }
        if changed {
            self.dirty = true;
        }
    }

    /// Write the current state to the slot if it changed since the last sync
    pub fn flush(&mut self) -> Result<()> {
        if !self.dirty {
            return Ok(());
        }

        let encoded = self
            .snapshot()
            .encode()
            .context("Failed to serialize snapshot")?;

        if self.last_synced.as_deref() != Some(encoded.as_str()) {
            self.port.save(&self.slot, &encoded)?;
            debug!(slot = %self.slot, tasks = self.tasks.len(), "Saved snapshot");
            self.last_synced = Some(encoded);
        }

        self.dirty = false;
        Ok(())
    }

    /// React to slots changed by someone else.
    ///
    /// Keys for other slots are ignored, as is the echo of our own last write.
    /// If our slot holds a valid snapshot different from what is in memory, it
    /// replaces tasks and filter wholesale; an empty or malformed slot leaves
    /// the state alone. Returns true when the state was replaced.
    pub fn apply_external_changes(&mut self, keys: &[String]) -> bool {
        if !keys.iter().any(|key| *key == self.slot) {
            return false;
        }

        let Some(snapshot) = load_snapshot(self.port.as_ref(), &self.slot) else {
            return false;
        };
        let encoded = snapshot.encode().ok();
        // Our own last write coming back, possibly older than memory by now
        if encoded.is_some() && encoded == self.last_synced {
            return false;
        }
        if snapshot == self.snapshot() {
            self.last_synced = encoded;
            return false;
        }

        info!(slot = %self.slot, tasks = snapshot.todo_data.len(), "Reloading state changed elsewhere");
        self.tasks = snapshot.todo_data;
        self.filter = snapshot.filter;
        self.last_synced = encoded;
        self.dirty = false;
        true
    }

    /// Complete state as written to the slot
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::new(self.tasks.clone(), self.filter)
    }

    fn modify(&mut self, id: &str, f: impl FnOnce(&mut Task)) {
        if let Some(task) = self.tasks.iter_mut().find(|task| task.id == id) {
            f(task);
            self.dirty = true;
        }
    }
}

fn load_snapshot(port: &dyn SnapshotPort, slot: &str) -> Option<Snapshot> {
    let raw = match port.load(slot) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            warn!(slot, error = ?e, "Failed to read slot");
            return None;
        }
    };

    match Snapshot::decode(&raw) {
        Ok(snapshot) => Some(snapshot),
        Err(SnapshotError::Empty) => None,
        Err(e) => {
            warn!(slot, error = %e, "Ignoring unreadable snapshot");
            None
        }
    }
}
