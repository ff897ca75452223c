use super::enums::{TaskFlag, TaskMode};
use super::relative_time::{now_millis, time_to_now, JUST_CREATED};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Time information carried by every task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeBlock {
    /// Creation timestamp (epoch milliseconds)
    pub task_add_time: i64,
    /// "time since creation" in words, recomputed on refresh
    pub time_to_now: String,
    /// Countdown running
    pub work: bool,
    /// Epoch milliseconds at which a running countdown reaches zero
    pub deadline: Option<i64>,
    /// Target duration, minutes part
    pub min: u32,
    /// Target duration, seconds part
    pub sec: u32,
}

impl TimeBlock {
    pub fn new(task_add_time: i64, min: u32, sec: u32) -> Self {
        Self {
            task_add_time,
            time_to_now: JUST_CREATED.to_string(),
            work: false,
            deadline: None,
            min,
            sec,
        }
    }

    /// Target duration in seconds
    pub fn total_seconds(&self) -> u64 {
        self.min as u64 * 60 + self.sec as u64
    }

    /// Format the target duration as "mm:ss"
    pub fn duration_formatted(&self) -> String {
        format!("{:02}:{:02}", self.min, self.sec)
    }

    fn set_total_seconds(&mut self, total: u64) {
        let (min, sec) = split_duration(total);
        self.min = min;
        self.sec = sec;
    }

    /// Seconds left at `now_ms`; a running countdown is measured against its
    /// deadline, rounded up so the full duration shows until a second passes
    pub fn remaining_at(&self, now_ms: i64) -> u64 {
        match (self.work, self.deadline) {
            (true, Some(deadline)) => {
                let left_ms = (deadline - now_ms).max(0) as u64;
                (left_ms + 999) / 1000
            }
            _ => self.total_seconds(),
        }
    }

    /// Start counting down the current duration from `now_ms`
    pub fn start_countdown(&mut self, now_ms: i64) {
        self.work = true;
        self.deadline = Some(now_ms + self.total_seconds() as i64 * 1000);
    }

    /// Stop the countdown, keeping what is left at `now_ms`
    pub fn stop_countdown(&mut self, now_ms: i64) {
        self.set_total_seconds(self.remaining_at(now_ms));
        self.work = false;
        self.deadline = None;
    }

    /// Bring `min:sec` in line with the deadline; returns true if anything changed.
    ///
    /// A countdown that reaches zero stops. One running without a deadline
    /// starts counting from `now_ms`.
    pub fn sync_countdown(&mut self, now_ms: i64) -> bool {
        if !self.work {
            return false;
        }

        let before = self.clone();
        if self.deadline.is_none() {
            self.start_countdown(now_ms);
        }

        let left = self.remaining_at(now_ms);
        self.set_total_seconds(left);
        if left == 0 {
            self.work = false;
            self.deadline = None;
        }
        *self != before
    }

    fn apply(&mut self, patch: &TimePatch) {
        let before = self.total_seconds();
        if let Some(min) = patch.min {
            self.min = min;
        }
        if let Some(sec) = patch.sec {
            self.sec = sec;
        }
        // Changing a running countdown moves its deadline by the same amount
        if let Some(deadline) = self.deadline {
            let delta = self.total_seconds() as i64 - before as i64;
            self.deadline = Some(deadline + delta * 1000);
        }
        if let Some(work) = patch.work {
            self.work = work;
            if !work {
                self.deadline = None;
            }
        }
    }
}

/// Split a number of seconds into `(minutes, seconds)` with seconds below 60
fn split_duration(total_seconds: u64) -> (u32, u32) {
    let min = (total_seconds / 60).min(u32::MAX as u64) as u32;
    (min, (total_seconds % 60) as u32)
}

/// `min:sec` as typed by a user, with seconds past 59 carried into minutes
pub fn normalize_duration(min: u32, sec: u32) -> (u32, u32) {
    split_duration(min as u64 * 60 + sec as u64)
}

/// Partial update of a task's time block; `None` fields are left untouched
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimePatch {
    pub min: Option<u32>,
    pub sec: Option<u32>,
    pub work: Option<bool>,
}

/// A to-do entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub done: bool,
    #[serde(rename = "editing")]
    pub mode: TaskMode,
    pub label: String,
    pub time: TimeBlock,
}

impl Task {
    pub fn new(label: String, min: u32, sec: u32) -> Self {
        Self::created_at(label, min, sec, now_millis())
    }

    pub fn created_at(label: String, min: u32, sec: u32, task_add_time: i64) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            done: false,
            mode: TaskMode::Viewing,
            label,
            time: TimeBlock::new(task_add_time, min, sec),
        }
    }

    pub fn is_editing(&self) -> bool {
        self.mode.is_editing()
    }

    /// Flip one boolean field
    pub fn toggle(&mut self, flag: TaskFlag) {
        match flag {
            TaskFlag::Done => self.done = !self.done,
            TaskFlag::Editing => self.mode = self.mode.toggled(),
        }
    }

    /// Set a new label and leave edit mode
    pub fn rename_and_close_edit(&mut self, label: String) {
        self.label = label;
        self.mode = TaskMode::Viewing;
    }

    pub fn update_time(&mut self, patch: &TimePatch) {
        self.time.apply(patch);
    }

    /// Recompute the relative-time label; returns true if it changed
    pub fn refresh_time_to_now(&mut self, now_ms: i64) -> bool {
        let label = time_to_now(self.time.task_add_time, now_ms);
        if label != self.time.time_to_now {
            self.time.time_to_now = label;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_task_new() {
        let task = Task::new("Buy milk".to_string(), 5, 0);
        assert_eq!(task.label, "Buy milk");
        assert!(!task.done);
        assert_eq!(task.mode, TaskMode::Viewing);
        assert_eq!(task.time.time_to_now, JUST_CREATED);
        assert_eq!(task.time.min, 5);
        assert_eq!(task.time.sec, 0);
        assert!(!task.time.work);
        assert!(task.time.deadline.is_none());
    }

    #[test]
    fn test_task_ids_are_unique() {
        let a = Task::new("a".to_string(), 0, 0);
        let b = Task::new("a".to_string(), 0, 0);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_toggle_flags() {
        let mut task = Task::new("Test".to_string(), 1, 0);

        task.toggle(TaskFlag::Done);
        assert!(task.done);
        assert!(!task.is_editing());

        task.toggle(TaskFlag::Editing);
        assert!(task.is_editing());
        assert!(task.done);
    }

    #[test]
    fn test_rename_and_close_edit() {
        let mut task = Task::new("Old".to_string(), 1, 0);
        task.toggle(TaskFlag::Editing);

        task.rename_and_close_edit("New".to_string());
        assert_eq!(task.label, "New");
        assert_eq!(task.mode, TaskMode::Viewing);
    }

    #[test]
    fn test_update_time_merges_only_given_fields() {
        let mut task = Task::new("Test".to_string(), 10, 30);

        task.update_time(&TimePatch {
            sec: Some(15),
            ..TimePatch::default()
        });
        assert_eq!(task.time.min, 10);
        assert_eq!(task.time.sec, 15);

        task.update_time(&TimePatch {
            min: Some(2),
            sec: Some(5),
            work: None,
        });
        assert_eq!(task.time.duration_formatted(), "02:05");
        assert_eq!(task.time.total_seconds(), 125);

        task.update_time(&TimePatch {
            work: Some(true),
            ..TimePatch::default()
        });
        assert!(task.time.work);
        assert_eq!(task.time.min, 2);
    }

    #[test]
    fn test_normalize_duration_carries_seconds() {
        assert_eq!(normalize_duration(0, 90), (1, 30));
        assert_eq!(normalize_duration(2, 59), (2, 59));
        assert_eq!(normalize_duration(1, 120), (3, 0));
    }

    #[test]
    fn test_countdown_follows_deadline() {
        let mut time = TimeBlock::new(0, 1, 0);
        time.start_countdown(10_000);
        assert_eq!(time.deadline, Some(70_000));

        // Part of a second does not take a second off
        assert!(!time.sync_countdown(10_400));
        assert_eq!(time.duration_formatted(), "01:00");

        assert!(time.sync_countdown(11_000));
        assert_eq!(time.duration_formatted(), "00:59");

        // Syncing twice at the same instant is idempotent
        assert!(time.sync_countdown(25_000));
        assert!(!time.sync_countdown(25_000));
        assert_eq!(time.duration_formatted(), "00:45");
    }

    #[test]
    fn test_countdown_stops_at_zero() {
        let mut time = TimeBlock::new(0, 0, 3);
        time.start_countdown(0);

        assert!(time.sync_countdown(9_000));
        assert_eq!(time.duration_formatted(), "00:00");
        assert!(!time.work);
        assert!(time.deadline.is_none());
    }

    #[test]
    fn test_stop_countdown_keeps_remaining() {
        let mut time = TimeBlock::new(0, 2, 0);
        time.start_countdown(0);

        time.stop_countdown(30_500);
        assert_eq!(time.duration_formatted(), "01:30");
        assert!(!time.work);
        assert_eq!(time.remaining_at(100_000), 90);
    }

    #[test]
    fn test_patch_moves_running_deadline() {
        let mut time = TimeBlock::new(0, 1, 0);
        time.start_countdown(0);

        time.apply(&TimePatch {
            min: Some(2),
            ..TimePatch::default()
        });
        assert_eq!(time.deadline, Some(120_000));

        time.apply(&TimePatch {
            work: Some(false),
            ..TimePatch::default()
        });
        assert!(time.deadline.is_none());
    }

    #[test]
    fn test_refresh_time_to_now() {
        let mut task = Task::created_at("Test".to_string(), 0, 0, 0);
        assert!(task.refresh_time_to_now(5 * 60 * 1000));
        assert_eq!(task.time.time_to_now, "5 minutes");
        assert!(!task.refresh_time_to_now(5 * 60 * 1000 + 1000));
    }

    #[test]
    fn test_task_json_shape() {
        let mut task = Task::created_at("Write report".to_string(), 5, 30, 1667303819786);
        task.id = "42".to_string();

        let value = serde_json::to_value(&task).unwrap();
        assert_eq!(
            value,
            json!({
                "id": "42",
                "done": false,
                "editing": false,
                "label": "Write report",
                "time": {
                    "taskAddTime": 1667303819786i64,
                    "timeToNow": "less than 2 seconds",
                    "work": false,
                    "deadline": null,
                    "min": 5,
                    "sec": 30
                }
            })
        );
    }
}
