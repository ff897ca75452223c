use crate::domain::{Filter, Task, TaskMode, TimeBlock};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default name of the persisted slot
pub const DEFAULT_SLOT: &str = "todo";

/// Complete store state as written to the slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub todo_data: Vec<Task>,
    #[serde(default)]
    pub filter: Filter,
}

/// Why a stored slot could not be turned into a snapshot
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("slot is empty")]
    Empty,
    #[error("slot contents are not a valid snapshot: {0}")]
    Malformed(#[from] serde_json::Error),
}

impl Snapshot {
    pub fn new(todo_data: Vec<Task>, filter: Filter) -> Self {
        Self { todo_data, filter }
    }

    /// Parse raw slot contents
    pub fn decode(raw: &str) -> Result<Self, SnapshotError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed == "null" {
            return Err(SnapshotError::Empty);
        }
        Ok(serde_json::from_str(trimmed)?)
    }

    pub fn encode(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Fixed starting list used when nothing was persisted yet
    pub fn seed() -> Self {
        const ADDED: i64 = 1667303819786;

        let seed_task = |id: &str, label: &str, done: bool, mode: TaskMode, min: u32, sec: u32| {
            let mut time = TimeBlock::new(ADDED, min, sec);
            time.time_to_now = "2 minutes".to_string();
            Task {
                id: id.to_string(),
                done,
                mode,
                label: label.to_string(),
                time,
            }
        };

        Self {
            todo_data: vec![
                seed_task("2488544113", "Complete task", false, TaskMode::Viewing, 10, 0),
                seed_task("6986027266", "Editing task", false, TaskMode::Editing, 5, 30),
                seed_task("218227547", "Active task", true, TaskMode::Viewing, 1, 0),
            ],
            filter: Filter::All,
        }
    }
}
