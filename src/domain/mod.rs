pub mod enums;
pub mod relative_time;
pub mod task;
pub mod views;

pub use enums::{Filter, InputField, TaskFlag, TaskMode, UiMode};
pub use relative_time::now_millis;
pub use task::{normalize_duration, Task, TimeBlock, TimePatch};
pub use views::{filtered_view, filtered_view_named, items_left_label, remaining_count};
