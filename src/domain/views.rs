use super::enums::Filter;
use super::task::Task;

/// Project the tasks visible under `filter`, keeping list order
pub fn filtered_view(tasks: &[Task], filter: Filter) -> Vec<&Task> {
    tasks
        .iter()
        .filter(|task| match filter {
            Filter::All => true,
            Filter::Active => !task.done,
            Filter::Completed => task.done,
        })
        .collect()
}

/// Like [`filtered_view`], but by name; unknown names show everything
pub fn filtered_view_named<'a>(tasks: &'a [Task], name: &str) -> Vec<&'a Task> {
    filtered_view(tasks, Filter::from_name(name).unwrap_or(Filter::All))
}

/// Number of tasks not yet done, as shown in the footer
pub fn remaining_count(tasks: &[Task]) -> String {
    tasks.iter().filter(|task| !task.done).count().to_string()
}

/// Footer text: "1 item left" / "3 items left"
pub fn items_left_label(count: &str) -> String {
    if count == "1" {
        format!("{} item left", count)
    } else {
        format!("{} items left", count)
    }
}
