use crate::app::AppState;
use crate::domain::Task;
use crate::ui::styles::{
    border_style, checked_style, default_style, done_style, editing_style, idle_style,
    running_style, selected_style, title_style,
};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

/// Render the task list for the active filter
pub fn render_list_pane(f: &mut Frame, app: &AppState, area: Rect) {
    let visible = app.store.visible();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style())
        .title(Span::styled(
            format!(" todos ({}) ", app.store.filter().label()),
            title_style(),
        ));

    if visible.is_empty() {
        let empty = Paragraph::new(Line::raw(" Nothing here. Press a to add a task."))
            .style(idle_style())
            .block(block);
        f.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = visible
        .iter()
        .enumerate()
        .map(|(idx, task)| {
            let buffer = app
                .edit
                .as_ref()
                .filter(|edit| edit.task_id == task.id)
                .map(|edit| edit.buffer.as_str());
            let style = if idx == app.selected_index {
                selected_style()
            } else {
                default_style()
            };
            ListItem::new(create_task_line(task, buffer)).style(style)
        })
        .collect();

    f.render_widget(List::new(items).block(block), area);
}

/// One row: `[x] label  ▶ 04:30  created 2 minutes ago`
///
/// `edit_buffer` is the in-progress label when this task is edited in place.
fn create_task_line(task: &Task, edit_buffer: Option<&str>) -> Line<'static> {
    let mut spans = Vec::new();

    if task.done {
        spans.push(Span::styled("[x] ".to_string(), checked_style()));
    } else {
        spans.push(Span::raw("[ ] ".to_string()));
    }

    match edit_buffer {
        Some(buffer) => {
            spans.push(Span::styled(buffer.to_string(), editing_style()));
            spans.push(Span::styled("█".to_string(), editing_style()));
        }
        // Loaded in edit mode but not yet focused
        None if task.is_editing() => {
            spans.push(Span::styled(task.label.clone(), editing_style()));
        }
        None if task.done => spans.push(Span::styled(task.label.clone(), done_style())),
        None => spans.push(Span::raw(task.label.clone())),
    }

    spans.push(Span::raw("  ".to_string()));

    let duration = task.time.duration_formatted();
    if task.time.work {
        spans.push(Span::styled(format!("▶ {}", duration), running_style()));
    } else {
        spans.push(Span::styled(format!("⏸ {}", duration), idle_style()));
    }

    spans.push(Span::styled(
        format!("  created {} ago", task.time.time_to_now),
        idle_style(),
    ));

    Line::from(spans)
}
