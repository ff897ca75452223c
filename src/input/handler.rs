use crate::app::AppState;
use crate::domain::{Filter, UiMode};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Handle keyboard input events; returns true when the app should quit
pub fn handle_key(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    // Ctrl+C quits from anywhere
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Ok(true);
    }

    match app.ui_mode {
        UiMode::Normal => handle_normal_mode(app, key),
        UiMode::AddingTask => handle_input_form_mode(app, key),
        UiMode::EditingLabel => handle_label_editing_mode(app, key),
    }
}

/// Handle keys in normal mode (task list and footer)
fn handle_normal_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') => return Ok(true),

        // Navigation
        KeyCode::Up | KeyCode::Char('k') => app.move_selection_up(),
        KeyCode::Down | KeyCode::Char('j') => app.move_selection_down(),

        // Task list
        KeyCode::Char('a') | KeyCode::Char('n') => app.start_add_task(),
        KeyCode::Char(' ') => app.toggle_done_selected(),
        KeyCode::Char('e') | KeyCode::Enter => app.begin_edit_selected(),
        KeyCode::Char('d') | KeyCode::Delete => app.delete_selected(),
        KeyCode::Char('+') | KeyCode::Char('=') => app.adjust_minutes(1),
        KeyCode::Char('-') | KeyCode::Char('_') => app.adjust_minutes(-1),
        KeyCode::Char('s') => app.toggle_countdown_selected(),

        // Footer
        KeyCode::Char('1') => app.set_filter(Filter::All),
        KeyCode::Char('2') => app.set_filter(Filter::Active),
        KeyCode::Char('3') => app.set_filter(Filter::Completed),
        KeyCode::Tab | KeyCode::Char('f') => app.cycle_filter(),
        KeyCode::Char('c') => app.clear_completed(),

        _ => {}
    }
    Ok(false)
}

/// Handle keys while the add-task form is open
fn handle_input_form_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Enter => app.submit_input_form(),
        KeyCode::Esc => app.cancel_input_form(),
        // Label -> minutes -> seconds
        KeyCode::Tab => app.input_form_toggle_field(),
        KeyCode::Backspace => app.input_form_backspace(),
        KeyCode::Char(c) => app.input_form_add_char(c),
        _ => {}
    }
    Ok(false)
}

/// Handle keys while a task label is being edited in place
fn handle_label_editing_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Enter => app.commit_edit(),
        // Leaving edit mode keeps the current label
        KeyCode::Esc => app.cancel_edit(),
        KeyCode::Backspace => app.edit_backspace(),
        KeyCode::Char(c) => app.edit_add_char(c),
        _ => {}
    }
    Ok(false)
}
