use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Main layout structure
pub struct MainLayout {
    pub keybindings_area: Rect,
    pub list_area: Rect,
    pub footer_area: Rect,
}

/// Create the main layout
/// - Top bar: keybindings (1 row)
/// - Task list: everything in between
/// - Footer: counter, filters and clear-completed (3 rows, bordered)
pub fn create_layout(area: Rect) -> MainLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Keybindings bar
            Constraint::Min(3),    // Task list
            Constraint::Length(3), // Footer
        ])
        .split(area);

    MainLayout {
        keybindings_area: chunks[0],
        list_area: chunks[1],
        footer_area: chunks[2],
    }
}

/// Create centered modal area (for the add-task form)
pub fn create_modal_area(area: Rect) -> Rect {
    let vertical_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Length(13),
            Constraint::Percentage(25),
        ])
        .split(area);

    let horizontal_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(20),
            Constraint::Percentage(60),
            Constraint::Percentage(20),
        ])
        .split(vertical_chunks[1]);

    horizontal_chunks[1]
}
