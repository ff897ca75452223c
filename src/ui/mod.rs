pub mod footer;
pub mod input_form;
pub mod keybindings;
pub mod layout;
pub mod list_pane;
pub mod styles;

use crate::app::AppState;
use footer::render_footer;
use input_form::render_input_form;
use keybindings::render_keybindings;
use layout::create_layout;
use list_pane::render_list_pane;
use ratatui::Frame;

/// Main render function - draws the entire UI
pub fn render(f: &mut Frame, app: &AppState) {
    let size = f.size();
    let layout = create_layout(size);

    render_keybindings(f, app, layout.keybindings_area);
    render_list_pane(f, app, layout.list_area);
    render_footer(f, app, layout.footer_area);

    // Input form floats above everything else
    if app.input_form.is_some() {
        render_input_form(f, app, size);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Filter;
    use crate::persistence::MemorySlots;
    use crate::store::TaskStore;
    use ratatui::{backend::TestBackend, buffer::Buffer, Terminal};
    use std::time::Duration;

    fn buffer_text(buffer: &Buffer) -> String {
        let area = buffer.area;
        let mut text = String::new();
        for y in 0..area.height {
            for x in 0..area.width {
                text.push_str(buffer.get(x, y).symbol());
            }
            text.push('\n');
        }
        text
    }

    fn draw(app: &AppState) -> String {
        let backend = TestBackend::new(100, 40);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| render(f, app)).unwrap();
        buffer_text(terminal.backend().buffer())
    }

    fn seeded_app() -> AppState {
        let slots = MemorySlots::new();
        let store = TaskStore::open(Box::new(slots.clone()), "todo");
        AppState::new(store, Box::new(slots), Duration::from_secs(4))
    }

    #[test]
    fn test_render_seed_list() {
        let app = seeded_app();
        let screen = draw(&app);

        assert!(screen.contains("Complete task"));
        assert!(screen.contains("Editing task"));
        assert!(screen.contains("Active task"));
        assert!(screen.contains("2 items left"));
        assert!(screen.contains("created 2 minutes ago"));
    }

    #[test]
    fn test_render_respects_filter() {
        let mut app = seeded_app();
        app.set_filter(Filter::Completed);
        let screen = draw(&app);

        assert!(screen.contains("Active task"));
        assert!(!screen.contains("Complete task"));
    }

    #[test]
    fn test_render_input_form() {
        let mut app = seeded_app();
        app.start_add_task();
        app.input_form_add_char('X');
        let screen = draw(&app);

        assert!(screen.contains("New Task"));
        assert!(screen.contains("> X"));
    }
}
