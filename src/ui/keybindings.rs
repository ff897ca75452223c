use crate::app::AppState;
use crate::domain::UiMode;
use crate::ui::styles::hint_style;
use ratatui::{layout::Rect, text::Line, widgets::Paragraph, Frame};

const NORMAL_HINTS: &str = " ↑/↓ select   a add   space done   e edit   d delete   + / - min   s start/stop   1/2/3 filter   c clear done   q quit";
const FORM_HINTS: &str = " Tab next field   Enter add   Esc cancel";
const EDIT_HINTS: &str = " Enter save   Esc keep label";

/// Render the keybindings hint bar for the current mode
pub fn render_keybindings(f: &mut Frame, app: &AppState, area: Rect) {
    let hints = match app.ui_mode {
        UiMode::Normal => NORMAL_HINTS,
        UiMode::AddingTask => FORM_HINTS,
        UiMode::EditingLabel => EDIT_HINTS,
    };

    let paragraph = Paragraph::new(Line::raw(hints)).style(hint_style());
    f.render_widget(paragraph, area);
}
