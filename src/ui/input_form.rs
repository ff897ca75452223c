use crate::app::AppState;
use crate::domain::InputField;
use crate::ui::{
    layout::create_modal_area,
    styles::{modal_bg_style, modal_title_style},
};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Render the add-task form
pub fn render_input_form(f: &mut Frame, app: &AppState, area: Rect) {
    if let Some(form) = &app.input_form {
        let modal_area = create_modal_area(area);

        // Clear the area behind the form
        f.render_widget(Clear, modal_area);

        let mut lines = vec![Line::raw("")];
        push_field(&mut lines, "What needs to be done?", &form.label, form.field == InputField::Label);
        push_field(&mut lines, "Min:", &form.minutes, form.field == InputField::Minutes);
        push_field(&mut lines, "Sec:", &form.seconds, form.field == InputField::Seconds);
        lines.push(Line::raw("Tab to switch fields  ·  Enter to add  ·  Esc to cancel"));

        let paragraph = Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(Span::styled(" New Task ", modal_title_style()))
                    .style(modal_bg_style()),
            )
            .wrap(Wrap { trim: false });

        f.render_widget(paragraph, modal_area);
    }
}

/// Label line, value line with cursor when focused, blank separator
fn push_field<'a>(lines: &mut Vec<Line<'a>>, label: &'a str, value: &'a str, focused: bool) {
    if focused {
        lines.push(Line::raw(format!("{} (editing)", label)));
    } else {
        lines.push(Line::raw(label));
    }

    lines.push(Line::from(vec![
        Span::raw("> "),
        Span::styled(value, modal_title_style()),
        if focused {
            Span::styled("█", modal_title_style()) // Cursor
        } else {
            Span::raw("")
        },
    ]));
    lines.push(Line::raw(""));
}
