use crate::app::AppState;
use crate::domain::{items_left_label, Filter};
use crate::ui::styles::{active_filter_style, border_style, default_style, hint_style};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Render the footer: remaining count, filter buttons, clear-completed
pub fn render_footer(f: &mut Frame, app: &AppState, area: Rect) {
    let line = create_footer_line(&app.store.remaining_count(), app.store.filter());
    let paragraph = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style()),
    );
    f.render_widget(paragraph, area);
}

fn create_footer_line(remaining: &str, active: Filter) -> Line<'static> {
    let mut spans = vec![
        Span::styled(format!(" {}", items_left_label(remaining)), default_style()),
        Span::raw("    ".to_string()),
    ];

    for (idx, filter) in Filter::all().iter().enumerate() {
        let button = format!(" {} {} ", idx + 1, filter.label());
        let style = if *filter == active {
            active_filter_style()
        } else {
            default_style()
        };
        spans.push(Span::styled(button, style));
        spans.push(Span::raw(" ".to_string()));
    }

    spans.push(Span::styled("   c clear completed".to_string(), hint_style()));
    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_footer_line_counts_and_buttons() {
        let line_str = format!("{:?}", create_footer_line("3", Filter::Active));

        assert!(line_str.contains("3 items left"));
        assert!(line_str.contains(" 1 All "));
        assert!(line_str.contains(" 2 Active "));
        assert!(line_str.contains(" 3 Completed "));
        assert!(line_str.contains("clear completed"));
    }

    #[test]
    fn test_footer_highlights_active_filter() {
        let line = create_footer_line("1", Filter::Completed);
        let active: Vec<_> = line
            .spans
            .iter()
            .filter(|span| span.style == active_filter_style())
            .collect();

        assert_eq!(active.len(), 1);
        assert_eq!(active[0].content, " 3 Completed ");
    }
}
