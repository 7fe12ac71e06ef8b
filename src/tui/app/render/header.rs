use crate::ui::theme::Theme;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

pub fn render_header(frame: &mut Frame, area: Rect, model: &str, endpoint: &str) {
    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(Theme::frame())
        .border_set(ratatui::symbols::border::ROUNDED);

    let lines = vec![
        Line::from(vec![
            Span::raw("  "),
            Span::styled("Revolt", Theme::accent()),
            Span::styled(format!(" v{}", env!("CARGO_PKG_VERSION")), Theme::dim()),
        ]),
        Line::from(vec![
            Span::raw("  "),
            Span::styled(format!("Model: {model} | {endpoint}"), Theme::dim()),
        ]),
    ];

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
