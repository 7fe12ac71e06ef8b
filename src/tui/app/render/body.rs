use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::layout::centered;
use crate::tui::state::AppState;
use crate::tui::widgets::{CodeViewer, Follow};
use crate::ui::theme::Theme;

const TITLE: &str = "What do you want to build?";

fn render_start_screen(frame: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(Span::styled(TITLE, Theme::heading())),
        Line::from(""),
        Line::from(Span::styled(
            "Describe an app below and press Enter.",
            Theme::dim(),
        )),
        Line::from(Span::styled(
            "The code streams in here as it is generated.",
            Theme::dim(),
        )),
    ];

    let height = lines.len() as u16;
    let paragraph = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(paragraph, centered(area, area.width, height));
}

/// Start screen until the first submission, the code viewer afterwards.
pub fn render_body(frame: &mut Frame, area: Rect, state: &mut AppState) {
    if !state.session.is_revealed() {
        render_start_screen(frame, area);
        return;
    }

    let session = &state.session;
    let loading = session.is_loading();
    let revision = session.revision();
    let title = session.language().or(Some("code"));

    let lines = state
        .highlight
        .lines(revision, session.language(), session.artifact());

    CodeViewer::new(lines, &mut state.scroll)
        .show_editor(state.show_editor)
        .title(title)
        .progress(session.status().progress_label(), state.spinner_frame)
        .follow(Follow {
            sync: &mut state.autoscroll,
            loading,
            revision,
        })
        .render(area, frame.buffer_mut());
}
