use crate::core::Status;
use crate::tui::state::Notice;
use crate::ui::theme::{DONE_MARK, FAILED_MARK, Theme, spinner_frame};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use std::time::Duration;

const HINTS: &str = "↵ generate | PgUp/PgDn scroll | Ctrl+E editor | Ctrl+C quit";

pub struct StatusInfo<'a> {
    pub status: Status,
    pub spinner_frame: usize,
    pub elapsed: Option<Duration>,
    pub last_duration: Option<Duration>,
    pub line_count: usize,
    pub notice: Option<&'a Notice>,
}

fn format_duration(d: Duration) -> String {
    let secs = d.as_secs();
    if secs > 0 {
        format!("{secs}s")
    } else {
        format!("{}ms", d.as_millis())
    }
}

fn right_segment(info: &StatusInfo<'_>) -> Option<(String, Style)> {
    if info.status.is_loading() {
        let frame_char = spinner_frame(info.spinner_frame);
        let elapsed = info
            .elapsed
            .map(|d| format!(" {}", format_duration(d)))
            .unwrap_or_default();
        let hint = match info.notice {
            Some(Notice::Info(message)) => format!(" | {message}"),
            _ => String::new(),
        };
        return Some((
            format!("{frame_char} {}{elapsed}{hint}", info.status),
            Theme::busy(),
        ));
    }

    match info.notice {
        Some(Notice::Error(message)) => {
            return Some((format!("{FAILED_MARK} {message}"), Theme::failed()));
        }
        Some(Notice::Info(message)) => return Some((message.clone(), Theme::dim())),
        None => {}
    }

    match info.status {
        Status::Initial => None,
        status => {
            let took = info
                .last_duration
                .map(|d| format!(" in {}", format_duration(d)))
                .unwrap_or_default();
            Some((
                format!("{DONE_MARK} {status}: {} lines{took}", info.line_count),
                Theme::done(),
            ))
        }
    }
}

pub fn render_status(frame: &mut Frame, area: Rect, info: &StatusInfo<'_>) {
    let left_line = Line::from(vec![Span::raw(" "), Span::styled(HINTS, Theme::dim())]);
    let left_width = left_line.width() as u16;

    let right = right_segment(info).map(|(text, style)| {
        Line::from(vec![Span::styled(text, style), Span::raw(" ")])
    });
    let right_width = right.as_ref().map_or(0, |l| l.width() as u16);

    let buf = frame.buffer_mut();
    if left_width + right_width < area.width {
        buf.set_line(area.x, area.y, &left_line, left_width);
    }

    if let Some(line) = right {
        let width = right_width.min(area.width);
        let x = area.x + area.width.saturating_sub(width);
        buf.set_line(x, area.y, &line, width);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info<'a>(status: Status) -> StatusInfo<'a> {
        StatusInfo {
            status,
            spinner_frame: 0,
            elapsed: None,
            last_duration: None,
            line_count: 0,
            notice: None,
        }
    }

    #[test]
    fn loading_shows_spinner_and_elapsed() {
        let mut status = info(Status::Creating);
        status.elapsed = Some(Duration::from_secs(3));

        let (text, _) = right_segment(&status).expect("segment");
        assert_eq!(text, "⠋ creating 3s");
    }

    #[test]
    fn info_notice_rides_along_while_loading() {
        let notice = Notice::Info("Input is locked".into());
        let mut status = info(Status::Updating);
        status.notice = Some(&notice);

        let (text, _) = right_segment(&status).expect("segment");
        assert_eq!(text, "⠋ updating | Input is locked");
    }

    #[test]
    fn finished_shows_line_count() {
        let mut status = info(Status::Updated);
        status.line_count = 42;
        status.last_duration = Some(Duration::from_millis(250));

        let (text, _) = right_segment(&status).expect("segment");
        assert_eq!(text, "✓ updated: 42 lines in 250ms");
    }

    #[test]
    fn error_notice_wins_when_idle() {
        let notice = Notice::Error("Generation request failed (500): boom".into());
        let mut status = info(Status::Created);
        status.notice = Some(&notice);

        let (text, style) = right_segment(&status).expect("segment");
        assert!(text.contains("500"));
        assert_eq!(style, Theme::failed());
    }

    #[test]
    fn initial_has_no_segment() {
        assert!(right_segment(&info(Status::Initial)).is_none());
    }
}
