mod highlight;
mod scroll_state;

pub use highlight::{HighlightCache, highlight};
pub use scroll_state::ScrollState;

use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Widget};

use crate::core::AutoScroll;
use crate::ui::theme::{MORE_BELOW, Theme, spinner_frame};

/// Pinning input for the auto-scroll synchronizer.
pub struct Follow<'a> {
    pub sync: &'a mut AutoScroll,
    pub loading: bool,
    pub revision: u64,
}

/// Renders the generated artifact.
///
/// Line count is measured and handed to the scroll state (and the
/// synchronizer, if any) before anything is painted.
pub struct CodeViewer<'a> {
    lines: &'a [Line<'static>],
    scroll: &'a mut ScrollState,
    show_editor: bool,
    title: Option<&'a str>,
    progress: Option<&'a str>,
    spinner_frame: usize,
    follow: Option<Follow<'a>>,
}

impl<'a> CodeViewer<'a> {
    #[must_use]
    pub const fn new(lines: &'a [Line<'static>], scroll: &'a mut ScrollState) -> Self {
        Self {
            lines,
            scroll,
            show_editor: true,
            title: None,
            progress: None,
            spinner_frame: 0,
            follow: None,
        }
    }

    /// Border, title and line-number gutter.
    #[must_use]
    pub const fn show_editor(mut self, show: bool) -> Self {
        self.show_editor = show;
        self
    }

    #[must_use]
    pub const fn title(mut self, title: Option<&'a str>) -> Self {
        self.title = title;
        self
    }

    #[must_use]
    pub const fn progress(mut self, label: Option<&'a str>, spinner_frame: usize) -> Self {
        self.progress = label;
        self.spinner_frame = spinner_frame;
        self
    }

    #[must_use]
    pub fn follow(mut self, follow: Follow<'a>) -> Self {
        self.follow = Some(follow);
        self
    }

    pub fn render(self, area: Rect, buf: &mut Buffer) {
        let inner = if self.show_editor {
            let block = self.editor_block();
            let inner = block.inner(area);
            block.render(area, buf);
            inner
        } else {
            area
        };

        let (body, progress_row) = self.split_progress(inner);

        let total_lines = self.lines.len();
        let viewport_height = body.height as usize;
        self.scroll.update(total_lines, viewport_height);

        if let Some(follow) = self.follow {
            follow
                .sync
                .observe(follow.loading, follow.revision, Some(&mut *self.scroll));
        }

        if let Some(row) = progress_row {
            Self::render_progress(row, buf, self.progress, self.spinner_frame);
        }

        if total_lines == 0 {
            return;
        }

        let gutter_width = if self.show_editor {
            total_lines.to_string().len() as u16 + 1
        } else {
            0
        };
        let code_x = body.x + gutter_width + u16::from(self.show_editor);
        let code_width = body.width.saturating_sub(code_x - body.x);

        let offset = self.scroll.position();
        let end = (offset + viewport_height).min(total_lines);

        for (row, (index, line)) in self.lines[offset..end]
            .iter()
            .enumerate()
            .map(|(i, line)| (offset + i, line))
            .enumerate()
        {
            let y = body.y + row as u16;
            if self.show_editor {
                let number = format!("{:>width$}", index + 1, width = gutter_width as usize);
                buf.set_string(body.x, y, number, Theme::dim());
            }
            buf.set_line(code_x, y, line, code_width);
        }

        if !self.scroll.is_at_bottom() {
            Self::render_scroll_indicator(body, buf);
        }
    }

    fn editor_block(&self) -> Block<'a> {
        let mut block = Block::default()
            .borders(Borders::ALL)
            .border_style(Theme::frame())
            .border_set(ratatui::symbols::border::ROUNDED);

        if let Some(title) = self.title {
            block = block.title(Line::from(vec![
                Span::raw(" "),
                Span::styled(title, Theme::tag()),
                Span::raw(" "),
            ]));
        }

        block
    }

    fn split_progress(&self, area: Rect) -> (Rect, Option<Rect>) {
        if self.progress.is_none() || area.height < 2 {
            return (area, None);
        }

        let row = Rect {
            x: area.x,
            y: area.y,
            width: area.width,
            height: 1,
        };
        let body = Rect {
            x: area.x,
            y: area.y + 1,
            width: area.width,
            height: area.height - 1,
        };
        (body, Some(row))
    }

    fn render_progress(row: Rect, buf: &mut Buffer, label: Option<&str>, frame: usize) {
        let Some(label) = label else {
            return;
        };
        let spinner = spinner_frame(frame);

        let line = Line::from(vec![
            Span::styled(format!("{spinner} {label}"), Theme::accent()),
        ])
        .alignment(Alignment::Center);
        Paragraph::new(line).render(row, buf);
    }

    fn render_scroll_indicator(area: Rect, buf: &mut Buffer) {
        if area.width < 10 || area.height == 0 {
            return;
        }

        let indicator_area = Rect {
            x: area.x + area.width - 10,
            y: area.y + area.height - 1,
            width: 10,
            height: 1,
        };

        let indicator = Line::from(Span::styled(
            MORE_BELOW,
            Theme::busy(),
        ));
        Paragraph::new(indicator).render(indicator_area, buf);
    }
}
