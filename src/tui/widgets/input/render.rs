use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::{Position, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Widget};

use super::InputWidget;
use crate::ui::theme::{PROMPT_MARK, RULE, Theme};

const SEND_HINT: &str = "↵ generate";
const LOCKED_HINT: &str = "generating…";
const HINT_WIDTH: u16 = 12;

impl InputWidget<'_> {
    pub fn render(&mut self, area: Rect, frame: &mut Frame) {
        Self::render_separator(area, frame.buffer_mut());

        let input_area = Self::input_area(area);
        self.render_prefix(input_area, frame.buffer_mut());
        self.render_hint(input_area, frame.buffer_mut());

        let textarea_area = Self::textarea_area(input_area);
        self.textarea
            .set_block(Block::default().borders(Borders::NONE));
        frame.render_widget(&self.textarea, textarea_area);

        if self.enabled {
            let (row, col) = self.textarea.cursor();
            frame.set_cursor_position(Position::new(
                textarea_area.x + col as u16,
                textarea_area.y + row as u16,
            ));
        }
    }

    fn render_separator(area: Rect, buf: &mut Buffer) {
        let separator_area = Rect { height: 1, ..area };
        let line = Line::from(Span::styled(
            RULE.repeat(area.width as usize),
            Theme::frame(),
        ));
        Paragraph::new(line).render(separator_area, buf);
    }

    fn render_prefix(&self, input_area: Rect, buf: &mut Buffer) {
        let style = if self.enabled {
            Theme::accent()
        } else {
            Theme::dim()
        };
        let prefix = Line::from(Span::styled(format!("{PROMPT_MARK} "), style));
        Paragraph::new(prefix).render(Rect { width: 2, height: 1, ..input_area }, buf);
    }

    fn render_hint(&self, input_area: Rect, buf: &mut Buffer) {
        let hint = if !self.enabled {
            LOCKED_HINT
        } else if self.is_empty() {
            return;
        } else {
            SEND_HINT
        };

        if input_area.width <= HINT_WIDTH + 2 || input_area.height == 0 {
            return;
        }

        let hint_area = Rect {
            x: input_area.x + input_area.width - HINT_WIDTH,
            y: input_area.y,
            width: HINT_WIDTH,
            height: 1,
        };
        Paragraph::new(Line::from(Span::styled(hint, Theme::dim()))).render(hint_area, buf);
    }

    const fn input_area(area: Rect) -> Rect {
        Rect {
            x: area.x,
            y: area.y + 1,
            width: area.width,
            height: area.height.saturating_sub(1),
        }
    }

    const fn textarea_area(input_area: Rect) -> Rect {
        Rect {
            x: input_area.x + 2,
            y: input_area.y,
            width: input_area.width.saturating_sub(2 + HINT_WIDTH),
            height: input_area.height,
        }
    }
}
