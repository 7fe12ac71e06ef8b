use ratatui::layout::{Constraint, Layout, Rect};

pub const HEADER_HEIGHT: u16 = 3;
pub const INPUT_HEIGHT: u16 = 3;
pub const STATUS_HEIGHT: u16 = 1;

pub struct LayoutAreas {
    pub header: Rect,
    /// Start screen before the first submission, code viewer after.
    pub body: Rect,
    pub input: Rect,
    pub status: Rect,
}

#[must_use]
pub fn calculate_layout(area: Rect) -> LayoutAreas {
    let [header, body, input, status] = Layout::vertical([
        Constraint::Length(HEADER_HEIGHT),
        Constraint::Min(3),
        Constraint::Length(INPUT_HEIGHT),
        Constraint::Length(STATUS_HEIGHT),
    ])
    .areas(area);

    LayoutAreas {
        header,
        body,
        input,
        status,
    }
}

/// A `width` x `height` box centered in `area`, clipped to it.
#[must_use]
pub fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
