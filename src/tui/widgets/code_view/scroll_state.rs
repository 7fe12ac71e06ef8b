use crate::core::ScrollRegion;

/// Vertical position of the code viewer, measured in lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScrollState {
    position: usize,
    total_lines: usize,
    viewport_height: usize,
}

impl ScrollState {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            position: 0,
            total_lines: 0,
            viewport_height: 0,
        }
    }

    #[must_use]
    pub const fn position(&self) -> usize {
        self.position
    }

    #[must_use]
    pub const fn total_lines(&self) -> usize {
        self.total_lines
    }

    #[must_use]
    pub const fn is_at_bottom(&self) -> bool {
        self.position >= self.max_scroll()
    }

    /// Records fresh measurements and clamps the position to them.
    pub fn update(&mut self, total_lines: usize, viewport_height: usize) {
        self.total_lines = total_lines;
        self.viewport_height = viewport_height;
        self.position = self.position.min(self.max_scroll());
    }

    pub const fn scroll_to_bottom(&mut self) {
        self.position = self.max_scroll();
    }

    pub const fn scroll_to_top(&mut self) {
        self.position = 0;
    }

    pub const fn scroll_up(&mut self, lines: usize) {
        self.position = self.position.saturating_sub(lines);
    }

    pub fn scroll_down(&mut self, lines: usize) {
        self.position = (self.position + lines).min(self.max_scroll());
    }

    pub const fn reset(&mut self) {
        *self = Self::new();
    }

    const fn max_scroll(&self) -> usize {
        self.total_lines.saturating_sub(self.viewport_height)
    }
}

impl ScrollRegion for ScrollState {
    fn content_height(&self) -> usize {
        self.total_lines
    }

    fn visible_height(&self) -> usize {
        self.viewport_height
    }

    fn set_offset(&mut self, offset: usize) {
        self.position = offset.min(self.max_scroll());
    }
}
