//! Colors and glyphs used by the terminal UI, named by what they mark.

use ratatui::style::{Color, Modifier, Style};

const ACCENT: Color = Color::Rgb(59, 130, 246);
const TAG: Color = Color::Rgb(167, 139, 250);
const DONE: Color = Color::Rgb(16, 185, 129);
const BUSY: Color = Color::Rgb(245, 158, 11);
const FAILED: Color = Color::Rgb(239, 68, 68);
const DIM: Color = Color::Rgb(107, 114, 128);
const FRAME: Color = Color::Rgb(55, 65, 81);
const TEXT: Color = Color::Rgb(255, 255, 255);
const CODE: Color = Color::Rgb(192, 197, 206);

pub const RULE: &str = "─";
pub const MORE_BELOW: &str = "↓ More";
pub const PROMPT_MARK: &str = "❯";
pub const DONE_MARK: &str = "✓";
pub const FAILED_MARK: &str = "✗";
pub const SPINNER: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

#[must_use]
pub fn spinner_frame(frame: usize) -> &'static str {
    SPINNER[frame % SPINNER.len()]
}

pub struct Theme;

impl Theme {
    /// Product name, prompt mark, progress label.
    #[must_use]
    pub const fn accent() -> Style {
        Style::new().fg(ACCENT).add_modifier(Modifier::BOLD)
    }

    /// Language tag in the code viewer title.
    #[must_use]
    pub const fn tag() -> Style {
        Style::new().fg(TAG)
    }

    #[must_use]
    pub const fn done() -> Style {
        Style::new().fg(DONE)
    }

    #[must_use]
    pub const fn busy() -> Style {
        Style::new().fg(BUSY)
    }

    #[must_use]
    pub const fn failed() -> Style {
        Style::new().fg(FAILED)
    }

    #[must_use]
    pub const fn dim() -> Style {
        Style::new().fg(DIM)
    }

    #[must_use]
    pub const fn frame() -> Style {
        Style::new().fg(FRAME)
    }

    /// Editable prompt text.
    #[must_use]
    pub const fn text() -> Style {
        Style::new().fg(TEXT)
    }

    /// Artifact text when no highlighter applies.
    #[must_use]
    pub const fn code() -> Style {
        Style::new().fg(CODE)
    }

    #[must_use]
    pub const fn heading() -> Style {
        Style::new().fg(TEXT).add_modifier(Modifier::BOLD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spinner_wraps_around() {
        assert_eq!(spinner_frame(0), "⠋");
        assert_eq!(spinner_frame(SPINNER.len() + 1), "⠙");
    }
}
