mod key_handler;
mod render;

use crate::ui::theme::Theme;
use ratatui::style::{Modifier, Style};
use tui_textarea::TextArea;

const PLACEHOLDER: &str = "Describe the app you want, e.g. \"Build me a calculator\"";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputAction {
    Continue,
    Submit(String),
    Clear,
    /// Input arrived while the prompt is locked.
    Blocked,
}

/// Prompt editor. Locked while a generation is in flight.
pub struct InputWidget<'a> {
    textarea: TextArea<'a>,
    enabled: bool,
}

impl InputWidget<'_> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            textarea: Self::create_textarea(true),
            enabled: true,
        }
    }

    #[must_use]
    pub fn text(&self) -> String {
        self.textarea.lines().join("\n")
    }

    pub fn clear(&mut self) {
        self.textarea = Self::create_textarea(self.enabled);
    }

    /// Whitespace-only prompts count as empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.textarea.lines().iter().all(|l| l.trim().is_empty())
    }

    /// The prompt as submitted. The text stays in the editor so it can be
    /// shown frozen while generating and edited for the next cycle.
    #[must_use]
    pub fn prompt(&self) -> String {
        self.text().trim().to_string()
    }

    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        if self.enabled != enabled {
            self.enabled = enabled;
            self.configure_textarea();
        }
    }

    fn create_textarea(enabled: bool) -> TextArea<'static> {
        let mut textarea = TextArea::default();
        textarea.set_placeholder_text(PLACEHOLDER);
        textarea.set_placeholder_style(Theme::dim());
        textarea.set_cursor_line_style(Style::default());
        Self::style_textarea(&mut textarea, enabled);
        textarea
    }

    fn configure_textarea(&mut self) {
        self.textarea.set_cursor_line_style(Style::default());
        Self::style_textarea(&mut self.textarea, self.enabled);
    }

    fn style_textarea(textarea: &mut TextArea<'_>, enabled: bool) {
        if enabled {
            textarea.set_style(Theme::text());
            textarea.set_cursor_style(Theme::text().add_modifier(Modifier::REVERSED));
        } else {
            textarea.set_style(Theme::dim());
            textarea.set_cursor_style(Theme::dim());
        }
    }
}

impl Default for InputWidget<'_> {
    fn default() -> Self {
        Self::new()
    }
}
