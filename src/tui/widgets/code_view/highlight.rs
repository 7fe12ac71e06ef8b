use std::sync::LazyLock;

use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use syntect::easy::HighlightLines;
use syntect::highlighting::{Theme as SyntectTheme, ThemeSet};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

use crate::ui::theme::Theme;

static SYNTAXES: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);
static THEMES: LazyLock<ThemeSet> = LazyLock::new(ThemeSet::load_defaults);

const THEME_NAME: &str = "base16-ocean.dark";

/// The bundled syntax set has no TypeScript grammar; the JavaScript one
/// covers TS and JSX well enough for display.
fn syntax_token(language: &str) -> &str {
    match language.to_ascii_lowercase().as_str() {
        "ts" | "tsx" | "typescript" | "jsx" | "javascript" | "mjs" | "cjs" => "js",
        "py" | "python" => "py",
        "sh" | "bash" | "shell" | "zsh" => "sh",
        "rs" | "rust" => "rs",
        _ => language,
    }
}

fn find_syntax(language: Option<&str>) -> &'static SyntaxReference {
    language
        .filter(|l| !l.is_empty())
        .and_then(|l| SYNTAXES.find_syntax_by_token(syntax_token(l)))
        .unwrap_or_else(|| SYNTAXES.find_syntax_plain_text())
}

fn theme() -> Option<&'static SyntectTheme> {
    THEMES.themes.get(THEME_NAME)
}

fn plain_lines(code: &str) -> Vec<Line<'static>> {
    code.lines()
        .map(|line| Line::from(Span::styled(line.to_string(), Theme::code())))
        .collect()
}

/// Highlights `code` line by line. Unknown languages and highlighter errors
/// fall back to unstyled text.
#[must_use]
pub fn highlight(code: &str, language: Option<&str>) -> Vec<Line<'static>> {
    let Some(theme) = theme() else {
        return plain_lines(code);
    };

    let mut highlighter = HighlightLines::new(find_syntax(language), theme);
    let mut lines = Vec::new();

    for line in LinesWithEndings::from(code) {
        match highlighter.highlight_line(line, &SYNTAXES) {
            Ok(ranges) => {
                let spans: Vec<Span<'static>> = ranges
                    .into_iter()
                    .filter_map(|(style, text)| {
                        let text = text.trim_end_matches(['\n', '\r']);
                        (!text.is_empty()).then(|| {
                            let fg = Color::Rgb(
                                style.foreground.r,
                                style.foreground.g,
                                style.foreground.b,
                            );
                            Span::styled(text.to_string(), Style::new().fg(fg))
                        })
                    })
                    .collect();
                lines.push(Line::from(spans));
            }
            Err(e) => {
                tracing::debug!(error = %e, "Highlighting failed, rendering plain text");
                return plain_lines(code);
            }
        }
    }

    lines
}

/// Highlighted lines for the latest artifact revision.
#[derive(Debug, Default)]
pub struct HighlightCache {
    key: Option<(u64, Option<String>)>,
    lines: Vec<Line<'static>>,
}

impl HighlightCache {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            key: None,
            lines: Vec::new(),
        }
    }

    /// Re-highlights only when the revision or language changed.
    pub fn lines(&mut self, revision: u64, language: Option<&str>, code: &str) -> &[Line<'static>] {
        let stale = self
            .key
            .as_ref()
            .is_none_or(|(rev, lang)| *rev != revision || lang.as_deref() != language);

        if stale {
            self.lines = highlight(code, language);
            self.key = Some((revision, language.map(String::from)));
        }

        &self.lines
    }

    pub fn clear(&mut self) {
        self.key = None;
        self.lines.clear();
    }
}
