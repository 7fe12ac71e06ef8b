use std::time::{Duration, Instant};

use crate::core::{AutoScroll, Cycle, Effect, GenerationError, Result, Session, SessionEvent};
use crate::tui::widgets::{HighlightCache, ScrollState};

const SPINNER_INTERVAL: Duration = Duration::from_millis(80);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Info(String),
    Error(String),
}

/// Everything the UI draws from. Generation state lives in `session`; the
/// rest is presentation.
pub struct AppState {
    pub should_quit: bool,
    pub spinner_frame: usize,
    pub session: Session,
    pub scroll: ScrollState,
    pub autoscroll: AutoScroll,
    pub highlight: HighlightCache,
    pub show_editor: bool,
    pub notice: Option<Notice>,

    spinner_last_update: Option<Instant>,
    request_start: Option<Instant>,
    last_duration: Option<Duration>,
}

impl AppState {
    #[must_use]
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            should_quit: false,
            spinner_frame: 0,
            session: Session::new(model),
            scroll: ScrollState::new(),
            autoscroll: AutoScroll::new(),
            highlight: HighlightCache::new(),
            show_editor: true,
            notice: None,
            spinner_last_update: None,
            request_start: None,
            last_duration: None,
        }
    }

    pub fn tick(&mut self) {
        if !self.session.is_loading() {
            return;
        }

        let now = Instant::now();
        match self.spinner_last_update {
            Some(last) if now.duration_since(last) >= SPINNER_INTERVAL => {
                self.spinner_frame = self.spinner_frame.wrapping_add(1);
                self.spinner_last_update = Some(now);
            }
            None => self.spinner_last_update = Some(now),
            _ => {}
        }
    }

    pub const fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Starts a cycle for `prompt`. The returned cycle must be handed to the
    /// runner.
    pub fn submit(&mut self, prompt: String) -> Result<Option<Cycle>> {
        match self.session.apply(SessionEvent::Submit { prompt }) {
            Ok(effects) => Ok(self.absorb(effects)),
            Err(GenerationError::Busy) => {
                self.notice = Some(Notice::Info(
                    "Wait for the current generation to finish".to_string(),
                ));
                Err(GenerationError::Busy)
            }
            Err(e) => Err(e),
        }
    }

    /// Applies an event coming back from the runner.
    pub fn apply_generation(&mut self, event: SessionEvent) -> Option<Cycle> {
        match self.session.apply(event) {
            Ok(effects) => self.absorb(effects),
            Err(e) => {
                tracing::warn!(error = %e, "Dropped generation event");
                None
            }
        }
    }

    fn absorb(&mut self, effects: Vec<Effect>) -> Option<Cycle> {
        let mut start = None;

        for effect in effects {
            match effect {
                Effect::RevealOutput => {
                    self.scroll.reset();
                    self.autoscroll.invalidate();
                }
                Effect::LoadingChanged(true) => {
                    self.notice = None;
                    self.request_start = Some(Instant::now());
                    self.last_duration = None;
                }
                Effect::LoadingChanged(false) => {
                    if matches!(self.notice, Some(Notice::Info(_))) {
                        self.notice = None;
                    }
                    self.last_duration = self.request_start.take().map(|s| s.elapsed());
                    self.spinner_last_update = None;
                }
                Effect::StartGeneration(cycle) => start = Some(cycle),
                Effect::ArtifactChanged { revision } => {
                    tracing::trace!(revision, "Artifact changed");
                }
                Effect::Failed(message) => self.notice = Some(Notice::Error(message)),
            }
        }

        start
    }

    #[must_use]
    pub fn elapsed(&self) -> Option<Duration> {
        self.request_start.map(|start| start.elapsed())
    }

    #[must_use]
    pub const fn last_duration(&self) -> Option<Duration> {
        self.last_duration
    }

    pub const fn toggle_editor(&mut self) {
        self.show_editor = !self.show_editor;
    }

    pub const fn scroll_up(&mut self, lines: usize) {
        self.scroll.scroll_up(lines);
    }

    pub fn scroll_down(&mut self, lines: usize) {
        self.scroll.scroll_down(lines);
    }

    pub const fn scroll_to_top(&mut self) {
        self.scroll.scroll_to_top();
    }

    pub const fn scroll_to_bottom(&mut self) {
        self.scroll.scroll_to_bottom();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::error::BackendError;
    use crate::core::{ArtifactUpdate, Status, StreamConsumer};
    use bytes::Bytes;
    use futures::stream;

    async fn update_for(raw: &'static str) -> ArtifactUpdate {
        let mut last = None;
        StreamConsumer::new()
            .consume(
                stream::iter(vec![Ok::<_, BackendError>(Bytes::from_static(raw.as_bytes()))]),
                |u| last = Some(u),
            )
            .await
            .expect("stream succeeds");
        last.expect("one update")
    }

    #[test]
    fn new_state_is_idle() {
        let state = AppState::new("m");
        assert!(!state.should_quit);
        assert_eq!(state.session.status(), Status::Initial);
        assert!(state.elapsed().is_none());
        assert!(state.show_editor);
    }

    #[test]
    fn submit_returns_cycle_and_starts_timer() {
        let mut state = AppState::new("m");
        let cycle = state
            .submit("Build me a calculator".into())
            .expect("accepted")
            .expect("cycle started");

        assert_eq!(cycle.request.prompt(), Some("Build me a calculator"));
        assert!(state.elapsed().is_some());
        assert!(state.session.is_revealed());
    }

    #[test]
    fn second_submit_while_loading_is_busy() {
        let mut state = AppState::new("m");
        state.submit("one".into()).expect("accepted");

        assert!(matches!(
            state.submit("two".into()),
            Err(GenerationError::Busy)
        ));
        assert!(matches!(state.notice, Some(Notice::Info(_))));
        assert_eq!(state.session.prompt(), "one");
    }

    #[tokio::test]
    async fn completed_cycle_stops_timer_and_renders_lines() {
        let mut state = AppState::new("m");
        let cycle = state
            .submit("p".into())
            .expect("accepted")
            .expect("cycle started");

        state.apply_generation(SessionEvent::StreamOpened { cycle: cycle.id });
        state.apply_generation(SessionEvent::Published {
            cycle: cycle.id,
            update: update_for("```tsx\nconst a = 1;\nconst b = 2;\n```").await,
        });
        let lines = state.highlight.lines(
            state.session.revision(),
            state.session.language(),
            state.session.artifact(),
        );
        assert_eq!(lines.len(), 2);

        state.apply_generation(SessionEvent::Completed { cycle: cycle.id });
        assert_eq!(state.session.status(), Status::Created);
        assert!(state.elapsed().is_none());
        assert!(state.last_duration().is_some());
        assert!(state.notice.is_none());
    }

    #[test]
    fn busy_notice_is_dropped_when_cycle_ends() {
        let mut state = AppState::new("m");
        let cycle = state
            .submit("one".into())
            .expect("accepted")
            .expect("cycle started");
        let _ = state.submit("two".into());
        assert!(matches!(state.notice, Some(Notice::Info(_))));

        state.apply_generation(SessionEvent::StreamOpened { cycle: cycle.id });
        state.apply_generation(SessionEvent::Completed { cycle: cycle.id });
        assert!(state.notice.is_none());
    }

    #[test]
    fn failure_sets_error_notice() {
        let mut state = AppState::new("m");
        let cycle = state
            .submit("p".into())
            .expect("accepted")
            .expect("cycle started");

        state.apply_generation(SessionEvent::Failed {
            cycle: cycle.id,
            error: "Generation response has no body".into(),
        });

        assert_eq!(
            state.notice,
            Some(Notice::Error("Generation response has no body".into()))
        );
        assert!(state.session.input_enabled());
    }

    #[test]
    fn tick_only_spins_while_loading() {
        let mut state = AppState::new("m");
        state.tick();
        assert_eq!(state.spinner_frame, 0);

        state.submit("p".into()).expect("accepted");
        state.tick();
        state.spinner_last_update = Some(Instant::now() - SPINNER_INTERVAL * 2);
        state.tick();
        assert_eq!(state.spinner_frame, 1);
    }
}
