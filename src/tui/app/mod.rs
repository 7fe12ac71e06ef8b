mod render;
mod terminal;

use std::sync::Arc;

use crate::backend::GenerationBackend;
use crate::core::{Cycle, GenerationError, Result, SessionEvent};
use crate::tui::events::{AppEvent, terminal_event_loop, tick_loop};
use crate::tui::layout::calculate_layout;
use crate::tui::runner::{GenerationRunner, RunnerCommand};
use crate::tui::state::{AppState, Notice};
use crate::tui::widgets::{InputAction, InputWidget};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use render::{StatusInfo, render_body, render_header, render_status};
use terminal::{Tui, restore_terminal, setup_terminal};

const PAGE_SCROLL: usize = 10;

pub struct TuiApp {
    runner_tx: mpsc::UnboundedSender<RunnerCommand>,
    runner_handle: JoinHandle<()>,
    endpoint: String,
    state: AppState,
    input_widget: InputWidget<'static>,
    event_rx: mpsc::UnboundedReceiver<AppEvent>,
    event_tx: mpsc::UnboundedSender<AppEvent>,
    terminal: Tui,
}

impl TuiApp {
    pub(crate) fn with_event_channels(
        backend: Arc<dyn GenerationBackend>,
        endpoint: String,
        event_tx: mpsc::UnboundedSender<AppEvent>,
        event_rx: mpsc::UnboundedReceiver<AppEvent>,
    ) -> Result<Self> {
        let terminal = setup_terminal()?;
        let model = backend.model().to_string();

        let (runner, runner_tx) = GenerationRunner::new(backend, event_tx.clone());
        let runner_handle = tokio::spawn(runner.run());

        Ok(Self {
            runner_tx,
            runner_handle,
            endpoint,
            state: AppState::new(model),
            input_widget: InputWidget::new(),
            event_rx,
            event_tx,
            terminal,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        let tx1 = self.event_tx.clone();
        let tx2 = self.event_tx.clone();

        let input_task = tokio::spawn(async move {
            if let Err(e) = terminal_event_loop(tx1).await {
                tracing::error!(error = %e, "Terminal event loop failed");
            }
        });
        let tick_task = tokio::spawn(tick_loop(tx2));

        while !self.state.should_quit {
            self.draw()?;

            if let Some(event) = self.event_rx.recv().await {
                self.handle_event(event);
            }
        }

        let _ = self.runner_tx.send(RunnerCommand::Shutdown);
        self.runner_handle.abort();
        input_task.abort();
        tick_task.abort();

        restore_terminal(&mut self.terminal)?;

        Ok(())
    }

    fn draw(&mut self) -> Result<()> {
        let state = &mut self.state;
        let input_widget = &mut self.input_widget;
        let endpoint = self.endpoint.as_str();

        self.terminal.draw(|f| {
            let layout = calculate_layout(f.area());

            render_header(f, layout.header, state.session.model(), endpoint);
            render_body(f, layout.body, state);
            input_widget.render(layout.input, f);

            let info = StatusInfo {
                status: state.session.status(),
                spinner_frame: state.spinner_frame,
                elapsed: state.elapsed(),
                last_duration: state.last_duration(),
                line_count: state.scroll.total_lines(),
                notice: state.notice.as_ref(),
            };
            render_status(f, layout.status, &info);
        })?;

        Ok(())
    }

    fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Input(key) => self.handle_key_input(key),
            AppEvent::Paste(text) => {
                let action = self.input_widget.handle_paste(&text);
                self.handle_input_action(action);
            }
            AppEvent::Resize(_w, _h) => self.state.autoscroll.invalidate(),
            AppEvent::MouseScroll(delta) => {
                let lines = usize::from(delta.unsigned_abs());
                if delta < 0 {
                    self.state.scroll_up(lines);
                } else {
                    self.state.scroll_down(lines);
                }
            }
            AppEvent::Tick => self.state.tick(),
            AppEvent::Generation(event) => {
                if let Some(cycle) = self.state.apply_generation(event) {
                    self.start_cycle(cycle);
                }
            }
        }

        self.input_widget
            .set_enabled(self.state.session.input_enabled());
    }

    fn handle_key_input(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Char('c') if ctrl => {
                if self.input_widget.is_enabled() && !self.input_widget.is_empty() {
                    self.input_widget.clear();
                } else {
                    self.state.quit();
                }
            }
            KeyCode::Char('d') if ctrl => {
                if self.input_widget.is_empty() {
                    self.state.quit();
                }
            }
            KeyCode::Char('e') if ctrl => self.state.toggle_editor(),
            KeyCode::PageUp => self.state.scroll_up(PAGE_SCROLL),
            KeyCode::PageDown => self.state.scroll_down(PAGE_SCROLL),
            KeyCode::Home if ctrl => self.state.scroll_to_top(),
            KeyCode::End if ctrl => self.state.scroll_to_bottom(),
            _ => {
                let action = self.input_widget.handle_key(key);
                self.handle_input_action(action);
            }
        }
    }

    fn handle_input_action(&mut self, action: InputAction) {
        match action {
            InputAction::Continue | InputAction::Clear => {}
            InputAction::Blocked => {
                self.state.notice = Some(Notice::Info(
                    "Input is locked while your app is generating".to_string(),
                ));
            }
            InputAction::Submit(prompt) => match self.state.submit(prompt) {
                Ok(Some(cycle)) => self.start_cycle(cycle),
                Ok(None) | Err(GenerationError::Busy) => {}
                Err(e) => self.state.notice = Some(Notice::Error(e.to_string())),
            },
        }
    }

    fn start_cycle(&mut self, cycle: Cycle) {
        let id = cycle.id;
        if self.runner_tx.send(RunnerCommand::Generate(cycle)).is_err() {
            tracing::error!(cycle = %id, "Generation runner is gone");
            let _ = self.state.apply_generation(SessionEvent::Failed {
                cycle: id,
                error: "Generation runner stopped".to_string(),
            });
        }
    }
}

impl Drop for TuiApp {
    fn drop(&mut self) {
        self.runner_handle.abort();
        let _ = restore_terminal(&mut self.terminal);
    }
}
