use std::sync::Arc;

use crate::backend::GenerationBackend;
use crate::core::{Cycle, drive_cycle};
use crate::tui::events::AppEvent;
use tokio::sync::mpsc;

#[derive(Debug)]
pub enum RunnerCommand {
    Generate(Cycle),
    Shutdown,
}

/// Background task that owns the network side of a cycle. It never touches
/// the session; progress goes back to the UI as `AppEvent::Generation`.
pub struct GenerationRunner {
    backend: Arc<dyn GenerationBackend>,
    cmd_rx: mpsc::UnboundedReceiver<RunnerCommand>,
    event_tx: mpsc::UnboundedSender<AppEvent>,
}

impl GenerationRunner {
    #[must_use]
    pub fn new(
        backend: Arc<dyn GenerationBackend>,
        event_tx: mpsc::UnboundedSender<AppEvent>,
    ) -> (Self, mpsc::UnboundedSender<RunnerCommand>) {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let runner = Self {
            backend,
            cmd_rx,
            event_tx,
        };
        (runner, cmd_tx)
    }

    pub async fn run(mut self) {
        while let Some(cmd) = self.cmd_rx.recv().await {
            match cmd {
                RunnerCommand::Generate(cycle) => self.generate(&cycle).await,
                RunnerCommand::Shutdown => {
                    tracing::info!("Generation runner shutting down");
                    break;
                }
            }
        }
    }

    async fn generate(&self, cycle: &Cycle) {
        let event_tx = self.event_tx.clone();

        let result = drive_cycle(self.backend.as_ref(), cycle, |event| {
            let _ = event_tx.send(AppEvent::Generation(event));
        })
        .await;

        if let Err(e) = result {
            tracing::debug!(cycle = %cycle.id, error = %e, "Runner finished cycle with error");
        }
    }
}
