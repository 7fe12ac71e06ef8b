pub mod app;
pub mod events;
pub mod layout;
pub mod runner;
pub mod state;
pub mod widgets;

pub use app::TuiApp;

use crate::backend::GenerationBackend;
use crate::config::AppConfig;
use crate::core::Result;
use std::sync::Arc;
use tokio::sync::mpsc;

pub async fn run_tui(backend: Arc<dyn GenerationBackend>, config: &AppConfig) -> Result<()> {
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let endpoint = config.endpoint_url();

    tracing::info!(model = backend.model(), %endpoint, "Starting interactive session");

    let mut app = TuiApp::with_event_channels(backend, endpoint, event_tx, event_rx)?;
    app.run().await
}
