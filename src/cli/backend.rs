use std::sync::Arc;

use crate::backend::{GenerationBackend, HttpBackend, ScriptedBackend};
use crate::config::AppConfig;
use crate::core::{GenerationError, Result};

use super::Cli;

/// Flags on top of the loaded configuration.
#[must_use]
pub fn effective_config(cli: &Cli, config: AppConfig) -> AppConfig {
    config.with_overrides(cli.model.clone(), cli.api_url.clone())
}

pub fn create_backend(cli: &Cli, config: &AppConfig) -> Result<Arc<dyn GenerationBackend>> {
    if cli.demo {
        tracing::info!("Using the scripted demo backend");
        return Ok(Arc::new(ScriptedBackend::demo()));
    }

    if config.api_base_url.trim().is_empty() {
        return Err(GenerationError::Config(
            "api_base_url is empty. Set it in config.toml, REVOLT_API_BASE_URL or --api-url"
                .to_string(),
        ));
    }

    let backend = HttpBackend::with_http_config(
        &config.api_base_url,
        &config.endpoint_path,
        &config.model,
        config.http_config(),
    )?;
    tracing::debug!(?backend, "Created HTTP backend");

    Ok(Arc::new(backend))
}
