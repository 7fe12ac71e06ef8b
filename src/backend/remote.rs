use async_trait::async_trait;
use futures::StreamExt;
use reqwest::StatusCode;

use crate::backend::error::BackendError;
use crate::backend::http::{HttpClient, HttpConfig};
use crate::backend::{ByteStream, GenerationBackend};
use crate::core::types::GenerationRequest;

#[derive(Clone)]
pub struct HttpBackend {
    http: HttpClient,
    base_url: String,
    endpoint_path: String,
    model: String,
}

impl std::fmt::Debug for HttpBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpBackend")
            .field("url", &self.endpoint())
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl HttpBackend {
    pub fn new(
        base_url: impl Into<String>,
        endpoint_path: impl Into<String>,
        model: impl Into<String>,
    ) -> Result<Self, BackendError> {
        Self::with_http_config(base_url, endpoint_path, model, HttpConfig::default())
    }

    pub fn with_http_config(
        base_url: impl Into<String>,
        endpoint_path: impl Into<String>,
        model: impl Into<String>,
        http_config: HttpConfig,
    ) -> Result<Self, BackendError> {
        Ok(Self {
            http: HttpClient::with_config(http_config)?,
            base_url: base_url.into(),
            endpoint_path: endpoint_path.into(),
            model: model.into(),
        })
    }

    #[must_use]
    pub fn endpoint(&self) -> String {
        join_endpoint(&self.base_url, &self.endpoint_path)
    }
}

/// Joins a base URL and a path with exactly one slash between them.
#[must_use]
pub fn join_endpoint(base_url: &str, endpoint_path: &str) -> String {
    let base = base_url.trim_end_matches('/');
    let path = endpoint_path.trim_start_matches('/');
    format!("{base}/{path}")
}

#[async_trait]
impl GenerationBackend for HttpBackend {
    fn name(&self) -> &'static str {
        "http"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn open(&self, request: &GenerationRequest) -> Result<ByteStream, BackendError> {
        let url = self.endpoint();
        let body = serde_json::to_string(request)
            .map_err(|e| BackendError::Configuration(format!("Failed to encode request: {e}")))?;

        tracing::info!(%url, model = %request.model, "Opening generation stream");

        let response = self
            .http
            .post(&url)
            .header("content-type", "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| BackendError::Connection(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(BackendError::from_status(
                status.as_u16(),
                status.canonical_reason(),
                &error_body,
            ));
        }

        if matches!(status, StatusCode::NO_CONTENT | StatusCode::RESET_CONTENT)
            || response.content_length() == Some(0)
        {
            return Err(BackendError::MissingBody);
        }

        let stream = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(|e| BackendError::StreamRead(e.to_string())));

        Ok(Box::pin(stream))
    }
}
