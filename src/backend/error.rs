use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Generation request failed ({status}): {message}")]
    Transport { status: u16, message: String },

    #[error("Generation response has no body")]
    MissingBody,

    #[error("Stream read failed: {0}")]
    StreamRead(String),

    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl BackendError {
    #[must_use]
    pub fn transport(status: u16, message: impl Into<String>) -> Self {
        Self::Transport {
            status,
            message: message.into(),
        }
    }

    /// Builds a `Transport` error from a non-success response, preferring the
    /// `error.message` (or bare `error` string) of a JSON body over the raw text.
    #[must_use]
    pub fn from_status(status: u16, reason: Option<&str>, body: &str) -> Self {
        let parsed = serde_json::from_str::<serde_json::Value>(body).ok();
        let message = parsed
            .as_ref()
            .and_then(|v| {
                let error = v.get("error")?;
                error
                    .get("message")
                    .and_then(serde_json::Value::as_str)
                    .or_else(|| error.as_str())
                    .map(String::from)
            })
            .or_else(|| {
                let trimmed = body.trim();
                (!trimmed.is_empty() && parsed.is_none()).then(|| trimmed.to_string())
            })
            .or_else(|| reason.map(String::from))
            .unwrap_or_else(|| format!("HTTP {status}"));

        Self::Transport { status, message }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_status_prefers_json_error_message() {
        let body = r#"{"error": {"message": "model overloaded"}}"#;
        let err = BackendError::from_status(503, Some("Service Unavailable"), body);

        match err {
            BackendError::Transport { status, message } => {
                assert_eq!(status, 503);
                assert_eq!(message, "model overloaded");
            }
            _ => panic!("Expected Transport error"),
        }
    }

    #[test]
    fn from_status_accepts_bare_error_string() {
        let err = BackendError::from_status(400, None, r#"{"error": "prompt required"}"#);
        assert_eq!(
            err.to_string(),
            "Generation request failed (400): prompt required"
        );
    }

    #[test]
    fn from_status_falls_back_to_plain_body_then_reason() {
        let err = BackendError::from_status(500, Some("Internal Server Error"), "boom");
        assert!(matches!(err, BackendError::Transport { ref message, .. } if message == "boom"));

        let err = BackendError::from_status(500, Some("Internal Server Error"), "");
        assert!(
            matches!(err, BackendError::Transport { ref message, .. } if message == "Internal Server Error")
        );

        let err = BackendError::from_status(599, None, "");
        assert!(matches!(err, BackendError::Transport { ref message, .. } if message == "HTTP 599"));
    }
}
