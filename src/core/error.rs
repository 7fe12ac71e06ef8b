use thiserror::Error;

use crate::backend::error::BackendError;

#[derive(Error, Debug)]
pub enum GenerationError {
    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error("A generation is already in progress")]
    Busy,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl GenerationError {
    #[must_use]
    pub const fn backend(&self) -> Option<&BackendError> {
        match self {
            Self::Backend(err) => Some(err),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, GenerationError>;
