pub mod error;
pub mod http;
pub mod mock;
pub mod remote;

pub use error::BackendError;
pub use http::{HttpClient, HttpConfig};
pub use mock::{ScriptedBackend, ScriptedReply};
pub use remote::{HttpBackend, join_endpoint};

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use std::pin::Pin;
use std::sync::Arc;

use crate::core::types::GenerationRequest;

pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, BackendError>> + Send>>;

/// Source of generated text.
///
/// `open` resolves once response headers are in. A non-success status or a
/// missing body must fail here, before any chunk is handed out.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    fn name(&self) -> &str;
    fn model(&self) -> &str;
    async fn open(&self, request: &GenerationRequest) -> Result<ByteStream, BackendError>;
}

#[async_trait]
impl<T: GenerationBackend + ?Sized> GenerationBackend for Arc<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn model(&self) -> &str {
        (**self).model()
    }

    async fn open(&self, request: &GenerationRequest) -> Result<ByteStream, BackendError> {
        (**self).open(request).await
    }
}
