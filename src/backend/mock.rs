use async_trait::async_trait;
use bytes::Bytes;
use futures::{StreamExt, stream};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use crate::backend::error::BackendError;
use crate::backend::{ByteStream, GenerationBackend};
use crate::core::types::GenerationRequest;

const DEMO_CHUNK_DELAY: Duration = Duration::from_millis(40);

const DEMO_RESPONSE: &str = r#"Here is a small calculator component:

```tsx
import { useState } from "react";

export default function Calculator() {
  const [display, setDisplay] = useState("0");

  function press(key: string) {
    setDisplay((current) => (current === "0" ? key : current + key));
  }

  function evaluate() {
    try {
      setDisplay(String(Function(`return (${display})`)()));
    } catch {
      setDisplay("Error");
    }
  }

  return (
    <div className="mx-auto max-w-xs rounded-xl bg-gray-900 p-4">
      <div className="mb-4 text-right text-3xl text-white">{display}</div>
      <div className="grid grid-cols-4 gap-2">
        {"789/456*123-0.=+".split("").map((key) => (
          <button
            key={key}
            onClick={() => (key === "=" ? evaluate() : press(key))}
            className="rounded bg-gray-700 py-3 text-white"
          >
            {key}
          </button>
        ))}
      </div>
      <button onClick={() => setDisplay("0")} className="mt-2 w-full rounded bg-red-600 py-2">
        Clear
      </button>
    </div>
  );
}
```
"#;

/// What the scripted backend does for one `open` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptedReply {
    Stream {
        chunks: Vec<String>,
        delay: Option<Duration>,
    },
    Status {
        status: u16,
        message: String,
    },
    MissingBody,
    Interrupted {
        chunks: Vec<String>,
        error: String,
    },
}

impl ScriptedReply {
    #[must_use]
    pub fn chunks<I, S>(chunks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Stream {
            chunks: chunks.into_iter().map(Into::into).collect(),
            delay: None,
        }
    }

    #[must_use]
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self::Status {
            status,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn interrupted<I, S>(chunks: I, error: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Interrupted {
            chunks: chunks.into_iter().map(Into::into).collect(),
            error: error.into(),
        }
    }

    #[must_use]
    pub fn with_delay(self, delay: Duration) -> Self {
        match self {
            Self::Stream { chunks, .. } => Self::Stream {
                chunks,
                delay: Some(delay),
            },
            other => other,
        }
    }

    /// A canned calculator response cut into small chunks.
    #[must_use]
    pub fn demo() -> Self {
        let chars: Vec<char> = DEMO_RESPONSE.chars().collect();
        let chunks = chars.chunks(24).map(|c| c.iter().collect::<String>());
        Self::chunks(chunks).with_delay(DEMO_CHUNK_DELAY)
    }

    fn into_stream(self) -> Result<ByteStream, BackendError> {
        match self {
            Self::Stream { chunks, delay } => {
                let items = stream::iter(chunks).then(move |chunk| async move {
                    if let Some(delay) = delay {
                        tokio::time::sleep(delay).await;
                    }
                    Ok::<_, BackendError>(Bytes::from(chunk))
                });
                Ok(Box::pin(items))
            }
            Self::Status { status, message } => Err(BackendError::transport(status, message)),
            Self::MissingBody => Err(BackendError::MissingBody),
            Self::Interrupted { chunks, error } => {
                let items = chunks
                    .into_iter()
                    .map(|c| Ok(Bytes::from(c)))
                    .chain(std::iter::once(Err(BackendError::StreamRead(error))));
                Ok(Box::pin(stream::iter(items)))
            }
        }
    }
}

/// In-memory backend that replays queued replies in order.
#[derive(Clone)]
pub struct ScriptedBackend {
    model: String,
    replies: Arc<Mutex<VecDeque<ScriptedReply>>>,
    fallback: Option<ScriptedReply>,
    request_history: Arc<Mutex<Vec<GenerationRequest>>>,
}

impl ScriptedBackend {
    #[must_use]
    pub fn new() -> Self {
        Self {
            model: "scripted-model".to_string(),
            replies: Arc::new(Mutex::new(VecDeque::new())),
            fallback: None,
            request_history: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Answers every request with the canned demo response.
    #[must_use]
    pub fn demo() -> Self {
        Self {
            model: "demo".to_string(),
            fallback: Some(ScriptedReply::demo()),
            ..Self::new()
        }
    }

    #[must_use]
    pub fn with_reply(self, reply: ScriptedReply) -> Self {
        self.replies.lock().push_back(reply);
        self
    }

    #[must_use]
    pub fn request_history(&self) -> Vec<GenerationRequest> {
        self.request_history.lock().clone()
    }

    #[must_use]
    pub fn request_count(&self) -> usize {
        self.request_history.lock().len()
    }

    fn next_reply(&self) -> Result<ScriptedReply, BackendError> {
        self.replies
            .lock()
            .pop_front()
            .or_else(|| self.fallback.clone())
            .ok_or_else(|| {
                BackendError::Configuration("ScriptedBackend: no replies queued".to_string())
            })
    }
}

impl Default for ScriptedBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ScriptedBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptedBackend")
            .field("model", &self.model)
            .field("queued", &self.replies.lock().len())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl GenerationBackend for ScriptedBackend {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn open(&self, request: &GenerationRequest) -> Result<ByteStream, BackendError> {
        self.request_history.lock().push(request.clone());
        self.next_reply()?.into_stream()
    }
}
