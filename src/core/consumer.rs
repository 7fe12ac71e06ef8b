use bytes::Bytes;
use futures::{Stream, StreamExt};

use crate::backend::error::BackendError;
use crate::core::accumulator::{RawAccumulator, Utf8Decoder};
use crate::core::extract::{extract, fence_language};

/// A display string published after a chunk was folded into the accumulator.
///
/// Only the consumer builds these, which keeps the displayed artifact tied to
/// `extract(accumulator)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactUpdate {
    chunk: usize,
    raw_len: usize,
    artifact: String,
    language: Option<String>,
}

impl ArtifactUpdate {
    /// Zero-based index of the chunk that produced this update.
    #[must_use]
    pub const fn chunk(&self) -> usize {
        self.chunk
    }

    /// Byte length of the accumulator the artifact was extracted from.
    #[must_use]
    pub const fn raw_len(&self) -> usize {
        self.raw_len
    }

    #[must_use]
    pub fn artifact(&self) -> &str {
        &self.artifact
    }

    #[must_use]
    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamOutcome {
    pub raw: String,
    pub artifact: String,
    pub chunks: usize,
}

#[derive(Debug, Default)]
pub struct StreamConsumer {
    decoder: Utf8Decoder,
    accumulator: RawAccumulator,
    chunks: usize,
}

impl StreamConsumer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drives `stream` to its end, publishing after every chunk.
    ///
    /// The stream is owned here and dropped on every return path. On a read
    /// error the loop stops; updates already handed to `publish` stay valid.
    pub async fn consume<S, F>(
        mut self,
        mut stream: S,
        mut publish: F,
    ) -> Result<StreamOutcome, BackendError>
    where
        S: Stream<Item = Result<Bytes, BackendError>> + Unpin,
        F: FnMut(ArtifactUpdate),
    {
        while let Some(next) = stream.next().await {
            let bytes = match next {
                Ok(bytes) => bytes,
                Err(e) => {
                    tracing::warn!(
                        chunks = self.chunks,
                        received = self.accumulator.len(),
                        error = %e,
                        "Generation stream aborted"
                    );
                    return Err(match e {
                        err @ BackendError::StreamRead(_) => err,
                        other => BackendError::StreamRead(other.to_string()),
                    });
                }
            };

            let text = self.decoder.decode(&bytes);
            self.accumulator.append(&text);
            tracing::debug!(
                chunk = self.chunks,
                bytes = bytes.len(),
                total = self.accumulator.len(),
                "Received chunk"
            );
            publish(self.snapshot());
            self.chunks += 1;
        }

        if let Some(replacement) = self.decoder.finish() {
            self.accumulator.push(replacement);
            publish(self.snapshot());
        }

        let artifact = extract(self.accumulator.as_str());
        Ok(StreamOutcome {
            raw: self.accumulator.into_string(),
            artifact,
            chunks: self.chunks,
        })
    }

    fn snapshot(&self) -> ArtifactUpdate {
        let raw = self.accumulator.as_str();
        ArtifactUpdate {
            chunk: self.chunks,
            raw_len: raw.len(),
            artifact: extract(raw),
            language: fence_language(raw).map(String::from),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;

    fn chunks(parts: &[&'static str]) -> impl Stream<Item = Result<Bytes, BackendError>> + Unpin {
        stream::iter(
            parts
                .iter()
                .copied()
                .map(|p| Ok(Bytes::from_static(p.as_bytes())))
                .collect::<Vec<_>>(),
        )
    }

    #[tokio::test]
    async fn publishes_after_every_chunk() {
        let mut published = Vec::new();
        let outcome = StreamConsumer::new()
            .consume(
                chunks(&["```tsx\nfunction Calc() ", "{ return <div/> }\n```"]),
                |update| published.push(update),
            )
            .await
            .expect("stream succeeds");

        assert_eq!(published.len(), 2);
        assert_eq!(published[0].artifact(), "```tsx\nfunction Calc()");
        assert_eq!(published[1].artifact(), "function Calc() { return <div/> }");
        assert_eq!(published[1].language(), Some("tsx"));
        assert_eq!(outcome.artifact, "function Calc() { return <div/> }");
        assert_eq!(outcome.chunks, 2);
    }

    #[tokio::test]
    async fn every_publication_extracts_a_growing_prefix() {
        let parts = ["Sure!\n``", "`js\nconst a", " = 1;\n", "``", "`\nDone."];
        let mut published = Vec::new();
        let outcome = StreamConsumer::new()
            .consume(chunks(&parts), |update| published.push(update))
            .await
            .expect("stream succeeds");

        let mut last_len = 0;
        for (i, update) in published.iter().enumerate() {
            assert_eq!(update.chunk(), i);
            assert!(update.raw_len() >= last_len);
            assert_eq!(update.artifact(), extract(&outcome.raw[..update.raw_len()]));
            last_len = update.raw_len();
        }
        assert_eq!(last_len, outcome.raw.len());
        assert_eq!(outcome.artifact, "const a = 1;");
    }

    #[tokio::test]
    async fn empty_stream_completes_without_publishing() {
        let mut count = 0;
        let outcome = StreamConsumer::new()
            .consume(chunks(&[]), |_| count += 1)
            .await
            .expect("stream succeeds");

        assert_eq!(count, 0);
        assert_eq!(outcome.raw, "");
        assert_eq!(outcome.artifact, "");
    }

    #[tokio::test]
    async fn utf8_split_across_chunks_is_reassembled() {
        let bytes = "```\nconst s = \"→\";\n```".as_bytes();
        let split = bytes
            .iter()
            .position(|b| *b == 0xE2)
            .expect("arrow present")
            + 1;
        let parts = vec![
            Ok(Bytes::copy_from_slice(&bytes[..split])),
            Ok(Bytes::copy_from_slice(&bytes[split..])),
        ];

        let outcome = StreamConsumer::new()
            .consume(stream::iter(parts), |_| {})
            .await
            .expect("stream succeeds");

        assert_eq!(outcome.artifact, "const s = \"→\";");
    }

    #[tokio::test]
    async fn mid_stream_error_aborts_after_partial_publication() {
        let parts = vec![
            Ok(Bytes::from_static(b"```ts\nlet partial")),
            Err(BackendError::StreamRead("connection reset".into())),
            Ok(Bytes::from_static(b" = 1;\n```")),
        ];
        let mut published = Vec::new();

        let err = StreamConsumer::new()
            .consume(stream::iter(parts), |u| published.push(u))
            .await
            .expect_err("stream fails");

        assert!(matches!(err, BackendError::StreamRead(ref m) if m == "connection reset"));
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].artifact(), "```ts\nlet partial");
    }

    #[tokio::test]
    async fn non_read_errors_mid_stream_are_reported_as_stream_read() {
        let parts = vec![Err(BackendError::Connection("gone".into()))];
        let err = StreamConsumer::new()
            .consume(stream::iter(parts), |_| {})
            .await
            .expect_err("stream fails");

        assert!(matches!(err, BackendError::StreamRead(_)));
    }
}
