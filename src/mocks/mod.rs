//! Mock implementations for testing.
//!
//! [`MockChunkSource`] scripts the body a server would send, including
//! mid-stream transport failures. [`RecordingSink`] captures everything a
//! session delivers to its sink.

use bytes::Bytes;
use futures::stream;

use crate::streaming::{DeltaSink, StreamOutcome};
use crate::transport::{ChunkStream, TransportError};
use crate::types::TextDelta;

/// Scripted chunk source.
///
/// ```
/// use integrations_gemini_stream::mocks::MockChunkSource;
/// use integrations_gemini_stream::transport::TransportError;
///
/// let source = MockChunkSource::new()
///     .chunk("[{\"candidates\":")
///     .fail(TransportError::Timeout)
///     .into_stream();
/// ```
#[derive(Debug, Default, Clone)]
pub struct MockChunkSource {
    items: Vec<Result<Bytes, TransportError>>,
}

impl MockChunkSource {
    /// Create an empty source; it signals end-of-stream immediately.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a text chunk.
    pub fn chunk(self, text: &str) -> Self {
        self.bytes(Bytes::copy_from_slice(text.as_bytes()))
    }

    /// Append a raw byte chunk.
    pub fn bytes(mut self, bytes: impl Into<Bytes>) -> Self {
        self.items.push(Ok(bytes.into()));
        self
    }

    /// Append a transport failure.
    pub fn fail(mut self, error: TransportError) -> Self {
        self.items.push(Err(error));
        self
    }

    /// Append `body` cut into byte chunks of at most `size` bytes.
    ///
    /// Cuts may fall inside multi-byte characters.
    pub fn chunked(mut self, body: &[u8], size: usize) -> Self {
        for piece in body.chunks(size.max(1)) {
            self.items.push(Ok(Bytes::copy_from_slice(piece)));
        }
        self
    }

    /// Append `body` cut at the given byte offsets.
    pub fn split_at(mut self, body: &[u8], offsets: &[usize]) -> Self {
        let mut start = 0;
        for &offset in offsets.iter().chain(std::iter::once(&body.len())) {
            let end = offset.clamp(start, body.len());
            self.items.push(Ok(Bytes::copy_from_slice(&body[start..end])));
            start = end;
        }
        self
    }

    /// Number of scripted items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if nothing is scripted.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Turn the script into a chunk stream.
    pub fn into_stream(self) -> ChunkStream {
        Box::pin(stream::iter(self.items))
    }
}

/// Sink recording every delta and the accumulated text seen with it.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    /// Deltas in delivery order.
    pub deltas: Vec<TextDelta>,
    /// Accumulated text passed alongside each delta.
    pub snapshots: Vec<String>,
    /// Outcome passed to `on_complete`.
    pub completed: Option<StreamOutcome>,
}

impl RecordingSink {
    /// Concatenation of the recorded deltas.
    pub fn text(&self) -> String {
        self.deltas.iter().map(|d| d.text.as_str()).collect()
    }
}

impl DeltaSink for RecordingSink {
    fn on_delta(&mut self, delta: &TextDelta, accumulated: &str) {
        self.deltas.push(delta.clone());
        self.snapshots.push(accumulated.to_string());
    }

    fn on_complete(&mut self, outcome: &StreamOutcome) {
        self.completed = Some(outcome.clone());
    }
}
