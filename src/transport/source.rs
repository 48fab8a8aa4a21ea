//! Chunk source trait and the reqwest response adapter.

use async_trait::async_trait;
use bytes::Bytes;
use futures::{Stream, StreamExt};
use std::pin::Pin;

use super::error::TransportError;

/// Boxed stream of raw body chunks.
pub type ChunkStream = Pin<Box<dyn Stream<Item = Result<Bytes, TransportError>> + Send>>;

/// A lazy, finite sequence of body chunks.
///
/// `None` is the explicit end-of-stream signal. An `Err` ends the session
/// early; the caller keeps whatever text was decoded before it.
#[async_trait]
pub trait ChunkSource: Send {
    /// Pull the next chunk, waiting for the network if necessary.
    async fn next_chunk(&mut self) -> Option<Result<Bytes, TransportError>>;
}

#[async_trait]
impl<S> ChunkSource for S
where
    S: Stream<Item = Result<Bytes, TransportError>> + Unpin + Send,
{
    async fn next_chunk(&mut self) -> Option<Result<Bytes, TransportError>> {
        self.next().await
    }
}

/// Turn a streaming HTTP response into a [`ChunkStream`].
///
/// Non-success statuses are reported up front with the response body, so a
/// decoding session is only started for a body that carries envelopes.
pub async fn from_response(response: reqwest::Response) -> Result<ChunkStream, TransportError> {
    let status = response.status();
    if !status.is_success() {
        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError::Body(format!("Failed to read error response: {}", e)))?;
        return Err(TransportError::Status {
            status: status.as_u16(),
            body: String::from_utf8_lossy(&body).into_owned(),
        });
    }

    let stream = response.bytes_stream().map(|result| result.map_err(TransportError::from));
    Ok(Box::pin(stream))
}
