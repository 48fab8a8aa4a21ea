//! Driving a decoder from a chunk source.
//!
//! [`decode_stream`] pulls chunks until the source ends or fails, pushes
//! every delta to a [`DeltaSink`] as it is decoded, and returns a single
//! [`StreamOutcome`]. [`DeltaStream`] offers the same pipeline as a
//! `futures::Stream` of deltas for pull-style consumers.

use futures::Stream;
use serde_json::json;
use std::collections::VecDeque;
use std::pin::Pin;
use std::task::{Context, Poll};
use tracing::Instrument;

use super::decoder::StreamDecoder;
use crate::error::{StreamError, StreamResult};
use crate::transport::{ChunkSource, ChunkStream};
use crate::types::{DecoderStats, TextDelta};

/// Receiver of decoded text, typically a live display.
pub trait DeltaSink: Send {
    /// Called for every delta in order, with the text accumulated so far
    /// (including this delta).
    fn on_delta(&mut self, delta: &TextDelta, accumulated: &str);

    /// Called once when the session ends, successfully or not.
    fn on_complete(&mut self, _outcome: &StreamOutcome) {}
}

/// Final result of a decoding session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamOutcome {
    /// The full response, the fallback message for an empty response, or
    /// the partial text decoded before a failure.
    pub text: String,
    /// The failure that ended the session early.
    pub error: Option<StreamError>,
    /// User-facing line describing `error`.
    pub error_line: Option<String>,
    /// Session counters.
    pub stats: DecoderStats,
}

impl StreamOutcome {
    /// Returns true if the session ended before the source finished.
    pub fn is_partial(&self) -> bool {
        self.error.is_some()
    }

    /// Text to display: the response, followed by the error line when the
    /// session failed.
    pub fn render(&self) -> String {
        match &self.error_line {
            None => self.text.clone(),
            Some(line) if self.text.is_empty() => line.clone(),
            Some(line) => format!("{}\n\n{}", self.text, line),
        }
    }
}

/// Decode everything `source` delivers, forwarding deltas to `sink`.
///
/// The decoder is consumed: one decoder serves exactly one response.
pub async fn decode_stream<S, K>(source: &mut S, decoder: StreamDecoder, sink: &mut K) -> StreamOutcome
where
    S: ChunkSource + ?Sized,
    K: DeltaSink + ?Sized,
{
    let span = tracing::info_span!("gemini.stream.decode", session_id = %decoder.session_id());
    run_session(source, decoder, sink).instrument(span).await
}

async fn run_session<S, K>(source: &mut S, mut decoder: StreamDecoder, sink: &mut K) -> StreamOutcome
where
    S: ChunkSource + ?Sized,
    K: DeltaSink + ?Sized,
{
    decoder.logger().info("Stream decoding started", json!({
        "session_id": decoder.session_id().to_string(),
    }));

    let mut failure = None;
    while let Some(chunk) = source.next_chunk().await {
        let fed = chunk
            .map_err(StreamError::from)
            .and_then(|bytes| decoder.feed_bytes(&bytes));

        match fed {
            Ok(deltas) => {
                // Replay the accumulated text per delta so the sink sees
                // each intermediate state.
                let total = decoder.accumulated();
                let mut upto = total.len() - deltas.iter().map(|d| d.text.len()).sum::<usize>();
                for delta in &deltas {
                    upto += delta.text.len();
                    sink.on_delta(delta, &total[..upto]);
                }
            }
            Err(e) => {
                decoder.logger().error("Stream decoding interrupted", json!({
                    "session_id": decoder.session_id().to_string(),
                    "error": e.to_string(),
                    "retryable": e.is_retryable(),
                }));
                failure = Some(e);
                break;
            }
        }
    }

    let outcome = match failure {
        None => StreamOutcome {
            text: decoder.finish(),
            error: None,
            error_line: None,
            stats: decoder.stats(),
        },
        Some(error) => {
            let partial = decoder.accumulated().to_string();
            decoder.finish();
            StreamOutcome {
                text: partial,
                error_line: Some(error.user_message(&decoder.config().error_prefix)),
                error: Some(error),
                stats: decoder.stats(),
            }
        }
    };

    sink.on_complete(&outcome);
    outcome
}

/// Deltas of a chunk stream, decoded on demand.
///
/// Yields `Err` once if the source fails, then ends.
pub struct DeltaStream {
    inner: ChunkStream,
    decoder: StreamDecoder,
    pending: VecDeque<TextDelta>,
    done: bool,
}

impl DeltaStream {
    /// Decode `inner` with `decoder`.
    pub fn new(inner: ChunkStream, decoder: StreamDecoder) -> Self {
        Self {
            inner,
            decoder,
            pending: VecDeque::new(),
            done: false,
        }
    }

    /// The underlying decoder, for progress and statistics.
    pub fn decoder(&self) -> &StreamDecoder {
        &self.decoder
    }

    /// End the session and return the final text.
    ///
    /// Deltas not yet pulled from the stream are still part of the text.
    pub fn finish(mut self) -> String {
        self.decoder.finish()
    }
}

impl Stream for DeltaStream {
    type Item = StreamResult<TextDelta>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();

        loop {
            if let Some(delta) = this.pending.pop_front() {
                return Poll::Ready(Some(Ok(delta)));
            }

            if this.done {
                return Poll::Ready(None);
            }

            match this.inner.as_mut().poll_next(cx) {
                Poll::Ready(Some(Ok(bytes))) => match this.decoder.feed_bytes(&bytes) {
                    Ok(deltas) => this.pending.extend(deltas),
                    Err(e) => {
                        this.done = true;
                        return Poll::Ready(Some(Err(e)));
                    }
                },
                Poll::Ready(Some(Err(e))) => {
                    this.done = true;
                    return Poll::Ready(Some(Err(e.into())));
                }
                Poll::Ready(None) => {
                    this.done = true;
                    this.decoder.finish();
                }
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}
