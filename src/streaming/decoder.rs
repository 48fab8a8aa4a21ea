//! Incremental decoder for `streamGenerateContent` response bodies.
//!
//! The body is either one JSON array of envelopes:
//! ```json
//! [{"candidates":[...]},
//! {"candidates":[...]}]
//! ```
//! or a sequence of bare envelope objects, optionally wrapped in
//! server-sent-event `data:` lines. Chunks arrive with no relation to value
//! boundaries, so the decoder buffers text, finds complete top-level objects
//! with [`Scanner`], and emits the text fragment of each envelope as soon as
//! its closing brace arrives.

use serde_json::{json, Value};
use std::sync::Arc;
use uuid::Uuid;

use super::scanner::{ScanEvent, Scanner};
use super::utf8::Utf8ChunkDecoder;
use crate::config::DecoderConfig;
use crate::error::StreamResult;
use crate::observability::{Logger, StructuredLogger};
use crate::types::{DecoderStats, Envelope, FramingMode, TextDelta};

/// Result of trying to parse a candidate top-level value.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseOutcome {
    /// The span is a complete JSON value.
    Complete(Value),
    /// The span ended before the value did; more input may complete it.
    Incomplete,
    /// The span can never become valid JSON.
    Invalid(String),
}

impl ParseOutcome {
    /// Attempt to parse `text` as a single JSON value.
    pub fn attempt(text: &str) -> Self {
        match serde_json::from_str::<Value>(text) {
            Ok(value) => ParseOutcome::Complete(value),
            Err(e) if e.is_eof() => ParseOutcome::Incomplete,
            Err(e) => ParseOutcome::Invalid(e.to_string()),
        }
    }
}

/// Decoder for one streamed response.
///
/// Create one per request and discard it after [`finish`](Self::finish).
/// `feed` never fails on malformed input: fragments that are not yet
/// complete stay buffered, fragments that can never parse are dropped, and
/// text already decoded is never lost.
///
/// ```
/// use integrations_gemini_stream::StreamDecoder;
///
/// let mut decoder = StreamDecoder::new();
/// let mut deltas = decoder.feed(r#"{"candidates":[{"content":{"parts":[{"te"#);
/// deltas.extend(decoder.feed(r#"xt":"Hi"}]}}]}"#));
///
/// assert_eq!(deltas.len(), 1);
/// assert_eq!(deltas[0].text, "Hi");
/// assert_eq!(decoder.finish(), "Hi");
/// ```
pub struct StreamDecoder {
    config: DecoderConfig,
    logger: Arc<dyn Logger>,
    session_id: Uuid,
    buffer: String,
    scanner: Scanner,
    utf8: Utf8ChunkDecoder,
    framing: FramingMode,
    accumulated: String,
    stats: DecoderStats,
    finished: bool,
}

impl StreamDecoder {
    /// Create a decoder with the default configuration.
    pub fn new() -> Self {
        Self::with_config(DecoderConfig::default())
    }

    /// Create a decoder with the given configuration.
    pub fn with_config(config: DecoderConfig) -> Self {
        let logger = Arc::new(StructuredLogger::new("gemini.stream").with_level(config.log_level));
        Self {
            config,
            logger,
            session_id: Uuid::new_v4(),
            buffer: String::new(),
            scanner: Scanner::default(),
            utf8: Utf8ChunkDecoder::new(),
            framing: FramingMode::Unknown,
            accumulated: String::new(),
            stats: DecoderStats::default(),
            finished: false,
        }
    }

    /// Replace the logger.
    pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = logger;
        self
    }

    /// Feed one chunk of text and return the deltas it completed, in order.
    pub fn feed(&mut self, chunk: &str) -> Vec<TextDelta> {
        if self.finished {
            self.logger.warn("Chunk fed after finish was ignored", json!({
                "session_id": self.session_id.to_string(),
                "length": chunk.len(),
            }));
            return Vec::new();
        }

        self.stats.chunks += 1;
        self.stats.bytes += chunk.len() as u64;
        self.buffer.push_str(chunk);

        let mut deltas = Vec::new();
        while let Some(event) = self.scanner.next_event(self.buffer.as_bytes()) {
            match event {
                ScanEvent::ArrayOpened => self.detect_framing(FramingMode::Array),
                ScanEvent::ObjectOpened => self.detect_framing(FramingMode::ObjectStream),
                ScanEvent::ValueClosed { start, end } => self.complete_value(start, end, &mut deltas),
                ScanEvent::ArrayClosed => {
                    self.stats.arrays_closed += 1;
                    self.logger.debug("Envelope array closed", json!({
                        "session_id": self.session_id.to_string(),
                    }));
                }
            }
        }

        self.compact();
        deltas
    }

    /// Feed one chunk of raw body bytes.
    ///
    /// Multi-byte characters split across chunks are reassembled. In strict
    /// UTF-8 mode an invalid sequence fails the call before anything from
    /// the chunk is fed.
    pub fn feed_bytes(&mut self, chunk: &[u8]) -> StreamResult<Vec<TextDelta>> {
        let text = self.utf8.decode(chunk, self.config.lossy_utf8)?;
        Ok(self.feed(&text))
    }

    /// End the session and return the accumulated response.
    ///
    /// Returns the configured fallback message when nothing was decoded. An
    /// unterminated trailing fragment is discarded. Calling this more than
    /// once returns the same text.
    pub fn finish(&mut self) -> String {
        if !self.finished {
            self.finished = true;

            let dangling = self.buffer.len() + self.utf8.pending_len();
            if dangling > 0 {
                self.logger.debug("Discarding incomplete trailing fragment", json!({
                    "session_id": self.session_id.to_string(),
                    "length": dangling,
                }));
            }
            self.buffer = String::new();
            self.scanner.reset();

            self.logger.info("Stream decoding finished", json!({
                "session_id": self.session_id.to_string(),
                "framing": self.framing,
                "stats": self.stats,
            }));
        }

        if self.accumulated.is_empty() {
            self.config.fallback_message.clone()
        } else {
            self.accumulated.clone()
        }
    }

    /// Text decoded so far.
    pub fn accumulated(&self) -> &str {
        &self.accumulated
    }

    /// Wire shape detected for this session.
    pub fn framing(&self) -> FramingMode {
        self.framing
    }

    /// Session counters.
    pub fn stats(&self) -> DecoderStats {
        self.stats
    }

    /// Identifier carried in this session's log events.
    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Bytes currently buffered for an unfinished value.
    pub fn buffered_len(&self) -> usize {
        self.buffer.len()
    }

    /// Returns true once `finish` has been called.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// The session configuration.
    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    pub(crate) fn logger(&self) -> &Arc<dyn Logger> {
        &self.logger
    }

    fn detect_framing(&mut self, framing: FramingMode) {
        if self.framing == FramingMode::Unknown {
            self.framing = framing;
            self.logger.debug("Detected response framing", json!({
                "session_id": self.session_id.to_string(),
                "framing": framing,
            }));
        }
    }

    fn complete_value(&mut self, start: usize, end: usize, deltas: &mut Vec<TextDelta>) {
        match ParseOutcome::attempt(&self.buffer[start..end]) {
            ParseOutcome::Complete(value) => {
                self.stats.envelopes += 1;
                if let Some(text) = Envelope::from_value(&value).into_text() {
                    self.emit(text, deltas);
                }
            }
            ParseOutcome::Incomplete => self.scanner.reopen(),
            ParseOutcome::Invalid(reason) => {
                self.stats.dropped_fragments += 1;
                self.logger.warn("Dropping malformed envelope", json!({
                    "session_id": self.session_id.to_string(),
                    "length": end - start,
                    "reason": reason,
                }));
            }
        }
    }

    fn emit(&mut self, text: String, deltas: &mut Vec<TextDelta>) {
        let delta = TextDelta::new(self.stats.deltas, text);
        self.stats.deltas += 1;
        self.accumulated.push_str(&delta.text);

        self.logger.debug("Emitted text delta", json!({
            "session_id": self.session_id.to_string(),
            "index": delta.index,
            "length": delta.text.len(),
        }));
        deltas.push(delta);
    }

    /// Drop everything before the in-progress value, and the value itself
    /// when it has outgrown the buffer limit.
    fn compact(&mut self) {
        let retain_from = self.scanner.retain_from();
        if retain_from > 0 {
            self.buffer.drain(..retain_from);
            self.scanner.shift(retain_from);
        }

        if self.buffer.len() > self.config.max_buffer_bytes {
            self.stats.dropped_fragments += 1;
            self.logger.warn("Discarding oversized fragment", json!({
                "session_id": self.session_id.to_string(),
                "length": self.buffer.len(),
                "limit": self.config.max_buffer_bytes,
            }));
            self.buffer.clear();
            self.scanner.reset();
        }
    }
}

impl Default for StreamDecoder {
    fn default() -> Self {
        Self::new()
    }
}
