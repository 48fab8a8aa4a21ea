//! # Gemini Streaming Response Decoder
//!
//! Incremental decoder for `streamGenerateContent` response bodies.
//!
//! ## Features
//!
//! - Decodes both wire shapes of the endpoint: one JSON array of envelopes,
//!   or back-to-back bare envelope objects (including `data:` SSE lines)
//! - Chunk-boundary independent: any slicing of the body, down to single
//!   bytes inside multi-byte characters, yields the same deltas
//! - Linear scanning with string and escape tracking, so braces inside
//!   generated code never break envelope boundaries
//! - Never fails on malformed fragments; already decoded text is kept
//! - Async driver with a sink callback, and a `futures::Stream` adapter
//! - Structured logging through `tracing`
//!
//! ## Quick Start
//!
//! ```rust
//! use integrations_gemini_stream::StreamDecoder;
//!
//! let mut decoder = StreamDecoder::new();
//! let body = r#"[{"candidates":[{"content":{"parts":[{"text":"A"}]}}]},
//! {"candidates":[{"content":{"parts":[{"text":"B"}]}}]}]"#;
//!
//! let mut deltas = Vec::new();
//! for piece in body.as_bytes().chunks(7) {
//!     deltas.extend(decoder.feed_bytes(piece)?);
//! }
//!
//! assert_eq!(deltas.len(), 2);
//! assert_eq!(decoder.finish(), "AB");
//! # Ok::<(), integrations_gemini_stream::StreamError>(())
//! ```
//!
//! ## Module Organization
//!
//! - `streaming` - Decoder, session driver and delta stream
//! - `transport` - Chunk source abstraction and HTTP response adapter
//! - `config` - Decoder configuration and builder
//! - `error` - Error types and taxonomy
//! - `types` - Envelopes, deltas and session statistics
//! - `observability` - Structured logging

#![warn(missing_docs)]
#![warn(clippy::all)]

// Public modules
pub mod config;
pub mod error;
pub mod observability;
pub mod streaming;
pub mod transport;
pub mod types;

// Development/testing modules - always available for integration tests
pub mod mocks;
pub mod fixtures;

// Re-exports for convenience
pub use config::{
    DecoderConfig, DecoderConfigBuilder, LogLevel, DEFAULT_ERROR_PREFIX,
    DEFAULT_FALLBACK_MESSAGE, DEFAULT_MAX_BUFFER_BYTES,
};
pub use error::{ConfigurationError, ResponseError, StreamError, StreamResult};
pub use streaming::{
    decode_stream, DeltaSink, DeltaStream, ParseOutcome, StreamDecoder, StreamOutcome,
    Utf8ChunkDecoder,
};
pub use transport::{from_response, ChunkSource, ChunkStream, TransportError};
pub use types::{DecoderStats, Envelope, FramingMode, TextDelta};
pub use observability::{Logger, NoopLogger, StructuredLogger};
