//! Streaming response decoding.
//!
//! The `streamGenerateContent` endpoint delivers its reply as a long-lived
//! body of JSON envelopes, either wrapped in one array or written back to
//! back as bare objects. This module turns that body into text deltas:
//!
//! - [`StreamDecoder`] buffers text across chunk boundaries and emits one
//!   [`TextDelta`](crate::types::TextDelta) per completed envelope
//! - [`Utf8ChunkDecoder`] reassembles characters split between byte chunks
//! - [`decode_stream`] drives a decoder from a
//!   [`ChunkSource`](crate::transport::ChunkSource) into a [`DeltaSink`]
//! - [`DeltaStream`] exposes the same pipeline as a `futures::Stream`
//!
//! ## Example
//!
//! ```rust,no_run
//! use integrations_gemini_stream::streaming::{decode_stream, DeltaSink, StreamDecoder};
//! use integrations_gemini_stream::transport::from_response;
//! use integrations_gemini_stream::TextDelta;
//!
//! struct Console;
//!
//! impl DeltaSink for Console {
//!     fn on_delta(&mut self, _delta: &TextDelta, accumulated: &str) {
//!         // redraw the partially rendered reply
//!         let _ = accumulated;
//!     }
//! }
//!
//! async fn render(response: reqwest::Response) -> Result<String, Box<dyn std::error::Error>> {
//!     let mut source = from_response(response).await?;
//!     let outcome = decode_stream(&mut source, StreamDecoder::new(), &mut Console).await;
//!     Ok(outcome.render())
//! }
//! ```

mod decoder;
mod scanner;
mod session;
mod utf8;

pub use decoder::{ParseOutcome, StreamDecoder};
pub use session::{decode_stream, DeltaSink, DeltaStream, StreamOutcome};
pub use utf8::Utf8ChunkDecoder;
