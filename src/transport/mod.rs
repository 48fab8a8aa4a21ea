//! Chunk source abstractions for the stream decoder.
//!
//! The decoder never performs I/O itself. It consumes chunks from a
//! [`ChunkSource`], which is usually the body of a `streamGenerateContent`
//! HTTP response.

mod error;
mod source;

pub use error::TransportError;
pub use source::{from_response, ChunkSource, ChunkStream};
