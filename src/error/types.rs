//! Main error type for the stream decoder.

use thiserror::Error;
use super::categories::*;
use crate::transport::TransportError;

/// Result type alias for stream decoding operations.
pub type StreamResult<T> = Result<T, StreamError>;

/// Top-level error type for a decoding session.
///
/// Malformed envelope fragments never surface here; they are handled inside
/// the decoder. Only configuration, transport and byte-level decoding
/// problems reach the caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StreamError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Response error: {0}")]
    Response(#[from] ResponseError),
}

impl StreamError {
    /// Returns true if reissuing the request could succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            StreamError::Transport(TransportError::Timeout)
                | StreamError::Transport(TransportError::Connection(_))
        )
    }

    /// Render the single error line shown after any partial text.
    pub fn user_message(&self, prefix: &str) -> String {
        let detail = match self {
            StreamError::Transport(e) => e.to_string(),
            StreamError::Response(e) => e.to_string(),
            StreamError::Configuration(e) => e.to_string(),
        };
        format!("{} {}", prefix, detail)
    }
}
