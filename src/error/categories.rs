//! Error category types for granular error handling.

use thiserror::Error;

/// Configuration-related errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("Fallback message must not be empty")]
    EmptyFallbackMessage,

    #[error("Invalid buffer limit: {value}")]
    InvalidBufferLimit { value: String },

    #[error("Invalid configuration: {message}")]
    InvalidConfiguration { message: String },
}

/// Errors raised while turning the response body into text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResponseError {
    #[error("Invalid UTF-8 in stream at byte offset {offset}")]
    InvalidUtf8 { offset: u64 },
}
