//! Configuration types for the stream decoder.

use crate::error::{ConfigurationError, StreamError};

/// Text returned by `finish` when a session produced no content.
pub const DEFAULT_FALLBACK_MESSAGE: &str = "Sorry, I couldn't generate a response.";

/// Prefix of the error line appended after partial text on transport failure.
pub const DEFAULT_ERROR_PREFIX: &str = "Error: Could not connect to the AI service.";

/// Default upper bound for an unterminated fragment (8 MiB).
pub const DEFAULT_MAX_BUFFER_BYTES: usize = 8 * 1024 * 1024;

/// Log level for the decoder.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// Error level - only errors.
    Error,
    /// Warning level - errors and warnings.
    Warn,
    /// Info level - general information.
    #[default]
    Info,
    /// Debug level - detailed information.
    Debug,
    /// Trace level - very detailed information.
    Trace,
}

impl LogLevel {
    fn rank(self) -> u8 {
        match self {
            LogLevel::Error => 0,
            LogLevel::Warn => 1,
            LogLevel::Info => 2,
            LogLevel::Debug => 3,
            LogLevel::Trace => 4,
        }
    }

    /// Returns true if an event at `level` passes this minimum level.
    pub fn allows(self, level: LogLevel) -> bool {
        level.rank() <= self.rank()
    }
}

/// Configuration for a decoding session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecoderConfig {
    /// Returned by `finish` when no delta was produced.
    pub fallback_message: String,
    /// Prefix of the user-visible transport error line.
    pub error_prefix: String,
    /// Largest unterminated fragment kept before it is discarded.
    pub max_buffer_bytes: usize,
    /// Replace invalid UTF-8 with U+FFFD. When false, a chunk containing an
    /// invalid sequence is rejected whole.
    pub lossy_utf8: bool,
    /// Log level.
    pub log_level: LogLevel,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            fallback_message: DEFAULT_FALLBACK_MESSAGE.to_string(),
            error_prefix: DEFAULT_ERROR_PREFIX.to_string(),
            max_buffer_bytes: DEFAULT_MAX_BUFFER_BYTES,
            lossy_utf8: true,
            log_level: LogLevel::Info,
        }
    }
}

impl DecoderConfig {
    /// Create a new configuration builder.
    pub fn builder() -> DecoderConfigBuilder {
        DecoderConfigBuilder::default()
    }

    /// Create configuration from environment variables.
    ///
    /// Unset variables fall back to the defaults; set but unparsable values
    /// are rejected.
    pub fn from_env() -> Result<Self, StreamError> {
        let mut builder = Self::builder();

        if let Ok(message) = std::env::var("GEMINI_STREAM_FALLBACK_MESSAGE") {
            builder = builder.fallback_message(message);
        }

        if let Ok(prefix) = std::env::var("GEMINI_STREAM_ERROR_PREFIX") {
            builder = builder.error_prefix(prefix);
        }

        if let Ok(raw) = std::env::var("GEMINI_STREAM_MAX_BUFFER_BYTES") {
            let value = raw
                .trim()
                .parse::<usize>()
                .map_err(|_| ConfigurationError::InvalidBufferLimit { value: raw.clone() })?;
            builder = builder.max_buffer_bytes(value);
        }

        if let Ok(raw) = std::env::var("GEMINI_STREAM_LOSSY_UTF8") {
            let lossy = match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" => false,
                _ => {
                    return Err(ConfigurationError::InvalidConfiguration {
                        message: format!("GEMINI_STREAM_LOSSY_UTF8 must be a boolean, got '{}'", raw),
                    }
                    .into())
                }
            };
            builder = builder.lossy_utf8(lossy);
        }

        builder.build()
    }
}

/// Builder for DecoderConfig.
#[derive(Default)]
pub struct DecoderConfigBuilder {
    fallback_message: Option<String>,
    error_prefix: Option<String>,
    max_buffer_bytes: Option<usize>,
    lossy_utf8: Option<bool>,
    log_level: Option<LogLevel>,
}

impl DecoderConfigBuilder {
    /// Set the text returned for an empty response.
    pub fn fallback_message(mut self, message: impl Into<String>) -> Self {
        self.fallback_message = Some(message.into());
        self
    }

    /// Set the prefix of the transport error line.
    pub fn error_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.error_prefix = Some(prefix.into());
        self
    }

    /// Set the largest unterminated fragment kept in the buffer.
    pub fn max_buffer_bytes(mut self, limit: usize) -> Self {
        self.max_buffer_bytes = Some(limit);
        self
    }

    /// Choose between lossy and strict UTF-8 decoding.
    pub fn lossy_utf8(mut self, lossy: bool) -> Self {
        self.lossy_utf8 = Some(lossy);
        self
    }

    /// Set the log level.
    pub fn log_level(mut self, level: LogLevel) -> Self {
        self.log_level = Some(level);
        self
    }

    /// Build the configuration.
    pub fn build(self) -> Result<DecoderConfig, StreamError> {
        let defaults = DecoderConfig::default();

        let fallback_message = self.fallback_message.unwrap_or(defaults.fallback_message);
        if fallback_message.is_empty() {
            return Err(ConfigurationError::EmptyFallbackMessage.into());
        }

        let max_buffer_bytes = self.max_buffer_bytes.unwrap_or(defaults.max_buffer_bytes);
        if max_buffer_bytes == 0 {
            return Err(ConfigurationError::InvalidBufferLimit {
                value: max_buffer_bytes.to_string(),
            }
            .into());
        }

        Ok(DecoderConfig {
            fallback_message,
            error_prefix: self.error_prefix.unwrap_or(defaults.error_prefix),
            max_buffer_bytes,
            lossy_utf8: self.lossy_utf8.unwrap_or(defaults.lossy_utf8),
            log_level: self.log_level.unwrap_or(defaults.log_level),
        })
    }
}
