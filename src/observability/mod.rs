//! Observability layer for the stream decoder.
//!
//! Logging goes through the [`Logger`] trait so sessions can be run with
//! the tracing-backed [`StructuredLogger`] or silently with [`NoopLogger`].
//!
//! ```rust
//! use integrations_gemini_stream::observability::{Logger, StructuredLogger};
//! use integrations_gemini_stream::config::LogLevel;
//! use serde_json::json;
//!
//! let logger = StructuredLogger::new("gemini.stream")
//!     .with_level(LogLevel::Debug);
//!
//! logger.info("Session started", json!({ "session_id": "abc" }));
//! ```

pub mod logging;

pub use logging::{Logger, NoopLogger, StructuredLogger};
