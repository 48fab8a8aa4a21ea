//! Delta and session bookkeeping types.

use serde::Serialize;

/// Plain-text fragment extracted from one envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextDelta {
    /// Zero-based position in the session's emission order.
    pub index: u64,
    /// The fragment.
    pub text: String,
}

impl TextDelta {
    /// Create a delta.
    pub fn new(index: u64, text: impl Into<String>) -> Self {
        Self { index, text: text.into() }
    }
}

/// Wire shape of the response body, as first observed in a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FramingMode {
    /// Nothing but whitespace seen yet.
    #[default]
    Unknown,
    /// A JSON array of envelopes.
    Array,
    /// Back-to-back bare envelope objects.
    ObjectStream,
}

/// Counters describing one decoding session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DecoderStats {
    /// Chunks fed.
    pub chunks: u64,
    /// Text bytes fed.
    pub bytes: u64,
    /// Top-level values parsed successfully.
    pub envelopes: u64,
    /// Deltas emitted.
    pub deltas: u64,
    /// Fragments discarded as malformed or oversized.
    pub dropped_fragments: u64,
    /// Arrays closed by a top-level `]`.
    pub arrays_closed: u64,
}
