//! Core types for the stream decoder.

pub mod delta;
pub mod envelope;

pub use delta::{DecoderStats, FramingMode, TextDelta};
pub use envelope::{Envelope, EnvelopeCandidate, EnvelopeContent, EnvelopePart};
