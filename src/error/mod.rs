//! Error types for the stream decoder.

mod types;
mod categories;

pub use types::*;
pub use categories::*;
