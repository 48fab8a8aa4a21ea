//! Incremental UTF-8 decoding of body chunks.
//!
//! Network chunks may end in the middle of a multi-byte sequence. The
//! incomplete tail is held back and completed by the next chunk.

use crate::error::ResponseError;

/// Stateful UTF-8 decoder for a chunked byte stream.
#[derive(Debug, Default)]
pub struct Utf8ChunkDecoder {
    pending: Vec<u8>,
    consumed: u64,
}

impl Utf8ChunkDecoder {
    /// Create a decoder with no pending bytes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode `chunk`, joined to any tail held back from the previous call.
    ///
    /// With `lossy` set, invalid sequences become U+FFFD. Otherwise the first
    /// invalid sequence is reported and the decoder state is left as it was
    /// before the call.
    pub fn decode(&mut self, chunk: &[u8], lossy: bool) -> Result<String, ResponseError> {
        let mut bytes = Vec::with_capacity(self.pending.len() + chunk.len());
        bytes.extend_from_slice(&self.pending);
        bytes.extend_from_slice(chunk);

        let mut text = String::with_capacity(bytes.len());
        let mut rest: &[u8] = &bytes;
        let mut offset = 0usize;

        let pending = loop {
            match std::str::from_utf8(rest) {
                Ok(valid) => {
                    text.push_str(valid);
                    break Vec::new();
                }
                Err(e) => {
                    let (valid, after) = rest.split_at(e.valid_up_to());
                    // `valid_up_to` marks a verified prefix.
                    text.push_str(&String::from_utf8_lossy(valid));
                    offset += valid.len();

                    match e.error_len() {
                        None => break after.to_vec(),
                        Some(invalid_len) => {
                            if !lossy {
                                return Err(ResponseError::InvalidUtf8 {
                                    offset: self.consumed + offset as u64,
                                });
                            }
                            text.push(char::REPLACEMENT_CHARACTER);
                            rest = &after[invalid_len..];
                            offset += invalid_len;
                        }
                    }
                }
            }
        };

        self.consumed += (bytes.len() - pending.len()) as u64;
        self.pending = pending;
        Ok(text)
    }

    /// Number of bytes held back awaiting the rest of a sequence.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}
