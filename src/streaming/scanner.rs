//! Incremental structural scanner over the parse buffer.
//!
//! The scanner walks the buffer one byte at a time and remembers where it
//! stopped, so every byte of the response is examined exactly once no
//! matter how the body is sliced into chunks. It tracks string literals and
//! escape sequences, which means braces and brackets inside text never
//! affect nesting depth or framing. All structural characters are ASCII, so
//! byte offsets it reports always fall on `char` boundaries.

/// Structural events reported to the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ScanEvent {
    /// A `[` opened an array of envelopes outside any value.
    ArrayOpened,
    /// A `{` opened a bare object outside any array.
    ObjectOpened,
    /// A top-level `{` was balanced by the `}` ending at `end` (exclusive).
    ValueClosed { start: usize, end: usize },
    /// A `]` closed the current array outside any value.
    ArrayClosed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Frame {
    #[default]
    AwaitingFraming,
    InArray,
}

#[derive(Debug, Default)]
pub(crate) struct Scanner {
    pos: usize,
    frame: Frame,
    depth: usize,
    value_start: usize,
    in_string: bool,
    escape: bool,
}

impl Scanner {
    /// Advance through `input` until the next structural event.
    ///
    /// Returns `None` once all of `input` has been examined; the next call
    /// resumes at the first byte appended since.
    pub(crate) fn next_event(&mut self, input: &[u8]) -> Option<ScanEvent> {
        while self.pos < input.len() {
            let at = self.pos;
            let byte = input[at];
            self.pos += 1;

            if self.in_string {
                if self.escape {
                    self.escape = false;
                } else if byte == b'\\' {
                    self.escape = true;
                } else if byte == b'"' {
                    self.in_string = false;
                }
                continue;
            }

            if self.depth > 0 {
                match byte {
                    b'"' => self.in_string = true,
                    b'{' => self.depth += 1,
                    b'}' => {
                        self.depth -= 1;
                        if self.depth == 0 {
                            return Some(ScanEvent::ValueClosed {
                                start: self.value_start,
                                end: self.pos,
                            });
                        }
                    }
                    _ => {}
                }
                continue;
            }

            match (self.frame, byte) {
                (frame, b'{') => {
                    self.depth = 1;
                    self.value_start = at;
                    if frame == Frame::AwaitingFraming {
                        return Some(ScanEvent::ObjectOpened);
                    }
                }
                (Frame::AwaitingFraming, b'[') => {
                    self.frame = Frame::InArray;
                    return Some(ScanEvent::ArrayOpened);
                }
                (Frame::InArray, b'"') => self.in_string = true,
                (Frame::InArray, b']') => {
                    self.frame = Frame::AwaitingFraming;
                    return Some(ScanEvent::ArrayClosed);
                }
                // Separators, whitespace and SSE `data:` prefixes.
                _ => {}
            }
        }
        None
    }

    /// Resume scanning the value that just closed, as if its last `}` had
    /// not been seen.
    pub(crate) fn reopen(&mut self) {
        self.depth = 1;
    }

    /// Returns true while a top-level value is open.
    pub(crate) fn in_value(&self) -> bool {
        self.depth > 0
    }

    /// First buffer offset the scanner still needs.
    pub(crate) fn retain_from(&self) -> usize {
        if self.in_value() {
            self.value_start
        } else {
            self.pos
        }
    }

    /// Account for `count` bytes removed from the front of the buffer.
    pub(crate) fn shift(&mut self, count: usize) {
        self.pos -= count;
        if self.in_value() {
            self.value_start -= count;
        }
    }

    /// Forget all progress and wait for fresh framing.
    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn events(input: &str) -> Vec<ScanEvent> {
        let mut scanner = Scanner::default();
        std::iter::from_fn(|| scanner.next_event(input.as_bytes())).collect()
    }

    #[test]
    fn test_bare_objects() {
        assert_eq!(
            events(r#"{"a":{"b":1}} {"c":2}"#),
            vec![
                ScanEvent::ObjectOpened,
                ScanEvent::ValueClosed { start: 0, end: 13 },
                ScanEvent::ObjectOpened,
                ScanEvent::ValueClosed { start: 14, end: 21 },
            ]
        );
    }

    #[test]
    fn test_array_of_objects() {
        assert_eq!(
            events(r#"[{"a":[1]},{"b":2}]"#),
            vec![
                ScanEvent::ArrayOpened,
                ScanEvent::ValueClosed { start: 1, end: 10 },
                ScanEvent::ValueClosed { start: 11, end: 18 },
                ScanEvent::ArrayClosed,
            ]
        );
    }

    #[test]
    fn test_structural_characters_inside_strings() {
        assert_eq!(
            events(r#"{"text":"fn main() { let v = [1]; }"}"#),
            vec![ScanEvent::ObjectOpened, ScanEvent::ValueClosed { start: 0, end: 37 }]
        );
        assert_eq!(
            events(r#"["]", {"a":"}"}]"#),
            vec![
                ScanEvent::ArrayOpened,
                ScanEvent::ValueClosed { start: 6, end: 15 },
                ScanEvent::ArrayClosed,
            ]
        );
    }

    #[test]
    fn test_escaped_quotes_and_backslashes() {
        assert_eq!(
            events(r#"{"a":"say \"}\" \\"}"#),
            vec![ScanEvent::ObjectOpened, ScanEvent::ValueClosed { start: 0, end: 20 }]
        );
    }

    #[test]
    fn test_resumes_across_appends() {
        let mut scanner = Scanner::default();
        let mut buffer = String::from(r#"{"a":"x\"#);
        assert_eq!(scanner.next_event(buffer.as_bytes()), Some(ScanEvent::ObjectOpened));
        assert_eq!(scanner.next_event(buffer.as_bytes()), None);
        assert!(scanner.in_value());

        // The escape started in the first append still applies.
        buffer.push_str(r#""}"}"#);
        assert_eq!(
            scanner.next_event(buffer.as_bytes()),
            Some(ScanEvent::ValueClosed { start: 0, end: 12 })
        );
    }

    #[test]
    fn test_stray_closers_outside_values_are_ignored() {
        assert_eq!(events("} ] data: "), vec![]);
    }

    #[test]
    fn test_shift_and_retain() {
        let mut scanner = Scanner::default();
        let buffer = r#"  {"a":"#;
        while scanner.next_event(buffer.as_bytes()).is_some() {}
        assert_eq!(scanner.retain_from(), 2);

        scanner.shift(2);
        assert_eq!(scanner.retain_from(), 0);
        assert_eq!(scanner.pos, buffer.len() - 2);
    }

    #[test]
    fn test_reopen_continues_value() {
        let mut scanner = Scanner::default();
        let buffer = r#"{"a":1}}"#;
        assert_eq!(scanner.next_event(buffer.as_bytes()), Some(ScanEvent::ObjectOpened));
        assert_eq!(
            scanner.next_event(buffer.as_bytes()),
            Some(ScanEvent::ValueClosed { start: 0, end: 7 })
        );
        scanner.reopen();
        assert_eq!(
            scanner.next_event(buffer.as_bytes()),
            Some(ScanEvent::ValueClosed { start: 0, end: 8 })
        );
    }
}
