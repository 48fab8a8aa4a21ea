//! Envelope types for `streamGenerateContent` responses.
//!
//! Only the path `candidates[0].content.parts[0].text` is modelled. Every
//! level is optional so that envelopes carrying only usage metadata, safety
//! feedback or function calls simply carry no text.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One streamed increment of a model response.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    /// The candidate responses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub candidates: Option<Vec<EnvelopeCandidate>>,
}

/// A candidate within an envelope.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EnvelopeCandidate {
    /// Generated content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<EnvelopeContent>,
}

/// Content of a candidate.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct EnvelopeContent {
    /// Content parts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parts: Option<Vec<EnvelopePart>>,
}

/// A content part. Non-text parts deserialize with `text: None`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct EnvelopePart {
    /// Text of the part.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// JSON pointer to the text fragment of an envelope.
const TEXT_POINTER: &str = "/candidates/0/content/parts/0/text";

impl Envelope {
    /// Interpret a parsed JSON value as an envelope.
    ///
    /// Only the text path is read; siblings of any shape are ignored, and a
    /// value without a string at that path is an envelope without text.
    pub fn from_value(value: &Value) -> Self {
        match value.pointer(TEXT_POINTER).and_then(Value::as_str) {
            Some(text) => Self::with_text(text),
            None => Self::default(),
        }
    }

    /// Build an envelope carrying a single text part.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            candidates: Some(vec![EnvelopeCandidate {
                content: Some(EnvelopeContent {
                    parts: Some(vec![EnvelopePart { text: Some(text.into()) }]),
                }),
            }]),
        }
    }

    /// Take the text fragment at `candidates[0].content.parts[0].text`.
    ///
    /// Empty text counts as no fragment.
    pub fn into_text(self) -> Option<String> {
        self.candidates?
            .into_iter()
            .next()?
            .content?
            .parts?
            .into_iter()
            .next()?
            .text
            .filter(|text| !text.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_text() {
        let value = json!({
            "candidates": [{
                "content": { "parts": [{ "text": "Hi" }], "role": "model" },
                "finishReason": "STOP"
            }],
            "usageMetadata": { "promptTokenCount": 3, "totalTokenCount": 4 }
        });
        assert_eq!(Envelope::from_value(&value).into_text(), Some("Hi".to_string()));
    }

    #[test]
    fn test_only_first_candidate_and_part() {
        let value = json!({
            "candidates": [
                { "content": { "parts": [{ "text": "first" }, { "text": "second" }] } },
                { "content": { "parts": [{ "text": "other" }] } }
            ]
        });
        assert_eq!(Envelope::from_value(&value).into_text(), Some("first".to_string()));
    }

    #[test]
    fn test_missing_path_is_no_text() {
        let cases = [
            json!({}),
            json!({ "candidates": [] }),
            json!({ "candidates": [{ "finishReason": "SAFETY" }] }),
            json!({ "candidates": [{ "content": { "parts": [] } }] }),
            json!({ "candidates": [{ "content": { "parts": [{ "functionCall": { "name": "f" } }] } }] }),
            json!({ "candidates": [{ "content": { "parts": [{ "text": "" }] } }] }),
            json!({ "usageMetadata": { "totalTokenCount": 9 } }),
        ];
        for value in cases {
            assert_eq!(Envelope::from_value(&value).into_text(), None, "{}", value);
        }
    }

    #[test]
    fn test_unexpected_siblings_do_not_hide_text() {
        let value = json!({
            "candidates": [
                { "content": { "parts": [{ "text": "Hi" }, { "text": 7 }] }, "index": "zero" },
                "junk"
            ],
            "usageMetadata": []
        });
        assert_eq!(Envelope::from_value(&value).into_text(), Some("Hi".to_string()));
    }

    #[test]
    fn test_wrong_shape_is_no_text() {
        assert_eq!(Envelope::from_value(&json!({ "candidates": "nope" })).into_text(), None);
        assert_eq!(Envelope::from_value(&json!("text")).into_text(), None);
        assert_eq!(
            Envelope::from_value(&json!({ "candidates": [{ "content": { "parts": [{ "text": 5 }] } }] }))
                .into_text(),
            None
        );
    }

    #[test]
    fn test_with_text_serializes_to_wire_shape() {
        let wire = serde_json::to_value(Envelope::with_text("Hi")).unwrap();
        assert_eq!(wire, json!({ "candidates": [{ "content": { "parts": [{ "text": "Hi" }] } }] }));
    }
}
