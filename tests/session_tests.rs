//! Integration tests for driving a decoder from a chunk source.

use integrations_gemini_stream::fixtures::load_fixture;
use integrations_gemini_stream::mocks::{MockChunkSource, RecordingSink};
use integrations_gemini_stream::observability::NoopLogger;
use integrations_gemini_stream::streaming::{decode_stream, DeltaSink, DeltaStream, StreamOutcome};
use integrations_gemini_stream::{
    DecoderConfig, StreamDecoder, StreamError, TextDelta, TransportError, DEFAULT_FALLBACK_MESSAGE,
};
use futures::StreamExt;
use mockall::{mock, Sequence};
use pretty_assertions::assert_eq;
use std::sync::Arc;

mock! {
    Sink {}

    impl DeltaSink for Sink {
        fn on_delta(&mut self, delta: &TextDelta, accumulated: &str);
        fn on_complete(&mut self, outcome: &StreamOutcome);
    }
}

fn decoder() -> StreamDecoder {
    StreamDecoder::new().with_logger(Arc::new(NoopLogger))
}

#[tokio::test]
async fn test_sink_receives_deltas_in_order_then_completion() {
    let mut source = MockChunkSource::new()
        .chunked(load_fixture("stream/sse_response.txt").as_bytes(), 5)
        .into_stream();

    let mut sink = MockSink::new();
    let mut seq = Sequence::new();
    sink.expect_on_delta()
        .withf(|delta, accumulated| delta.index == 0 && delta.text == "Chapter one" && accumulated == "Chapter one")
        .times(1)
        .in_sequence(&mut seq)
        .return_const(());
    sink.expect_on_delta()
        .withf(|delta, accumulated| {
            delta.index == 1 && accumulated == "Chapter one covers the basics."
        })
        .times(1)
        .in_sequence(&mut seq)
        .return_const(());
    sink.expect_on_complete()
        .withf(|outcome| outcome.error.is_none() && outcome.text == "Chapter one covers the basics.")
        .times(1)
        .in_sequence(&mut seq)
        .return_const(());

    let outcome = decode_stream(&mut source, decoder(), &mut sink).await;
    assert_eq!(outcome.render(), "Chapter one covers the basics.");
    assert_eq!(outcome.stats.deltas, 2);
}

#[tokio::test]
async fn test_several_deltas_in_one_chunk_each_get_a_snapshot() {
    let mut source = MockChunkSource::new()
        .chunk(&load_fixture("stream/array_response.json"))
        .into_stream();
    let mut sink = RecordingSink::default();

    let outcome = decode_stream(&mut source, decoder(), &mut sink).await;

    assert_eq!(sink.deltas.len(), 3);
    assert_eq!(sink.snapshots[0], "Photosynthesis");
    assert_eq!(sink.snapshots[1], "Photosynthesis turns light into chemical energy.\n\n");
    assert_eq!(sink.snapshots[2], outcome.text);
    assert_eq!(sink.text(), outcome.text);
}

#[tokio::test]
async fn test_empty_body_reports_fallback() {
    let mut source = MockChunkSource::new().into_stream();
    let mut sink = RecordingSink::default();

    let outcome = decode_stream(&mut source, decoder(), &mut sink).await;

    assert!(sink.deltas.is_empty());
    assert_eq!(outcome.text, DEFAULT_FALLBACK_MESSAGE);
    assert_eq!(sink.completed.map(|o| o.render()), Some(DEFAULT_FALLBACK_MESSAGE.to_string()));
}

#[tokio::test]
async fn test_transport_failure_mid_stream() {
    let body = load_fixture("stream/array_response.json");
    let cut = body.find("## Key").unwrap();

    let mut source = MockChunkSource::new()
        .chunk(&body[..cut])
        .fail(TransportError::Body("connection closed before message completed".into()))
        .chunk(&body[cut..])
        .into_stream();
    let mut sink = RecordingSink::default();

    let outcome = decode_stream(&mut source, decoder(), &mut sink).await;

    assert!(outcome.is_partial());
    assert_eq!(outcome.text, "Photosynthesis turns light into chemical energy.\n\n");
    assert!(matches!(outcome.error, Some(StreamError::Transport(TransportError::Body(_)))));
    assert_eq!(
        outcome.render(),
        "Photosynthesis turns light into chemical energy.\n\n\n\n\
         Error: Could not connect to the AI service. \
         Body error: connection closed before message completed"
    );
    assert_eq!(sink.deltas.len(), 2);
}

#[tokio::test]
async fn test_failure_before_any_text_renders_only_error_line() {
    let config = DecoderConfig::builder().error_prefix("Error:").build().unwrap();
    let mut source = MockChunkSource::new().fail(TransportError::Timeout).into_stream();
    let mut sink = RecordingSink::default();

    let decoder = StreamDecoder::with_config(config).with_logger(Arc::new(NoopLogger));
    let outcome = decode_stream(&mut source, decoder, &mut sink).await;

    assert_eq!(outcome.text, "");
    assert_eq!(outcome.render(), "Error: Timeout");
    assert!(outcome.error.as_ref().is_some_and(StreamError::is_retryable));
}

#[tokio::test]
async fn test_strict_utf8_failure_ends_session() {
    let config = DecoderConfig::builder().lossy_utf8(false).build().unwrap();
    let mut source = MockChunkSource::new()
        .chunk(r#"{"candidates":[{"content":{"parts":[{"text":"ok"}]}}]}"#)
        .bytes(&b"\xC3\x28"[..])
        .into_stream();
    let mut sink = RecordingSink::default();

    let decoder = StreamDecoder::with_config(config).with_logger(Arc::new(NoopLogger));
    let outcome = decode_stream(&mut source, decoder, &mut sink).await;

    assert_eq!(outcome.text, "ok");
    assert!(matches!(outcome.error, Some(StreamError::Response(_))));
}

#[tokio::test]
async fn test_delta_stream_over_split_characters() {
    let body = load_fixture("stream/code_response.json");
    let source = MockChunkSource::new().chunked(body.as_bytes(), 3).into_stream();

    let deltas: Vec<TextDelta> = DeltaStream::new(source, decoder())
        .map(|result| result.unwrap())
        .collect()
        .await;

    assert_eq!(deltas.len(), 3);
    assert_eq!(deltas[2].text, " — café ☕ é");
}
