//! Tests for IncrementalResponseStream.

use crate::tests::utils::computers_operation;
use crate::tests::utils::path;
use crate::IncrementalError;
use crate::IncrementalMerger;
use crate::IncrementalResponseStream;
use crate::ScalarAdapterRegistry;
use crate::Value;
use futures::stream;
use futures::StreamExt;
use libgraphql_json::JsonObject;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::sync::Arc;

fn merger() -> IncrementalMerger {
    IncrementalMerger::new(
        Arc::new(computers_operation()),
        Arc::new(ScalarAdapterRegistry::empty()),
        JsonObject::new(),
    )
}

fn multipart(parts: &[&str], close: bool) -> Vec<u8> {
    let mut body = String::new();
    for part in parts {
        body.push_str("\r\n---\r\nContent-Type: application/json\r\n\r\n");
        body.push_str(part);
    }
    body.push_str(if close { "\r\n-----\r\n" } else { "\r\n" });
    body.into_bytes()
}

fn chunked(body: Vec<u8>, chunk_size: usize) -> Vec<Result<Vec<u8>, std::io::Error>> {
    body.chunks(chunk_size).map(|chunk| Ok(chunk.to_vec())).collect()
}

const INITIAL: &str = r#"{"data":{"computers":[{"__typename":"Computer","id":"Computer1"}]},"hasNext":true}"#;
const PATCH: &str = r#"{"incremental":[{"data":{"cpu":"386"},"path":["computers",0]}],"hasNext":false}"#;

/// Verifies one emitted response per payload, across arbitrary chunking.
#[tokio::test]
async fn test_one_response_per_payload() {
    let body = multipart(&[INITIAL, PATCH], true);
    let responses: Vec<_> = IncrementalResponseStream::new(stream::iter(chunked(body, 5)), merger())
        .collect()
        .await;

    assert_eq!(responses.len(), 2);
    let cpu = path(r#"["computers", 0, "cpu"]"#);
    let first = responses[0].as_ref().unwrap();
    assert!(first.has_next);
    assert_eq!(first.data.as_ref().unwrap().pointer(&cpu), Some(&Value::Null));
    let second = responses[1].as_ref().unwrap();
    assert!(!second.has_next);
    assert_eq!(second.data.as_ref().unwrap().pointer(&cpu), Some(&Value::from("386")));
}

/// Verifies that nothing is read from the source before the first poll,
/// and that dropping the stream drops the source.
#[tokio::test]
async fn test_stream_is_cold() {
    let polls = Arc::new(AtomicUsize::new(0));
    let counted = polls.clone();
    let source = stream::iter(chunked(multipart(&[INITIAL, PATCH], true), 16)).inspect(move |_| {
        counted.fetch_add(1, Ordering::SeqCst);
    });

    let mut responses = IncrementalResponseStream::new(source, merger());
    assert_eq!(polls.load(Ordering::SeqCst), 0);

    let first = responses.next().await.unwrap().unwrap();
    assert!(first.has_next);
    let read = polls.load(Ordering::SeqCst);
    assert!(read > 0);

    drop(responses);
    assert_eq!(polls.load(Ordering::SeqCst), read);
    assert_eq!(Arc::strong_count(&polls), 1);
}

/// Verifies that the stream ends right after the final payload, ignoring
/// anything the source still has.
#[tokio::test]
async fn test_stream_ends_after_final_payload() {
    let trailing = r#"{"incremental":[],"hasNext":false}"#;
    let body = multipart(&[INITIAL, PATCH, trailing], true);
    let responses: Vec<_> = IncrementalResponseStream::new(stream::iter(chunked(body, 64)), merger())
        .collect()
        .await;
    assert_eq!(responses.len(), 2);
    assert!(responses.iter().all(Result::is_ok));
}

/// Verifies that a source that ends before the final payload is an error.
#[tokio::test]
async fn test_source_ends_early() {
    let body = multipart(&[INITIAL], false);
    let mut responses = IncrementalResponseStream::new(stream::iter(chunked(body, 8)), merger());
    assert!(responses.next().await.unwrap().is_ok());
    assert!(matches!(
        responses.next().await.unwrap().unwrap_err(),
        IncrementalError::StreamEndedEarly,
    ));
    assert!(responses.next().await.is_none());
}

/// Verifies that a transport failure ends the stream with that failure.
#[tokio::test]
async fn test_transport_error() {
    let mut body = multipart(&[INITIAL], false);
    body.extend_from_slice(b"---\r\n");
    let mut chunks = chunked(body, 1024);
    chunks.push(Err(std::io::Error::other("connection reset")));
    let mut responses = IncrementalResponseStream::new(stream::iter(chunks), merger());
    assert!(responses.next().await.unwrap().is_ok());
    let err = responses.next().await.unwrap().unwrap_err();
    assert!(matches!(&err, IncrementalError::Transport(source) if source.to_string() == "connection reset"));
    assert!(responses.next().await.is_none());
}

/// Verifies that a fatal merge error ends the stream.
#[tokio::test]
async fn test_merge_error_ends_stream() {
    let bad_patch = r#"{"incremental":[{"data":{"cpu":"386"},"path":["computers",3]}],"hasNext":true}"#;
    let body = multipart(&[INITIAL, bad_patch, PATCH], true);
    let responses: Vec<_> = IncrementalResponseStream::new(stream::iter(chunked(body, 32)), merger())
        .collect()
        .await;
    assert_eq!(responses.len(), 2);
    assert!(matches!(
        responses[1].as_ref().unwrap_err(),
        IncrementalError::UnresolvablePath { .. },
    ));
}

/// Verifies that a custom boundary is honored.
#[tokio::test]
async fn test_custom_boundary() {
    let body = format!(
        "--graphql\r\ncontent-type: application/json\r\n\r\n{INITIAL}\r\n--graphql\r\ncontent-type: application/json\r\n\r\n{PATCH}\r\n--graphql--\r\n",
    );
    let chunks = vec![Ok::<_, std::io::Error>(body.into_bytes())];
    let responses: Vec<_> = IncrementalResponseStream::new(stream::iter(chunks), merger())
        .with_boundary("graphql")
        .collect()
        .await;
    assert_eq!(responses.len(), 2);
    assert!(responses.iter().all(Result::is_ok));
}
