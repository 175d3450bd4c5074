//! SSE parser for streaming chat completions.
//!
//! Adapts a raw `reqwest` byte stream into text deltas. Handles partial
//! lines split across network reads, blank keep-alive lines, and the
//! `data: [DONE]` terminator.

use bytes::Bytes;
use futures::stream::Stream;
use std::pin::Pin;
use std::task::{Context, Poll};

use crate::error::OpenAIError;

/// Raw streaming chunk from the OpenAI API.
#[derive(Debug, serde::Deserialize)]
struct StreamChunkRaw {
    choices: Vec<StreamChoiceRaw>,
}

#[derive(Debug, serde::Deserialize)]
struct StreamChoiceRaw {
    delta: DeltaRaw,
}

#[derive(Debug, serde::Deserialize)]
struct DeltaRaw {
    #[serde(default)]
    content: Option<String>,
}

/// One parsed SSE event.
enum SseEvent {
    Delta(String),
    Done,
}

/// Stream of text deltas from a streaming chat completion.
///
/// Yields each delta in arrival order and ends when the API sends
/// `data: [DONE]`. Deltas may be empty (role-only chunks); consumers
/// decide whether to forward them.
pub struct CompletionStream {
    inner: Pin<Box<dyn Stream<Item = Result<Bytes, reqwest::Error>> + Send>>,
    buffer: String,
    finished: bool,
}

impl CompletionStream {
    pub(crate) fn new(
        byte_stream: impl Stream<Item = Result<Bytes, reqwest::Error>> + Send + 'static,
    ) -> Self {
        Self {
            inner: Box::pin(byte_stream),
            buffer: String::new(),
            finished: false,
        }
    }

    /// Pull the next complete SSE event out of the line buffer, if any.
    fn next_buffered_event(&mut self) -> Option<Result<SseEvent, OpenAIError>> {
        loop {
            let newline = self.buffer.find('\n')?;
            let line = self.buffer[..newline].trim().to_string();
            self.buffer.drain(..=newline);

            // Blank lines separate SSE events; "event:", "id:" etc. carry
            // nothing we need.
            let Some(data) = line.strip_prefix("data: ") else {
                continue;
            };
            let data = data.trim();

            if data == "[DONE]" {
                return Some(Ok(SseEvent::Done));
            }

            return Some(match serde_json::from_str::<StreamChunkRaw>(data) {
                Ok(raw) => {
                    let delta = raw
                        .choices
                        .into_iter()
                        .next()
                        .and_then(|c| c.delta.content)
                        .unwrap_or_default();
                    Ok(SseEvent::Delta(delta))
                }
                Err(e) => Err(OpenAIError::Parse(format!(
                    "Failed to parse stream chunk: {} (data: {})",
                    e,
                    excerpt(data)
                ))),
            });
        }
    }
}

/// First 200 characters of a payload, for error messages. Counted in
/// characters so a multibyte payload is never sliced mid-character.
fn excerpt(data: &str) -> String {
    data.chars().take(200).collect()
}

impl Stream for CompletionStream {
    type Item = Result<String, OpenAIError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();

        if this.finished {
            return Poll::Ready(None);
        }

        loop {
            match this.next_buffered_event() {
                Some(Ok(SseEvent::Delta(delta))) => return Poll::Ready(Some(Ok(delta))),
                Some(Ok(SseEvent::Done)) => {
                    this.finished = true;
                    return Poll::Ready(None);
                }
                Some(Err(e)) => return Poll::Ready(Some(Err(e))),
                None => {}
            }

            match Pin::new(&mut this.inner).poll_next(cx) {
                Poll::Ready(Some(Ok(bytes))) => match std::str::from_utf8(&bytes) {
                    Ok(text) => this.buffer.push_str(text),
                    Err(e) => {
                        this.finished = true;
                        return Poll::Ready(Some(Err(OpenAIError::Parse(format!(
                            "Invalid UTF-8 in stream: {}",
                            e
                        )))));
                    }
                },
                Poll::Ready(Some(Err(e))) => {
                    this.finished = true;
                    return Poll::Ready(Some(Err(OpenAIError::Network(e.to_string()))));
                }
                Poll::Ready(None) => {
                    // Connection closed without [DONE]; drain what we have.
                    this.finished = true;
                    if !this.buffer.ends_with('\n') {
                        this.buffer.push('\n');
                    }
                    return match this.next_buffered_event() {
                        Some(Ok(SseEvent::Delta(delta))) => Poll::Ready(Some(Ok(delta))),
                        Some(Err(e)) => Poll::Ready(Some(Err(e))),
                        _ => Poll::Ready(None),
                    };
                }
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    fn sse_stream(lines: &[&str]) -> CompletionStream {
        let chunks: Vec<Result<Bytes, reqwest::Error>> = lines
            .iter()
            .map(|line| Ok(Bytes::from(format!("{}\n", line))))
            .collect();
        CompletionStream::new(futures::stream::iter(chunks))
    }

    #[tokio::test]
    async fn test_deltas_in_order_then_end() {
        let mut stream = sse_stream(&[
            r#"data: {"choices":[{"delta":{"content":"Hello"}}]}"#,
            "",
            r#"data: {"choices":[{"delta":{"content":" world"}}]}"#,
            "",
            "data: [DONE]",
        ]);

        assert_eq!(stream.next().await.unwrap().unwrap(), "Hello");
        assert_eq!(stream.next().await.unwrap().unwrap(), " world");
        assert!(stream.next().await.is_none());
        // The stream is fused after [DONE]
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn test_delta_split_across_reads() {
        let chunks: Vec<Result<Bytes, reqwest::Error>> = vec![
            Ok(Bytes::from(r#"data: {"choices":[{"del"#)),
            Ok(Bytes::from("ta\":{\"content\":\"Hi\"}}]}\n")),
            Ok(Bytes::from("data: [DONE]\n")),
        ];
        let mut stream = CompletionStream::new(futures::stream::iter(chunks));

        assert_eq!(stream.next().await.unwrap().unwrap(), "Hi");
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn test_role_only_chunk_yields_empty_delta() {
        let mut stream = sse_stream(&[r#"data: {"choices":[{"delta":{}}]}"#, "", "data: [DONE]"]);

        assert_eq!(stream.next().await.unwrap().unwrap(), "");
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn test_malformed_chunk_is_an_error() {
        let mut stream = sse_stream(&["data: {not json}", "data: [DONE]"]);

        assert!(stream.next().await.unwrap().is_err());
    }

    #[tokio::test]
    async fn test_malformed_multibyte_chunk_is_an_error() {
        // 240 bytes of 3-byte characters; the error excerpt must cut on
        // a character boundary, not at byte 200.
        let line = format!("data: {}", "め".repeat(80));
        let mut stream = sse_stream(&[line.as_str(), "data: [DONE]"]);

        let item = stream.next().await.unwrap();
        assert!(matches!(item, Err(OpenAIError::Parse(_))));
    }

    #[tokio::test]
    async fn test_stream_without_done_marker_drains() {
        let mut stream = sse_stream(&[r#"data: {"choices":[{"delta":{"content":"tail"}}]}"#]);

        assert_eq!(stream.next().await.unwrap().unwrap(), "tail");
        assert!(stream.next().await.is_none());
    }
}
