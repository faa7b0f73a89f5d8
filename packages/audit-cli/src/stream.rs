//! SSE frame parsing for the audit event stream.
//!
//! Converts the raw response byte stream into [`StreamFrame`] values.
//! Handles partial lines and buffering. A malformed frame is logged and
//! skipped so one corrupt frame cannot kill an otherwise healthy stream;
//! non-data lines (comments, keep-alives) are ignored.

use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use futures::stream::Stream;

use audit::StreamFrame;

/// Stream adapter that yields decoded frames from SSE bytes.
pub struct FrameStream {
    inner: Pin<Box<dyn Stream<Item = Result<Bytes, reqwest::Error>> + Send>>,
    buffer: String,
    finished: bool,
}

impl FrameStream {
    pub fn new(
        byte_stream: impl Stream<Item = Result<Bytes, reqwest::Error>> + Send + 'static,
    ) -> Self {
        Self {
            inner: Box::pin(byte_stream),
            buffer: String::new(),
            finished: false,
        }
    }
}

impl Stream for FrameStream {
    type Item = StreamFrame;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();

        loop {
            if let Some(frame) = next_frame(&mut this.buffer) {
                return Poll::Ready(Some(frame));
            }
            if this.finished {
                return Poll::Ready(None);
            }

            match Pin::new(&mut this.inner).poll_next(cx) {
                Poll::Ready(Some(Ok(bytes))) => {
                    this.buffer.push_str(&String::from_utf8_lossy(&bytes));
                }
                Poll::Ready(Some(Err(err))) => {
                    tracing::warn!(error = %err, "event stream transport error");
                    this.finished = true;
                }
                Poll::Ready(None) => {
                    this.finished = true;
                    // A final line may lack its trailing newline.
                    if !this.buffer.is_empty() && !this.buffer.ends_with('\n') {
                        this.buffer.push('\n');
                    }
                }
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}

/// Pull the next complete frame out of `buffer`.
///
/// Returns `None` when no complete `data:` line is available yet.
pub(crate) fn next_frame(buffer: &mut String) -> Option<StreamFrame> {
    loop {
        let newline = buffer.find('\n')?;
        let line = buffer[..newline].trim().to_string();
        buffer.drain(..=newline);

        // Blank lines are SSE event separators.
        if line.is_empty() {
            continue;
        }

        // Only data lines carry frames; "event:", "id:", ":" keep-alive
        // comments and the like are skipped.
        let Some(data) = line.strip_prefix("data:") else {
            continue;
        };

        match serde_json::from_str::<StreamFrame>(data.trim()) {
            Ok(frame) => return Some(frame),
            Err(err) => {
                tracing::warn!(error = %err, line = %line, "skipping malformed stream frame");
                continue;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use audit::StreamPhase;

    fn parse_all(input: &str) -> Vec<StreamFrame> {
        let mut buffer = input.to_string();
        let mut frames = Vec::new();
        while let Some(frame) = next_frame(&mut buffer) {
            frames.push(frame);
        }
        frames
    }

    #[test]
    fn parses_a_complete_frame() {
        let frames = parse_all("data: {\"type\":\"status\",\"message\":\"hi\"}\n\n");
        assert_eq!(
            frames,
            vec![StreamFrame::Status {
                message: "hi".into()
            }]
        );
    }

    #[test]
    fn waits_for_complete_lines() {
        let mut buffer = "data: {\"type\":\"status\",".to_string();
        assert!(next_frame(&mut buffer).is_none());

        buffer.push_str("\"message\":\"later\"}\n");
        assert_eq!(
            next_frame(&mut buffer),
            Some(StreamFrame::Status {
                message: "later".into()
            })
        );
    }

    #[test]
    fn malformed_frame_is_skipped_not_fatal() {
        let frames = parse_all(
            "data: {not json}\n\ndata: {\"type\":\"phase\",\"phase\":\"ANALYZING\",\"message\":\"ok\"}\n\n",
        );
        assert_eq!(
            frames,
            vec![StreamFrame::Phase {
                phase: StreamPhase::Analyzing,
                message: "ok".into()
            }]
        );
    }

    #[test]
    fn non_data_lines_are_ignored() {
        let frames = parse_all(
            ": keep-alive\nevent: message\ndata: {\"type\":\"error\",\"error\":\"boom\"}\n\n",
        );
        assert_eq!(
            frames,
            vec![StreamFrame::Error {
                error: "boom".into()
            }]
        );
    }

    #[test]
    fn parses_phase_wire_names() {
        let frames = parse_all(
            "data: {\"type\":\"phase\",\"phase\":\"EXTRACTING\",\"message\":\"go\"}\n\n",
        );
        assert!(matches!(
            frames[0],
            StreamFrame::Phase {
                phase: StreamPhase::Extracting,
                ..
            }
        ));
    }

    #[test]
    fn multiple_frames_in_one_chunk() {
        let frames = parse_all(
            "data: {\"type\":\"status\",\"message\":\"a\"}\n\ndata: {\"type\":\"status\",\"message\":\"b\"}\n\n",
        );
        assert_eq!(frames.len(), 2);
    }
}
