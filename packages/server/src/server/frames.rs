//! Mapping from orchestrator events onto wire frames.
//!
//! The transport guarantees: an immediate status acknowledgment, phase
//! notices for each step start, and exactly one terminal frame (result
//! or error) after which the stream ends.

use async_stream::stream;
use futures::Stream;

use audit::{RunHandle, StepId, StepOutput, StreamFrame, StreamPhase, WorkflowEvent};

/// Translate one orchestrator event into its wire frame.
///
/// The extract result produces no client-visible frame; the client only
/// sees the final combined payload.
pub fn frame_for_event(event: &WorkflowEvent) -> Option<StreamFrame> {
    match event {
        WorkflowEvent::StepStart {
            step: StepId::Extract,
        } => Some(StreamFrame::Phase {
            phase: StreamPhase::Extracting,
            message: "Initiating data extraction from Amazon...".into(),
        }),
        WorkflowEvent::StepStart {
            step: StepId::Analyze,
        } => Some(StreamFrame::Phase {
            phase: StreamPhase::Analyzing,
            message: "Handing off to AI for strategic analysis...".into(),
        }),
        WorkflowEvent::StepResult {
            output: StepOutput::Extract(_),
            ..
        } => None,
        WorkflowEvent::StepResult {
            output: StepOutput::Analyze(report),
            ..
        } => Some(StreamFrame::Result {
            data: report.clone(),
        }),
        WorkflowEvent::StepError { message, .. } => Some(StreamFrame::Error {
            error: message.clone(),
        }),
    }
}

/// Drain a run into an ordered frame stream.
///
/// Emits the status acknowledgment first, then mapped run events until a
/// terminal frame. A run stream that closes without one (which the
/// orchestrator never does) is reported as an error frame so the client
/// always observes a terminal event.
pub fn run_frames(handle: RunHandle) -> impl Stream<Item = StreamFrame> + Send {
    stream! {
        yield StreamFrame::Status {
            message: "Workflow initialized".into(),
        };

        let mut events = handle.events;
        let mut terminal_sent = false;
        while let Some(event) = events.recv().await {
            let Some(frame) = frame_for_event(&event) else {
                continue;
            };
            let is_terminal = frame.is_terminal();
            yield frame;
            if is_terminal {
                terminal_sent = true;
                break;
            }
        }

        if !terminal_sent {
            yield StreamFrame::Error {
                error: "workflow stream ended unexpectedly".into(),
            };
        }
    }
}
