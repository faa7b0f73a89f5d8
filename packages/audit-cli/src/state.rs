//! Client pipeline state machine.
//!
//! A pure reducer over `(state, event)`, independent of any rendering so
//! the transitions are testable on their own. The run `generation`
//! counter is the stale-stream guard: a reset or resubmission bumps it,
//! and frames tagged with an older generation are ignored, so late
//! events from an abandoned stream can never repopulate cleared state.

use audit::{AuditReport, StreamFrame, StreamPhase};

/// Client-visible phase of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Extracting,
    Analyzing,
    Complete,
    Error,
}

impl Phase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::Complete | Phase::Error)
    }
}

impl From<StreamPhase> for Phase {
    fn from(phase: StreamPhase) -> Self {
        match phase {
            StreamPhase::Extracting => Phase::Extracting,
            StreamPhase::Analyzing => Phase::Analyzing,
        }
    }
}

/// The whole of the client's run state.
#[derive(Debug, Clone, Default)]
pub struct PipelineState {
    pub phase: Phase,
    pub domain: String,
    /// Append-only progress log, insertion order significant.
    pub log: Vec<String>,
    pub result: Option<AuditReport>,
    /// Transient user-facing notification for the last error.
    pub notice: Option<String>,
    /// Bumped on submit and reset; frames from older generations are stale.
    pub generation: u64,
}

/// Events driving the state machine.
#[derive(Debug, Clone)]
pub enum PipelineEvent {
    /// User submitted a validated domain.
    Submit { domain: String },
    /// A frame arrived from the stream opened at `generation`.
    Frame { generation: u64, frame: StreamFrame },
    /// User asked for a new audit.
    Reset,
}

/// Pure transition function.
pub fn reduce(state: PipelineState, event: PipelineEvent) -> PipelineState {
    match event {
        PipelineEvent::Submit { domain } => PipelineState {
            phase: Phase::Extracting,
            log: vec![
                format!("Agent initialized with domain target: {domain}"),
                "Connecting to backend workflow engine...".to_string(),
            ],
            domain,
            result: None,
            notice: None,
            generation: state.generation + 1,
        },
        PipelineEvent::Frame { generation, frame } => {
            if generation != state.generation {
                // Stale subscription; the reset already invalidated it.
                return state;
            }
            apply_frame(state, frame)
        }
        PipelineEvent::Reset => PipelineState {
            generation: state.generation + 1,
            ..PipelineState::default()
        },
    }
}

fn apply_frame(mut state: PipelineState, frame: StreamFrame) -> PipelineState {
    match frame {
        StreamFrame::Status { message } => {
            state.log.push(message);
        }
        StreamFrame::Phase { phase, message } => {
            state.phase = phase.into();
            state.log.push(message);
        }
        StreamFrame::Result { data } => {
            state
                .log
                .push("Strategic report generated successfully.".to_string());
            state.result = Some(data);
            state.phase = Phase::Complete;
        }
        StreamFrame::Error { error } => {
            state.log.push(format!("Error: {error}"));
            state.notice = Some(error);
            state.phase = Phase::Error;
        }
    }
    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use audit::testing::{sample_record, sample_report};

    fn frame(state: &PipelineState, frame: StreamFrame) -> PipelineEvent {
        PipelineEvent::Frame {
            generation: state.generation,
            frame,
        }
    }

    fn submitted() -> PipelineState {
        reduce(
            PipelineState::default(),
            PipelineEvent::Submit {
                domain: "patagonia.com".into(),
            },
        )
    }

    #[test]
    fn submit_clears_and_enters_extracting() {
        let state = submitted();
        assert_eq!(state.phase, Phase::Extracting);
        assert_eq!(state.domain, "patagonia.com");
        assert!(state.result.is_none());
        assert_eq!(state.log.len(), 2);
        assert_eq!(state.generation, 1);
    }

    #[test]
    fn phases_progress_in_order_and_log_grows_monotonically() {
        let mut state = submitted();
        let mut seen = vec![state.phase];
        let mut log_len = state.log.len();

        let frames = [
            StreamFrame::Status {
                message: "Workflow initialized".into(),
            },
            StreamFrame::Phase {
                phase: StreamPhase::Extracting,
                message: "Initiating data extraction from Amazon...".into(),
            },
            StreamFrame::Phase {
                phase: StreamPhase::Analyzing,
                message: "Handing off to AI for strategic analysis...".into(),
            },
            StreamFrame::Result {
                data: sample_report(sample_record(true)),
            },
        ];
        for f in frames {
            let event = frame(&state, f);
            state = reduce(state, event);
            assert!(state.log.len() >= log_len, "log never shrinks mid-run");
            log_len = state.log.len();
            if seen.last() != Some(&state.phase) {
                seen.push(state.phase);
            }
        }

        assert_eq!(
            seen,
            vec![Phase::Extracting, Phase::Analyzing, Phase::Complete]
        );
        assert!(state.result.is_some());
    }

    #[test]
    fn result_forces_complete_regardless_of_prior_phase() {
        let state = submitted();
        // No ANALYZING notice arrived, result still wins.
        let state = reduce(
            state,
            PipelineEvent::Frame {
                generation: 1,
                frame: StreamFrame::Result {
                    data: sample_report(sample_record(false)),
                },
            },
        );
        assert_eq!(state.phase, Phase::Complete);
    }

    #[test]
    fn error_and_complete_are_mutually_exclusive() {
        let state = submitted();
        let state = reduce(
            state,
            PipelineEvent::Frame {
                generation: 1,
                frame: StreamFrame::Error {
                    error: "collaborator error: search down".into(),
                },
            },
        );
        assert_eq!(state.phase, Phase::Error);
        assert!(state.result.is_none());
        assert!(state.notice.as_deref().unwrap().contains("search down"));
        assert!(state.log.last().unwrap().starts_with("Error:"));
    }

    #[test]
    fn reset_clears_everything_atomically() {
        let mut state = submitted();
        state = reduce(
            state,
            PipelineEvent::Frame {
                generation: 1,
                frame: StreamFrame::Result {
                    data: sample_report(sample_record(true)),
                },
            },
        );

        let state = reduce(state, PipelineEvent::Reset);
        assert_eq!(state.phase, Phase::Idle);
        assert!(state.domain.is_empty());
        assert!(state.log.is_empty());
        assert!(state.result.is_none());
    }

    #[test]
    fn late_frames_from_old_run_are_ignored_after_reset() {
        let state = submitted();
        let old_generation = state.generation;

        let state = reduce(state, PipelineEvent::Reset);
        let state = reduce(
            state,
            PipelineEvent::Frame {
                generation: old_generation,
                frame: StreamFrame::Result {
                    data: sample_report(sample_record(true)),
                },
            },
        );

        // The stale result must not repopulate the cleared state.
        assert_eq!(state.phase, Phase::Idle);
        assert!(state.result.is_none());
        assert!(state.log.is_empty());
    }

    #[test]
    fn invalid_input_never_leaves_idle() {
        // Validation happens before Submit is ever dispatched; a state
        // that only sees validation failure stays untouched.
        let state = PipelineState::default();
        assert!(audit::validate_domain("not a domain").is_err());
        assert_eq!(state.phase, Phase::Idle);
        assert!(state.log.is_empty());
    }
}
