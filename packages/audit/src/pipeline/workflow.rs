//! Workflow orchestrator: the run state machine and its event stream.
//!
//! A run walks `Created -> Extracting -> Analyzing -> Complete`, or
//! drops to `Failed` from either step. Each step executes exactly once;
//! there is no retry. Subscribers drain lifecycle events from the
//! returned handle until a terminal event closes the stream.

use std::sync::Arc;

use tokio::sync::mpsc;
use uuid::Uuid;

use crate::error::AuditError;
use crate::pipeline::analyze::run_analyze;
use crate::pipeline::extract::{run_extract, ExtractOutput};
use crate::schema::AuditReport;
use crate::traits::ai::AI;
use crate::traits::searcher::MarketSearcher;

/// Pipeline step identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepId {
    Extract,
    Analyze,
}

impl StepId {
    pub fn as_str(&self) -> &'static str {
        match self {
            StepId::Extract => "extract",
            StepId::Analyze => "analyze",
        }
    }
}

/// Phases of a single run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Created,
    Extracting,
    Analyzing,
    Complete,
    Failed,
}

/// Step payloads carried by result events.
#[derive(Debug, Clone)]
pub enum StepOutput {
    Extract(ExtractOutput),
    Analyze(AuditReport),
}

/// Lifecycle events emitted by a run, in emission order.
#[derive(Debug, Clone)]
pub enum WorkflowEvent {
    StepStart { step: StepId },
    StepResult { step: StepId, output: StepOutput },
    StepError { step: StepId, message: String },
}

impl WorkflowEvent {
    /// Terminal events end the run's event stream.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            WorkflowEvent::StepError { .. }
                | WorkflowEvent::StepResult {
                    step: StepId::Analyze,
                    ..
                }
        )
    }
}

/// A single audit execution.
#[derive(Debug)]
pub struct Run {
    pub id: Uuid,
    pub domain: String,
    pub phase: RunPhase,
}

impl Run {
    fn new(domain: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            domain,
            phase: RunPhase::Created,
        }
    }

    fn advance(&mut self, next: RunPhase) {
        tracing::debug!(run = %self.id, from = ?self.phase, to = ?next, "phase transition");
        self.phase = next;
    }
}

/// Handle to a started run: its id and the subscribable event stream.
pub struct RunHandle {
    pub id: Uuid,
    pub events: mpsc::Receiver<WorkflowEvent>,
}

/// Sequences the extraction and analysis steps for one run.
pub struct AuditWorkflow {
    ai: Arc<dyn AI>,
    searcher: Arc<dyn MarketSearcher>,
}

impl AuditWorkflow {
    pub fn new(ai: Arc<dyn AI>, searcher: Arc<dyn MarketSearcher>) -> Self {
        Self { ai, searcher }
    }

    /// Start a run for `domain`.
    ///
    /// The run executes on its own task and keeps going even if the
    /// receiver is dropped mid-stream; a disconnect does not cancel
    /// in-flight collaborator calls.
    pub fn create_run(&self, domain: impl Into<String>) -> RunHandle {
        let run = Run::new(domain.into());
        let id = run.id;
        let (tx, rx) = mpsc::channel(16);
        let ai = self.ai.clone();
        let searcher = self.searcher.clone();

        tokio::spawn(async move {
            drive_run(run, ai, searcher, tx).await;
        });

        RunHandle { id, events: rx }
    }
}

async fn drive_run(
    mut run: Run,
    ai: Arc<dyn AI>,
    searcher: Arc<dyn MarketSearcher>,
    tx: mpsc::Sender<WorkflowEvent>,
) {
    run.advance(RunPhase::Extracting);
    emit(&tx, WorkflowEvent::StepStart {
        step: StepId::Extract,
    })
    .await;

    let extract = match run_extract(ai.as_ref(), searcher.as_ref(), &run.domain).await {
        Ok(output) => output,
        Err(err) => {
            fail(&mut run, &tx, StepId::Extract, err).await;
            return;
        }
    };
    emit(&tx, WorkflowEvent::StepResult {
        step: StepId::Extract,
        output: StepOutput::Extract(extract.clone()),
    })
    .await;

    run.advance(RunPhase::Analyzing);
    emit(&tx, WorkflowEvent::StepStart {
        step: StepId::Analyze,
    })
    .await;

    let report = match run_analyze(ai.as_ref(), &extract).await {
        Ok(report) => report,
        Err(err) => {
            fail(&mut run, &tx, StepId::Analyze, err).await;
            return;
        }
    };
    emit(&tx, WorkflowEvent::StepResult {
        step: StepId::Analyze,
        output: StepOutput::Analyze(report),
    })
    .await;

    run.advance(RunPhase::Complete);
    tracing::info!(run = %run.id, domain = %run.domain, "audit run complete");
}

async fn fail(run: &mut Run, tx: &mpsc::Sender<WorkflowEvent>, step: StepId, err: AuditError) {
    tracing::warn!(run = %run.id, step = step.as_str(), error = %err, "step failed");
    run.advance(RunPhase::Failed);
    emit(tx, WorkflowEvent::StepError {
        step,
        message: err.to_string(),
    })
    .await;
}

async fn emit(tx: &mpsc::Sender<WorkflowEvent>, event: WorkflowEvent) {
    if tx.send(event).await.is_err() {
        // Subscriber gone; the run finishes fire-and-forget.
        tracing::debug!("event subscriber dropped, run continues");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{sample_record, sample_report, MockAI};
    use crate::traits::searcher::{MockMarketSearcher, SearchHit};

    async fn collect_events(mut handle: RunHandle) -> Vec<WorkflowEvent> {
        let mut events = Vec::new();
        while let Some(event) = handle.events.recv().await {
            events.push(event);
        }
        events
    }

    fn happy_workflow() -> AuditWorkflow {
        let ai = MockAI::new()
            .with_brand("patagonia.com", "Patagonia")
            .with_record("Patagonia", sample_record(true))
            .with_report("Patagonia", sample_report(sample_record(true)));
        let searcher = MockMarketSearcher::new().with_hits(
            "Patagonia",
            vec![SearchHit::new(
                "Patagonia Jacket",
                "https://amazon.com/dp/1",
                "Official",
            )],
        );
        AuditWorkflow::new(Arc::new(ai), Arc::new(searcher))
    }

    #[tokio::test]
    async fn events_arrive_in_pipeline_order() {
        let handle = happy_workflow().create_run("patagonia.com");
        let events = collect_events(handle).await;

        assert_eq!(events.len(), 4);
        assert!(matches!(
            events[0],
            WorkflowEvent::StepStart {
                step: StepId::Extract
            }
        ));
        assert!(matches!(
            events[1],
            WorkflowEvent::StepResult {
                step: StepId::Extract,
                ..
            }
        ));
        assert!(matches!(
            events[2],
            WorkflowEvent::StepStart {
                step: StepId::Analyze
            }
        ));
        assert!(matches!(
            events[3],
            WorkflowEvent::StepResult {
                step: StepId::Analyze,
                ..
            }
        ));
        assert!(events[3].is_terminal());
    }

    #[tokio::test]
    async fn search_failure_emits_single_terminal_error() {
        let ai = MockAI::new();
        let searcher = MockMarketSearcher::failing("search provider down");
        let workflow = AuditWorkflow::new(Arc::new(ai), Arc::new(searcher));

        let events = collect_events(workflow.create_run("acme.com")).await;

        assert_eq!(events.len(), 2);
        assert!(matches!(
            events[0],
            WorkflowEvent::StepStart {
                step: StepId::Extract
            }
        ));
        match &events[1] {
            WorkflowEvent::StepError { step, message } => {
                assert_eq!(*step, StepId::Extract);
                assert!(message.contains("search provider down"));
            }
            other => panic!("expected step error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn analysis_failure_stops_after_analyze_error() {
        let ai = MockAI::new()
            .with_brand("acme.com", "Acme")
            .with_record("Acme", sample_record(false))
            .with_analyze_error("model overloaded");
        let workflow = AuditWorkflow::new(Arc::new(ai), Arc::new(MockMarketSearcher::new()));

        let events = collect_events(workflow.create_run("acme.com")).await;

        // extract start, extract result, analyze start, analyze error
        assert_eq!(events.len(), 4);
        assert!(matches!(
            events[3],
            WorkflowEvent::StepError {
                step: StepId::Analyze,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn empty_domain_fails_without_collaborator_calls() {
        let ai = Arc::new(MockAI::new());
        let workflow = AuditWorkflow::new(ai.clone(), Arc::new(MockMarketSearcher::new()));

        let events = collect_events(workflow.create_run("")).await;

        assert_eq!(events.len(), 2);
        assert!(matches!(events[1], WorkflowEvent::StepError { .. }));
        assert!(ai.calls().is_empty());
    }

    #[tokio::test]
    async fn run_continues_when_subscriber_drops() {
        let workflow = happy_workflow();
        let handle = workflow.create_run("patagonia.com");
        drop(handle.events);

        // Nothing to assert beyond "no panic": the spawned task must
        // tolerate a dropped receiver.
        tokio::task::yield_now().await;
    }
}
