//! Brand Marketplace Audit Pipeline
//!
//! A two-step streamed audit of a brand's Amazon presence: extraction
//! (brand inference, marketplace search, structuring) followed by
//! analysis (strategic insight generation). The orchestrator exposes
//! each run as an ordered event stream that transports can drain to a
//! client.
//!
//! # Design
//!
//! - Collaborators (search provider, LLM) sit behind traits; their
//!   output is untrusted until it passes the schema validator.
//! - Step results flow as explicit values, not shared mutable state.
//! - Events and wire frames are closed tagged enums handled
//!   exhaustively on both ends.
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use audit::{AuditWorkflow, SerpApiSearcher};
//!
//! let workflow = AuditWorkflow::new(ai, Arc::new(SerpApiSearcher::new(key)));
//! let mut handle = workflow.create_run("patagonia.com");
//! while let Some(event) = handle.events.recv().await {
//!     // forward to the client; a terminal event ends the stream
//! }
//! ```
//!
//! # Modules
//!
//! - [`traits`] - Collaborator abstractions (AI, MarketSearcher)
//! - [`schema`] - Structured record, report, and validation
//! - [`pipeline`] - Steps, orchestrator, and prompts
//! - [`protocol`] - Wire frames for the server-to-client stream
//! - [`domain`] - Hostname validation and normalization
//! - [`testing`] - Mock implementations for testing

pub mod domain;
pub mod error;
pub mod pipeline;
pub mod protocol;
pub mod schema;
pub mod testing;
pub mod traits;

// Re-export core types at crate root
pub use error::{AuditError, Result};
pub use protocol::{StreamFrame, StreamPhase};
pub use schema::{
    parse_audit_report, parse_structured_record, AuditReport, ConfidenceLevel, Insight,
    InsightIcon, Product, StructuredRecord, INSIGHT_COUNT, MAX_TOP_PRODUCTS,
};
pub use traits::{
    ai::AI,
    searcher::{MarketSearcher, MockMarketSearcher, SearchHit, SerpApiSearcher},
};

// Re-export pipeline components
pub use pipeline::{
    run_analyze, run_extract, AuditWorkflow, ExtractOutput, Run, RunHandle, RunPhase, StepId,
    StepOutput, WorkflowEvent,
};

// Re-export domain validation
pub use domain::{normalize_domain, validate_domain};

// Re-export testing utilities
pub use testing::MockAI;
