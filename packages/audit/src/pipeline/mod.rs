//! Audit pipeline - the core of the library.
//!
//! The pipeline sequences two steps over a run:
//! - Extraction: brand inference, marketplace search, structuring
//! - Analysis: strategic insight generation over the structured record
//!
//! The orchestrator exposes each run as a subscribable event stream; a
//! terminal event (analyze result or any step error) ends the stream.

pub mod analyze;
pub mod extract;
pub mod prompts;
pub mod workflow;

pub use analyze::run_analyze;
pub use extract::{run_extract, ExtractOutput};
pub use prompts::{
    format_analyze_prompt, format_brand_prompt, format_structure_prompt, ANALYST_SYSTEM_PROMPT,
    BRAND_SYSTEM_PROMPT, EXTRACTOR_SYSTEM_PROMPT,
};
pub use workflow::{
    AuditWorkflow, Run, RunHandle, RunPhase, StepId, StepOutput, WorkflowEvent,
};
