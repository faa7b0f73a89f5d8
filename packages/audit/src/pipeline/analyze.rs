//! Analysis step: strategic insights over the structured record.

use crate::error::Result;
use crate::pipeline::extract::ExtractOutput;
use crate::schema::AuditReport;
use crate::traits::ai::AI;

/// Run the analysis step over the extraction output.
///
/// Fails on collaborator error or when the report does not carry exactly
/// three insights; partial insights never surface.
pub async fn run_analyze(ai: &dyn AI, extract: &ExtractOutput) -> Result<AuditReport> {
    tracing::info!(brand = %extract.brand_name, "generating strategic insights");

    let report = ai.analyze(&extract.brand_name, &extract.record).await?;
    report.validate()?;

    Ok(report)
}
