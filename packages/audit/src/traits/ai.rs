//! AI collaborator trait for the audit pipeline.
//!
//! Implementations wrap a specific LLM provider and handle prompting and
//! response parsing. All three operations suspend on a network call and
//! may fail as a whole; no partial output is ever surfaced.

use async_trait::async_trait;

use crate::error::Result;
use crate::schema::{AuditReport, StructuredRecord};
use crate::traits::searcher::SearchHit;

/// LLM operations needed by the audit pipeline.
#[async_trait]
pub trait AI: Send + Sync {
    /// Infer the canonical brand behind a hostname.
    ///
    /// Must cope with multi-label hosts: `zambia.steers.africa` is
    /// `Steers`, not `zambia`.
    async fn infer_brand(&self, domain: &str) -> Result<String>;

    /// Structure raw marketplace search hits into a record.
    ///
    /// The returned record has passed type and enum checks; callers
    /// still run [`StructuredRecord::validate`] before trusting it.
    async fn structure(
        &self,
        brand: &str,
        domain: &str,
        hits: &[SearchHit],
    ) -> Result<StructuredRecord>;

    /// Derive strategic insights from a validated record.
    ///
    /// When `record.amazon_presence` is false the prompt steers the
    /// model toward opportunity-cost and risk framing; that is a content
    /// policy carried in the prompt, not a code branch here.
    async fn analyze(&self, brand: &str, record: &StructuredRecord) -> Result<AuditReport>;
}
