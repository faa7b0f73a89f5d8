//! Extraction step: derive the brand, search the marketplace, structure
//! the hits into a validated record.

use crate::error::{AuditError, Result};
use crate::schema::StructuredRecord;
use crate::traits::ai::AI;
use crate::traits::searcher::{MarketSearcher, SearchHit};

/// Accumulated output of the extraction step.
///
/// Passed to the analysis step as a plain data dependency; there is no
/// shared mutable run state between steps.
#[derive(Debug, Clone)]
pub struct ExtractOutput {
    pub domain: String,
    pub brand_name: String,
    pub raw_hits: Vec<SearchHit>,
    pub record: StructuredRecord,
}

/// Run the extraction step for a domain.
///
/// An empty domain fails immediately, before any collaborator call.
/// Collaborator failures and schema violations propagate unchanged; no
/// partial record is ever produced.
pub async fn run_extract(
    ai: &dyn AI,
    searcher: &dyn MarketSearcher,
    domain: &str,
) -> Result<ExtractOutput> {
    if domain.trim().is_empty() {
        return Err(AuditError::InvalidDomain {
            reason: "domain is empty".into(),
        });
    }

    let brand_name = ai.infer_brand(domain).await?;
    tracing::info!(%domain, brand = %brand_name, "searching marketplace");

    let raw_hits = searcher.search_brand(&brand_name).await?;
    tracing::debug!(hits = raw_hits.len(), "marketplace search returned");

    let record = ai.structure(&brand_name, domain, &raw_hits).await?;
    record.validate()?;

    Ok(ExtractOutput {
        domain: domain.to_string(),
        brand_name,
        raw_hits,
        record,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{sample_record, MockAI};
    use crate::traits::searcher::MockMarketSearcher;

    #[tokio::test]
    async fn empty_domain_fails_before_collaborators() {
        let ai = MockAI::new();
        let searcher = MockMarketSearcher::new();

        let err = run_extract(&ai, &searcher, "  ").await.unwrap_err();
        assert!(matches!(err, AuditError::InvalidDomain { .. }));
        assert!(ai.calls().is_empty(), "no collaborator call expected");
    }

    #[tokio::test]
    async fn happy_path_returns_validated_record() {
        let ai = MockAI::new()
            .with_brand("patagonia.com", "Patagonia")
            .with_record("Patagonia", sample_record(true));
        let searcher = MockMarketSearcher::new().with_hits(
            "Patagonia",
            vec![SearchHit::new(
                "Patagonia Jacket",
                "https://amazon.com/dp/1",
                "Official store",
            )],
        );

        let output = run_extract(&ai, &searcher, "patagonia.com").await.unwrap();
        assert_eq!(output.brand_name, "Patagonia");
        assert_eq!(output.raw_hits.len(), 1);
        assert!(output.record.amazon_presence);
    }

    #[tokio::test]
    async fn search_failure_propagates() {
        let ai = MockAI::new();
        let searcher = MockMarketSearcher::failing("search provider down");

        let err = run_extract(&ai, &searcher, "acme.com").await.unwrap_err();
        assert!(matches!(err, AuditError::Collaborator(_)));
    }

    #[tokio::test]
    async fn oversized_product_list_is_rejected() {
        let mut record = sample_record(true);
        record.top_products = (0..6)
            .map(|n| crate::schema::Product {
                name: format!("P{n}"),
                price: "$1".into(),
                rating: "4.0".into(),
                url: "https://amazon.com/dp/x".into(),
            })
            .collect();

        let ai = MockAI::new().with_record("Acme", record);
        let searcher = MockMarketSearcher::new();

        let err = run_extract(&ai, &searcher, "acme.com").await.unwrap_err();
        assert!(matches!(err, AuditError::SchemaViolation { .. }));
    }
}
