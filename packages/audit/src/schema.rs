//! Structured audit schema and validation.
//!
//! The structuring and insight collaborators are nondeterministic; every
//! response is untrusted input. Serde deserialization enforces types and
//! enum membership, and the explicit `validate` pass enforces the
//! sequence constraints serde cannot express. Nothing downstream of the
//! pipeline sees a record that has not passed through here.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{AuditError, Result};

/// Maximum number of ranked products in a structured record.
pub const MAX_TOP_PRODUCTS: usize = 5;

/// Number of strategic insights a finished report must carry.
pub const INSIGHT_COUNT: usize = 3;

/// Confidence in the detected marketplace presence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum ConfidenceLevel {
    High,
    Medium,
    Low,
}

impl ConfidenceLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfidenceLevel::High => "High",
            ConfidenceLevel::Medium => "Medium",
            ConfidenceLevel::Low => "Low",
        }
    }
}

/// A single ranked product listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Product {
    pub name: String,
    pub price: String,
    pub rating: String,
    pub url: String,
}

/// Validated output of the extraction step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct StructuredRecord {
    pub amazon_presence: bool,
    pub confidence_level: ConfidenceLevel,
    pub primary_category: String,
    pub estimated_product_count: String,
    /// Ranked best-first; at most [`MAX_TOP_PRODUCTS`] entries.
    pub top_products: Vec<Product>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ranking_data: Option<String>,
}

impl StructuredRecord {
    /// Enforce the constraints serde cannot: product list length.
    ///
    /// `top_products` is conventionally empty when `amazon_presence` is
    /// false; that is a caller convention, not checked here.
    pub fn validate(&self) -> Result<()> {
        if self.top_products.len() > MAX_TOP_PRODUCTS {
            return Err(AuditError::schema_violation(
                "top_products",
                format!(
                    "at most {MAX_TOP_PRODUCTS} products allowed, got {}",
                    self.top_products.len()
                ),
            ));
        }
        Ok(())
    }
}

/// Icon attached to a strategic insight.
///
/// Lightbulb marks opportunities, TrendingUp growth moves, AlertCircle
/// warnings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum InsightIcon {
    Lightbulb,
    TrendingUp,
    AlertCircle,
}

/// One strategic insight derived from the structured record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Insight {
    pub title: String,
    pub content: String,
    pub icon: InsightIcon,
}

/// Extraction record augmented with exactly three strategic insights.
///
/// Serializes flat: insight fields sit alongside the record fields on
/// the wire, matching the result frame payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AuditReport {
    #[serde(flatten)]
    pub record: StructuredRecord,
    pub strategic_insights: Vec<Insight>,
}

impl AuditReport {
    /// Record constraints plus the exactly-three-insights rule.
    pub fn validate(&self) -> Result<()> {
        self.record.validate()?;
        if self.strategic_insights.len() != INSIGHT_COUNT {
            return Err(AuditError::schema_violation(
                "strategic_insights",
                format!(
                    "exactly {INSIGHT_COUNT} insights required, got {}",
                    self.strategic_insights.len()
                ),
            ));
        }
        Ok(())
    }
}

/// Parse and validate collaborator output against [`StructuredRecord`].
pub fn parse_structured_record(json: &str) -> Result<StructuredRecord> {
    let record: StructuredRecord =
        serde_json::from_str(json).map_err(|err| AuditError::SchemaViolation {
            field: "structured_record".into(),
            constraint: err.to_string(),
        })?;
    record.validate()?;
    Ok(record)
}

/// Parse and validate collaborator output against [`AuditReport`].
pub fn parse_audit_report(json: &str) -> Result<AuditReport> {
    let report: AuditReport =
        serde_json::from_str(json).map_err(|err| AuditError::SchemaViolation {
            field: "audit_report".into(),
            constraint: err.to_string(),
        })?;
    report.validate()?;
    Ok(report)
}
