//! Testing utilities including mock implementations.
//!
//! Useful for testing pipeline logic without real LLM or search calls.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::error::{AuditError, Result};
use crate::schema::{
    AuditReport, ConfidenceLevel, Insight, InsightIcon, Product, StructuredRecord,
};
use crate::traits::ai::AI;
use crate::traits::searcher::SearchHit;

/// A mock AI implementation for testing.
///
/// Returns deterministic, configurable responses for every operation and
/// records calls for assertions.
#[derive(Default)]
pub struct MockAI {
    /// Predefined brand names by domain
    brands: Arc<RwLock<HashMap<String, String>>>,

    /// Predefined structured records by brand
    records: Arc<RwLock<HashMap<String, StructuredRecord>>>,

    /// Predefined reports by brand
    reports: Arc<RwLock<HashMap<String, AuditReport>>>,

    infer_error: Option<String>,
    structure_error: Option<String>,
    analyze_error: Option<String>,

    /// Call tracking for assertions
    calls: Arc<RwLock<Vec<MockAICall>>>,
}

/// Record of a call made to the mock AI.
#[derive(Debug, Clone, PartialEq)]
pub enum MockAICall {
    InferBrand { domain: String },
    Structure { brand: String, hit_count: usize },
    Analyze { brand: String },
}

impl MockAI {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a predefined brand for a domain.
    pub fn with_brand(self, domain: impl Into<String>, brand: impl Into<String>) -> Self {
        self.brands
            .write()
            .unwrap()
            .insert(domain.into(), brand.into());
        self
    }

    /// Add a predefined structured record for a brand.
    pub fn with_record(self, brand: impl Into<String>, record: StructuredRecord) -> Self {
        self.records.write().unwrap().insert(brand.into(), record);
        self
    }

    /// Add a predefined report for a brand.
    pub fn with_report(self, brand: impl Into<String>, report: AuditReport) -> Self {
        self.reports.write().unwrap().insert(brand.into(), report);
        self
    }

    /// Make `infer_brand` fail with the given message.
    pub fn with_infer_error(mut self, message: impl Into<String>) -> Self {
        self.infer_error = Some(message.into());
        self
    }

    /// Make `structure` fail with the given message.
    pub fn with_structure_error(mut self, message: impl Into<String>) -> Self {
        self.structure_error = Some(message.into());
        self
    }

    /// Make `analyze` fail with the given message.
    pub fn with_analyze_error(mut self, message: impl Into<String>) -> Self {
        self.analyze_error = Some(message.into());
        self
    }

    /// Calls made so far, in order.
    pub fn calls(&self) -> Vec<MockAICall> {
        self.calls.read().unwrap().clone()
    }

    fn record_call(&self, call: MockAICall) {
        self.calls.write().unwrap().push(call);
    }
}

#[async_trait]
impl AI for MockAI {
    async fn infer_brand(&self, domain: &str) -> Result<String> {
        self.record_call(MockAICall::InferBrand {
            domain: domain.to_string(),
        });
        if let Some(message) = &self.infer_error {
            return Err(AuditError::collaborator_msg(message.clone()));
        }
        if let Some(brand) = self.brands.read().unwrap().get(domain) {
            return Ok(brand.clone());
        }
        // Default: capitalized first label of the hostname.
        let label = domain.split('.').next().unwrap_or(domain);
        let mut chars = label.chars();
        Ok(match chars.next() {
            Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
            None => label.to_string(),
        })
    }

    async fn structure(
        &self,
        brand: &str,
        _domain: &str,
        hits: &[SearchHit],
    ) -> Result<StructuredRecord> {
        self.record_call(MockAICall::Structure {
            brand: brand.to_string(),
            hit_count: hits.len(),
        });
        if let Some(message) = &self.structure_error {
            return Err(AuditError::collaborator_msg(message.clone()));
        }
        if let Some(record) = self.records.read().unwrap().get(brand) {
            return Ok(record.clone());
        }
        // Default: presence follows hit count; absence is a confident finding.
        Ok(StructuredRecord {
            amazon_presence: !hits.is_empty(),
            confidence_level: ConfidenceLevel::High,
            primary_category: if hits.is_empty() {
                String::new()
            } else {
                "General".to_string()
            },
            estimated_product_count: hits.len().to_string(),
            top_products: vec![],
            ranking_data: None,
        })
    }

    async fn analyze(&self, brand: &str, record: &StructuredRecord) -> Result<AuditReport> {
        self.record_call(MockAICall::Analyze {
            brand: brand.to_string(),
        });
        if let Some(message) = &self.analyze_error {
            return Err(AuditError::collaborator_msg(message.clone()));
        }
        if let Some(report) = self.reports.read().unwrap().get(brand) {
            return Ok(report.clone());
        }
        Ok(sample_report(record.clone()))
    }
}

/// A plausible structured record for tests.
pub fn sample_record(presence: bool) -> StructuredRecord {
    StructuredRecord {
        amazon_presence: presence,
        confidence_level: ConfidenceLevel::High,
        primary_category: if presence {
            "Outdoor Apparel".to_string()
        } else {
            String::new()
        },
        estimated_product_count: if presence { "120+" } else { "0" }.to_string(),
        top_products: if presence {
            vec![
                Product {
                    name: "Down Jacket".into(),
                    price: "$229.00".into(),
                    rating: "4.8".into(),
                    url: "https://amazon.com/dp/1".into(),
                },
                Product {
                    name: "Fleece Pullover".into(),
                    price: "$119.00".into(),
                    rating: "4.7".into(),
                    url: "https://amazon.com/dp/2".into(),
                },
            ]
        } else {
            vec![]
        },
        ranking_data: None,
    }
}

/// A report wrapping `record` with one insight per icon category.
pub fn sample_report(record: StructuredRecord) -> AuditReport {
    AuditReport {
        record,
        strategic_insights: vec![
            Insight {
                title: "Catalog whitespace".into(),
                content: "Adjacent categories are underserved.".into(),
                icon: InsightIcon::Lightbulb,
            },
            Insight {
                title: "Pricing headroom".into(),
                content: "Top listings undercut the brand's own store.".into(),
                icon: InsightIcon::TrendingUp,
            },
            Insight {
                title: "Reseller risk".into(),
                content: "Unauthorized sellers rank above official listings.".into(),
                icon: InsightIcon::AlertCircle,
            },
        ],
    }
}
