//! Marketplace search trait for brand discovery.
//!
//! Abstracts over search providers so the pipeline stays testable
//! without network access. The concrete provider is SerpApi, queried
//! with a `site:amazon.com` scoped Google search.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{AuditError, Result};

/// A raw marketplace mention returned by the search provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

impl SearchHit {
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        snippet: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            snippet: snippet.into(),
        }
    }
}

/// Marketplace search: a single request/response call per brand.
///
/// A provider-level failure is fatal to the extraction step; there is no
/// silent empty-result fallback.
#[async_trait]
pub trait MarketSearcher: Send + Sync {
    /// Search the marketplace for mentions of a brand.
    async fn search_brand(&self, brand: &str) -> Result<Vec<SearchHit>>;
}

/// Mock searcher for testing.
#[derive(Default)]
pub struct MockMarketSearcher {
    hits: RwLock<HashMap<String, Vec<SearchHit>>>,
    fail_with: Option<String>,
}

impl MockMarketSearcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add canned hits for a brand.
    pub fn with_hits(self, brand: &str, hits: Vec<SearchHit>) -> Self {
        self.hits.write().unwrap().insert(brand.to_string(), hits);
        self
    }

    /// Make every search fail with the given message.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            hits: RwLock::new(HashMap::new()),
            fail_with: Some(message.into()),
        }
    }
}

#[async_trait]
impl MarketSearcher for MockMarketSearcher {
    async fn search_brand(&self, brand: &str) -> Result<Vec<SearchHit>> {
        if let Some(message) = &self.fail_with {
            return Err(AuditError::collaborator_msg(message.clone()));
        }
        Ok(self
            .hits
            .read()
            .unwrap()
            .get(brand)
            .cloned()
            .unwrap_or_default())
    }
}

/// SerpApi-backed marketplace searcher.
///
/// Runs a Google search scoped to `site:amazon.com` for the quoted
/// brand name and maps organic results to [`SearchHit`]s.
pub struct SerpApiSearcher {
    api_key: String,
    client: reqwest::Client,
    /// Number of organic results requested per search.
    pub max_results: usize,
}

impl SerpApiSearcher {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            client: reqwest::Client::new(),
            max_results: 10,
        }
    }

    /// Set the number of results requested per search.
    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }
}

#[async_trait]
impl MarketSearcher for SerpApiSearcher {
    async fn search_brand(&self, brand: &str) -> Result<Vec<SearchHit>> {
        #[derive(Deserialize)]
        struct Response {
            #[serde(default)]
            organic_results: Vec<OrganicResult>,
        }

        #[derive(Deserialize)]
        struct OrganicResult {
            title: String,
            link: String,
            #[serde(default)]
            snippet: String,
        }

        let query = format!("site:amazon.com \"{brand}\"");
        let num = self.max_results.to_string();
        tracing::debug!(%query, "querying SerpApi");

        let response = self
            .client
            .get("https://serpapi.com/search")
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("engine", "google"),
                ("q", query.as_str()),
                ("num", num.as_str()),
            ])
            .send()
            .await
            .map_err(AuditError::collaborator)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AuditError::collaborator_msg(format!(
                "SerpApi error {status}: {body}"
            )));
        }

        let parsed: Response = response.json().await.map_err(AuditError::collaborator)?;

        Ok(parsed
            .organic_results
            .into_iter()
            .map(|r| SearchHit::new(r.title, r.link, r.snippet))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mock_returns_canned_hits() {
        let searcher = MockMarketSearcher::new().with_hits(
            "Patagonia",
            vec![SearchHit::new(
                "Patagonia Store",
                "https://amazon.com/stores/patagonia",
                "Visit the Patagonia Store",
            )],
        );

        let hits = searcher.search_brand("Patagonia").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "Patagonia Store");
    }

    #[tokio::test]
    async fn mock_returns_empty_for_unknown_brand() {
        let searcher = MockMarketSearcher::new();
        assert!(searcher.search_brand("Nobody").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn failing_mock_surfaces_collaborator_error() {
        let searcher = MockMarketSearcher::failing("quota exceeded");
        let err = searcher.search_brand("Anything").await.unwrap_err();
        assert!(matches!(err, AuditError::Collaborator(_)));
        assert!(err.to_string().contains("quota exceeded"));
    }
}
