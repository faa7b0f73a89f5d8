use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub openai_api_key: String,
    pub serpapi_api_key: String,
    pub extractor_model: String,
    pub analyst_model: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            openai_api_key: env::var("OPENAI_API_KEY")
                .context("OPENAI_API_KEY must be set")?,
            serpapi_api_key: env::var("SERPAPI_API_KEY")
                .context("SERPAPI_API_KEY must be set")?,
            extractor_model: env::var("AUDIT_EXTRACTOR_MODEL")
                .unwrap_or_else(|_| "gpt-4o-mini".to_string()),
            analyst_model: env::var("AUDIT_ANALYST_MODEL")
                .unwrap_or_else(|_| "gpt-4o".to_string()),
        })
    }
}
