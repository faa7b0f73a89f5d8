//! Application setup and router configuration.

use std::sync::Arc;

use axum::http::header::CONTENT_TYPE;
use axum::http::Method;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use audit::{AuditWorkflow, MarketSearcher, AI};

use super::routes::{analyze_handler, extract_handler, health_handler, workflow_handler};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub workflow: Arc<AuditWorkflow>,
    pub ai: Arc<dyn AI>,
    pub searcher: Arc<dyn MarketSearcher>,
}

/// Build the Axum application router
pub fn build_app(ai: Arc<dyn AI>, searcher: Arc<dyn MarketSearcher>) -> Router {
    let state = AppState {
        workflow: Arc::new(AuditWorkflow::new(ai.clone(), searcher.clone())),
        ai,
        searcher,
    };

    // CORS configuration - allow any origin for development
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE]);

    Router::new()
        .route("/api/chat/workflow", post(workflow_handler))
        .route("/api/chat/extract", post(extract_handler))
        .route("/api/chat/analyze", post(analyze_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
