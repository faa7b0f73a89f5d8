//! HTTP handlers: the streaming workflow endpoint plus standalone step
//! routes for exercising extraction and analysis independently.

use std::convert::Infallible;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{IntoResponse, Response};
use axum::Json;
use futures::StreamExt;
use serde::Deserialize;

use audit::{run_analyze, run_extract, ExtractOutput, StreamFrame, StructuredRecord};

use super::app::AppState;
use super::frames::run_frames;

#[derive(Debug, Deserialize)]
pub struct WorkflowRequest {
    #[serde(default)]
    pub domain: String,
}

/// `POST /api/chat/workflow` — run a full audit, streaming progress as
/// SSE frames. Exactly one terminal frame is sent, then the connection
/// closes.
pub async fn workflow_handler(
    State(state): State<AppState>,
    Json(request): Json<WorkflowRequest>,
) -> Response {
    let domain = request.domain.trim().to_string();
    if domain.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": "Domain is required"})),
        )
            .into_response();
    }

    let handle = state.workflow.create_run(&domain);
    tracing::info!(run = %handle.id, %domain, "workflow run started");

    let stream = run_frames(handle).map(|frame| Ok::<_, Infallible>(frame_event(&frame)));
    Sse::new(stream).keep_alive(KeepAlive::default()).into_response()
}

/// Encode a frame as a single-line SSE data event.
fn frame_event(frame: &StreamFrame) -> Event {
    let payload = serde_json::to_string(frame).unwrap_or_else(|err| {
        // Still emit a terminal-shaped frame if encoding ever fails.
        tracing::error!(error = %err, "failed to encode stream frame");
        r#"{"type":"error","error":"internal serialization failure"}"#.to_string()
    });
    Event::default().data(payload)
}

/// `POST /api/chat/extract` — run the extraction step alone and return
/// the structured record.
pub async fn extract_handler(
    State(state): State<AppState>,
    Json(request): Json<WorkflowRequest>,
) -> Response {
    let domain = request.domain.trim().to_string();
    if domain.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": "Domain is required"})),
        )
            .into_response();
    }

    match run_extract(state.ai.as_ref(), state.searcher.as_ref(), &domain).await {
        Ok(output) => Json(output.record).into_response(),
        Err(err) => {
            tracing::warn!(%domain, error = %err, "extraction failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"error": err.to_string()})),
            )
                .into_response()
        }
    }
}

/// `POST /api/chat/analyze` — run the analysis step over an existing
/// structured record and return the completed report.
pub async fn analyze_handler(
    State(state): State<AppState>,
    Json(record): Json<StructuredRecord>,
) -> Response {
    if let Err(err) = record.validate() {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": err.to_string()})),
        )
            .into_response();
    }

    // No brand context on this route; fall back to the category label.
    let brand_name = if record.primary_category.is_empty() {
        "the brand".to_string()
    } else {
        record.primary_category.clone()
    };
    let extract = ExtractOutput {
        domain: String::new(),
        brand_name,
        raw_hits: vec![],
        record,
    };

    match run_analyze(state.ai.as_ref(), &extract).await {
        Ok(report) => Json(report).into_response(),
        Err(err) => {
            tracing::warn!(error = %err, "analysis failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"error": err.to_string()})),
            )
                .into_response()
        }
    }
}

/// `GET /health`
pub async fn health_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}
