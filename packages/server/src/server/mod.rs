//! HTTP server: router, handlers, and the SSE transport.

pub mod app;
pub mod frames;
pub mod routes;

pub use app::{build_app, AppState};
