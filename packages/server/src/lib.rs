//! Brand audit API server.
//!
//! Thin HTTP shell over the `audit` pipeline: configuration, concrete
//! collaborator clients, and the SSE streaming transport.

pub mod config;
pub mod kernel;
pub mod server;

pub use config::Config;
