//! Typed errors for the audit pipeline.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to keep failure
//! modes strongly typed at the step and orchestrator boundaries.

use thiserror::Error;

/// Errors that can occur while running an audit.
#[derive(Debug, Error)]
pub enum AuditError {
    /// Domain failed validation; raised before any collaborator call
    #[error("invalid domain: {reason}")]
    InvalidDomain { reason: String },

    /// Search or LLM collaborator failed (network, auth, quota)
    #[error("collaborator error: {0}")]
    Collaborator(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Collaborator output does not conform to the declared schema
    #[error("schema violation in `{field}`: {constraint}")]
    SchemaViolation { field: String, constraint: String },
}

impl AuditError {
    /// Wrap any error as a collaborator failure.
    pub fn collaborator(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Collaborator(err.into())
    }

    /// Build a collaborator failure from a plain message.
    pub fn collaborator_msg(message: impl Into<String>) -> Self {
        Self::Collaborator(message.into().into())
    }

    /// Build a schema violation naming the offending field and constraint.
    pub fn schema_violation(field: impl Into<String>, constraint: impl Into<String>) -> Self {
        Self::SchemaViolation {
            field: field.into(),
            constraint: constraint.into(),
        }
    }
}

/// Result type alias for audit operations.
pub type Result<T> = std::result::Result<T, AuditError>;
