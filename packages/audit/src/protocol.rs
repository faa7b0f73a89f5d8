//! Wire protocol for the server-to-client event stream.
//!
//! Each SSE frame carries one JSON-encoded [`StreamFrame`] on a single
//! `data:` line. The set of frames is closed so both sides handle every
//! case exhaustively instead of falling through on unknown type tags.

use serde::{Deserialize, Serialize};

use crate::schema::AuditReport;

/// Phase announced to the client while the run is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StreamPhase {
    Extracting,
    Analyzing,
}

/// One frame of the audit event stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StreamFrame {
    /// Informational, phase-independent.
    Status { message: String },
    /// Phase transition notice.
    Phase { phase: StreamPhase, message: String },
    /// Terminal success; sent at most once per connection.
    Result { data: AuditReport },
    /// Terminal failure; mutually exclusive with `Result`.
    Error { error: String },
}

impl StreamFrame {
    /// Terminal frames end the connection; exactly one is sent per run.
    pub fn is_terminal(&self) -> bool {
        matches!(self, StreamFrame::Result { .. } | StreamFrame::Error { .. })
    }
}
