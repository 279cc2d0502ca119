// ── Core error types ──
//
// Consumers never see HTTP status codes or JSON decode failures here.
// Every remote failure collapses into `RemoteCallFailed` carrying the
// human-readable message the server (or transport) produced.

use std::fmt;

use thiserror::Error;

use crate::model::CandidateId;

/// One failed item of a bulk import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportFailure {
    pub id: CandidateId,
    pub message: String,
}

impl fmt::Display for ImportFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.id, self.message)
    }
}

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Remote ───────────────────────────────────────────────────────
    #[error("{message}")]
    RemoteCallFailed { message: String },

    // ── Outcomes reported as errors by `into_result` ─────────────────
    /// Informational: nothing to do. Not a failure of the operation.
    #[error("{reason}")]
    ValidationSkipped { reason: String },

    #[error("Partial import. Errors: {}", join_failures(.failures))]
    PartialImportFailure {
        imported: usize,
        failures: Vec<ImportFailure>,
    },

    // ── Session state ────────────────────────────────────────────────
    #[error("No gateway selected")]
    NoGatewaySelected,

    #[error("Gateway not found: {mac}")]
    GatewayNotFound { mac: String },

    #[error("Unknown discovery candidate: {id}")]
    UnknownCandidate { id: String },

    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    /// `true` for outcomes that are informational rather than failures.
    pub fn is_informational(&self) -> bool {
        matches!(self, Self::ValidationSkipped { .. })
    }
}

fn join_failures(failures: &[ImportFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" | ")
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<myhome_api::Error> for CoreError {
    fn from(err: myhome_api::Error) -> Self {
        tracing::debug!(
            error = %err,
            transient = err.is_transient(),
            "management API call failed"
        );
        CoreError::RemoteCallFailed {
            message: err.message(),
        }
    }
}
