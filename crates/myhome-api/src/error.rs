use thiserror::Error;

/// Top-level error type for the `myhome-api` crate.
///
/// Covers every failure mode of the management API: authentication,
/// transport, server-reported errors, and payload decoding.
/// `myhome-core` folds all of these into a single remote-call failure.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// The access token was rejected (HTTP 401).
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Server ──────────────────────────────────────────────────────
    /// Non-success response. `message` is the server's `{"message": ...}`
    /// text when present, otherwise a status line with a body preview.
    #[error("{message}")]
    Api { status: u16, message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if this is a transient error worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// The human-readable message, without the variant prefix for
    /// server-reported errors.
    pub fn message(&self) -> String {
        match self {
            Self::Api { message, .. } | Self::Authentication { message } => message.clone(),
            other => other.to_string(),
        }
    }
}
