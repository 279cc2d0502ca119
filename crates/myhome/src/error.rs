//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors
//! with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use myhome_config::ConfigError;
use myhome_core::CoreError;

pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const REMOTE: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Remote ───────────────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(
        code(myhome::remote),
        help(
            "Check that Home Assistant is reachable and the MyHOME integration is loaded.\n\
             Use --insecure (-k) for self-signed certificates."
        )
    )]
    Remote { message: String },

    #[error("Import finished with errors ({imported} imported)")]
    #[diagnostic(
        code(myhome::partial_import),
        help("{summary}\nRun: myhome discovery show  to review the remaining candidates")
    )]
    PartialImport { imported: usize, summary: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("No access token configured for profile '{profile}'")]
    #[diagnostic(
        code(myhome::no_token),
        help(
            "Store one with: myhome config set-token --profile {profile}\n\
             Or pass --token / set MYHOME_TOKEN."
        )
    )]
    NoToken { profile: String },

    #[error("Keyring access failed: {message}")]
    #[diagnostic(code(myhome::keyring))]
    Keyring { message: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("Gateway '{mac}' not found")]
    #[diagnostic(
        code(myhome::gateway_not_found),
        help("Run: myhome gateways list  to see available gateways")
    )]
    GatewayNotFound { mac: String },

    #[error("No MyHOME gateway is configured in Home Assistant")]
    #[diagnostic(
        code(myhome::no_gateway),
        help("Add a MyHOME gateway through the Home Assistant integrations page first.")
    )]
    NoGateway,

    #[error("Candidate '{id}' is not pending discovery")]
    #[diagnostic(
        code(myhome::unknown_candidate),
        help("Run: myhome discovery show  to see pending candidates")
    )]
    UnknownCandidate { id: String },

    #[error("{platform} device '{key}' not found")]
    #[diagnostic(
        code(myhome::device_not_found),
        help("Run: myhome devices list  to see configured devices")
    )]
    DeviceNotFound { platform: String, key: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(myhome::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(myhome::profile_not_found),
        help("Available profiles: {available}")
    )]
    ProfileNotFound { name: String, available: String },

    #[error("Configuration file not found")]
    #[diagnostic(
        code(myhome::no_config),
        help(
            "Create a profile in {path}\n\
             or pass --url and --token."
        )
    )]
    NoConfig { path: String },

    #[error("Configuration error: {message}")]
    #[diagnostic(code(myhome::config))]
    Config { message: String },

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Prompt failed: {message}")]
    #[diagnostic(
        code(myhome::prompt),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    Prompt { message: String },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to render YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Remote { .. } => exit_code::REMOTE,
            Self::NoToken { .. } | Self::Keyring { .. } => exit_code::AUTH,
            Self::GatewayNotFound { .. }
            | Self::NoGateway
            | Self::UnknownCandidate { .. }
            | Self::DeviceNotFound { .. }
            | Self::ProfileNotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. } | Self::Prompt { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        let message = err.to_string();
        match err {
            CoreError::RemoteCallFailed { message } => Self::Remote { message },

            CoreError::ValidationSkipped { reason } => Self::Validation {
                field: "selection".into(),
                reason,
            },

            CoreError::PartialImportFailure { imported, .. } => Self::PartialImport {
                imported,
                summary: message,
            },

            CoreError::NoGatewaySelected => Self::NoGateway,

            CoreError::GatewayNotFound { mac } => Self::GatewayNotFound { mac },

            CoreError::UnknownCandidate { id } => Self::UnknownCandidate { id },

            CoreError::ValidationFailed { message } => Self::Validation {
                field: "input".into(),
                reason: message,
            },

            CoreError::Config { message } => Self::Config { message },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            ConfigError::NoToken { profile } => Self::NoToken { profile },
            ConfigError::UnknownProfile { name } => Self::ProfileNotFound {
                name,
                available: String::new(),
            },
            ConfigError::Keyring(e) => Self::Keyring {
                message: e.to_string(),
            },
            ConfigError::Io(e) => Self::Io(e),
            other @ (ConfigError::Serialization(_) | ConfigError::Figment(_)) => Self::Config {
                message: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use myhome_core::{CandidateId, ImportFailure, Platform};

    #[test]
    fn remote_failures_keep_the_server_message() {
        let err = CliError::from(CoreError::RemoteCallFailed {
            message: "Duplicate key".into(),
        });
        assert_eq!(err.to_string(), "Duplicate key");
        assert_eq!(err.exit_code(), exit_code::REMOTE);
    }

    #[test]
    fn partial_import_carries_the_aggregate_summary() {
        let err = CliError::from(CoreError::PartialImportFailure {
            imported: 2,
            failures: vec![ImportFailure {
                id: CandidateId::new(Platform::Light, "12"),
                message: "Duplicate key".into(),
            }],
        });
        match &err {
            CliError::PartialImport { imported, summary } => {
                assert_eq!(*imported, 2);
                assert_eq!(summary, "Partial import. Errors: light:12 -> Duplicate key");
            }
            other => panic!("unexpected mapping: {other:?}"),
        }
        assert_eq!(err.exit_code(), exit_code::GENERAL);
    }

    #[test]
    fn lookup_failures_exit_as_not_found() {
        let err = CliError::from(CoreError::GatewayNotFound { mac: "aa".into() });
        assert_eq!(err.exit_code(), exit_code::NOT_FOUND);
        let err = CliError::from(ConfigError::NoToken {
            profile: "home".into(),
        });
        assert_eq!(err.exit_code(), exit_code::AUTH);
    }
}
