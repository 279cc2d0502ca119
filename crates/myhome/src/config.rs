//! CLI configuration: thin wrapper around `myhome_config` that layers the
//! `GlobalOpts` overrides (--url, --token, --insecure, --timeout) on top
//! of the selected profile.

use std::time::Duration;

use secrecy::SecretString;

use myhome_core::{ConnectionConfig, TlsVerification};

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub use myhome_config::{Config, Profile, config_path, load_config_or_default};

/// Where to connect and which gateway the operator asked for.
#[derive(Debug)]
pub struct Target {
    pub connection: ConnectionConfig,
    pub gateway: Option<String>,
}

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .unwrap_or_else(|| config.active_profile_name().to_owned())
}

/// Build the connection target from config file, profile, and flags.
///
/// Without a matching profile, `--url` and `--token` alone are enough.
pub fn resolve_target(global: &GlobalOpts) -> Result<Target, CliError> {
    let cfg = load_config_or_default();
    let profile_name = active_profile_name(global, &cfg);

    if let Some(profile) = cfg.profiles.get(&profile_name) {
        return resolve_profile(profile, &profile_name, &cfg, global);
    }

    if global.profile.is_some() && global.url.is_none() {
        let mut available: Vec<&str> = cfg.profiles.keys().map(String::as_str).collect();
        available.sort_unstable();
        return Err(CliError::ProfileNotFound {
            name: profile_name,
            available: if available.is_empty() {
                "(none)".into()
            } else {
                available.join(", ")
            },
        });
    }

    let url_str = global.url.as_deref().ok_or_else(|| CliError::NoConfig {
        path: config_path().display().to_string(),
    })?;
    let url = parse_url(url_str)?;

    let token = global
        .token
        .clone()
        .map(SecretString::from)
        .ok_or(CliError::NoToken {
            profile: profile_name,
        })?;

    let mut connection = ConnectionConfig::new(url, token);
    if global.insecure || cfg.defaults.insecure {
        connection.tls = TlsVerification::DangerAcceptInvalid;
    }
    connection.timeout = Duration::from_secs(global.timeout.unwrap_or(cfg.defaults.timeout));

    Ok(Target {
        connection,
        gateway: global.gateway.clone(),
    })
}

/// Translate a `Profile` + global flags into a connection target.
///
/// CLI flag overrides take priority over profile values.
fn resolve_profile(
    profile: &Profile,
    profile_name: &str,
    cfg: &Config,
    global: &GlobalOpts,
) -> Result<Target, CliError> {
    let url = match global.url.as_deref() {
        Some(url_str) => parse_url(url_str)?,
        None => myhome_config::profile_url(profile)?,
    };

    let token = match global.token {
        Some(ref token) => SecretString::from(token.clone()),
        None => myhome_config::resolve_token(profile, profile_name)?,
    };

    let mut connection = ConnectionConfig::new(url, token);
    connection.tls = if global.insecure {
        TlsVerification::DangerAcceptInvalid
    } else {
        myhome_config::tls_for(profile, &cfg.defaults)
    };
    connection.timeout = Duration::from_secs(
        global
            .timeout
            .or(profile.timeout)
            .unwrap_or(cfg.defaults.timeout),
    );

    Ok(Target {
        connection,
        gateway: global.gateway.clone().or_else(|| profile.gateway.clone()),
    })
}

fn parse_url(url_str: &str) -> Result<url::Url, CliError> {
    url_str.parse().map_err(|_| CliError::Validation {
        field: "url".into(),
        reason: format!("invalid URL: {url_str}"),
    })
}
