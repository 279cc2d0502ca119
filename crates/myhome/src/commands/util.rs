//! Shared helpers for command handlers.

use myhome_core::{Controller, Gateway};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

/// Load the gateway list and settle on the requested (or first) gateway.
///
/// A requested gateway that is not listed fails before any gateway is
/// synced. Returns `None` only when Home Assistant has no gateway at all.
pub async fn open_session(
    controller: &Controller,
    requested: Option<&str>,
) -> Result<Option<Gateway>, CliError> {
    if let Some(mac) = requested {
        controller.preselect_gateway(mac);
    }
    Ok(controller.load_gateways().await?)
}

pub fn require_gateway(selected: Option<Gateway>) -> Result<Gateway, CliError> {
    selected.ok_or(CliError::NoGateway)
}

/// Fail if the initial sync left an error on the status line.
pub fn ensure_synced(controller: &Controller) -> Result<(), CliError> {
    match controller.status().error {
        Some(message) => Err(CliError::Remote { message }),
        None => Ok(()),
    }
}

/// Echo the session's status notice to stderr.
pub fn print_notice(controller: &Controller, global: &GlobalOpts) {
    if let Some(notice) = controller.status().notice {
        output::notice(&notice, global.quiet);
    }
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Prompt {
            message: e.to_string(),
        })
}

pub fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}
