//! Command dispatch: bridges CLI args -> Controller operations -> output.

pub mod config_cmd;
pub mod devices;
pub mod discovery;
pub mod gateways;
pub mod util;

use myhome_core::Controller;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Open the gateway session and dispatch a remote command.
pub async fn dispatch(
    cmd: Command,
    controller: &Controller,
    gateway: Option<&str>,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let selected = util::open_session(controller, gateway).await?;

    match cmd {
        Command::Gateways(args) => gateways::handle(controller, selected, args, global).await,
        Command::Discovery(args) => {
            let gateway = util::require_gateway(selected)?;
            discovery::handle(controller, &gateway, args, global).await
        }
        Command::Devices(args) => {
            let gateway = util::require_gateway(selected)?;
            devices::handle(controller, &gateway, args, global).await
        }
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}
