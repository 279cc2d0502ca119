//! Gateway command handlers.

use tabled::Tabled;

use myhome_core::{Controller, Gateway};

use crate::cli::{GatewaysArgs, GatewaysCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct GatewayRow {
    #[tabled(rename = " ")]
    current: &'static str,
    #[tabled(rename = "MAC")]
    mac: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Host")]
    host: String,
    #[tabled(rename = "Passive discovery")]
    passive: &'static str,
}

impl GatewayRow {
    fn new(gateway: &Gateway, selected: Option<&str>) -> Self {
        Self {
            current: if selected == Some(gateway.mac.as_str()) {
                "*"
            } else {
                ""
            },
            mac: gateway.mac.clone(),
            name: gateway.name.clone(),
            host: gateway.host.clone(),
            passive: util::yes_no(gateway.discovery_by_activation),
        }
    }
}

pub async fn handle(
    controller: &Controller,
    selected: Option<Gateway>,
    args: GatewaysArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        GatewaysCommand::List => {
            let gateways = controller.gateways();
            let current = selected.map(|g| g.mac);
            let out = output::render_list(
                &global.output,
                &gateways,
                |g| GatewayRow::new(g, current.as_deref()),
                |g| g.mac.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        GatewaysCommand::Passive { state } => {
            let gateway = util::require_gateway(selected)?;
            let updated = controller
                .set_passive_discovery(&gateway.mac, state.enabled())
                .await?;
            output::notice(
                &format!(
                    "Passive discovery on {} ({}): {}",
                    updated.name,
                    updated.mac,
                    if updated.discovery_by_activation {
                        "on"
                    } else {
                        "off"
                    }
                ),
                global.quiet,
            );
            Ok(())
        }
    }
}
