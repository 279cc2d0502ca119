//! Configured-device command handlers.

use tabled::Tabled;

use myhome_core::{ConfiguredDevice, Controller, DeviceKind, DeviceRecord, Gateway, Platform};

use crate::cli::{AddDeviceArgs, DevicesArgs, DevicesCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "Platform")]
    platform: String,
    #[tabled(rename = "Key")]
    key: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Address")]
    address: String,
    #[tabled(rename = "Details")]
    details: String,
}

impl From<&ConfiguredDevice> for DeviceRow {
    fn from(d: &ConfiguredDevice) -> Self {
        Self {
            platform: d.platform().to_string(),
            key: d.key().to_owned(),
            name: d.record.name.clone(),
            address: d.record.address.clone(),
            details: d.details(),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    controller: &Controller,
    gateway: &Gateway,
    args: DevicesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        DevicesCommand::List { platform } => {
            util::ensure_synced(controller)?;
            let view = controller.configuration();
            let devices: Vec<ConfiguredDevice> = view
                .devices()
                .iter()
                .filter(|d| platform.is_none_or(|p| d.platform() == p))
                .cloned()
                .collect();
            let out = output::render_list(
                &global.output,
                &devices,
                |d| DeviceRow::from(d),
                |d| format!("{}:{}", d.platform(), d.key()),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        DevicesCommand::Add(add) => {
            let record = build_record(add)?;
            tracing::debug!(gateway = %gateway.mac, key = %record.key, "saving device");
            controller.create_device(&record).await?;
            util::print_notice(controller, global);
            Ok(())
        }

        DevicesCommand::Remove { platform, key } => {
            util::ensure_synced(controller)?;
            if controller.configuration().devices().get(platform, &key).is_none() {
                return Err(CliError::DeviceNotFound {
                    platform: platform.to_string(),
                    key,
                });
            }
            if !util::confirm(
                &format!("Remove {platform} device '{key}' from {}?", gateway.name),
                global.yes,
            )? {
                return Ok(());
            }
            controller.delete_device(platform, &key).await?;
            util::print_notice(controller, global);
            Ok(())
        }
    }
}

/// Build a record from `devices add` flags, rejecting flags that belong
/// to another platform.
fn build_record(args: AddDeviceArgs) -> Result<DeviceRecord, CliError> {
    let foreign = |flag: &str| CliError::Validation {
        field: flag.to_owned(),
        reason: format!("not applicable to {} devices", args.platform),
    };
    let climate_flags = args.no_heat || args.no_cool || args.no_fan || args.no_standalone;

    let kind = match args.platform {
        Platform::Light => DeviceKind::Light {
            dimmable: args.dimmable,
        },
        Platform::Cover => DeviceKind::Cover,
        Platform::Climate => DeviceKind::Climate {
            heat: !args.no_heat,
            cool: !args.no_cool,
            fan: !args.no_fan,
            standalone: !args.no_standalone,
        },
        Platform::Sensor => DeviceKind::Sensor {
            class: args.class.unwrap_or_default(),
        },
    };
    if args.dimmable && args.platform != Platform::Light {
        return Err(foreign("--dimmable"));
    }
    if args.class.is_some() && args.platform != Platform::Sensor {
        return Err(foreign("--class"));
    }
    if climate_flags && args.platform != Platform::Climate {
        return Err(foreign("--no-heat/--no-cool/--no-fan/--no-standalone"));
    }

    let name = args.name.unwrap_or_else(|| args.key.clone());
    let mut record = DeviceRecord::new(args.platform, args.key, name, args.address);
    record.kind = kind;
    record.validate()?;
    Ok(record)
}
