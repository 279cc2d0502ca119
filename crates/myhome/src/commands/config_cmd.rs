//! Config subcommand handlers.

use secrecy::SecretString;
use serde::Serialize;
use tabled::Tabled;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Profile};
use crate::error::CliError;
use crate::output;

/// Profile as shown by `config show`; never carries the token itself.
#[derive(Clone, Serialize, Tabled)]
struct ProfileSummary {
    #[tabled(rename = "Profile")]
    name: String,
    #[tabled(rename = "Default")]
    default: &'static str,
    #[tabled(rename = "URL")]
    url: String,
    #[tabled(rename = "Gateway")]
    gateway: String,
    #[tabled(rename = "Token")]
    token: String,
}

impl ProfileSummary {
    fn new(name: &str, profile: &Profile, default_name: &str) -> Self {
        Self {
            name: name.to_owned(),
            default: if name == default_name { "*" } else { "" },
            url: profile.url.clone(),
            gateway: profile.gateway.clone().unwrap_or_else(|| "(first)".into()),
            token: token_source(profile),
        }
    }
}

fn token_source(profile: &Profile) -> String {
    match (&profile.token_env, &profile.token) {
        (Some(var), _) => format!("env ${var}"),
        (None, Some(_)) => "config file".into(),
        (None, None) => "keyring".into(),
    }
}

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Show => {
            let cfg = config::load_config_or_default();
            let default_name = cfg.active_profile_name();
            let mut entries: Vec<(&String, &Profile)> = cfg.profiles.iter().collect();
            entries.sort_by_key(|(name, _)| *name);
            let profiles: Vec<ProfileSummary> = entries
                .into_iter()
                .map(|(name, profile)| ProfileSummary::new(name, profile, default_name))
                .collect();
            let out = output::render_list(
                &global.output,
                &profiles,
                ProfileSummary::clone,
                |p| p.name.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            println!("{}", config::config_path().display());
            Ok(())
        }

        ConfigCommand::SetToken => {
            let cfg = config::load_config_or_default();
            let profile_name = config::active_profile_name(global, &cfg);
            let token = rpassword::prompt_password(format!("Access token for '{profile_name}': "))
                .map_err(|e| CliError::Prompt {
                    message: e.to_string(),
                })?;
            if token.trim().is_empty() {
                return Err(CliError::Validation {
                    field: "token".into(),
                    reason: "token cannot be empty".into(),
                });
            }
            myhome_config::store_token(&profile_name, &SecretString::from(token))?;
            output::notice(
                &format!("Token stored in the system keyring for profile '{profile_name}'."),
                global.quiet,
            );
            Ok(())
        }
    }
}
