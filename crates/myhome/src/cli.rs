//! Clap derive structures for the `myhome` CLI.

use clap::{Args, Parser, Subcommand, ValueEnum};

use myhome_core::{CandidateId, DraftEdit, Platform, SensorClass};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// myhome -- onboard MyHOME gateway devices into Home Assistant
#[derive(Debug, Parser)]
#[command(
    name = "myhome",
    version,
    about = "Onboard and configure MyHOME gateway devices from the command line",
    long_about = "Lists the MyHOME gateways known to Home Assistant, reviews devices \
        discovered by activation, and imports them into the gateway configuration.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Configuration profile to use
    #[arg(long, short = 'p', env = "MYHOME_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Home Assistant URL (overrides profile)
    #[arg(long, env = "MYHOME_URL", global = true)]
    pub url: Option<String>,

    /// Long-lived access token
    #[arg(long, env = "MYHOME_TOKEN", global = true, hide_env_values = true)]
    pub token: Option<String>,

    /// Gateway MAC to operate on (defaults to the first gateway)
    #[arg(long, short = 'g', env = "MYHOME_GATEWAY", global = true)]
    pub gateway: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "MYHOME_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "MYHOME_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds
    #[arg(long, env = "MYHOME_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List gateways and toggle passive discovery
    #[command(alias = "gw")]
    Gateways(GatewaysArgs),

    /// Review, clear and import discovered devices
    #[command(alias = "disc")]
    Discovery(DiscoveryArgs),

    /// Manage configured devices
    #[command(alias = "dev")]
    Devices(DevicesArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Gateways ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GatewaysArgs {
    #[command(subcommand)]
    pub command: GatewaysCommand,
}

#[derive(Debug, Subcommand)]
pub enum GatewaysCommand {
    /// List gateways registered in Home Assistant
    #[command(alias = "ls")]
    List,

    /// Turn discovery by activation on or off for the selected gateway
    Passive {
        #[arg(value_enum)]
        state: Toggle,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Toggle {
    On,
    Off,
}

impl Toggle {
    pub fn enabled(self) -> bool {
        matches!(self, Self::On)
    }
}

// ── Discovery ────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct DiscoveryArgs {
    #[command(subcommand)]
    pub command: DiscoveryCommand,
}

#[derive(Debug, Subcommand)]
pub enum DiscoveryCommand {
    /// Show pending candidates with their draft settings
    #[command(alias = "ls")]
    Show,

    /// Drop the gateway's pending discovery list
    Clear,

    /// Import the selected candidates into the gateway configuration
    Import(ImportArgs),
}

#[derive(Debug, Args)]
pub struct ImportArgs {
    /// Import only these candidates (e.g. light:12); others are deselected
    #[arg(long, value_name = "ID")]
    pub only: Vec<CandidateId>,

    /// Leave these candidates out of the import
    #[arg(long, value_name = "ID")]
    pub skip: Vec<CandidateId>,

    /// Edit a draft before import: <platform>:<address>.<field>=<value>
    #[arg(long, value_name = "EDIT")]
    pub set: Vec<DraftEdit>,
}

// ── Devices ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct DevicesArgs {
    #[command(subcommand)]
    pub command: DevicesCommand,
}

#[derive(Debug, Subcommand)]
pub enum DevicesCommand {
    /// List configured devices
    #[command(alias = "ls")]
    List {
        /// Only show this platform
        #[arg(long)]
        platform: Option<Platform>,
    },

    /// Create or update a configured device
    Add(AddDeviceArgs),

    /// Remove a configured device
    #[command(alias = "rm")]
    Remove {
        /// Device platform (light, cover, climate, sensor)
        platform: Platform,
        /// Device key
        key: String,
    },
}

#[derive(Debug, Args)]
#[allow(clippy::struct_excessive_bools)]
pub struct AddDeviceArgs {
    /// Device platform (light, cover, climate, sensor)
    pub platform: Platform,

    /// Device key, unique within the platform
    #[arg(long)]
    pub key: String,

    /// OpenWebNet address: `where` for light/cover/sensor, `zone` for climate
    #[arg(long)]
    pub address: String,

    /// Display name (defaults to the key)
    #[arg(long)]
    pub name: Option<String>,

    /// Light: dimmer
    #[arg(long)]
    pub dimmable: bool,

    /// Sensor: measured quantity
    #[arg(long)]
    pub class: Option<SensorClass>,

    /// Climate: disable heating
    #[arg(long)]
    pub no_heat: bool,

    /// Climate: disable cooling
    #[arg(long)]
    pub no_cool: bool,

    /// Climate: disable fan control
    #[arg(long)]
    pub no_fan: bool,

    /// Climate: zone is controlled by a central unit
    #[arg(long)]
    pub no_standalone: bool,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Display configured profiles
    Show,

    /// Print the config file path
    Path,

    /// Store the active profile's access token in the system keyring
    SetToken,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
