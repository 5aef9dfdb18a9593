//! CLI argument definitions using clap.

use clap::{Args, Parser, Subcommand, ValueEnum};
use wayfinder_types::ServiceType;

/// Output format for commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Service type selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ServiceTypeArg {
    /// Service BC offices
    #[value(name = "servicebc", alias = "ServiceBC")]
    ServiceBc,
    /// Health BC sites
    #[value(name = "healthbc", alias = "HealthBC")]
    HealthBc,
}

impl From<ServiceTypeArg> for ServiceType {
    fn from(arg: ServiceTypeArg) -> Self {
        match arg {
            ServiceTypeArg::ServiceBc => ServiceType::ServiceBC,
            ServiceTypeArg::HealthBc => ServiceType::HealthBC,
        }
    }
}

/// A position given on the command line
#[derive(Debug, Clone, Copy, Default, Args)]
pub struct PositionArgs {
    /// Latitude in decimal degrees (or set WAYFINDER_POSITION="lat,lon")
    #[arg(long, requires = "lon", allow_negative_numbers = true)]
    pub lat: Option<f64>,

    /// Longitude in decimal degrees
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    pub lon: Option<f64>,
}

#[derive(Parser)]
#[command(name = "wayfinder")]
#[command(author, version, about = "Find nearby Service BC and Health BC locations", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Base URL of the location API
    #[arg(long, global = true, env = "WAYFINDER_SERVICE_URL")]
    pub service_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List locations near you, closest first
    Locations {
        /// Only show locations whose name contains this text
        #[arg(short, long, default_value = "")]
        search: String,

        /// Which kind of location to list
        #[arg(short = 't', long = "type", value_enum, default_value = "servicebc")]
        service_type: ServiceTypeArg,

        #[command(flatten)]
        position: PositionArgs,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// List the services offered
    Services {
        /// Only list services of this kind
        #[arg(short = 't', long = "type", value_enum)]
        service_type: Option<ServiceTypeArg>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Show or change your settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },

    /// Set, clear or show your current location
    Locate {
        #[command(flatten)]
        position: PositionArgs,

        /// Forget the cached location
        #[arg(long, conflicts_with_all = ["lat", "lon"])]
        clear: bool,
    },

    /// Fetch fresh location data and drop cached assets
    Refresh,

    /// Drop cached map tiles
    ClearCache,

    /// Delete all saved settings, location and data
    ClearStorage,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Settings subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum SettingsAction {
    /// Show current settings
    Show {
        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Change one setting
    Set {
        #[command(subcommand)]
        setting: SettingArg,
    },
}

/// Settings that can be changed
#[derive(Debug, Clone, Subcommand)]
pub enum SettingArg {
    /// Interface language code (e.g. eng, fra)
    Lang { value: String },

    /// Never fetch from the network
    OfflineMode {
        #[arg(value_parser = parse_bool_arg, action = clap::ArgAction::Set)]
        enabled: bool,
    },

    /// Share which settings you change, tagged with your location
    AnalyticsOptIn {
        #[arg(value_parser = parse_bool_arg, action = clap::ArgAction::Set)]
        enabled: bool,
    },

    /// Search radius in kilometres (1-5000)
    LocationRange { km: u32 },
}

/// Configuration keys
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ConfigKey {
    /// Base URL of the location API
    ServiceUrl,
    /// Request timeout in seconds
    Timeout,
}

/// Configuration subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Set a configuration value
    Set {
        #[arg(value_enum)]
        key: ConfigKey,
        value: String,
    },

    /// Unset (remove) a configuration value
    Unset {
        #[arg(value_enum)]
        key: ConfigKey,
    },

    /// Show configuration file path
    Path,
}

/// Parse boolean argument with flexible input
fn parse_bool_arg(s: &str) -> Result<bool, String> {
    match s.to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" | "enable" | "enabled" => Ok(true),
        "false" | "no" | "off" | "0" | "disable" | "disabled" => Ok(false),
        _ => Err(format!(
            "Invalid boolean value '{}'. Use: true/false, yes/no, on/off, 1/0",
            s
        )),
    }
}
