use crate::platform::api::types::CloudProvider;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "relay-ctl")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Provision CI/CD relay infrastructure")]
#[command(long_about = "A terminal console for provisioning relay infrastructure: a guided six-step deployment wizard with cost estimates, an explicit confirmation gate and live progress while the deployment runs.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Base URL of the relay provisioning API
    #[arg(long, global = true, env = "RELAY_API_URL", value_name = "URL")]
    pub api_url: Option<String>,

    /// Bearer token for the relay provisioning API
    #[arg(long, global = true, env = "RELAY_API_TOKEN", hide_env_values = true)]
    pub api_token: Option<String>,

    /// Output in JSON format where applicable
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the interactive relay deployment wizard
    Deploy,

    /// Estimate cost and provisioning time for a deployment configuration
    Estimate {
        /// Deployment configuration file (TOML or JSON)
        #[arg(short, long, value_name = "FILE")]
        file: PathBuf,
    },

    /// Show the status of a deployment
    Status {
        /// Deployment identifier
        #[arg(value_name = "DEPLOYMENT_ID")]
        deployment_id: String,

        /// Follow the deployment until it finishes
        #[arg(short, long)]
        watch: bool,
    },

    /// Cancel a running deployment
    Cancel {
        /// Deployment identifier
        #[arg(value_name = "DEPLOYMENT_ID")]
        deployment_id: String,
    },

    /// List registered relays
    Relays,

    /// Show supported providers, infrastructure types, regions and sizes
    Catalog {
        /// Only show one provider (aws, azure, gcp)
        #[arg(short, long)]
        provider: Option<CloudProvider>,
    },
}

impl Cli {
    /// Initialize logging based on verbosity level
    pub fn init_logging(&self) {
        if self.quiet {
            return;
        }

        let level = match self.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        };

        env_logger::Builder::from_default_env()
            .filter_level(level)
            .init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_status_watch() {
        let cli = Cli::try_parse_from(["relay-ctl", "-vv", "status", "d1", "--watch"]).unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Status {
                deployment_id,
                watch,
            } => {
                assert_eq!(deployment_id, "d1");
                assert!(watch);
            }
            _ => panic!("expected status command"),
        }
    }

    #[test]
    fn test_parse_catalog_provider() {
        let cli = Cli::try_parse_from(["relay-ctl", "catalog", "--provider", "gcp"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Catalog {
                provider: Some(CloudProvider::Gcp)
            }
        ));
        assert!(Cli::try_parse_from(["relay-ctl", "catalog", "-p", "hetzner"]).is_err());
    }
}
