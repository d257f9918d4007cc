//! # relay-ctl
//!
//! Terminal console for provisioning CI/CD relay infrastructure.
//!
//! The core is the relay deployment wizard: a six-step flow that accumulates
//! a deployment configuration, fetches a cost estimate, gates provisioning
//! behind an explicit confirmation, then starts and polls the server-side
//! deployment until it completes, fails or is canceled.
//!
//! ## Example
//!
//! ```rust,no_run
//! use relay_ctl::config::types::DeploymentSettings;
//! use relay_ctl::platform::api::PlatformApiClient;
//! use relay_ctl::wizard::{ConfigPatch, WizardController};
//! use relay_ctl::platform::api::CloudProvider;
//! use std::sync::Arc;
//!
//! # async fn example() -> relay_ctl::Result<()> {
//! let client = Arc::new(PlatformApiClient::with_url("http://localhost:8000")?);
//! let mut wizard = WizardController::new(client, &DeploymentSettings::default());
//!
//! wizard.set_field(ConfigPatch::new().provider(CloudProvider::Aws))?;
//! wizard.next_step()?;
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod handlers;
pub mod platform;
pub mod wizard;

// Re-export commonly used types and functions
pub use error::{RelayCtlError, Result};
pub use wizard::{WizardController, WizardSession};
use cli::Commands;
use config::types::Config;

/// The current version of the CLI tool
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub async fn run_command(command: Commands, config: &Config, json: bool) -> Result<()> {
    match command {
        Commands::Deploy => handlers::handle_deploy(config).await,
        Commands::Estimate { file } => handlers::handle_estimate(config, &file, json).await,
        Commands::Status {
            deployment_id,
            watch,
        } => handlers::handle_status(config, &deployment_id, watch, json).await,
        Commands::Cancel { deployment_id } => {
            handlers::handle_cancel(config, &deployment_id, json).await
        }
        Commands::Relays => handlers::handle_relays(config, json).await,
        Commands::Catalog { provider } => handlers::handle_catalog(provider),
    }
}
