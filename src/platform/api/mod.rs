//! Platform API client module
//!
//! Provides access to the relay provisioning backend and the seam the wizard
//! core uses to reach it.
//!
//! # Example
//!
//! ```rust,ignore
//! use relay_ctl::platform::api::{PlatformApiClient, RelayBackend};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = PlatformApiClient::with_url("https://relay.example.com")?;
//!
//!     let run = client.get_deployment_status("d1").await?;
//!     println!("Deployment {} is {}", run.deployment_id, run.status);
//!
//!     Ok(())
//! }
//! ```

pub mod backend;
pub mod client;
pub mod error;
pub mod types;

// Re-export commonly used items
pub use backend::RelayBackend;
pub use client::PlatformApiClient;
pub use error::{PlatformApiError, Result};
pub use types::{
    CancelDeploymentResponse, CloudProvider, DeploymentConfig, DeploymentRun, DeploymentStatus,
    RelayList, RelaySummary, ResourceEstimate, StartDeploymentResponse,
};
