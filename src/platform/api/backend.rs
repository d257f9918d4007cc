//! Backend seam used by the wizard core
//!
//! The wizard only talks to the provisioning backend through this trait, so
//! the HTTP client can be swapped for a scripted backend in tests.

use super::error::Result;
use super::types::{
    CancelDeploymentResponse, DeploymentConfig, DeploymentRun, ResourceEstimate,
    StartDeploymentResponse,
};
use async_trait::async_trait;

/// The four provisioning operations the wizard consumes
///
/// All operations are safe to retry except `start_deployment`, which must be
/// issued at most once per confirmed configuration.
#[async_trait]
pub trait RelayBackend: Send + Sync {
    /// Estimate cost, time and resource count for a complete configuration
    async fn estimate_resources(&self, config: &DeploymentConfig) -> Result<ResourceEstimate>;

    /// Create the server-side deployment job
    async fn start_deployment(&self, config: &DeploymentConfig)
    -> Result<StartDeploymentResponse>;

    /// Fetch the current status of a deployment job
    async fn get_deployment_status(&self, deployment_id: &str) -> Result<DeploymentRun>;

    /// Request cancellation of a running deployment job
    async fn cancel_deployment(&self, deployment_id: &str) -> Result<CancelDeploymentResponse>;
}
