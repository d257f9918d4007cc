//! Error taxonomy for the deployment wizard
//!
//! Every asynchronous boundary converts backend failures into one of these
//! kinds before session state is touched.

use crate::platform::api::types::{DeploymentRun, DeploymentStatus};
use std::time::Duration;
use thiserror::Error;

/// Error from the resource estimate request
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EstimationError {
    #[error("Estimate request failed: {0}")]
    Backend(String),

    #[error("Estimate request timed out after {}s", .0.as_secs())]
    TimedOut(Duration),

    #[error("Another estimate is already in flight for a different configuration")]
    InFlight,

    #[error("Configuration is incomplete: {0}")]
    Incomplete(String),
}

/// Error from starting a deployment
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StartError {
    #[error("Failed to start deployment: {0}")]
    Backend(String),

    #[error("A deployment was already started for this session ({0})")]
    AlreadyStarted(String),

    #[error("A start request is already in flight")]
    InFlight,

    #[error("Deployment has not been confirmed")]
    NotConfirmed,
}

/// Error from canceling a deployment
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CancelError {
    #[error("Deployment cannot be canceled while {0}")]
    NotCancelable(DeploymentStatus),

    #[error("No deployment is running")]
    NoDeployment,

    #[error("Cancel request failed: {0}")]
    Backend(String),
}

/// Errors surfaced by the wizard to the operator
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WizardError {
    /// Step predicate is false; a navigation refusal, not a failure
    #[error("Cannot leave step {step}: {reason}")]
    ValidationBlocked { step: u8, reason: String },

    #[error(transparent)]
    Estimation(#[from] EstimationError),

    #[error(transparent)]
    Start(#[from] StartError),

    #[error(transparent)]
    Cancel(#[from] CancelError),

    #[error("Status poll failed: {0}")]
    Poll(String),

    #[error("Deployment failed: {0}")]
    DeploymentFailed(String),
}

impl WizardError {
    /// Terminal failure of a run, if it failed
    pub fn from_run(run: &DeploymentRun) -> Option<Self> {
        (run.status == DeploymentStatus::Failed).then(|| {
            WizardError::DeploymentFailed(
                run.error
                    .clone()
                    .unwrap_or_else(|| "deployment failed without an error message".to_string()),
            )
        })
    }

    /// Whether the operator can retry in place
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, WizardError::DeploymentFailed(_))
    }
}
