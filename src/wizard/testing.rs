//! Scripted in-memory backend
//!
//! Lets the wizard run without a provisioning API: estimates, start results,
//! status polls and cancel acknowledgments are replayed from a script and
//! every call is counted.

use crate::platform::api::error::{PlatformApiError, Result};
use crate::platform::api::types::{
    CancelDeploymentResponse, CloudProvider, DeploymentConfig, DeploymentRun, DeploymentStatus,
    ResourceEstimate, StartDeploymentResponse,
};
use crate::platform::api::RelayBackend;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// aws / ec2 / us-east-1 / t3.medium x2
pub fn scenario_config() -> DeploymentConfig {
    DeploymentConfig {
        provider: Some(CloudProvider::Aws),
        infrastructure_type: Some("ec2".to_string()),
        region: Some("us-east-1".to_string()),
        instance_type: Some("t3.medium".to_string()),
        instance_count: Some(2),
        ..Default::default()
    }
}

pub fn scenario_estimate() -> ResourceEstimate {
    ResourceEstimate {
        estimated_cost_monthly: 85.50,
        estimated_deployment_time_minutes: 15,
        resource_count: 12,
        breakdown: Default::default(),
    }
}

/// A run snapshot with the given status and progress
pub fn run(id: &str, status: DeploymentStatus, progress: u8) -> DeploymentRun {
    DeploymentRun {
        progress_percent: progress,
        status,
        ..DeploymentRun::initializing(id)
    }
}

fn server_error(message: &str) -> PlatformApiError {
    PlatformApiError::ServerError {
        status: 503,
        message: message.to_string(),
    }
}

#[derive(Default)]
pub struct ScriptedBackend {
    pub estimate_delay: Duration,
    pub estimate_error: Option<String>,
    /// Estimate to answer with instead of [`scenario_estimate`]
    pub estimate: Option<ResourceEstimate>,
    pub start_errors: Mutex<VecDeque<String>>,
    pub start_delay: Duration,
    pub deployment_id: String,
    pub polls: Mutex<VecDeque<std::result::Result<DeploymentRun, String>>>,
    pub poll_delay: Duration,
    pub cancel_result: Mutex<Option<std::result::Result<DeploymentStatus, String>>>,
    pub estimate_calls: AtomicUsize,
    pub start_calls: AtomicUsize,
    pub poll_calls: AtomicUsize,
    pub cancel_calls: AtomicUsize,
    pub(crate) last_poll: Mutex<Option<DeploymentRun>>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self {
            deployment_id: "d1".to_string(),
            ..Default::default()
        }
    }

    pub fn with_polls(self, polls: Vec<std::result::Result<DeploymentRun, String>>) -> Self {
        *self.polls.lock() = polls.into();
        self
    }

    /// Fail the next start request with `message`
    pub fn failing_start(self, message: &str) -> Self {
        self.start_errors.lock().push_back(message.to_string());
        self
    }

    pub fn calls(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RelayBackend for ScriptedBackend {
    async fn estimate_resources(&self, _config: &DeploymentConfig) -> Result<ResourceEstimate> {
        self.estimate_calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.estimate_delay).await;
        match &self.estimate_error {
            Some(message) => Err(server_error(message)),
            None => Ok(self.estimate.clone().unwrap_or_else(scenario_estimate)),
        }
    }

    async fn start_deployment(
        &self,
        _config: &DeploymentConfig,
    ) -> Result<StartDeploymentResponse> {
        self.start_calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.start_delay).await;
        if let Some(message) = self.start_errors.lock().pop_front() {
            return Err(server_error(&message));
        }
        Ok(StartDeploymentResponse {
            deployment_id: self.deployment_id.clone(),
        })
    }

    async fn get_deployment_status(&self, deployment_id: &str) -> Result<DeploymentRun> {
        self.poll_calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.poll_delay).await;
        let next = self.polls.lock().pop_front();
        match next {
            Some(Ok(run)) => {
                *self.last_poll.lock() = Some(run.clone());
                Ok(run)
            }
            Some(Err(message)) => Err(server_error(&message)),
            None => Ok(self
                .last_poll
                .lock()
                .clone()
                .unwrap_or_else(|| DeploymentRun::initializing(deployment_id))),
        }
    }

    async fn cancel_deployment(&self, deployment_id: &str) -> Result<CancelDeploymentResponse> {
        self.cancel_calls.fetch_add(1, Ordering::SeqCst);
        let result = self
            .cancel_result
            .lock()
            .clone()
            .unwrap_or(Ok(DeploymentStatus::Canceled));
        match result {
            Ok(status) => Ok(CancelDeploymentResponse {
                status,
                deployment_id: Some(deployment_id.to_string()),
            }),
            Err(message) => Err(server_error(&message)),
        }
    }
}
