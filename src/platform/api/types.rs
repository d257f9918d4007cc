//! API request and response types for the relay provisioning endpoints
//!
//! These types mirror the backend DTOs for deployment estimates, deployment
//! runs and registered relays. Field names follow the backend's snake_case
//! wire format.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Cloud provider types a relay can be provisioned on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CloudProvider {
    Aws,
    Azure,
    Gcp,
}

impl CloudProvider {
    /// Returns the lowercase string identifier for this provider
    pub fn as_str(&self) -> &'static str {
        match self {
            CloudProvider::Aws => "aws",
            CloudProvider::Azure => "azure",
            CloudProvider::Gcp => "gcp",
        }
    }

    /// Returns the human-readable display name for this provider
    pub fn display_name(&self) -> &'static str {
        match self {
            CloudProvider::Aws => "Amazon Web Services",
            CloudProvider::Azure => "Microsoft Azure",
            CloudProvider::Gcp => "Google Cloud Platform",
        }
    }

    /// Returns all supported cloud providers
    pub fn all() -> &'static [CloudProvider] {
        &[CloudProvider::Aws, CloudProvider::Azure, CloudProvider::Gcp]
    }
}

impl fmt::Display for CloudProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CloudProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "aws" | "amazon" => Ok(CloudProvider::Aws),
            "azure" | "microsoft" => Ok(CloudProvider::Azure),
            "gcp" | "google" | "google-cloud" => Ok(CloudProvider::Gcp),
            _ => Err(format!(
                "Unknown cloud provider: '{}'. Valid options: aws, azure, gcp",
                s
            )),
        }
    }
}

// =============================================================================
// Deployment configuration
// =============================================================================

/// Relay deployment specification accumulated by the wizard
///
/// Every field is optional until the step that owns it has been completed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentConfig {
    /// Target cloud provider
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<CloudProvider>,
    /// Infrastructure type from the provider's catalog (e.g. "ec2", "lambda")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub infrastructure_type: Option<String>,
    /// Region id; must be supported by the infrastructure type
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// Instance/machine type (instance-based infrastructure only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_type: Option<String>,
    /// Number of instances (instance-based infrastructure only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_count: Option<u32>,
    /// Lower auto-scaling bound
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_scaling_min: Option<u32>,
    /// Upper auto-scaling bound
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_scaling_max: Option<u32>,
    /// Operator-chosen relay identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relay_name: Option<String>,
}

/// Cost, time and resource estimate for a complete deployment configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceEstimate {
    /// Estimated monthly cost in USD
    pub estimated_cost_monthly: f64,
    /// Estimated provisioning time
    pub estimated_deployment_time_minutes: u32,
    /// Total number of cloud resources that will be created
    pub resource_count: u32,
    /// Resource kind label -> count
    #[serde(default)]
    pub breakdown: BTreeMap<String, u32>,
}

// =============================================================================
// Deployment runs
// =============================================================================

/// Lifecycle status of a deployment run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeploymentStatus {
    Initializing,
    InProgress,
    Completed,
    Failed,
    #[serde(alias = "cancelled")]
    Canceled,
}

impl DeploymentStatus {
    /// Terminal statuses admit no further transitions
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            DeploymentStatus::Completed | DeploymentStatus::Failed | DeploymentStatus::Canceled
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DeploymentStatus::Initializing => "initializing",
            DeploymentStatus::InProgress => "in_progress",
            DeploymentStatus::Completed => "completed",
            DeploymentStatus::Failed => "failed",
            DeploymentStatus::Canceled => "canceled",
        }
    }
}

impl fmt::Display for DeploymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Snapshot of a server-side deployment job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeploymentRun {
    /// Server-assigned deployment identifier
    pub deployment_id: String,
    /// Current lifecycle status
    pub status: DeploymentStatus,
    /// Progress percentage (0-100)
    #[serde(default)]
    pub progress_percent: u8,
    /// Human-readable description of the step being executed
    #[serde(default)]
    pub current_step_message: Option<String>,
    /// Failure reason; only present when status is failed
    #[serde(default)]
    pub error: Option<String>,
    /// Id of the registered relay, reported once provisioning completes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relay_id: Option<String>,
    /// Most recent transient status-poll failure (client side only)
    #[serde(skip)]
    pub last_poll_error: Option<String>,
    /// When this snapshot was last updated (client side only)
    #[serde(skip)]
    pub last_updated: Option<DateTime<Utc>>,
}

impl DeploymentRun {
    /// A freshly created run, before the first status poll
    pub fn initializing(deployment_id: impl Into<String>) -> Self {
        Self {
            deployment_id: deployment_id.into(),
            status: DeploymentStatus::Initializing,
            progress_percent: 0,
            current_step_message: None,
            error: None,
            relay_id: None,
            last_poll_error: None,
            last_updated: Some(Utc::now()),
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

/// Response from starting a deployment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartDeploymentResponse {
    /// Identifier used to poll the deployment
    pub deployment_id: String,
}

/// Response from canceling a deployment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelDeploymentResponse {
    /// Status after the cancel request was processed
    pub status: DeploymentStatus,
    #[serde(default)]
    pub deployment_id: Option<String>,
}

// =============================================================================
// Relay registry
// =============================================================================

/// Registered relay as returned by the relay listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelaySummary {
    pub relay_id: String,
    pub relay_name: String,
    /// pending | healthy | degraded | unhealthy
    pub status: String,
    pub created_at: String,
    #[serde(default)]
    pub last_heartbeat: Option<String>,
    #[serde(default)]
    pub queue_provider: Option<String>,
}

/// Relay listing response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayList {
    pub relays: Vec<RelaySummary>,
    pub total: usize,
}

/// API error response format
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    /// Error message
    pub error: Option<String>,
    /// Detailed error message
    pub message: Option<String>,
    /// Error detail as emitted by the relay backend
    pub detail: Option<String>,
}

impl ApiErrorResponse {
    /// Get the error message, preferring `message`, then `error`, then `detail`
    pub fn get_message(&self) -> String {
        self.message
            .clone()
            .or_else(|| self.error.clone())
            .or_else(|| self.detail.clone())
            .unwrap_or_else(|| "Unknown error".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_from_str() {
        assert_eq!("aws".parse::<CloudProvider>().unwrap(), CloudProvider::Aws);
        assert_eq!("Google".parse::<CloudProvider>().unwrap(), CloudProvider::Gcp);
        assert_eq!(" azure ".parse::<CloudProvider>().unwrap(), CloudProvider::Azure);
        let err = "hetzner".parse::<CloudProvider>().unwrap_err();
        assert!(err.contains("aws, azure, gcp"));
    }

    #[test]
    fn test_provider_serde_lowercase() {
        let json = serde_json::to_string(&CloudProvider::Gcp).unwrap();
        assert_eq!(json, "\"gcp\"");
    }

    #[test]
    fn test_status_terminal() {
        assert!(!DeploymentStatus::Initializing.is_terminal());
        assert!(!DeploymentStatus::InProgress.is_terminal());
        assert!(DeploymentStatus::Completed.is_terminal());
        assert!(DeploymentStatus::Failed.is_terminal());
        assert!(DeploymentStatus::Canceled.is_terminal());
    }

    #[test]
    fn test_status_accepts_british_spelling() {
        let status: DeploymentStatus = serde_json::from_str("\"cancelled\"").unwrap();
        assert_eq!(status, DeploymentStatus::Canceled);
        let status: DeploymentStatus = serde_json::from_str("\"in_progress\"").unwrap();
        assert_eq!(status, DeploymentStatus::InProgress);
    }

    #[test]
    fn test_deployment_run_defaults_missing_fields() {
        let run: DeploymentRun =
            serde_json::from_str(r#"{"deployment_id":"d1","status":"initializing"}"#).unwrap();
        assert_eq!(run.progress_percent, 0);
        assert!(run.current_step_message.is_none());
        assert!(run.error.is_none());
        assert!(run.last_poll_error.is_none());
    }

    #[test]
    fn test_config_skips_unset_fields() {
        let config = DeploymentConfig {
            provider: Some(CloudProvider::Aws),
            region: Some("us-east-1".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["provider"], "aws");
        assert_eq!(json["region"], "us-east-1");
        assert!(json.get("instance_type").is_none());
    }

    #[test]
    fn test_estimate_breakdown_optional() {
        let estimate: ResourceEstimate = serde_json::from_str(
            r#"{"estimated_cost_monthly":85.5,"estimated_deployment_time_minutes":15,"resource_count":12}"#,
        )
        .unwrap();
        assert!(estimate.breakdown.is_empty());
        assert_eq!(estimate.resource_count, 12);
    }

    #[test]
    fn test_api_error_message_preference() {
        let err = ApiErrorResponse {
            error: Some("bad".to_string()),
            message: None,
            detail: Some("detail".to_string()),
        };
        assert_eq!(err.get_message(), "bad");
        let err = ApiErrorResponse {
            error: None,
            message: None,
            detail: Some("Relay not found".to_string()),
        };
        assert_eq!(err.get_message(), "Relay not found");
    }
}
