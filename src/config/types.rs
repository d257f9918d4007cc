use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub deployment: DeploymentSettings,
}

/// Provisioning backend connection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the relay provisioning API
    pub url: String,
    /// Bearer token (prefer RELAY_API_TOKEN over storing it in the file)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Per-request HTTP timeout
    pub request_timeout_secs: u64,
}

/// Wizard and deployment orchestration tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeploymentSettings {
    /// Upper bound for a single estimate request
    pub estimate_timeout_secs: u64,
    /// Delay between deployment status polls
    pub poll_interval_secs: u64,
    /// Consecutive failed polls tolerated before the run is declared lost
    pub max_consecutive_poll_failures: u32,
    /// Monthly cost above which the confirmation shows a warning
    pub cost_warning_threshold: f64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:8000".to_string(),
            token: None,
            request_timeout_secs: 30,
        }
    }
}

impl Default for DeploymentSettings {
    fn default() -> Self {
        Self {
            estimate_timeout_secs: 20,
            poll_interval_secs: 3,
            max_consecutive_poll_failures: 5,
            cost_warning_threshold: 200.0,
        }
    }
}

impl DeploymentSettings {
    pub fn estimate_timeout(&self) -> Duration {
        Duration::from_secs(self.estimate_timeout_secs.max(1))
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }
}

impl Config {
    /// Apply command-line / environment overrides on top of file values
    pub fn with_overrides(mut self, api_url: Option<String>, api_token: Option<String>) -> Self {
        if let Some(url) = api_url.filter(|u| !u.trim().is_empty()) {
            self.api.url = url;
        }
        if let Some(token) = api_token.filter(|t| !t.trim().is_empty()) {
            self.api.token = Some(token);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
            [api]
            url = "https://relay.example.com"

            [deployment]
            poll_interval_secs = 10
            "#,
        )
        .unwrap();

        assert_eq!(config.api.url, "https://relay.example.com");
        assert_eq!(config.api.request_timeout_secs, 30);
        assert_eq!(config.deployment.poll_interval_secs, 10);
        assert_eq!(config.deployment.max_consecutive_poll_failures, 5);
        assert_eq!(config.deployment.cost_warning_threshold, 200.0);
    }

    #[test]
    fn test_zero_durations_are_clamped() {
        let settings = DeploymentSettings {
            poll_interval_secs: 0,
            estimate_timeout_secs: 0,
            ..Default::default()
        };
        assert_eq!(settings.poll_interval(), Duration::from_secs(1));
        assert_eq!(settings.estimate_timeout(), Duration::from_secs(1));
    }

    #[test]
    fn test_overrides() {
        let config = Config::default().with_overrides(
            Some("https://override.example.com".to_string()),
            Some(String::new()),
        );
        assert_eq!(config.api.url, "https://override.example.com");
        assert!(config.api.token.is_none());
    }
}
