//! Platform API client for relay provisioning
//!
//! Provides access to the provisioning backend: resource estimates,
//! deployment jobs and the relay registry.

use super::backend::RelayBackend;
use super::error::{PlatformApiError, Result};
use super::types::{
    ApiErrorResponse, CancelDeploymentResponse, DeploymentConfig, DeploymentRun, RelayList,
    ResourceEstimate, StartDeploymentResponse,
};
use crate::config::types::ApiConfig;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// User agent for API requests
const USER_AGENT: &str = concat!("relay-ctl/", env!("CARGO_PKG_VERSION"));

/// Request timeout used when none is configured
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Client for interacting with the relay platform API
pub struct PlatformApiClient {
    /// HTTP client with configured timeout and headers
    http_client: Client,
    /// Base API URL, without trailing slash
    api_url: String,
    /// Bearer token, if configured
    api_token: Option<String>,
}

impl PlatformApiClient {
    /// Create a client from the `[api]` configuration section
    pub fn new(config: &ApiConfig) -> Result<Self> {
        Self::build(
            &config.url,
            config.token.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    /// Create an unauthenticated client with a custom API URL
    pub fn with_url(api_url: impl Into<String>) -> Result<Self> {
        Self::build(
            &api_url.into(),
            None,
            Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        )
    }

    fn build(api_url: &str, api_token: Option<String>, timeout: Duration) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(PlatformApiError::HttpError)?;

        Ok(Self {
            http_client,
            api_url: api_url.trim().trim_end_matches('/').to_string(),
            api_token: api_token.filter(|t| !t.trim().is_empty()),
        })
    }

    /// Get the configured API URL
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Make a GET request
    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{}", self.api_url, path);
        log::debug!("GET {}", url);

        let response = self.authorize(self.http_client.get(&url)).send().await?;

        self.handle_response(response).await
    }

    /// Make a POST request with a JSON body
    async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let url = format!("{}{}", self.api_url, path);
        log::debug!("POST {}", url);

        let response = self
            .authorize(self.http_client.post(&url))
            .json(body)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Handle the HTTP response, converting errors appropriately
    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T> {
        let status = response.status();

        if status.is_success() {
            response
                .json::<T>()
                .await
                .map_err(|e| PlatformApiError::ParseError(e.to_string()))
        } else {
            let status_code = status.as_u16();
            let error_body = response.text().await.unwrap_or_default();
            let error_message = serde_json::from_str::<ApiErrorResponse>(&error_body)
                .map(|e| e.get_message())
                .unwrap_or_else(|_| error_body.clone());

            match status_code {
                401 => Err(PlatformApiError::Unauthorized),
                403 => Err(PlatformApiError::PermissionDenied(error_message)),
                404 => Err(PlatformApiError::NotFound(error_message)),
                429 => Err(PlatformApiError::RateLimited),
                500..=599 => Err(PlatformApiError::ServerError {
                    status: status_code,
                    message: error_message,
                }),
                _ => Err(PlatformApiError::ApiError {
                    status: status_code,
                    message: error_message,
                }),
            }
        }
    }

    // =========================================================================
    // Relay registry
    // =========================================================================

    /// List all registered relays
    ///
    /// Endpoint: GET /api/relays/
    pub async fn list_relays(&self) -> Result<RelayList> {
        self.get("/api/relays/").await
    }
}

// =============================================================================
// Deployment API methods
// =============================================================================

/// Path of one deployment; the id is encoded as a single path segment
fn deployment_path(deployment_id: &str) -> String {
    format!("/api/relays/deployments/{}", urlencoding::encode(deployment_id))
}

#[async_trait]
impl RelayBackend for PlatformApiClient {
    /// Endpoint: POST /api/relays/deployments/estimate
    async fn estimate_resources(&self, config: &DeploymentConfig) -> Result<ResourceEstimate> {
        self.post("/api/relays/deployments/estimate", config).await
    }

    /// Endpoint: POST /api/relays/deployments
    async fn start_deployment(
        &self,
        config: &DeploymentConfig,
    ) -> Result<StartDeploymentResponse> {
        log::info!(
            "Starting relay deployment on {}",
            config
                .provider
                .map(|p| p.as_str())
                .unwrap_or("unknown provider")
        );
        self.post("/api/relays/deployments", config).await
    }

    /// Endpoint: GET /api/relays/deployments/:deploymentId
    async fn get_deployment_status(&self, deployment_id: &str) -> Result<DeploymentRun> {
        self.get(&deployment_path(deployment_id)).await
    }

    /// Endpoint: POST /api/relays/deployments/:deploymentId/cancel
    async fn cancel_deployment(&self, deployment_id: &str) -> Result<CancelDeploymentResponse> {
        log::info!("Requesting cancellation of deployment {}", deployment_id);
        self.post(
            &format!("{}/cancel", deployment_path(deployment_id)),
            &serde_json::json!({}),
        )
        .await
    }
}
