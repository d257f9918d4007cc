//! Error types for the relay platform API client
//!
//! Provides structured error types for all API operations.

use thiserror::Error;

/// Errors that can occur when interacting with the relay platform API
#[derive(Debug, Error)]
pub enum PlatformApiError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// API returned an error response
    #[error("API error ({status}): {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error message from the API
        message: String,
    },

    /// Failed to parse the API response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Missing or rejected API token
    #[error("Not authenticated - set RELAY_API_TOKEN or pass --api-token")]
    Unauthorized,

    /// Requested resource was not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Token does not grant the requested operation
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded - please try again later")]
    RateLimited,

    /// Server error
    #[error("Server error ({status}): {message}")]
    ServerError {
        /// HTTP status code (5xx)
        status: u16,
        /// Error message
        message: String,
    },
}

/// Result type alias for platform API operations
pub type Result<T> = std::result::Result<T, PlatformApiError>;
