//! Errors returned by the inventory backend client.

use thiserror::Error;

/// Errors that can occur when talking to the inventory backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed (connection, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body was not valid JSON.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Backend answered 401; the token is missing or expired.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Backend answered 403.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Backend answered 404.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Any other non-success status.
    #[error("Backend returned {status}: {message}")]
    Status { status: u16, message: String },

    /// Backend answered 2xx with `success: false`.
    #[error("Request rejected: {0}")]
    Rejected(String),

    /// An endpoint URL could not be built from the base URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    /// Whether the failure is an authentication or permission problem.
    #[must_use]
    pub const fn is_auth(&self) -> bool {
        matches!(self, Self::Unauthorized(_) | Self::Forbidden(_))
    }

    /// Whether the failure points at the backend or the network rather than
    /// the request itself.
    #[must_use]
    pub fn is_server_side(&self) -> bool {
        match self {
            Self::Http(_) | Self::Parse(_) => true,
            Self::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Log the failure, sending server-side failures to Sentry.
    pub fn report(&self, operation: &str) {
        if self.is_server_side() {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                operation,
                sentry_event_id = %event_id,
                "Inventory request failed"
            );
        } else {
            tracing::error!(error = %self, operation, "Inventory request failed");
        }
    }
}
