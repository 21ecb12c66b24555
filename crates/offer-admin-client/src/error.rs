//! Error types for backend calls

use thiserror::Error;

/// Result type alias for client operations
pub type ClientResult<T> = Result<T, ClientError>;

/// HTTP status the backend uses for rate limiting
pub const TOO_MANY_REQUESTS: u16 = 429;

/// Errors that can occur while talking to the backend
#[derive(Error, Debug)]
pub enum ClientError {
    /// Transport failure: connection refused, timeout, TLS, ...
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status
    #[error("Request failed with status code {status}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, kept for logging
        body: String,
    },

    /// An authenticated endpoint was called without a bearer token
    #[error("No authentication token available")]
    MissingToken,

    /// The response body did not match the expected shape
    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Invalid client configuration
    #[error("Invalid configuration: {message}")]
    Configuration {
        /// Error message
        message: String,
    },

    /// Error bubbled up from the core crate
    #[error(transparent)]
    Core(#[from] offer_admin_core::Error),
}

impl ClientError {
    /// Create a status error
    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self::Status {
            status,
            body: body.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// HTTP status carried by this error, if any
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Http(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Whether the backend rejected the call for rate limiting
    pub fn is_rate_limited(&self) -> bool {
        self.status_code() == Some(TOO_MANY_REQUESTS)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::missing_panics_doc)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_status_message_matches_backend_wording() {
        let err = ClientError::status(500, "boom");
        assert_eq!(err.to_string(), "Request failed with status code 500");
        assert_eq!(err.status_code(), Some(500));
        assert!(!err.is_rate_limited());
    }

    #[test]
    fn test_rate_limited_detection() {
        assert!(ClientError::status(TOO_MANY_REQUESTS, "").is_rate_limited());
        assert!(!ClientError::MissingToken.is_rate_limited());
        assert!(ClientError::MissingToken.status_code().is_none());
    }

    #[test]
    fn test_decode_error_conversion() {
        let json_err = serde_json::from_str::<u32>("nope").unwrap_err();
        let err = ClientError::from(json_err);
        assert!(err.to_string().starts_with("Failed to decode response"));
    }

    #[test]
    fn test_core_error_is_transparent() {
        let err = ClientError::from(offer_admin_core::Error::configuration("bad"));
        assert_eq!(err.to_string(), "Configuration error: bad");
    }
}
