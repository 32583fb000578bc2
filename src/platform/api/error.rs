//! Error types for the control plane API client

use thiserror::Error;

/// Errors that can occur when talking to the provisioning control plane
#[derive(Debug, Error)]
pub enum PlatformApiError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// API returned an error response
    #[error("API error ({status}): {message}")]
    ApiError { status: u16, message: String },

    /// Failed to parse the API response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// No usable access token - needs `infractl auth login`
    #[error("Not authenticated - run `infractl auth login` first")]
    Unauthorized,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Rate limit exceeded - please try again later")]
    RateLimited,

    /// Server error (5xx)
    #[error("Server error ({status}): {message}")]
    ServerError { status: u16, message: String },
}

impl PlatformApiError {
    /// Map a non-success HTTP status and its decoded message to an error
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            401 => PlatformApiError::Unauthorized,
            403 => PlatformApiError::PermissionDenied(message),
            404 => PlatformApiError::NotFound(message),
            429 => PlatformApiError::RateLimited,
            500..=599 => PlatformApiError::ServerError { status, message },
            _ => PlatformApiError::ApiError { status, message },
        }
    }

    /// Whether repeating the same request later may succeed
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            PlatformApiError::HttpError(_)
                | PlatformApiError::RateLimited
                | PlatformApiError::ServerError { .. }
        )
    }
}

/// Result type alias for API operations
pub type Result<T> = std::result::Result<T, PlatformApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_mapping() {
        assert!(matches!(
            PlatformApiError::from_status(401, String::new()),
            PlatformApiError::Unauthorized
        ));
        assert!(matches!(
            PlatformApiError::from_status(404, "infra 9".into()),
            PlatformApiError::NotFound(m) if m == "infra 9"
        ));
        assert!(matches!(
            PlatformApiError::from_status(503, "down".into()),
            PlatformApiError::ServerError { status: 503, .. }
        ));
        let err = PlatformApiError::from_status(422, "bad values".into());
        assert!(err.to_string().contains("422"));
        assert!(err.to_string().contains("bad values"));
    }

    #[test]
    fn test_transient_errors() {
        assert!(PlatformApiError::RateLimited.is_transient());
        assert!(PlatformApiError::from_status(502, "bad gateway".into()).is_transient());
        assert!(!PlatformApiError::Unauthorized.is_transient());
        assert!(!PlatformApiError::from_status(404, "gone".into()).is_transient());
        assert!(!PlatformApiError::ParseError("eof".into()).is_transient());
    }

    #[test]
    fn test_error_messages() {
        assert!(PlatformApiError::Unauthorized
            .to_string()
            .contains("infractl auth login"));
        assert!(PlatformApiError::RateLimited.to_string().contains("Rate limit"));
        let parse = PlatformApiError::ParseError("invalid json".to_string());
        assert!(parse.to_string().contains("invalid json"));
    }
}
