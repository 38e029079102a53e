//! Domain errors for the Notion synchronizer.

use thiserror::Error;

/// Domain-level errors that can occur while synchronizing a payload or record.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    #[error("Unsupported event type: {0}")]
    UnsupportedEventType(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Notion API error: {0}")]
    Remote(#[from] NotionApiError),
}

pub type DomainResult<T> = Result<T, DomainError>;

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::SerializationError(err.to_string())
    }
}

impl From<std::io::Error> for DomainError {
    fn from(err: std::io::Error) -> Self {
        DomainError::Storage(err.to_string())
    }
}

/// Errors reported by the Notion API or its transport.
///
/// Every variant is classified as either transient (eligible for retry with
/// backoff) or permanent. The retry policy only consults [`is_transient`].
///
/// [`is_transient`]: NotionApiError::is_transient
#[derive(Debug, Error)]
pub enum NotionApiError {
    /// Malformed request or schema mismatch (HTTP 400)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Missing or revoked integration token (HTTP 401)
    #[error("Unauthorized - integration token rejected")]
    Unauthorized,

    /// Integration lacks access to the resource (HTTP 403)
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Page or database does not exist or is not shared (HTTP 404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Transaction conflict while saving (HTTP 409)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Rate limit exceeded (HTTP 429)
    #[error("Rate limited - too many requests")]
    RateLimited,

    /// Server-side failure (HTTP 5xx)
    #[error("Server error ({status}): {body}")]
    ServerError { status: u16, body: String },

    /// Request deadline elapsed in the transport
    #[error("Request timeout")]
    Timeout,

    /// Connection-level failure
    #[error("Network error: {0}")]
    Network(String),

    /// Response body could not be decoded
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// Successful response without a page identifier
    #[error("Notion API response did not include a page ID")]
    MissingPageId,

    /// Any other non-success status
    #[error("Unexpected response ({status}): {body}")]
    Unexpected { status: u16, body: String },
}

impl NotionApiError {
    /// Classify a non-success HTTP status and its body.
    pub fn from_status(status: u16, body: String) -> Self {
        match status {
            400 => Self::InvalidRequest(body),
            401 => Self::Unauthorized,
            403 => Self::Forbidden(body),
            404 => Self::NotFound(body),
            409 => Self::Conflict(body),
            429 => Self::RateLimited,
            500..=599 => Self::ServerError { status, body },
            _ => Self::Unexpected { status, body },
        }
    }

    /// Returns true if this error is transient and should be retried
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::RateLimited
                | Self::Conflict(_)
                | Self::ServerError { .. }
                | Self::Timeout
                | Self::Network(_)
        )
    }

    /// Returns true if this is a permanent error that should not be retried
    pub fn is_permanent(&self) -> bool {
        !self.is_transient()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_errors() {
        assert!(NotionApiError::RateLimited.is_transient());
        assert!(NotionApiError::Timeout.is_transient());
        assert!(NotionApiError::Conflict("conflict_error".to_string()).is_transient());
        assert!(NotionApiError::ServerError {
            status: 502,
            body: "bad gateway".to_string()
        }
        .is_transient());
    }

    #[test]
    fn test_permanent_errors() {
        assert!(NotionApiError::InvalidRequest("validation_error".to_string()).is_permanent());
        assert!(NotionApiError::Unauthorized.is_permanent());
        assert!(NotionApiError::NotFound("object_not_found".to_string()).is_permanent());
        assert!(NotionApiError::MissingPageId.is_permanent());
        assert!(NotionApiError::Decode("eof".to_string()).is_permanent());
    }

    #[test]
    fn test_from_status_mapping() {
        assert!(matches!(
            NotionApiError::from_status(429, String::new()),
            NotionApiError::RateLimited
        ));
        assert!(matches!(
            NotionApiError::from_status(503, String::new()),
            NotionApiError::ServerError { status: 503, .. }
        ));
        assert!(matches!(
            NotionApiError::from_status(401, String::new()),
            NotionApiError::Unauthorized
        ));
        assert!(matches!(
            NotionApiError::from_status(418, "teapot".to_string()),
            NotionApiError::Unexpected { status: 418, .. }
        ));
    }

    #[test]
    fn test_remote_error_wraps_into_domain_error() {
        let err: DomainError = NotionApiError::RateLimited.into();
        assert!(matches!(err, DomainError::Remote(NotionApiError::RateLimited)));
        assert!(err.to_string().contains("Rate limited"));
    }
}
