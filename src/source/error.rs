//! Error types for the source layer.

use thiserror::Error;

/// Error type for HTTP operations.
///
/// Describes what went wrong without dictating recovery strategy.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Network connection failed.
    ///
    /// This includes DNS resolution failures, connection refused,
    /// and other network-level errors.
    #[error("Connection error: {0}")]
    Connection(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Request timed out.
    #[error("Request timed out")]
    Timeout,

    /// The provided URL is invalid.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

/// Error type for a single snapshot fetch.
///
/// Every variant is recoverable from the scheduler's point of view: a failed
/// tick is logged and polling continues against the last known-good snapshot.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request never produced a response.
    #[error("Transport error: {0}")]
    Transport(#[from] HttpError),

    /// The tracking page answered with a non-success status.
    #[error("Unexpected HTTP status {status}")]
    Status {
        /// The received status code.
        status: http::StatusCode,
    },

    /// The page did not contain the embedded flight payload.
    #[error("Flight payload not found in page")]
    MissingPayload,

    /// The embedded payload was not valid JSON of the expected shape.
    #[error("Failed to parse flight payload: {0}")]
    Parse(#[from] serde_json::Error),

    /// The payload listed no flights for the target.
    #[error("No flight data for target")]
    NoFlight,

    /// The source could not serve the request for another reason.
    #[error("Source unavailable: {message}")]
    Unavailable {
        /// Description of the failure.
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_names_code() {
        let error = FetchError::Status {
            status: http::StatusCode::SERVICE_UNAVAILABLE,
        };
        assert!(error.to_string().contains("503"));
    }

    #[test]
    fn transport_error_keeps_source() {
        let error = FetchError::from(HttpError::Timeout);

        assert!(matches!(error, FetchError::Transport(HttpError::Timeout)));
        assert!(std::error::Error::source(&error).is_some());
    }

    #[test]
    fn parse_error_converts_from_serde() {
        let serde_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error = FetchError::from(serde_error);

        assert!(matches!(error, FetchError::Parse(_)));
        assert!(error.to_string().starts_with("Failed to parse flight payload"));
    }

    #[test]
    fn unavailable_displays_message() {
        let error = FetchError::Unavailable {
            message: "maintenance".to_string(),
        };
        assert!(error.to_string().contains("maintenance"));
    }
}
