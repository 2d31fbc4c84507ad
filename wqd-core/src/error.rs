/// Error types for the prediction service client
use thiserror::Error;

/// Failure of a single remote call.
///
/// Errors never propagate past the refresh controller; their `Display`
/// text is what the dashboard shows in its error banner.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// `GET /iot/latest` answered 404 or carried no reading
    #[error("no IoT data yet: waiting for the first sensor upload")]
    NotFound,

    /// Any other non-2xx status
    #[error("remote error: HTTP {status}")]
    Remote { status: u16 },

    /// The body parsed but required fields were missing or malformed
    #[error("response not valid: {0}")]
    InvalidResponse(String),

    /// The request never produced a response
    #[error("request failed: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(value: reqwest::Error) -> Self {
        ApiError::Transport(value.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(value: serde_json::Error) -> Self {
        ApiError::InvalidResponse(value.to_string())
    }
}

/// Type alias for Results using ApiError
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::ApiError;

    #[test]
    fn remote_error_mentions_status() {
        let msg = ApiError::Remote { status: 500 }.to_string();
        assert!(msg.contains("500"));
    }

    #[test]
    fn not_found_guides_the_user() {
        assert!(ApiError::NotFound.to_string().contains("no IoT data yet"));
    }

    #[test]
    fn invalid_response_says_not_valid() {
        let msg = ApiError::InvalidResponse("missing field `ci90_low`".into()).to_string();
        assert!(msg.starts_with("response not valid"));
        assert!(msg.contains("ci90_low"));
    }
}
