/// Unified error handling module
use thiserror::Error;

/// Shown when a failure carries no usable message
pub const FALLBACK_MESSAGE: &str = "Failed to load data";

/// Failure of a single `/quakes` query.
///
/// Built where the raw failure is caught; the display string is what the
/// alert panel shows.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Service unreachable, timed out, or answered with a non-2xx status
    #[error("{message}")]
    NetworkFailure {
        message: String,
        status: Option<u16>,
    },
    /// Body did not match the expected payload shape
    #[error("{0}")]
    DecodeFailure(String),
    #[error("Failed to load data")]
    Unknown,
}

impl FetchError {
    pub fn network(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.trim().is_empty() {
            return FetchError::Unknown;
        }
        FetchError::NetworkFailure {
            message,
            status: None,
        }
    }

    pub fn status(code: u16) -> Self {
        FetchError::NetworkFailure {
            message: format!("Request failed with status code {}", code),
            status: Some(code),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.trim().is_empty() {
            return FetchError::Unknown;
        }
        FetchError::DecodeFailure(message)
    }

    /// Stable code used in logs
    pub fn code(&self) -> &'static str {
        match self {
            FetchError::NetworkFailure {
                status: Some(status),
                ..
            } => match status {
                403 => "UPSTREAM_403",
                404 => "UPSTREAM_404",
                429 => "UPSTREAM_429",
                500..=599 => "UPSTREAM_5XX",
                _ => "UPSTREAM_ERROR",
            },
            FetchError::NetworkFailure { status: None, .. } => "NETWORK_FAILURE",
            FetchError::DecodeFailure(_) => "DECODE_FAILURE",
            FetchError::Unknown => "UNKNOWN",
        }
    }

    /// Message for the error panel, never empty
    pub fn user_message(&self) -> String {
        let message = self.to_string();
        if message.trim().is_empty() {
            FALLBACK_MESSAGE.to_string()
        } else {
            message
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return FetchError::status(status.as_u16());
        }
        if err.is_decode() {
            return FetchError::decode(err.to_string());
        }
        if err.is_timeout() {
            return FetchError::network(format!("Request timed out: {}", err));
        }
        FetchError::network(err.to_string())
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::decode(format!("Malformed response: {}", err))
    }
}

/// Type alias for query results
pub type ApiResult<T> = Result<T, FetchError>;
