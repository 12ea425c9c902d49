use std::io;
use std::result::Result as StdResult;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("API error: {0}")]
    ApiError(String),
    #[error("API invalid data: {0}")]
    ApiInvalidData(String),
    #[error("API invalid format: {0}")]
    ApiInvalidFormat(String),
    #[error("API connection failed: {0}")]
    ApiConnectionFailed(String),
    #[error("API request timed out: {0}")]
    ApiTimeout(String),
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),
    #[error("Network error: {0}")]
    NetworkError(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Server error: {0}")]
    ServerError(String),
    #[error("Internal error: {0}")]
    InternalError(String),
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
}

impl Error {
    /// Short machine-readable category, reported to callers next to the message.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::ApiError(_)
            | Error::ApiConnectionFailed(_)
            | Error::ApiTimeout(_)
            | Error::RateLimitExceeded(_)
            | Error::NetworkError(_) => "upstream_unavailable",
            Error::ApiInvalidData(_) | Error::ApiInvalidFormat(_) => "upstream_invalid_response",
            Error::NotFound(_) => "not_found",
            Error::ValidationError(_) => "invalid_request",
            Error::ConfigError(_)
            | Error::ServerError(_)
            | Error::InternalError(_)
            | Error::IoError(_) => "internal",
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Error::ApiTimeout(err.to_string())
        } else if err.is_connect() {
            Error::ApiConnectionFailed(err.to_string())
        } else if err.is_decode() {
            Error::ApiInvalidFormat(err.to_string())
        } else {
            Error::NetworkError(err.to_string())
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::ApiInvalidFormat(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::ConfigError(err.to_string())
    }
}

impl From<prometheus::Error> for Error {
    fn from(err: prometheus::Error) -> Self {
        Error::InternalError(err.to_string())
    }
}

pub type Result<T> = StdResult<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(Error::ApiConnectionFailed("down".into()).kind(), "upstream_unavailable");
        assert_eq!(Error::ApiInvalidData("bad".into()).kind(), "upstream_invalid_response");
        assert_eq!(Error::NotFound("ABC".into()).kind(), "not_found");
        assert_eq!(Error::ValidationError("limit".into()).kind(), "invalid_request");
        assert_eq!(Error::ConfigError("port".into()).kind(), "internal");
    }

    #[test]
    fn test_json_error_is_invalid_format() {
        let err: Error = serde_json::from_str::<Vec<u32>>("{not json").unwrap_err().into();
        assert!(matches!(err, Error::ApiInvalidFormat(_)));
    }
}
