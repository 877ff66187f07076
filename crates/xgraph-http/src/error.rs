//! Error types for the HTTP transport.

use std::time::Duration;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// HTTP error information captured from reqwest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpErrorInfo {
    /// Error message.
    pub message: String,
    /// HTTP status code (if available).
    pub status_code: Option<u16>,
    /// Whether the error was a timeout.
    pub is_timeout: bool,
    /// Whether the error was a connection failure.
    pub is_connect: bool,
}

impl From<reqwest::Error> for HttpErrorInfo {
    fn from(err: reqwest::Error) -> Self {
        Self {
            message: err.to_string(),
            status_code: err.status().map(|status| status.as_u16()),
            is_timeout: err.is_timeout(),
            is_connect: err.is_connect(),
        }
    }
}

/// Error type for transport operations.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// HTTP/network error.
    #[error("HTTP error: {}", .0.message)]
    Http(HttpErrorInfo),

    /// Non-success HTTP status.
    #[error("HTTP status {status} with body: {body}")]
    HttpStatus {
        /// HTTP status code.
        status: StatusCode,
        /// Response body (truncated if needed).
        body: String,
        /// Retry-After duration when supplied.
        retry_after: Option<Duration>,
    },

    /// The request URL could not be built.
    #[error("invalid URL {url}: {message}")]
    InvalidUrl {
        /// The offending URL.
        url: String,
        /// Parser message.
        message: String,
    },

    /// Transport configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(HttpErrorInfo::from(err))
    }
}

impl TransportError {
    /// Returns `true` if the error is worth retrying.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http(info) => info.is_timeout || info.is_connect,
            Self::HttpStatus { status, .. } => {
                status.is_server_error() || *status == StatusCode::TOO_MANY_REQUESTS
            }
            Self::InvalidUrl { .. } | Self::Config(_) => false,
        }
    }

    /// Server-suggested delay before the next attempt.
    #[must_use]
    pub const fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::HttpStatus { retry_after, .. } => *retry_after,
            _ => None,
        }
    }

    /// HTTP status code, when one was received.
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Http(info) => info.status_code,
            Self::HttpStatus { status, .. } => Some(status.as_u16()),
            _ => None,
        }
    }
}

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn status_error(status: StatusCode) -> TransportError {
        TransportError::HttpStatus {
            status,
            body: String::new(),
            retry_after: None,
        }
    }

    #[test]
    fn server_errors_and_throttling_are_retryable() {
        assert!(status_error(StatusCode::BAD_GATEWAY).is_retryable());
        assert!(status_error(StatusCode::TOO_MANY_REQUESTS).is_retryable());
        assert!(!status_error(StatusCode::NOT_FOUND).is_retryable());
        assert!(!status_error(StatusCode::FORBIDDEN).is_retryable());
    }

    #[test]
    fn network_failures_follow_flags() {
        let timeout = TransportError::Http(HttpErrorInfo {
            message: "timed out".into(),
            status_code: None,
            is_timeout: true,
            is_connect: false,
        });
        let other = TransportError::Http(HttpErrorInfo {
            message: "builder".into(),
            status_code: None,
            is_timeout: false,
            is_connect: false,
        });
        assert!(timeout.is_retryable());
        assert!(!other.is_retryable());
        assert!(!TransportError::Config("bad header".into()).is_retryable());
    }

    #[test]
    fn retry_after_only_from_status() {
        let err = TransportError::HttpStatus {
            status: StatusCode::TOO_MANY_REQUESTS,
            body: "slow down".into(),
            retry_after: Some(Duration::from_secs(7)),
        };
        assert_eq!(err.retry_after(), Some(Duration::from_secs(7)));
        assert_eq!(err.status_code(), Some(429));
        assert_eq!(TransportError::Config("x".into()).retry_after(), None);
    }
}
