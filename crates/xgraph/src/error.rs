//! Client error types.

use thiserror::Error;
use xgraph_http::TransportError;

/// Errors surfaced by [`XGraphClient`](crate::XGraphClient) operations.
#[derive(Error, Debug)]
pub enum XGraphError {
    /// The API answered with an `errors` array; its first message, verbatim.
    #[error("{message}")]
    Upstream { message: String },

    /// No `rest_id` in the response: nothing matches the identifier.
    #[error("rest_id not found for {identifier}")]
    NotFound { identifier: String },

    /// A `rest_id` came back but the profile fields were withheld.
    ///
    /// The API answers this way both for accounts that do not exist and for
    /// private accounts; the two cannot be told apart from the response.
    #[error("either @{identifier} does not exist or is private")]
    PrivateOrNonexistent { identifier: String },

    /// The body did not have the expected structure.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The transport failed; passed through unchanged.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
}

impl From<serde_json::Error> for XGraphError {
    fn from(err: serde_json::Error) -> Self {
        Self::MalformedResponse(err.to_string())
    }
}

impl XGraphError {
    /// `true` when the account is missing or hidden, as opposed to the call
    /// itself failing. Retrying will not change the answer.
    #[must_use]
    pub const fn is_absent_profile(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::PrivateOrNonexistent { .. })
    }

    /// Check if this error is retryable.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(err) => err.is_retryable(),
            _ => false,
        }
    }
}

/// Result type for client operations.
pub type XGraphResult<T> = Result<T, XGraphError>;
