//! Error types for the client.
//!
//! [`ClientError::Validation`] messages are user-facing and surface in a
//! mode's status area verbatim; the other variants describe transport and
//! server failures and get the `Error: ` prefix when reported.

use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// A selection failed local validation; no request was made.
    #[error("{0}")]
    Validation(String),

    /// The request could not be completed at the transport level.
    #[error("network error: {0}")]
    Network(String),

    /// The request hit its deadline. There are no retries.
    #[error("request timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    /// The service answered with a non-2xx status.
    #[error("server returned status {status}")]
    Server { status: u16 },

    /// A JSON body could not be decoded.
    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ClientError {
    /// Map a reqwest failure, distinguishing the deadline case.
    pub fn from_reqwest(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            ClientError::Timeout(timeout)
        } else {
            ClientError::Network(err.to_string())
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, ClientError::Validation(_))
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
