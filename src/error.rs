//! Error taxonomy shared by the catalog client and the repositories.
//!
//! Every swallow-and-log boundary in the crate funnels through [`recover`], so
//! the log level and message shape depend only on the [`ErrorKind`] of the
//! failure and not on the call site.

use thiserror::Error;
use tracing::{error, warn};

/// Failures talking to the remote catalog.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Catalog API error: {status} - {body}")]
    Status { status: u16, body: String },

    #[error("Malformed catalog response: {0}")]
    Decode(String),
}

impl TransportError {
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::Status { status: 404, .. })
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for TransportError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

/// Failures of the underlying key-value store.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize value for '{key}': {message}")]
    Serialize { key: String, message: String },

    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Input rejected before any asynchronous work starts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Email and password are required")]
    MissingCredentials,

    #[error("Invalid email address: {0}")]
    InvalidEmail(String),

    #[error("Only @{0} addresses are accepted")]
    DomainNotAllowed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Transport,
    Storage,
    Validation,
    Corrupted,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Stored value under '{key}' is corrupted: {message}")]
    Corrupted { key: String, message: String },
}

impl Error {
    pub fn corrupted(key: &str, err: &serde_json::Error) -> Self {
        Self::Corrupted {
            key: key.to_string(),
            message: err.to_string(),
        }
    }

    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Transport(_) => ErrorKind::Transport,
            Self::Storage(_) => ErrorKind::Storage,
            Self::Validation(_) => ErrorKind::Validation,
            Self::Corrupted { .. } => ErrorKind::Corrupted,
        }
    }
}

/// Logs `err` according to its kind.
pub fn report(err: &Error, context: &str) {
    match err.kind() {
        ErrorKind::Storage => error!(kind = "storage", "{context}: {err}"),
        ErrorKind::Transport => warn!(kind = "transport", "{context}: {err}"),
        ErrorKind::Corrupted => warn!(kind = "corrupted", "{context}: {err}; treating as empty"),
        ErrorKind::Validation => warn!(kind = "validation", "{context}: {err}"),
    }
}

/// Unwraps `result`, or logs the failure and returns `fallback`.
pub fn recover<T, E>(result: Result<T, E>, fallback: T, context: &str) -> T
where
    E: Into<Error>,
{
    match result {
        Ok(value) => value,
        Err(err) => {
            report(&err.into(), context);
            fallback
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        let err: Error = TransportError::Timeout.into();
        assert_eq!(err.kind(), ErrorKind::Transport);

        let err: Error = StorageError::Backend("disk full".to_string()).into();
        assert_eq!(err.kind(), ErrorKind::Storage);

        let err: Error = ValidationError::MissingCredentials.into();
        assert_eq!(err.kind(), ErrorKind::Validation);

        let json_err = serde_json::from_str::<Vec<i32>>("not json").unwrap_err();
        assert_eq!(Error::corrupted("watchlist", &json_err).kind(), ErrorKind::Corrupted);
    }

    #[test]
    fn test_recover_returns_fallback() {
        let failed: Result<Vec<i32>, TransportError> = Err(TransportError::Network("down".into()));
        assert!(recover(failed, Vec::new(), "trending").is_empty());

        let ok: Result<i32, StorageError> = Ok(7);
        assert_eq!(recover(ok, 0, "count"), 7);
    }

    #[test]
    fn test_not_found_detection() {
        let err = TransportError::Status {
            status: 404,
            body: String::new(),
        };
        assert!(err.is_not_found());
        assert!(!TransportError::Timeout.is_not_found());
    }
}
