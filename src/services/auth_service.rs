//! Domain service for the demo sign-in flow.
//!
//! There is no credential check: any well-formed email with a non-empty
//! password signs in after a simulated round trip.

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;
use thiserror::Error;

use crate::error::{StorageError, ValidationError};
use crate::models::SessionRecord;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Failed to persist session: {0}")]
    Storage(#[from] StorageError),
}

/// Which screens a consumer may show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "user")]
pub enum SessionState {
    /// The stored session has not been read yet.
    Loading,
    Anonymous,
    Authenticated(SessionRecord),
}

impl SessionState {
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    #[must_use]
    pub const fn user(&self) -> Option<&SessionRecord> {
        match self {
            Self::Authenticated(user) => Some(user),
            _ => None,
        }
    }
}

#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Reads the persisted session once and leaves the `Loading` state.
    async fn restore(&self) -> SessionState;

    async fn state(&self) -> SessionState;

    async fn current_user(&self) -> Option<SessionRecord> {
        self.state().await.user().cloned()
    }

    /// # Errors
    ///
    /// Returns [`AuthError::Validation`] before any delay if the input is
    /// rejected, and [`AuthError::Storage`] if the session cannot be saved.
    async fn login(&self, email: &str, password: &str) -> Result<SessionRecord, AuthError>;

    /// Same contract as [`AuthService::login`]; the demo creates the account
    /// unconditionally.
    async fn signup(&self, email: &str, password: &str) -> Result<SessionRecord, AuthError>;

    /// Always ends signed out, even if the stored session cannot be deleted.
    async fn logout(&self);
}

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Invalid regex"))
}

/// Checks credentials before any asynchronous work starts.
pub fn validate_credentials(
    email: &str,
    password: &str,
    allowed_domain: Option<&str>,
) -> Result<(), ValidationError> {
    let email = email.trim();
    if email.is_empty() || password.is_empty() {
        return Err(ValidationError::MissingCredentials);
    }

    if !email_regex().is_match(email) {
        return Err(ValidationError::InvalidEmail(email.to_string()));
    }

    if let Some(domain) = allowed_domain {
        let matches = email
            .rsplit_once('@')
            .is_some_and(|(_, d)| d.eq_ignore_ascii_case(domain));
        if !matches {
            return Err(ValidationError::DomainNotAllowed(domain.to_string()));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_credentials() {
        assert!(validate_credentials("a@b.com", "x", None).is_ok());
        assert_eq!(
            validate_credentials("", "x", None),
            Err(ValidationError::MissingCredentials)
        );
        assert_eq!(
            validate_credentials("a@b.com", "", None),
            Err(ValidationError::MissingCredentials)
        );
        assert!(matches!(
            validate_credentials("not-an-email", "x", None),
            Err(ValidationError::InvalidEmail(_))
        ));
        assert!(matches!(
            validate_credentials("a b@c.com", "x", None),
            Err(ValidationError::InvalidEmail(_))
        ));
    }

    #[test]
    fn test_email_pattern() {
        let re = email_regex();
        assert!(re.is_match("spike.spiegel@bebop.co.jp"));
        assert!(!re.is_match("@bebop.com"));
        assert!(!re.is_match("spike@bebop"));
        assert!(!re.is_match("spike@@bebop.com"));
    }

    #[test]
    fn test_domain_restriction() {
        assert!(validate_credentials("ed@Gmail.com", "pw", Some("gmail.com")).is_ok());
        assert_eq!(
            validate_credentials("ed@bebop.com", "pw", Some("gmail.com")),
            Err(ValidationError::DomainNotAllowed("gmail.com".to_string()))
        );
    }

    #[test]
    fn test_session_state_helpers() {
        let user = SessionRecord::from_email("jet@bebop.com");
        let state = SessionState::Authenticated(user.clone());
        assert!(state.is_authenticated());
        assert_eq!(state.user(), Some(&user));
        assert!(!SessionState::Loading.is_authenticated());
        assert!(SessionState::Anonymous.user().is_none());
    }
}
