//! Local stand-in for a real authentication backend.

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{error, info};

use crate::config::SessionConfig;
use crate::db::SessionRepository;
use crate::models::SessionRecord;
use crate::services::auth_service::{AuthError, AuthService, SessionState, validate_credentials};

pub struct DemoAuthService {
    sessions: SessionRepository,
    state: RwLock<SessionState>,
    delay: Duration,
    allowed_domain: Option<String>,
}

impl DemoAuthService {
    #[must_use]
    pub fn new(sessions: SessionRepository, config: &SessionConfig) -> Self {
        Self {
            sessions,
            state: RwLock::new(SessionState::Loading),
            delay: config.simulated_delay(),
            allowed_domain: config.allowed_email_domain.clone(),
        }
    }

    async fn authenticate(&self, email: &str, password: &str) -> Result<SessionRecord, AuthError> {
        validate_credentials(email, password, self.allowed_domain.as_deref())?;

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let record = SessionRecord::from_email(email.trim());
        self.sessions.save(&record).await?;

        *self.state.write().await = SessionState::Authenticated(record.clone());
        info!(email = %record.email, "Signed in");
        Ok(record)
    }
}

#[async_trait]
impl AuthService for DemoAuthService {
    async fn restore(&self) -> SessionState {
        let restored = match self.sessions.get().await {
            Some(user) => SessionState::Authenticated(user),
            None => SessionState::Anonymous,
        };

        let mut state = self.state.write().await;
        // A sign-in that finished before the read wins over the stored value.
        if *state == SessionState::Loading {
            *state = restored;
        }
        state.clone()
    }

    async fn state(&self) -> SessionState {
        self.state.read().await.clone()
    }

    async fn login(&self, email: &str, password: &str) -> Result<SessionRecord, AuthError> {
        self.authenticate(email, password).await
    }

    async fn signup(&self, email: &str, password: &str) -> Result<SessionRecord, AuthError> {
        let record = self.authenticate(email, password).await?;
        info!(email = %record.email, "Created demo account");
        Ok(record)
    }

    async fn logout(&self) {
        if let Err(e) = self.sessions.clear().await {
            error!("Failed to remove stored session: {e}");
        }
        *self.state.write().await = SessionState::Anonymous;
        info!("Signed out");
    }
}
