use tracing::debug;

use crate::db::{SESSION_KEY, Store};
use crate::error::{StorageError, recover};
use crate::models::SessionRecord;

pub struct SessionRepository {
    store: Store,
}

impl SessionRepository {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    /// The stored session, if any. Unreadable or corrupted data counts as
    /// signed out.
    pub async fn get(&self) -> Option<SessionRecord> {
        recover(
            self.store.read_json::<SessionRecord>(SESSION_KEY).await,
            None,
            "Failed to load session",
        )
    }

    pub async fn save(&self, record: &SessionRecord) -> Result<(), StorageError> {
        let _guard = self.store.lock(SESSION_KEY).await;
        self.store.write_json(SESSION_KEY, record).await?;
        debug!(email = %record.email, "Saved session");
        Ok(())
    }

    pub async fn clear(&self) -> Result<(), StorageError> {
        let _guard = self.store.lock(SESSION_KEY).await;
        self.store.remove(SESSION_KEY).await?;
        debug!("Cleared session");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_save_get_clear() {
        let store = Store::in_memory();
        let sessions = store.sessions();
        assert!(sessions.get().await.is_none());

        let record = SessionRecord::from_email("faye@bebop.com");
        sessions.save(&record).await.unwrap();
        assert_eq!(sessions.get().await, Some(record));

        sessions.clear().await.unwrap();
        assert!(sessions.get().await.is_none());
        assert!(store.get_raw(SESSION_KEY).await.unwrap().is_none());

        sessions.clear().await.unwrap();
    }

    #[tokio::test]
    async fn test_corrupted_session_reads_as_signed_out() {
        let store = Store::in_memory();
        store.set_raw(SESSION_KEY, "[1, 2").await.unwrap();
        assert!(store.sessions().get().await.is_none());
    }
}
