use tracing::info;

use crate::db::{DARK_MODE_KEY, PROFILE_IMAGE_KEY, Store};
use crate::error::{Error, StorageError, recover};
use crate::models::Theme;

pub const DEFAULT_DARK_MODE: bool = true;

/// Dark-mode flag and profile image reference. Neither is ever deleted.
pub struct PreferenceRepository {
    store: Store,
}

impl PreferenceRepository {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    /// Defaults to dark when the flag is unset or unreadable.
    pub async fn dark_mode(&self) -> bool {
        let stored = self.store.read_json::<bool>(DARK_MODE_KEY).await;
        recover(stored, None, "Failed to load theme preference").unwrap_or(DEFAULT_DARK_MODE)
    }

    pub async fn set_dark_mode(&self, dark: bool) -> Result<(), StorageError> {
        let _guard = self.store.lock(DARK_MODE_KEY).await;
        self.store.write_json(DARK_MODE_KEY, &dark).await?;
        info!(dark, "Saved theme preference");
        Ok(())
    }

    /// Flips the stored flag and returns the new value.
    pub async fn toggle_dark_mode(&self) -> Result<bool, StorageError> {
        let _guard = self.store.lock(DARK_MODE_KEY).await;
        let current = match self.store.read_json::<bool>(DARK_MODE_KEY).await {
            Ok(value) => value.unwrap_or(DEFAULT_DARK_MODE),
            Err(Error::Storage(err)) => return Err(err),
            Err(_) => DEFAULT_DARK_MODE,
        };

        let next = !current;
        self.store.write_json(DARK_MODE_KEY, &next).await?;
        info!(dark = next, "Toggled theme preference");
        Ok(next)
    }

    pub async fn theme(&self) -> Theme {
        Theme::for_mode(self.dark_mode().await)
    }

    /// The stored reference is JSON text, but plain text left by older
    /// installs is returned as is.
    pub async fn profile_image(&self) -> Option<String> {
        let raw = recover(
            self.store.get_raw(PROFILE_IMAGE_KEY).await,
            None,
            "Failed to load profile image",
        )?;

        let reference = serde_json::from_str::<String>(&raw).unwrap_or(raw);
        (!reference.is_empty()).then_some(reference)
    }

    pub async fn set_profile_image(&self, reference: &str) -> Result<(), StorageError> {
        let _guard = self.store.lock(PROFILE_IMAGE_KEY).await;
        self.store.write_json(PROFILE_IMAGE_KEY, reference).await?;
        info!("Saved profile image");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::FlakyStore;

    #[tokio::test]
    async fn test_dark_mode_defaults_to_true() {
        let prefs = Store::in_memory().preferences();
        assert!(prefs.dark_mode().await);
        assert!(prefs.theme().await.is_dark_mode);
    }

    #[tokio::test]
    async fn test_dark_mode_round_trip() {
        let prefs = Store::in_memory().preferences();
        for value in [false, true, false] {
            prefs.set_dark_mode(value).await.unwrap();
            assert_eq!(prefs.dark_mode().await, value);
        }
    }

    #[tokio::test]
    async fn test_unparsable_flag_uses_default() {
        let store = Store::in_memory();
        store.set_raw(DARK_MODE_KEY, "maybe").await.unwrap();
        assert!(store.preferences().dark_mode().await);
    }

    #[tokio::test]
    async fn test_toggle_dark_mode() {
        let prefs = Store::in_memory().preferences();
        assert!(!prefs.toggle_dark_mode().await.unwrap());
        assert!(!prefs.dark_mode().await);
        assert_eq!(prefs.theme().await, Theme::LIGHT);
        assert!(prefs.toggle_dark_mode().await.unwrap());
    }

    #[tokio::test]
    async fn test_profile_image() {
        let store = Store::in_memory();
        let prefs = store.preferences();
        assert!(prefs.profile_image().await.is_none());

        prefs
            .set_profile_image("file:///photos/avatar.jpg")
            .await
            .unwrap();
        assert_eq!(
            prefs.profile_image().await.as_deref(),
            Some("file:///photos/avatar.jpg")
        );
        assert_eq!(
            store.get_raw(PROFILE_IMAGE_KEY).await.unwrap().as_deref(),
            Some("\"file:///photos/avatar.jpg\"")
        );
    }

    #[tokio::test]
    async fn test_profile_image_plain_text() {
        let store = Store::in_memory();
        store
            .set_raw(PROFILE_IMAGE_KEY, "content://media/42")
            .await
            .unwrap();
        assert_eq!(
            store.preferences().profile_image().await.as_deref(),
            Some("content://media/42")
        );
    }

    #[tokio::test]
    async fn test_failures() {
        let prefs = Store::new(FlakyStore::failing_writes()).preferences();
        assert!(prefs.set_dark_mode(false).await.is_err());
        assert!(prefs.dark_mode().await);

        let prefs = Store::new(FlakyStore::failing_reads()).preferences();
        assert!(prefs.dark_mode().await);
        assert!(prefs.profile_image().await.is_none());
        assert!(prefs.toggle_dark_mode().await.is_err());
    }
}
