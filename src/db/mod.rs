//! Persistent local state.
//!
//! Each entity lives as one JSON value under a fixed key. Mutations are
//! read-modify-write sequences over the whole value, serialized per key by
//! [`Store::lock`]. Two processes sharing a data directory can still lose
//! updates; splitting collections into per-entity keys with a generation
//! counter would close that gap.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::info;

use crate::config::{Config, StorageBackend};
use crate::error::{Error, StorageError};

pub mod kv;
pub mod repositories;

pub use kv::{FileStore, KeyValueStore, MemoryStore};
pub use repositories::preferences::PreferenceRepository;
pub use repositories::session::SessionRepository;
pub use repositories::watchlist::WatchlistRepository;

pub const WATCHLIST_KEY: &str = "watchlist";
pub const DARK_MODE_KEY: &str = "isDarkMode";
pub const PROFILE_IMAGE_KEY: &str = "profileImage";
pub const SESSION_KEY: &str = "user";

#[derive(Clone)]
pub struct Store {
    backend: Arc<dyn KeyValueStore>,
    locks: Arc<Mutex<HashMap<String, Arc<Mutex<()>>>>>,
}

impl Store {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self {
            backend,
            locks: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        match config.general.storage {
            StorageBackend::File => {
                info!("Using file storage at {}", config.general.data_path);
                Self::new(Arc::new(FileStore::new(&config.general.data_path)))
            }
            StorageBackend::Memory => {
                info!("Using in-memory storage; nothing will be persisted");
                Self::in_memory()
            }
        }
    }

    #[must_use]
    pub fn watchlist(&self) -> WatchlistRepository {
        WatchlistRepository::new(self.clone())
    }

    #[must_use]
    pub fn preferences(&self) -> PreferenceRepository {
        PreferenceRepository::new(self.clone())
    }

    #[must_use]
    pub fn sessions(&self) -> SessionRepository {
        SessionRepository::new(self.clone())
    }

    /// Acquires the write lock for `key`. Hold the guard across the whole
    /// read-modify-write sequence.
    pub async fn lock(&self, key: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            locks
                .entry(key.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        lock.lock_owned().await
    }

    pub async fn get_raw(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.backend.get(key).await
    }

    pub async fn set_raw(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.backend.set(key, value).await
    }

    pub async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.backend.remove(key).await
    }

    /// Reads and decodes the value under `key`.
    ///
    /// Fails with [`Error::Storage`] when the backend fails and
    /// [`Error::Corrupted`] when the stored text is not the expected JSON.
    pub async fn read_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, Error> {
        let Some(raw) = self.get_raw(key).await? else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| Error::corrupted(key, &e))
    }

    pub async fn write_json<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
    ) -> Result<(), StorageError> {
        let json = serde_json::to_string(value).map_err(|e| StorageError::Serialize {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        self.set_raw(key, &json).await
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, Ordering};

    /// Memory store whose reads and/or writes can be made to fail.
    #[derive(Default)]
    pub struct FlakyStore {
        inner: MemoryStore,
        pub fail_reads: AtomicBool,
        pub fail_writes: AtomicBool,
    }

    impl FlakyStore {
        pub fn failing_writes() -> Arc<Self> {
            let store = Self::default();
            store.fail_writes.store(true, Ordering::SeqCst);
            Arc::new(store)
        }

        pub fn failing_reads() -> Arc<Self> {
            let store = Self::default();
            store.fail_reads.store(true, Ordering::SeqCst);
            Arc::new(store)
        }
    }

    fn io_failure() -> StorageError {
        StorageError::Io(std::io::Error::other("device unavailable"))
    }

    #[async_trait]
    impl KeyValueStore for FlakyStore {
        async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            if self.fail_reads.load(Ordering::SeqCst) {
                return Err(io_failure());
            }
            self.inner.get(key).await
        }

        async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(io_failure());
            }
            self.inner.set(key, value).await
        }

        async fn remove(&self, key: &str) -> Result<(), StorageError> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(io_failure());
            }
            self.inner.remove(key).await
        }
    }
}
