use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::db::{Store, WATCHLIST_KEY};
use crate::domain::AnimeId;
use crate::error::{Error, StorageError, recover, report};
use crate::models::CatalogRecord;

/// One stored watchlist element. Elements that no longer decode as a record
/// are kept verbatim so that writing the list back never drops them.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
enum StoredEntry {
    Record(CatalogRecord),
    Opaque(Value),
}

impl StoredEntry {
    fn decode(value: Value) -> Self {
        match serde_json::from_value::<CatalogRecord>(value.clone()) {
            Ok(record) => Self::Record(record),
            Err(e) => {
                warn!("Keeping unreadable watchlist entry as stored: {e}");
                Self::Opaque(value)
            }
        }
    }

    fn id(&self) -> Option<AnimeId> {
        match self {
            Self::Record(record) => Some(record.id),
            Self::Opaque(value) => value
                .get("id")
                .or_else(|| value.get("mal_id"))
                .and_then(Value::as_u64)
                .and_then(|id| u32::try_from(id).ok())
                .map(AnimeId::new),
        }
    }
}

/// Ordered, unique-by-id bookmarks. Snapshots are stored as fetched and are
/// never refreshed from the catalog.
pub struct WatchlistRepository {
    store: Store,
}

impl WatchlistRepository {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    /// All readable entries in insertion order. A backend failure or a blob
    /// that is not a JSON array reads as an empty list.
    pub async fn list(&self) -> Vec<CatalogRecord> {
        let entries = recover(self.load().await, Vec::new(), "Failed to load watchlist");
        entries
            .into_iter()
            .filter_map(|entry| match entry {
                StoredEntry::Record(record) => Some(record),
                StoredEntry::Opaque(_) => None,
            })
            .collect()
    }

    pub async fn contains(&self, id: AnimeId) -> bool {
        self.list().await.iter().any(|r| r.id == id)
    }

    pub async fn count(&self) -> usize {
        self.list().await.len()
    }

    /// Appends `record` unless an entry with the same id exists.
    ///
    /// Returns `true` if the record was inserted.
    pub async fn add(&self, record: &CatalogRecord) -> Result<bool, StorageError> {
        let _guard = self.store.lock(WATCHLIST_KEY).await;
        let mut entries = self.load_for_update().await?;

        if entries.iter().any(|e| e.id() == Some(record.id)) {
            debug!(id = %record.id, "Already in watchlist");
            return Ok(false);
        }

        entries.push(StoredEntry::Record(record.clone()));
        self.store.write_json(WATCHLIST_KEY, &entries).await?;
        info!(id = %record.id, title = %record.title, "Added to watchlist");
        Ok(true)
    }

    /// Returns `true` if an entry was removed.
    pub async fn remove(&self, id: AnimeId) -> Result<bool, StorageError> {
        let _guard = self.store.lock(WATCHLIST_KEY).await;
        let mut entries = self.load_for_update().await?;

        let before = entries.len();
        entries.retain(|e| e.id() != Some(id));
        if entries.len() == before {
            debug!(%id, "Not in watchlist");
            return Ok(false);
        }

        self.store.write_json(WATCHLIST_KEY, &entries).await?;
        info!(%id, "Removed from watchlist");
        Ok(true)
    }

    /// Removes the record if present, adds it otherwise. Returns whether the
    /// record is in the watchlist afterwards.
    pub async fn toggle(&self, record: &CatalogRecord) -> Result<bool, StorageError> {
        let _guard = self.store.lock(WATCHLIST_KEY).await;
        let mut entries = self.load_for_update().await?;

        let before = entries.len();
        entries.retain(|e| e.id() != Some(record.id));
        let present = entries.len() == before;
        if present {
            entries.push(StoredEntry::Record(record.clone()));
        }

        self.store.write_json(WATCHLIST_KEY, &entries).await?;
        info!(id = %record.id, present, "Toggled watchlist entry");
        Ok(present)
    }

    pub async fn clear(&self) -> Result<(), StorageError> {
        let _guard = self.store.lock(WATCHLIST_KEY).await;
        self.store.remove(WATCHLIST_KEY).await?;
        info!("Cleared watchlist");
        Ok(())
    }

    async fn load(&self) -> Result<Vec<StoredEntry>, Error> {
        let values = self
            .store
            .read_json::<Vec<Value>>(WATCHLIST_KEY)
            .await?
            .unwrap_or_default();
        Ok(values.into_iter().map(StoredEntry::decode).collect())
    }

    // Only a blob that is not a JSON array at all is replaced by the next
    // write; a failing backend aborts the update so the stored list is left
    // untouched.
    async fn load_for_update(&self) -> Result<Vec<StoredEntry>, StorageError> {
        match self.load().await {
            Ok(entries) => Ok(entries),
            Err(Error::Storage(err)) => Err(err),
            Err(err) => {
                report(&err, "Watchlist unreadable before update");
                Ok(Vec::new())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::FlakyStore;
    use std::sync::Arc;
    use std::sync::atomic::Ordering;

    fn record(id: u32, title: &str) -> CatalogRecord {
        CatalogRecord::new(AnimeId::new(id), title)
    }

    #[tokio::test]
    async fn test_empty_when_unset() {
        let repo = Store::in_memory().watchlist();
        assert!(repo.list().await.is_empty());
        assert_eq!(repo.count().await, 0);
        assert!(!repo.contains(AnimeId::new(1)).await);
    }

    #[tokio::test]
    async fn test_add_is_idempotent() {
        let repo = Store::in_memory().watchlist();
        let r = record(1, "Cowboy Bebop");

        assert!(repo.add(&r).await.unwrap());
        assert!(!repo.add(&r).await.unwrap());

        let entries = repo.list().await;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, AnimeId::new(1));
    }

    #[tokio::test]
    async fn test_add_then_remove_restores_previous() {
        let repo = Store::in_memory().watchlist();
        repo.add(&record(7, "Mushishi")).await.unwrap();
        let before = repo.list().await;

        let r = record(30, "Neon Genesis Evangelion");
        repo.add(&r).await.unwrap();
        assert!(repo.remove(r.id).await.unwrap());

        assert_eq!(repo.list().await, before);
    }

    #[tokio::test]
    async fn test_insertion_order_preserved() {
        let repo = Store::in_memory().watchlist();
        repo.add(&record(900, "A")).await.unwrap();
        repo.add(&record(2, "B")).await.unwrap();
        repo.add(&record(45, "C")).await.unwrap();

        let ids: Vec<u32> = repo.list().await.iter().map(|r| r.id.value()).collect();
        assert_eq!(ids, vec![900, 2, 45]);
    }

    #[tokio::test]
    async fn test_remove_absent_is_noop() {
        let repo = Store::in_memory().watchlist();
        repo.add(&record(1, "A")).await.unwrap();
        assert!(!repo.remove(AnimeId::new(99)).await.unwrap());
        assert_eq!(repo.count().await, 1);
    }

    #[tokio::test]
    async fn test_toggle() {
        let repo = Store::in_memory().watchlist();
        let r = record(5, "Frieren");

        assert!(repo.toggle(&r).await.unwrap());
        assert!(repo.contains(r.id).await);

        assert!(!repo.toggle(&r).await.unwrap());
        assert!(!repo.contains(r.id).await);
    }

    #[tokio::test]
    async fn test_corrupted_blob_reads_empty() {
        let store = Store::in_memory();
        store.set_raw(WATCHLIST_KEY, "definitely not json").await.unwrap();

        let repo = store.watchlist();
        assert!(repo.list().await.is_empty());

        // The next write replaces the corrupted value.
        repo.add(&record(1, "A")).await.unwrap();
        assert_eq!(repo.count().await, 1);
    }

    #[tokio::test]
    async fn test_reads_snapshots_written_with_remote_keys() {
        let store = Store::in_memory();
        store
            .set_raw(
                WATCHLIST_KEY,
                r#"[{"mal_id": 21, "title": "One Piece", "score": 8.7, "episodes": null}]"#,
            )
            .await
            .unwrap();

        let repo = store.watchlist();
        assert!(repo.contains(AnimeId::new(21)).await);
        assert_eq!(repo.list().await[0].score, Some(8.7));
    }

    #[tokio::test]
    async fn test_off_schema_entry_does_not_cost_other_bookmarks() {
        let store = Store::in_memory();
        store
            .set_raw(
                WATCHLIST_KEY,
                r#"[
                    {"mal_id": 1, "title": "A"},
                    {"mal_id": 2, "title": "B", "episodes": -1, "score": "8.1"},
                    {"mal_id": 3, "title": "C", "genres": [{"mal_id": 1, "name": null}]},
                    {"title": "no id", "note": "kept"}
                ]"#,
            )
            .await
            .unwrap();

        let repo = store.watchlist();
        let ids = |entries: Vec<CatalogRecord>| -> Vec<u32> {
            entries.iter().map(|r| r.id.value()).collect()
        };
        assert_eq!(ids(repo.list().await), vec![1, 2, 3]);

        assert!(repo.add(&record(9, "New")).await.unwrap());
        assert_eq!(ids(repo.list().await), vec![1, 2, 3, 9]);

        assert!(repo.remove(AnimeId::new(1)).await.unwrap());
        assert!(!repo.toggle(&record(2, "B")).await.unwrap());
        assert_eq!(ids(repo.list().await), vec![3, 9]);

        // The undecodable element survives every rewrite.
        let raw = store.get_raw(WATCHLIST_KEY).await.unwrap().unwrap();
        assert!(raw.contains(r#""note":"kept""#));
    }

    #[tokio::test]
    async fn test_clear() {
        let store = Store::in_memory();
        let repo = store.watchlist();
        repo.add(&record(1, "A")).await.unwrap();
        repo.clear().await.unwrap();

        assert!(repo.list().await.is_empty());
        assert!(store.get_raw(WATCHLIST_KEY).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_write_failure_is_reported() {
        let repo = Store::new(FlakyStore::failing_writes()).watchlist();
        assert!(repo.add(&record(1, "A")).await.is_err());
        assert!(repo.list().await.is_empty());
    }

    #[tokio::test]
    async fn test_read_failure_falls_back_to_empty() {
        let flaky = Arc::new(FlakyStore::default());
        let repo = Store::new(flaky.clone()).watchlist();
        repo.add(&record(1, "A")).await.unwrap();

        flaky.fail_reads.store(true, Ordering::SeqCst);
        assert!(repo.list().await.is_empty());
        assert_eq!(repo.count().await, 0);
        assert!(repo.add(&record(2, "B")).await.is_err());

        flaky.fail_reads.store(false, Ordering::SeqCst);
        assert_eq!(repo.count().await, 1);
    }

    #[tokio::test]
    async fn test_concurrent_adds_through_one_store_are_not_lost() {
        let store = Store::in_memory();

        let tasks: Vec<_> = (1..=20)
            .map(|id| {
                let repo = store.watchlist();
                tokio::spawn(async move { repo.add(&record(id, "X")).await })
            })
            .collect();

        for task in tasks {
            task.await.unwrap().unwrap();
        }

        assert_eq!(store.watchlist().count().await, 20);
    }
}
