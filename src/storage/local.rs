//! Local filesystem storage implementation.
//!
//! All listings live in a single `listings.json` document under the root
//! directory. Every upsert rewrites the document atomically (temp file, then
//! rename), so a crash never leaves a half-written store.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use serde::{Serialize, de::DeserializeOwned};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::error::{AppError, Result};
use crate::models::ListingRecord;
use crate::storage::{ListingStore, StoredListing, UpsertOutcome};

const LISTINGS_KEY: &str = "listings.json";

/// Local filesystem storage backend.
pub struct LocalStorage {
    root_dir: PathBuf,
    // Serializes read-modify-write cycles on listings.json
    write_lock: Mutex<()>,
}

impl LocalStorage {
    /// Create a new LocalStorage rooted at the given directory.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    /// Get the full path for a relative key.
    fn path(&self, key: &str) -> PathBuf {
        self.root_dir.join(key)
    }

    /// Ensure parent directory exists.
    async fn ensure_dir(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, key: &str, bytes: &[u8]) -> Result<()> {
        let path = self.path(key);
        self.ensure_dir(&path).await?;

        let tmp = path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }

    async fn write_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(value)?;
        self.write_bytes(key, &bytes).await
    }

    /// Read bytes, returning None if file doesn't exist.
    async fn read_bytes(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.path(key);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }

    async fn read_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.read_bytes(key).await? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    async fn read_listings(&self) -> Result<Vec<StoredListing>> {
        Ok(self.read_json(LISTINGS_KEY).await?.unwrap_or_default())
    }
}

#[async_trait]
impl ListingStore for LocalStorage {
    async fn upsert(&self, url: &str, record: &ListingRecord) -> Result<UpsertOutcome> {
        let _guard = self.write_lock.lock().await;

        let now = Utc::now();
        let mut listings = self.read_listings().await?;

        let outcome = match listings.iter_mut().find(|l| l.url == url) {
            Some(existing) => {
                existing.record = record.clone();
                existing.updated_at = now;
                UpsertOutcome::updated(url)
            }
            None => {
                listings.push(StoredListing {
                    url: url.to_string(),
                    record: record.clone(),
                    first_seen: now,
                    updated_at: now,
                });
                UpsertOutcome::created(url)
            }
        };

        self.write_json(LISTINGS_KEY, &listings).await?;
        log::info!("{} ({} listings stored)", outcome.message, listings.len());
        Ok(outcome)
    }

    async fn get(&self, url: &str) -> Result<Option<StoredListing>> {
        Ok(self
            .read_listings()
            .await?
            .into_iter()
            .find(|l| l.url == url))
    }

    async fn load_all(&self) -> Result<Vec<StoredListing>> {
        let listings = self.read_listings().await?;
        if listings.is_empty() {
            log::warn!("No listings found in {}", self.path(LISTINGS_KEY).display());
        }
        Ok(listings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn record(title: &str) -> ListingRecord {
        ListingRecord {
            title: Some(title.to_string()),
            rating: Some("4.8".to_string()),
            ..ListingRecord::empty("Не работает")
        }
    }

    #[tokio::test]
    async fn test_write_and_read() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path());

        storage.write_bytes("test.txt", b"hello").await.unwrap();
        let data = storage.read_bytes("test.txt").await.unwrap();
        assert_eq!(data, Some(b"hello".to_vec()));
        assert!(!storage.path("test.tmp").exists());
    }

    #[tokio::test]
    async fn test_read_nonexistent() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path());

        assert!(storage.read_bytes("nope.txt").await.unwrap().is_none());
        assert!(storage.load_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_upsert_creates_then_updates() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path().join("nested"));
        let url = "https://yandex.ru/maps/org/cafe/1/";

        let first = storage.upsert(url, &record("Кафе")).await.unwrap();
        assert!(first.success);
        assert!(first.created);

        let stored = storage.get(url).await.unwrap().unwrap();
        let first_seen = stored.first_seen;

        let second = storage.upsert(url, &record("Кафе Новое")).await.unwrap();
        assert!(second.success);
        assert!(!second.created);

        let all = storage.load_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].record.title.as_deref(), Some("Кафе Новое"));
        assert_eq!(all[0].first_seen, first_seen);
        assert!(all[0].updated_at >= first_seen);
    }

    #[tokio::test]
    async fn test_distinct_urls_are_kept_in_order() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path());

        storage.upsert("https://a", &record("A")).await.unwrap();
        storage.upsert("https://b", &record("B")).await.unwrap();

        let urls: Vec<_> = storage
            .load_all()
            .await
            .unwrap()
            .into_iter()
            .map(|l| l.url)
            .collect();
        assert_eq!(urls, vec!["https://a", "https://b"]);
        assert!(storage.get("https://c").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_corrupt_store_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path());
        storage.write_bytes(LISTINGS_KEY, b"{not json").await.unwrap();

        let err = storage.upsert("https://a", &record("A")).await.unwrap_err();
        assert!(matches!(err, AppError::Json(_)));
    }
}
