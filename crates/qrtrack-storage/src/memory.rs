use async_trait::async_trait;
use dashmap::DashMap;
use qrtrack_core::repository::{ReadRepository, Repository, Result};
use qrtrack_core::{Link, QrCodeRecord, RecordId};
use std::sync::atomic::{AtomicI64, Ordering};

/// In-memory storage entry for a QR code record.
#[derive(Debug, Clone)]
struct Entry {
    link: Link,
    qr_image_url: String,
    scan_count: u64,
}

impl Entry {
    fn to_record(&self, id: RecordId) -> QrCodeRecord {
        QrCodeRecord {
            id,
            link: self.link.clone(),
            qr_image_url: self.qr_image_url.clone(),
            scan_count: self.scan_count,
        }
    }
}

/// In-memory implementation of the Repository trait using DashMap.
///
/// Identifiers come from a monotonically increasing counter starting at 1.
/// Counter updates happen under the entry's shard lock, so concurrent
/// increments of the same record are never lost.
#[derive(Debug)]
pub struct InMemoryRepository {
    storage: DashMap<RecordId, Entry>,
    next_id: AtomicI64,
}

impl InMemoryRepository {
    /// Creates a new in-memory repository.
    pub fn new() -> Self {
        Self {
            storage: DashMap::new(),
            next_id: AtomicI64::new(1),
        }
    }
}

impl Default for InMemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReadRepository for InMemoryRepository {
    async fn list_all(&self) -> Result<Vec<QrCodeRecord>> {
        let mut records: Vec<QrCodeRecord> = self
            .storage
            .iter()
            .map(|entry| entry.value().to_record(*entry.key()))
            .collect();
        records.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(records)
    }

    async fn fetch_by_id(&self, id: RecordId) -> Result<Option<QrCodeRecord>> {
        Ok(self.storage.get(&id).map(|entry| entry.to_record(id)))
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn create(&self, link: &Link) -> Result<RecordId> {
        let id = RecordId::new(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.storage.insert(
            id,
            Entry {
                link: link.clone(),
                qr_image_url: String::new(),
                scan_count: 0,
            },
        );
        Ok(id)
    }

    async fn set_image_url(&self, id: RecordId, url: &str) -> Result<bool> {
        let Some(mut entry) = self.storage.get_mut(&id) else {
            return Ok(false);
        };

        if !entry.qr_image_url.is_empty() {
            return Ok(false);
        }

        entry.qr_image_url = url.to_owned();
        Ok(true)
    }

    async fn increment_scan_count(&self, id: RecordId) -> Result<bool> {
        let Some(mut entry) = self.storage.get_mut(&id) else {
            return Ok(false);
        };

        entry.scan_count += 1;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn link(url: &str) -> Link {
        Link::new(url).unwrap()
    }

    #[tokio::test]
    async fn create_and_fetch() {
        let repo = InMemoryRepository::new();

        let id = repo.create(&link("https://example.com")).await.unwrap();

        let record = repo.fetch_by_id(id).await.unwrap().unwrap();
        assert_eq!(record.id, id);
        assert_eq!(record.link.as_str(), "https://example.com");
        assert_eq!(record.qr_image_url, "");
        assert_eq!(record.scan_count, 0);
    }

    #[tokio::test]
    async fn fetch_nonexistent() {
        let repo = InMemoryRepository::new();

        let result = repo.fetch_by_id(RecordId::new(999_999)).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn ids_are_assigned_sequentially() {
        let repo = InMemoryRepository::new();

        let first = repo.create(&link("https://one.example")).await.unwrap();
        let second = repo.create(&link("https://two.example")).await.unwrap();

        assert_eq!(first, RecordId::new(1));
        assert_eq!(second, RecordId::new(2));
    }

    #[tokio::test]
    async fn list_all_is_most_recent_first() {
        let repo = InMemoryRepository::new();

        for url in ["https://one.example", "https://two.example", "https://three.example"] {
            repo.create(&link(url)).await.unwrap();
        }

        let ids: Vec<i64> = repo
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .map(|record| record.id.get())
            .collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[tokio::test]
    async fn set_image_url_only_once() {
        let repo = InMemoryRepository::new();
        let id = repo.create(&link("https://example.com")).await.unwrap();

        assert!(repo.set_image_url(id, "https://img.example/1.png").await.unwrap());
        assert!(!repo.set_image_url(id, "https://img.example/2.png").await.unwrap());

        let record = repo.fetch_by_id(id).await.unwrap().unwrap();
        assert_eq!(record.qr_image_url, "https://img.example/1.png");
    }

    #[tokio::test]
    async fn set_image_url_unknown_id() {
        let repo = InMemoryRepository::new();

        assert!(!repo
            .set_image_url(RecordId::new(42), "https://img.example/1.png")
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn increment_unknown_id() {
        let repo = InMemoryRepository::new();

        assert!(!repo.increment_scan_count(RecordId::new(42)).await.unwrap());
    }

    #[tokio::test]
    async fn concurrent_increments_are_not_lost() {
        let repo = Arc::new(InMemoryRepository::new());
        let id = repo.create(&link("https://example.com")).await.unwrap();

        let mut handles = vec![];
        for _ in 0..50 {
            let repo = Arc::clone(&repo);
            handles.push(tokio::spawn(async move {
                repo.increment_scan_count(id).await.unwrap();
            }));
        }

        for handle in handles {
            handle.await.unwrap();
        }

        let record = repo.fetch_by_id(id).await.unwrap().unwrap();
        assert_eq!(record.scan_count, 50);
    }
}
