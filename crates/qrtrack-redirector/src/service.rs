use std::sync::Arc;

use crate::redirector::Redirector;
use async_trait::async_trait;
use qrtrack_core::{QrCodeRecord, RecordId, Repository};
use tracing::{debug, trace, warn};

/// Service for handling scans.
///
/// Fetches the record and then bumps its counter in a separate atomic
/// update. The two statements are not a transaction. A failed increment
/// is logged and the scan still resolves, so counting never blocks the
/// redirect.
#[derive(Debug)]
pub struct RedirectorService<R> {
    repository: Arc<R>,
}

impl<R> Clone for RedirectorService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R: Repository> RedirectorService<R> {
    /// Creates a new RedirectorService with the given repository.
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Resolves an identifier to its record, counting the scan.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(record))` - The record as it was fetched, before the increment
    /// * `Ok(None)` - If no record has this identifier
    /// * `Err(e)` - If the record could not be fetched
    pub async fn resolve(&self, id: RecordId) -> crate::Result<Option<QrCodeRecord>> {
        Redirector::resolve(self, id).await
    }
}

#[async_trait]
impl<R: Repository> Redirector for RedirectorService<R> {
    async fn resolve(&self, id: RecordId) -> crate::Result<Option<QrCodeRecord>> {
        trace!(id = %id, "resolving scan");

        let Some(record) = self.repository.fetch_by_id(id).await? else {
            debug!(id = %id, "record not found");
            return Ok(None);
        };

        match self.repository.increment_scan_count(id).await {
            Ok(true) => debug!(id = %id, link = %record.link, "scan counted"),
            Ok(false) => warn!(id = %id, "record vanished before its scan was counted"),
            Err(e) => warn!(id = %id, error = %e, "failed to count scan, redirecting anyway"),
        }

        Ok(Some(record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qrtrack_core::repository::Result as StorageResult;
    use qrtrack_core::{Link, ReadRepository, StorageError};
    use qrtrack_storage::InMemoryRepository;

    fn link(url: &str) -> Link {
        Link::new(url).unwrap()
    }

    async fn setup_with_record(url: &str) -> (Arc<InMemoryRepository>, RecordId) {
        let repo = Arc::new(InMemoryRepository::new());
        let id = repo.create(&link(url)).await.unwrap();
        (repo, id)
    }

    /// Reads succeed; every counter update fails.
    struct ReadOnlyRepository(InMemoryRepository);

    #[async_trait]
    impl ReadRepository for ReadOnlyRepository {
        async fn list_all(&self) -> StorageResult<Vec<QrCodeRecord>> {
            self.0.list_all().await
        }

        async fn fetch_by_id(&self, id: RecordId) -> StorageResult<Option<QrCodeRecord>> {
            self.0.fetch_by_id(id).await
        }
    }

    #[async_trait]
    impl Repository for ReadOnlyRepository {
        async fn create(&self, link: &Link) -> StorageResult<RecordId> {
            self.0.create(link).await
        }

        async fn set_image_url(&self, id: RecordId, url: &str) -> StorageResult<bool> {
            self.0.set_image_url(id, url).await
        }

        async fn increment_scan_count(&self, _id: RecordId) -> StorageResult<bool> {
            Err(StorageError::Unavailable("read-only replica".to_string()))
        }
    }

    /// Every operation fails.
    struct DownRepository;

    #[async_trait]
    impl ReadRepository for DownRepository {
        async fn list_all(&self) -> StorageResult<Vec<QrCodeRecord>> {
            Err(StorageError::Unavailable("down".to_string()))
        }

        async fn fetch_by_id(&self, _id: RecordId) -> StorageResult<Option<QrCodeRecord>> {
            Err(StorageError::Unavailable("down".to_string()))
        }
    }

    #[async_trait]
    impl Repository for DownRepository {
        async fn create(&self, _link: &Link) -> StorageResult<RecordId> {
            Err(StorageError::Unavailable("down".to_string()))
        }

        async fn set_image_url(&self, _id: RecordId, _url: &str) -> StorageResult<bool> {
            Err(StorageError::Unavailable("down".to_string()))
        }

        async fn increment_scan_count(&self, _id: RecordId) -> StorageResult<bool> {
            Err(StorageError::Unavailable("down".to_string()))
        }
    }

    #[tokio::test]
    async fn resolve_existing_record_counts_scan() {
        let (repo, id) = setup_with_record("https://example.com").await;
        let service = RedirectorService::new(Arc::clone(&repo));

        let record = service.resolve(id).await.unwrap().expect("record should exist");
        assert_eq!(record.link.as_str(), "https://example.com");

        let stored = repo.fetch_by_id(id).await.unwrap().unwrap();
        assert_eq!(stored.scan_count, 1);
    }

    #[tokio::test]
    async fn resolve_nonexistent_record() {
        let service = RedirectorService::new(Arc::new(InMemoryRepository::new()));

        let result = service.resolve(RecordId::new(999_999)).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn repeated_scans_each_count() {
        let (repo, id) = setup_with_record("https://example.com").await;
        let service = RedirectorService::new(Arc::clone(&repo));

        for _ in 0..3 {
            service.resolve(id).await.unwrap();
        }

        let stored = repo.fetch_by_id(id).await.unwrap().unwrap();
        assert_eq!(stored.scan_count, 3);
    }

    #[tokio::test]
    async fn concurrent_scans_count_exactly() {
        let (repo, id) = setup_with_record("https://example.com").await;
        let service = RedirectorService::new(Arc::clone(&repo));

        let mut handles = vec![];
        for _ in 0..25 {
            let service = service.clone();
            handles.push(tokio::spawn(async move {
                service.resolve(id).await.unwrap().unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let stored = repo.fetch_by_id(id).await.unwrap().unwrap();
        assert_eq!(stored.scan_count, 25);
    }

    #[tokio::test]
    async fn failed_increment_still_resolves() {
        let inner = InMemoryRepository::new();
        let id = inner.create(&link("https://example.com")).await.unwrap();
        let service = RedirectorService::new(Arc::new(ReadOnlyRepository(inner)));

        let record = service.resolve(id).await.unwrap().expect("record should exist");
        assert_eq!(record.link.as_str(), "https://example.com");
    }

    #[tokio::test]
    async fn failed_fetch_is_an_error() {
        let service = RedirectorService::new(Arc::new(DownRepository));

        let err = service.resolve(RecordId::new(1)).await.unwrap_err();
        assert!(matches!(
            err,
            crate::RedirectorError::Storage(StorageError::Unavailable(_))
        ));
    }
}
