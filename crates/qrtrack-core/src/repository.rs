use crate::error::StorageError;
use crate::link::Link;
use crate::record::{QrCodeRecord, RecordId};
use async_trait::async_trait;

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// A read-only view of a repository.
///
/// This trait provides only the read operations from [`Repository`].
#[async_trait]
pub trait ReadRepository: Send + Sync + 'static {
    /// Returns every record, most recently created first.
    async fn list_all(&self) -> Result<Vec<QrCodeRecord>>;

    /// Retrieves a single record by its identifier.
    /// Returns `None` if the record does not exist.
    async fn fetch_by_id(&self, id: RecordId) -> Result<Option<QrCodeRecord>>;
}

#[async_trait]
pub trait Repository: ReadRepository {
    /// Inserts a new record with an empty image URL and a zero scan count.
    /// Returns the identifier assigned by the store.
    async fn create(&self, link: &Link) -> Result<RecordId>;

    /// Sets the image URL of a record that does not have one yet.
    ///
    /// Returns `true` if the record existed and its image URL was empty.
    async fn set_image_url(&self, id: RecordId, url: &str) -> Result<bool>;

    /// Adds one to the scan counter as a single atomic update.
    /// Returns `true` if the record existed.
    async fn increment_scan_count(&self, id: RecordId) -> Result<bool>;
}
