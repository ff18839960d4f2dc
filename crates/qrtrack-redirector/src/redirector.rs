use crate::Result;
use async_trait::async_trait;
use qrtrack_core::{QrCodeRecord, RecordId};

#[async_trait]
pub trait Redirector: Send + Sync + 'static {
    /// Resolves an identifier to its stored record and counts the scan.
    /// Returns `None` if the record does not exist.
    async fn resolve(&self, id: RecordId) -> Result<Option<QrCodeRecord>>;
}
