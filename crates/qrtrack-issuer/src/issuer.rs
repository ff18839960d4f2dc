use crate::error::IssuerError;
use async_trait::async_trait;
use qrtrack_core::{Link, QrCodeRecord, RecordId};

type Result<T> = std::result::Result<T, IssuerError>;

#[async_trait]
pub trait Issuer: Send + Sync + 'static {
    /// Creates a record for `link`, renders and uploads its code, and
    /// returns the new record's identifier.
    async fn issue(&self, link: Link) -> Result<RecordId>;

    /// Returns every issued record, most recent first.
    async fn list(&self) -> Result<Vec<QrCodeRecord>>;
}
