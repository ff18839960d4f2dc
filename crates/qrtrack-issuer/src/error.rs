use qrtrack_core::{RecordId, StorageError};
use qrtrack_generator::RenderError;
use qrtrack_uploader::UploadError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IssuerError {
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("render error: {0}")]
    Render(#[from] RenderError),
    #[error("upload error: {0}")]
    Upload(#[from] UploadError),
    #[error("record {0} is missing or already has an image")]
    RecordMissing(RecordId),
}
