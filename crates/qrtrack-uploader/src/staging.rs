use crate::error::UploadError;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// A rendered image written to a local temporary file.
///
/// The file is removed when the value is dropped, whether or not the
/// upload that used it succeeded.
#[derive(Debug)]
pub struct StagedImage {
    file: NamedTempFile,
}

impl StagedImage {
    /// Writes `bytes` to a new `.png` file inside `dir`.
    pub fn write(dir: &Path, bytes: &[u8]) -> Result<Self, UploadError> {
        let mut file = tempfile::Builder::new()
            .prefix("qr-")
            .suffix(".png")
            .tempfile_in(dir)
            .map_err(UploadError::Staging)?;

        file.write_all(bytes).map_err(UploadError::Staging)?;
        file.flush().map_err(UploadError::Staging)?;

        Ok(Self { file })
    }

    /// Like [`StagedImage::write`], run on the blocking thread pool.
    pub async fn stage(dir: PathBuf, bytes: Vec<u8>) -> Result<Self, UploadError> {
        tokio::task::spawn_blocking(move || Self::write(&dir, &bytes))
            .await
            .map_err(|e| UploadError::Staging(std::io::Error::other(e)))?
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }
}
