//! Image hosting for rendered QR codes.
//!
//! Rendered images are staged as local files with [`StagedImage`] and handed
//! to an [`ImageHost`], which publishes them and returns a public URL.

pub mod cloudinary;
pub mod error;
pub mod staging;

use async_trait::async_trait;
use std::path::Path;

pub use cloudinary::{CloudinaryConfig, CloudinaryHost};
pub use error::UploadError;
pub use staging::StagedImage;

/// A remote service that publishes image files.
#[async_trait]
pub trait ImageHost: Send + Sync + 'static {
    /// Uploads the image at `image` and returns its public URL.
    async fn upload(&self, image: &Path) -> Result<String, UploadError>;
}
