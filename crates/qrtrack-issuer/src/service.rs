use crate::error::IssuerError;
use crate::issuer::Issuer;
use async_trait::async_trait;
use qrtrack_core::{Link, QrCodeRecord, RecordId, Repository};
use qrtrack_generator::Renderer;
use qrtrack_uploader::{ImageHost, StagedImage};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

/// A concrete implementation of the `Issuer` trait.
///
/// This service wraps a `Repository`, a `Renderer` and an `ImageHost`.
/// The record is created first so that its identifier can be baked into the
/// code. A failure in any later step leaves the record in place with an
/// empty image URL; nothing is retried or rolled back.
#[derive(Debug)]
pub struct IssuerService<R, G, H> {
    repository: Arc<R>,
    renderer: Arc<G>,
    host: Arc<H>,
    base_url: String,
    staging_dir: PathBuf,
}

impl<R: Repository, G: Renderer, H: ImageHost> IssuerService<R, G, H> {
    /// Creates a new `IssuerService`.
    ///
    /// `public_base_url` is the externally reachable origin of the scan
    /// endpoint; `staging_dir` holds images while they are being uploaded.
    pub fn new(
        repository: Arc<R>,
        renderer: G,
        host: H,
        public_base_url: impl Into<String>,
        staging_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            repository,
            renderer: Arc::new(renderer),
            host: Arc::new(host),
            base_url: public_base_url.into(),
            staging_dir: staging_dir.into(),
        }
    }

    async fn publish(&self, id: RecordId) -> Result<String, IssuerError> {
        let target = id.scan_url(&self.base_url);
        let image = self.renderer.render(&target)?;
        debug!(id = %id, target = %target, bytes = image.len(), "rendered code");

        // removed from disk when `staged` goes out of scope
        let staged = StagedImage::stage(self.staging_dir.clone(), image).await?;
        let url = self.host.upload(staged.path()).await?;
        Ok(url)
    }
}

#[async_trait]
impl<R: Repository, G: Renderer, H: ImageHost> Issuer for IssuerService<R, G, H> {
    async fn issue(&self, link: Link) -> Result<RecordId, IssuerError> {
        let id = self.repository.create(&link).await?;
        debug!(id = %id, link = %link, "created record");

        let url = self.publish(id).await?;

        if !self.repository.set_image_url(id, &url).await? {
            return Err(IssuerError::RecordMissing(id));
        }

        info!(id = %id, image_url = %url, "issued qr code");
        Ok(id)
    }

    async fn list(&self) -> Result<Vec<QrCodeRecord>, IssuerError> {
        Ok(self.repository.list_all().await?)
    }
}
