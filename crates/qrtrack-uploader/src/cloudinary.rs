use crate::error::UploadError;
use crate::ImageHost;
use async_trait::async_trait;
use jiff::Timestamp;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use sha1::{Digest, Sha1};
use std::path::Path;
use tracing::{debug, trace};
use typed_builder::TypedBuilder;

pub const DEFAULT_API_BASE: &str = "https://api.cloudinary.com";

#[derive(Debug, Clone, TypedBuilder)]
pub struct CloudinaryConfig {
    #[builder(setter(into))]
    cloud_name: String,
    #[builder(setter(into))]
    api_key: String,
    #[builder(setter(into))]
    api_secret: String,
    #[builder(default = DEFAULT_API_BASE.to_string(), setter(into))]
    api_base: String,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: Option<String>,
}

/// Uploads images to Cloudinary using signed upload requests.
///
/// A single attempt is made per image; failures are returned to the caller.
#[derive(Debug, Clone)]
pub struct CloudinaryHost {
    client: Client,
    config: CloudinaryConfig,
}

impl CloudinaryHost {
    pub fn new(config: CloudinaryConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    pub fn with_client(client: Client, config: CloudinaryConfig) -> Self {
        Self { client, config }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1_1/{}/image/upload",
            self.config.api_base.trim_end_matches('/'),
            self.config.cloud_name
        )
    }
}

/// Signs the upload parameters: the hex SHA-1 of `timestamp={ts}` followed
/// by the API secret.
fn sign(timestamp: i64, api_secret: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(format!("timestamp={timestamp}{api_secret}"));
    hex::encode(hasher.finalize())
}

#[async_trait]
impl ImageHost for CloudinaryHost {
    async fn upload(&self, image: &Path) -> Result<String, UploadError> {
        let bytes = tokio::fs::read(image).await.map_err(UploadError::Read)?;
        let file_name = image
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("qr.png")
            .to_owned();

        let timestamp = Timestamp::now().as_second();
        let form = Form::new()
            .part(
                "file",
                Part::bytes(bytes).file_name(file_name).mime_str("image/png")?,
            )
            .text("api_key", self.config.api_key.clone())
            .text("timestamp", timestamp.to_string())
            .text("signature", sign(timestamp, &self.config.api_secret));

        trace!(endpoint = %self.endpoint(), "uploading image");
        let response = self
            .client
            .post(self.endpoint())
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UploadError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let body: UploadResponse = response.json().await?;
        match body.secure_url {
            Some(url) if !url.is_empty() => {
                debug!(url = %url, "image uploaded");
                Ok(url)
            }
            _ => Err(UploadError::InvalidResponse(
                "missing secure_url".to_string(),
            )),
        }
    }
}
