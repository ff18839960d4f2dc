use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("target cannot be encoded as a QR code: {0}")]
    Encode(#[from] qrcode::types::QrError),
    #[error("failed to encode image: {0}")]
    Image(#[from] image::ImageError),
}
