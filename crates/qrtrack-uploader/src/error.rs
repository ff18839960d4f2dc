use thiserror::Error;

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("failed to stage image: {0}")]
    Staging(#[source] std::io::Error),
    #[error("failed to read staged image: {0}")]
    Read(#[source] std::io::Error),
    #[error("upload request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("upload rejected with status {status}: {body}")]
    Rejected { status: u16, body: String },
    #[error("upload response is invalid: {0}")]
    InvalidResponse(String),
}
