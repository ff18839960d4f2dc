use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use qrtrack_core::CoreError;
use std::fmt::Display;
use tracing::{debug, error};

pub type Result<T> = std::result::Result<T, AppError>;

pub const INVALID_LINK: &str = "Please provide a valid link.";
pub const NOT_FOUND: &str = "QR Code not found.";
pub const LOAD_FAILED: &str = "Error loading QR codes.";
pub const GENERATE_FAILED: &str = "Error generating QR code.";
pub const SCAN_FAILED: &str = "Server error.";

/// Request failures, rendered as plain-text responses.
///
/// Internal failures carry a generic public message; the underlying
/// detail is only written to the log.
#[derive(Debug)]
pub enum AppError {
    InvalidInput(String),
    NotFound,
    Internal {
        public: &'static str,
        detail: String,
    },
}

impl AppError {
    pub fn internal(public: &'static str, detail: impl Display) -> Self {
        Self::Internal {
            public,
            detail: detail.to_string(),
        }
    }
}

impl From<CoreError> for AppError {
    fn from(value: CoreError) -> Self {
        match value {
            CoreError::InvalidLink(message) => Self::InvalidInput(message),
            CoreError::InvalidRecordId(_) => Self::NotFound,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::InvalidInput(detail) => {
                debug!(detail = %detail, "rejected input");
                (StatusCode::BAD_REQUEST, INVALID_LINK).into_response()
            }
            AppError::NotFound => (StatusCode::NOT_FOUND, NOT_FOUND).into_response(),
            AppError::Internal { public, detail } => {
                error!(error = %detail, "{public}");
                (StatusCode::INTERNAL_SERVER_ERROR, public).into_response()
            }
        }
    }
}
