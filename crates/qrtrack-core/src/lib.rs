//! Core types and traits for the qrtrack QR code service.
//!
//! This crate provides the record model and the repository contract shared
//! by the issuer (code generation) and the redirector (scan counting).

pub mod error;
pub mod link;
pub mod record;
pub mod repository;

pub use error::{CoreError, StorageError};
pub use link::Link;
pub use record::{QrCodeRecord, RecordId};
pub use repository::{ReadRepository, Repository};
