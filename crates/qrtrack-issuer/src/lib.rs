//! QR code issuing.
//!
//! This crate provides the generation flow: a record is created, a code
//! pointing at its scan endpoint is rendered and uploaded, and the record
//! is updated with the public image URL.

pub mod error;
pub mod issuer;
pub mod service;

pub use error::IssuerError;
pub use issuer::Issuer;
pub use service::IssuerService;
