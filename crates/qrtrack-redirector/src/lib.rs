//! Scan resolution.
//!
//! This crate provides a [`RedirectorService`] that resolves a record
//! identifier to its destination and counts the scan. How the client is
//! sent onward is left to the HTTP layer.

pub mod error;
pub mod redirector;
pub mod service;

pub use error::{RedirectorError, Result};
pub use redirector::Redirector;
pub use service::RedirectorService;
