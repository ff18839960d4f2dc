use crate::error::{CoreError, Result};
use crate::link::Link;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// Store-assigned identifier of a QR code record.
///
/// Identifiers are positive integers handed out by the store on creation
/// and never change afterwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(i64);

impl RecordId {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn get(self) -> i64 {
        self.0
    }

    /// Generates the scan endpoint URL for this record based on the provided base URL.
    pub fn scan_url(self, base_url: &str) -> String {
        format!("{}/scan/{}", base_url.trim_end_matches('/'), self)
    }
}

impl FromStr for RecordId {
    type Err = CoreError;

    /// Parses an identifier from a path segment.
    ///
    /// Only a plain run of ASCII digits is accepted; signs, whitespace and
    /// anything that does not fit in an `i64` are rejected.
    fn from_str(value: &str) -> Result<Self> {
        if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CoreError::InvalidRecordId(format!(
                "must be a non-empty run of digits: '{value}'"
            )));
        }

        value
            .parse::<i64>()
            .map(Self)
            .map_err(|e| CoreError::InvalidRecordId(format!("'{value}': {e}")))
    }
}

impl Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A stored QR code: its destination, rendered image and scan counter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QrCodeRecord {
    pub id: RecordId,
    /// Destination the scan endpoint redirects to.
    pub link: Link,
    /// Public URL of the rendered image. Empty until the image has been uploaded.
    pub qr_image_url: String,
    /// Number of successful scans.
    pub scan_count: u64,
}

impl QrCodeRecord {
    /// Returns `true` once the rendered image has been uploaded.
    pub fn has_image(&self) -> bool {
        !self.qr_image_url.is_empty()
    }
}
