use askama::Template;
use qrtrack_core::QrCodeRecord;
use serde::Deserialize;

/// Body of `POST /generate-qr`.
#[derive(Debug, Deserialize)]
pub struct GenerateForm {
    #[serde(default)]
    pub link: Option<String>,
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexPage {
    pub records: Vec<QrCodeRecord>,
}

/// Page that tries to hand the link to another installed browser before
/// falling back to a plain navigation.
#[derive(Template)]
#[template(path = "handoff.html")]
pub struct HandoffPage<'a> {
    /// Custom-scheme URL for the alternate browser.
    pub handoff_url: &'a str,
    /// Destination used when the handoff does not navigate away.
    pub fallback_url: &'a str,
    pub delay_ms: u128,
}
