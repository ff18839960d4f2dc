use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use url::Url;

/// A validated destination URL for a QR code.
///
/// Links are trimmed of surrounding whitespace and must parse as absolute
/// `http` or `https` URLs with a host. The trimmed text is kept as entered.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Link(String);

impl Link {
    /// Creates a new `Link` after validating the input.
    pub fn new(link: impl AsRef<str>) -> Result<Self> {
        let link = link.as_ref().trim();
        Self::validate(link)?;
        Ok(Self(link.to_owned()))
    }

    /// Creates a `Link` without validation.
    ///
    /// Use this only for values read back from the store, which were
    /// validated when they were created.
    pub fn new_unchecked(link: impl Into<String>) -> Self {
        Self(link.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the link with its `http://` or `https://` prefix removed.
    pub fn without_scheme(&self) -> &str {
        match self.0.split_once("://") {
            Some((scheme, rest))
                if scheme.eq_ignore_ascii_case("http") || scheme.eq_ignore_ascii_case("https") =>
            {
                rest
            }
            _ => &self.0,
        }
    }

    /// Returns the link in normalized, percent-encoded form, suitable for a
    /// `Location` header.
    pub fn to_location(&self) -> String {
        Url::parse(&self.0)
            .map(String::from)
            .unwrap_or_else(|_| self.0.clone())
    }

    fn validate(link: &str) -> Result<()> {
        if link.is_empty() {
            return Err(CoreError::InvalidLink("link cannot be empty".to_string()));
        }

        let url = Url::parse(link).map_err(|e| CoreError::InvalidLink(format!("{e}: {link}")))?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(CoreError::InvalidLink(format!(
                "link scheme must be http or https: {}",
                url.scheme()
            )));
        }

        if url.host_str().is_none_or(str::is_empty) {
            return Err(CoreError::InvalidLink(format!("link has no host: {link}")));
        }

        Ok(())
    }
}

impl TryFrom<String> for Link {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Link> for String {
    fn from(value: Link) -> Self {
        value.0
    }
}

impl Display for Link {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
