use std::time::Duration;

use askama::Template;
use axum::http::header::{CACHE_CONTROL, EXPIRES, LOCATION, PRAGMA};
use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use qrtrack_core::Link;

use crate::error::{AppError, Result, SCAN_FAILED};
use crate::model::HandoffPage;

/// Headers that keep clients and proxies from caching a scan response, so
/// every visit reaches the server and is counted.
pub const NO_CACHE_HEADERS: [(HeaderName, &str); 3] = [
    (
        CACHE_CONTROL,
        "no-store, no-cache, must-revalidate, proxy-revalidate",
    ),
    (PRAGMA, "no-cache"),
    (EXPIRES, "0"),
];

pub const DEFAULT_HANDOFF_SCHEME: &str = "googlechrome";

/// How a resolved scan sends the client on to its destination.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ScanPresenter {
    /// Plain `302 Found` to the stored link.
    #[default]
    Direct,
    /// HTML page that opens `{scheme}://{link without http(s)://}` and falls
    /// back to the stored link after `delay`.
    Handoff { scheme: String, delay: Duration },
}

impl ScanPresenter {
    pub fn handoff(scheme: impl Into<String>, delay: Duration) -> Self {
        Self::Handoff {
            scheme: scheme.into(),
            delay,
        }
    }

    /// Builds the response for a resolved scan of `link`.
    pub fn present(&self, link: &Link) -> Result<Response> {
        match self {
            ScanPresenter::Direct => {
                let location = HeaderValue::try_from(link.to_location())
                    .map_err(|e| AppError::internal(SCAN_FAILED, e))?;
                Ok((StatusCode::FOUND, NO_CACHE_HEADERS, [(LOCATION, location)]).into_response())
            }
            ScanPresenter::Handoff { scheme, delay } => {
                let handoff_url = format!("{scheme}://{}", link.without_scheme());
                let fallback_url = link.to_location();
                let page = HandoffPage {
                    handoff_url: &handoff_url,
                    fallback_url: &fallback_url,
                    delay_ms: delay.as_millis(),
                }
                .render()
                .map_err(|e| AppError::internal(SCAN_FAILED, e))?;
                Ok((NO_CACHE_HEADERS, Html(page)).into_response())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    fn link(url: &str) -> Link {
        Link::new(url).unwrap()
    }

    fn assert_no_cache(response: &Response) {
        let headers = response.headers();
        assert_eq!(
            headers[CACHE_CONTROL],
            "no-store, no-cache, must-revalidate, proxy-revalidate"
        );
        assert_eq!(headers[PRAGMA], "no-cache");
        assert_eq!(headers[EXPIRES], "0");
    }

    #[test]
    fn direct_redirects_with_no_cache_headers() {
        let response = ScanPresenter::Direct
            .present(&link("https://example.com/landing"))
            .unwrap();

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(response.headers()[LOCATION], "https://example.com/landing");
        assert_no_cache(&response);
    }

    #[tokio::test]
    async fn handoff_renders_page_with_no_cache_headers() {
        let presenter = ScanPresenter::handoff("googlechrome", Duration::from_millis(1200));

        let response = presenter
            .present(&link("https://example.com/landing"))
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_no_cache(&response);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let body = String::from_utf8(body.to_vec()).unwrap();
        assert!(body.contains("googlechrome:"));
        assert!(body.contains("example.com"));
        assert!(body.contains("data-delay=\"1200\""));
        assert!(body.contains("<noscript>"));
    }

    #[test]
    fn default_is_direct() {
        assert_eq!(ScanPresenter::default(), ScanPresenter::Direct);
    }
}
