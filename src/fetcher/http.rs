//! HTTP fetcher implementation
//!
//! This module resolves addresses over HTTP:
//! - Building an HTTP client with a proper user agent string
//! - GET requests with status and Content-Type checks
//! - Link extraction from the returned HTML, resolving relative hrefs
//!   against the final (post-redirect) URL

use crate::fetcher::Fetcher;
use crate::FetchError;
use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use std::time::Duration;
use url::Url;

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `user_agent` - The user agent string to identify as
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(user_agent: &str) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent.to_string())
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// A [`Fetcher`] that resolves addresses by fetching them over HTTP and
/// extracting `<a href>` targets from the returned HTML
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Creates an HTTP fetcher around an already-built client
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, address: &str) -> Result<Vec<String>, FetchError> {
        let response =
            self.client
                .get(address)
                .send()
                .await
                .map_err(|e| FetchError::Request {
                    address: address.to_string(),
                    message: e.to_string(),
                })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                address: address.to_string(),
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        if !content_type.contains("text/html") {
            return Err(FetchError::ContentMismatch {
                address: address.to_string(),
                content_type,
            });
        }

        // Relative hrefs resolve against the final URL, not the requested one
        let base_url = response.url().clone();

        let body = response.text().await.map_err(|e| FetchError::Body {
            address: address.to_string(),
            message: e.to_string(),
        })?;

        Ok(extract_links(&body, &base_url))
    }
}

/// Extracts all outbound http(s) links from an HTML document
///
/// Relative hrefs are resolved against `base_url`; fragments, `javascript:`,
/// `mailto:` and other non-web schemes are dropped.
pub fn extract_links(html: &str, base_url: &Url) -> Vec<String> {
    let document = Html::parse_document(html);

    let selector = match Selector::parse("a[href]") {
        Ok(s) => s,
        Err(_) => return Vec::new(),
    };

    let mut links = Vec::new();

    for element in document.select(&selector) {
        let href = match element.value().attr("href") {
            Some(h) => h.trim(),
            None => continue,
        };

        if href.is_empty() || href.starts_with('#') {
            continue;
        }

        let resolved = match Url::parse(href) {
            Ok(absolute) => absolute,
            Err(_) => match base_url.join(href) {
                Ok(joined) => joined,
                Err(e) => {
                    tracing::debug!("Skipping unresolvable href {}: {}", href, e);
                    continue;
                }
            },
        };

        match resolved.scheme() {
            "http" | "https" => links.push(resolved.to_string()),
            _ => continue,
        }
    }

    links
}
