//! Page fetching.
//!
//! The `Fetcher` trait is the seam between the assembler and the
//! network; tests swap in a scripted implementation.

use async_trait::async_trait;
use reqwest::header;
use std::time::Duration;
use tracing::{debug, warn};

use crate::page::PageContent;

/// Browser-like identification header; some sites refuse the default
/// client string.
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Retrieves one URL and turns it into a [`PageContent`].
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetch a page. Never fails: transport and HTTP errors come back
    /// as an invalid `PageContent`.
    async fn fetch(&self, url: &str, timeout: Duration) -> PageContent;
}

/// HTTP fetcher backed by `reqwest`.
pub struct HttpFetcher {
    client: reqwest::Client,
    user_agent: String,
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpFetcher {
    /// Create a new fetcher with the browser-like user agent.
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    /// Set a custom user agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str, timeout: Duration) -> PageContent {
        debug!(url = %url, "page fetch starting");

        let response = match self
            .client
            .get(url)
            .header(header::USER_AGENT, &self.user_agent)
            .timeout(timeout)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!(url = %url, error = %e, "page fetch failed");
                return PageContent::failed(url, e.to_string());
            }
        };

        let status = response.status();
        if !status.is_success() {
            warn!(url = %url, status = %status, "page fetch returned non-success status");
            return PageContent::failed(url, format!("HTTP {}", status));
        }

        match response.text().await {
            Ok(html) => PageContent::from_html(url, &html),
            Err(e) => {
                warn!(url = %url, error = %e, "page body read failed");
                PageContent::failed(url, e.to_string())
            }
        }
    }
}
