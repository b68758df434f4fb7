// src/services/engine.rs

//! Browser-engine abstraction.
//!
//! The crawler needs exactly four things from whatever renders pages:
//! navigate to a URL with a timeout, wait for the page to settle, scroll to
//! the bottom to trigger lazy content, and hand back the current markup.
//! Anything meeting that contract is substitutable: a headless browser, a
//! plain HTTP fetch, or a canned snapshot in tests.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::error::{AppError, Result};
use crate::models::CrawlerConfig;

/// Opaque page-rendering oracle.
#[async_trait]
pub trait BrowserEngine: Send {
    /// Navigate to an absolute URL, honoring the configured timeout.
    async fn navigate(&mut self, url: &str) -> Result<()>;

    /// Wait until the page has reached a settled, rendered state.
    async fn wait_settled(&mut self) -> Result<()>;

    /// Scroll to the bottom of the page to trigger lazy-loaded content.
    async fn scroll_to_bottom(&mut self) -> Result<()>;

    /// Return the current rendered markup as text.
    async fn content(&mut self) -> Result<String>;
}

/// Run the full navigate → settle → scroll → content cycle for one URL.
pub async fn render_page(engine: &mut dyn BrowserEngine, url: &str) -> Result<String> {
    engine.navigate(url).await?;
    engine.wait_settled().await?;
    engine.scroll_to_bottom().await?;
    engine.content().await
}

/// Plain-HTTP engine implementation.
///
/// The target catalogs serve complete markup without client-side rendering,
/// so a GET satisfies the contract: the fetched body is already settled and
/// has no lazy content to scroll for.
pub struct FetchEngine {
    client: Client,
    body: Option<String>,
}

impl FetchEngine {
    /// Build an engine from crawler settings.
    pub fn new(config: &CrawlerConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::engine(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, body: None })
    }
}

#[async_trait]
impl BrowserEngine for FetchEngine {
    async fn navigate(&mut self, url: &str) -> Result<()> {
        self.body = None;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AppError::navigation(url, e))?
            .error_for_status()
            .map_err(|e| AppError::navigation(url, e))?;

        let text = response
            .text()
            .await
            .map_err(|e| AppError::navigation(url, e))?;
        self.body = Some(text);
        Ok(())
    }

    async fn wait_settled(&mut self) -> Result<()> {
        // A fetched body is already final.
        Ok(())
    }

    async fn scroll_to_bottom(&mut self) -> Result<()> {
        // No viewport, nothing lazy to trigger.
        Ok(())
    }

    async fn content(&mut self) -> Result<String> {
        self.body
            .clone()
            .ok_or_else(|| AppError::engine("content() called before a successful navigate()"))
    }
}
