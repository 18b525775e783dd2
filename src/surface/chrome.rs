//! Chrome automation over the DevTools protocol (chromiumoxide).

use async_trait::async_trait;
use chromiumoxide::{Browser, BrowserConfig as CdpConfig, Page};
use futures_util::StreamExt;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use super::GameSurface;
use crate::config::BrowserConfig;
use crate::error::{GameError, Result};

/// One Chrome process with a single tab open on the game.
///
/// The handle is owned by whoever drives the game; there is no process-wide
/// browser state.
pub struct ChromeSurface {
    browser: Browser,
    page: Page,
    handler: JoinHandle<()>,
}

impl ChromeSurface {
    /// Launch Chrome and open the game page.
    #[instrument(skip(config), fields(url = %config.url, headless = config.headless))]
    pub async fn launch(config: &BrowserConfig) -> Result<Self> {
        let mut builder = CdpConfig::builder().viewport(None);
        if !config.headless {
            builder = builder.with_head();
        }
        if let Some(path) = &config.chrome_path {
            builder = builder.chrome_executable(path);
        }
        let cdp_config = builder
            .build()
            .map_err(|e| GameError::Connection(format!("invalid browser config: {}", e)))?;

        let (browser, mut handler) = Browser::launch(cdp_config)
            .await
            .map_err(|e| GameError::Connection(format!("failed to launch browser: {}", e)))?;

        // CDP events must be drained for the browser to make progress.
        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!(error = %e, "cdp handler event error");
                }
            }
        });

        let page = browser
            .new_page(config.url.as_str())
            .await
            .map_err(|e| GameError::Connection(format!("failed to open {}: {}", config.url, e)))?;
        page.wait_for_navigation()
            .await
            .map_err(|e| GameError::Connection(format!("failed to load {}: {}", config.url, e)))?;

        info!("game page loaded");
        Ok(Self {
            browser,
            page,
            handler,
        })
    }
}

#[async_trait]
impl GameSurface for ChromeSurface {
    async fn click(&mut self, selector: &str) -> Result<()> {
        let element = self
            .page
            .find_element(selector)
            .await
            .map_err(|e| GameError::ElementNotFound(format!("{}: {}", selector, e)))?;
        element
            .click()
            .await
            .map_err(|e| GameError::ElementNotFound(format!("click on {} failed: {}", selector, e)))?;
        Ok(())
    }

    async fn read_text(&mut self, selector: &str) -> Result<String> {
        let element = self
            .page
            .find_element(selector)
            .await
            .map_err(|e| GameError::ElementNotFound(format!("{}: {}", selector, e)))?;
        let text = element
            .inner_text()
            .await
            .map_err(|e| GameError::ElementNotFound(format!("reading {} failed: {}", selector, e)))?;
        Ok(text.unwrap_or_default())
    }

    async fn read_all_text(&mut self, selector: &str) -> Result<Vec<String>> {
        let elements = self
            .page
            .find_elements(selector)
            .await
            .map_err(|e| GameError::ElementNotFound(format!("{}: {}", selector, e)))?;

        let mut texts = Vec::with_capacity(elements.len());
        for element in elements {
            let text = element.inner_text().await.map_err(|e| {
                GameError::ElementNotFound(format!("reading {} failed: {}", selector, e))
            })?;
            texts.push(text.unwrap_or_default());
        }
        Ok(texts)
    }

    async fn close(&mut self) -> Result<()> {
        if let Err(e) = self.browser.close().await {
            warn!(error = %e, "browser did not acknowledge close");
        }
        if let Err(e) = self.browser.wait().await {
            warn!(error = %e, "waiting for browser exit failed");
        }
        self.handler.abort();
        info!("browser closed");
        Ok(())
    }
}
