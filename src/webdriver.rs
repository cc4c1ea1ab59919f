use anyhow::{Context, Result};
use fantoccini::{Client, ClientBuilder, Locator};
use serde_json::json;
use tempfile::TempDir;
use tracing::{debug, info};

use crate::errors::HarvestError;
use crate::page::{MapPage, PageSession};
use crate::types::ViewportSize;
use crate::webdriver_manager::GLOBAL_WEBDRIVER_MANAGER;

/// WebDriver key code for Enter
const ENTER_KEY: char = '\u{e007}';

/// Supported browser types
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum BrowserType {
    /// Mozilla Firefox
    Firefox,
    /// Google Chrome/Chromium
    Chrome,
}

impl std::str::FromStr for BrowserType {
    type Err = anyhow::Error;

    /// Parse browser type from string (case-insensitive)
    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "firefox" => Ok(BrowserType::Firefox),
            "chrome" | "chromium" => Ok(BrowserType::Chrome),
            _ => anyhow::bail!("Unsupported browser: {}", s),
        }
    }
}

impl BrowserType {
    /// Name of the WebDriver executable for this browser
    pub fn driver_name(&self) -> &'static str {
        match self {
            BrowserType::Firefox => "geckodriver",
            BrowserType::Chrome => "chromedriver",
        }
    }
}

/// How to launch the browser for a session
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub browser: BrowserType,
    pub viewport: ViewportSize,
    pub headless: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            browser: BrowserType::Chrome,
            viewport: ViewportSize::default(),
            headless: true,
        }
    }
}

impl SessionConfig {
    /// WebDriver capabilities for this configuration
    pub fn capabilities(&self, user_data_dir: Option<&std::path::Path>) -> serde_json::Map<String, serde_json::Value> {
        let mut caps = serde_json::Map::new();
        let vp = self.viewport;

        match self.browser {
            BrowserType::Firefox => {
                let mut args = Vec::new();
                if self.headless {
                    args.push("--headless".to_string());
                }
                args.push(format!("--width={}", vp.width));
                args.push(format!("--height={}", vp.height));

                caps.insert("moz:firefoxOptions".to_string(), json!({ "args": args }));
            }
            BrowserType::Chrome => {
                let mut args = vec!["--no-sandbox".to_string()];
                if self.headless {
                    args.push("--headless=new".to_string());
                    args.push("--disable-gpu".to_string());
                    args.push("--disable-dev-shm-usage".to_string());
                }
                args.push(format!("--window-size={},{}", vp.width, vp.height));
                if let Some(dir) = user_data_dir {
                    args.push(format!("--user-data-dir={}", dir.display()));
                }

                caps.insert("goog:chromeOptions".to_string(), json!({ "args": args }));
            }
        }

        caps
    }
}

/// One browser with one page, serving exactly one batch.
///
/// Created with [`BrowserSession::open`]; [`PageSession::close`] must be
/// called once the batch is over, whatever its outcome.
pub struct BrowserSession {
    client: Client,
    browser_type: BrowserType,
    // Removed when the session is dropped
    _user_data_dir: Option<TempDir>,
}

impl BrowserSession {
    /// Launch a browser and open its page.
    pub async fn open(config: &SessionConfig) -> Result<Self, HarvestError> {
        Self::connect(config)
            .await
            .map_err(HarvestError::initialization)
    }

    async fn connect(config: &SessionConfig) -> Result<Self> {
        info!("Initializing {:?} browser", config.browser);

        let webdriver_url = GLOBAL_WEBDRIVER_MANAGER
            .ensure_driver(&config.browser)
            .await?;

        // Chrome refuses to share a profile directory between sessions
        let user_data_dir = match config.browser {
            BrowserType::Chrome => Some(
                tempfile::Builder::new()
                    .prefix("mapharvest-chrome-")
                    .tempdir()
                    .context("Failed to create browser profile directory")?,
            ),
            BrowserType::Firefox => None,
        };

        let caps = config.capabilities(user_data_dir.as_ref().map(TempDir::path));

        debug!("Connecting to WebDriver at {}", webdriver_url);
        let client = ClientBuilder::rustls()
            .capabilities(caps)
            .connect(&webdriver_url)
            .await
            .with_context(|| format!("Failed to connect to {}", config.browser.driver_name()))?;

        let vp = config.viewport;
        if let Err(e) = client.set_window_size(vp.width, vp.height).await {
            debug!("Could not set window size: {}", e);
        }

        Ok(BrowserSession {
            client,
            browser_type: config.browser,
            _user_data_dir: user_data_dir,
        })
    }

    pub fn browser_type(&self) -> BrowserType {
        self.browser_type
    }

    async fn run_script(&self, script: &str, selector: &str) -> Result<serde_json::Value> {
        self.client
            .execute(script, vec![json!(selector)])
            .await
            .with_context(|| format!("Script failed for {}", selector))
    }
}

impl PageSession for BrowserSession {
    async fn close(self) -> Result<()> {
        self.client
            .close()
            .await
            .context("Failed to close WebDriver session")?;
        Ok(())
    }
}

impl MapPage for BrowserSession {
    async fn goto(&self, url: &str) -> Result<()> {
        let url = url::Url::parse(url).with_context(|| format!("Invalid URL: {}", url))?;
        info!("Navigating to {}", url);
        self.client.goto(url.as_str()).await?;
        Ok(())
    }

    async fn is_ready(&self) -> Result<bool> {
        let value = self
            .client
            .execute("return document.readyState === 'complete';", vec![])
            .await?;
        Ok(value.as_bool().unwrap_or(false))
    }

    async fn is_present(&self, selector: &str) -> Result<bool> {
        let found = self.client.find_all(Locator::Css(selector)).await?;
        Ok(!found.is_empty())
    }

    async fn submit_text(&self, selector: &str, text: &str) -> Result<()> {
        let input = self
            .client
            .find(Locator::Css(selector))
            .await
            .with_context(|| format!("Element not found: {}", selector))?;

        input.clear().await?;
        input.send_keys(text).await?;
        input.send_keys(&ENTER_KEY.to_string()).await?;
        Ok(())
    }

    async fn scroll_to_bottom(&self, selector: &str) -> Result<()> {
        let script = r#"
            const el = document.querySelector(arguments[0]);
            if (!el) throw new Error('No element matches ' + arguments[0]);
            el.scrollTop = el.scrollHeight;
            return true;
        "#;
        self.run_script(script, selector).await?;
        Ok(())
    }

    async fn scroll_height(&self, selector: &str) -> Result<u64> {
        let script = r#"
            const el = document.querySelector(arguments[0]);
            if (!el) throw new Error('No element matches ' + arguments[0]);
            return el.scrollHeight;
        "#;
        let value = self.run_script(script, selector).await?;
        value
            .as_u64()
            .or_else(|| value.as_f64().map(|h| h.max(0.0).round() as u64))
            .with_context(|| format!("Unexpected scroll height: {}", value))
    }

    async fn count(&self, selector: &str) -> Result<usize> {
        Ok(self.client.find_all(Locator::Css(selector)).await?.len())
    }

    async fn open_entry(&self, selector: &str, index: usize) -> Result<()> {
        let found = self.client.find_all(Locator::Css(selector)).await?;
        let entry = found.get(index).with_context(|| {
            format!(
                "Entry {} is no longer in the feed ({} match {})",
                index + 1,
                found.len(),
                selector
            )
        })?;
        entry.click().await?;
        Ok(())
    }

    async fn text_of(&self, selector: &str) -> Result<Option<String>> {
        let found = self.client.find_all(Locator::Css(selector)).await?;
        match found.first() {
            Some(element) => Ok(Some(element.text().await?)),
            None => Ok(None),
        }
    }

    async fn current_url(&self) -> Result<String> {
        Ok(self.client.current_url().await?.to_string())
    }
}

#[cfg(test)]
#[path = "webdriver_test.rs"]
mod webdriver_test;
