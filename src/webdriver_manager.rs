use anyhow::{Context, Result};
use std::process::{Child, Command, Stdio};
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info};

use crate::webdriver::BrowserType;

/// Starts geckodriver/chromedriver on demand and stops what it started
#[derive(Default)]
pub struct WebDriverManager {
    processes: Mutex<Vec<DriverProcess>>,
}

struct DriverProcess {
    browser_type: BrowserType,
    child: Child,
    url: String,
}

impl WebDriverManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// URL of a ready WebDriver for `browser_type`, starting one if needed
    pub async fn ensure_driver(&self, browser_type: &BrowserType) -> Result<String> {
        let managed: Vec<String> = self
            .lock()
            .iter()
            .filter(|p| p.browser_type == *browser_type)
            .map(|p| p.url.clone())
            .collect();

        for url in managed.iter().map(String::as_str).chain([Self::standard_url(browser_type)]) {
            if Self::is_driver_ready(url).await {
                debug!("Using WebDriver at {}", url);
                return Ok(url.to_string());
            }
        }

        info!("No running {} found, starting one", browser_type.driver_name());
        self.start_driver(browser_type).await
    }

    fn standard_url(browser_type: &BrowserType) -> &'static str {
        match browser_type {
            BrowserType::Firefox => "http://localhost:4444",
            BrowserType::Chrome => "http://localhost:9515",
        }
    }

    async fn start_driver(&self, browser_type: &BrowserType) -> Result<String> {
        let command = browser_type.driver_name();
        if !Self::command_exists(command) {
            anyhow::bail!(
                "{} not found in PATH. Install it and make sure it is on PATH",
                command
            );
        }

        let port = Self::find_free_port()?;
        let port_arg = match browser_type {
            BrowserType::Firefox => vec!["--port".to_string(), port.to_string()],
            BrowserType::Chrome => vec![format!("--port={}", port)],
        };

        info!("Starting {} on port {}", command, port);
        let child = Command::new(command)
            .args(&port_arg)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .with_context(|| format!("Failed to start {}", command))?;

        let url = format!("http://localhost:{}", port);
        self.lock().push(DriverProcess {
            browser_type: *browser_type,
            child,
            url: url.clone(),
        });

        // 3 seconds total
        for _ in 0..30 {
            if Self::is_driver_ready(&url).await {
                info!("{} ready on port {}", command, port);
                return Ok(url);
            }
            sleep(Duration::from_millis(100)).await;
        }

        self.stop_url(&url);
        anyhow::bail!("{} failed to start within timeout", command)
    }

    /// Check if a command exists in PATH
    pub fn command_exists(command: &str) -> bool {
        let finder = if cfg!(windows) { "where" } else { "which" };
        Command::new(finder)
            .arg(command)
            .output()
            .map(|output| output.status.success())
            .unwrap_or(false)
    }

    /// Let the OS pick a free local port
    pub fn find_free_port() -> Result<u16> {
        let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
        Ok(listener.local_addr()?.port())
    }

    /// Whether the WebDriver at `url` answers its status endpoint with ready:true
    pub async fn is_driver_ready(url: &str) -> bool {
        let status_url = format!("{}/status", url);

        let response = match reqwest::Client::new()
            .get(&status_url)
            .timeout(Duration::from_secs(1))
            .send()
            .await
        {
            Ok(response) if response.status().is_success() => response,
            _ => return false,
        };

        response
            .json::<serde_json::Value>()
            .await
            .ok()
            .and_then(|body| body.pointer("/value/ready").and_then(|r| r.as_bool()))
            .unwrap_or(false)
    }

    fn stop_url(&self, url: &str) {
        let mut processes = self.lock();
        if let Some(index) = processes.iter().position(|p| p.url == url) {
            let mut process = processes.remove(index);
            let _ = process.child.kill();
            let _ = process.child.wait();
        }
    }

    /// Stop every WebDriver this manager started
    pub fn stop_all(&self) {
        let mut processes = self.lock();
        for process in processes.iter_mut() {
            debug!("Stopping WebDriver at {}", process.url);
            let _ = process.child.kill();
            let _ = process.child.wait();
        }
        processes.clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<DriverProcess>> {
        self.processes
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Drop for WebDriverManager {
    fn drop(&mut self) {
        self.stop_all();
    }
}

lazy_static::lazy_static! {
    pub static ref GLOBAL_WEBDRIVER_MANAGER: WebDriverManager = WebDriverManager::new();
}

#[cfg(test)]
#[path = "webdriver_manager_test.rs"]
mod webdriver_manager_test;
