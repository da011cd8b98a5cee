use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use rand::Rng;
use tracing::{info, warn};

use tagscout_common::AppConfig;

// --- PageRenderer trait ---

/// Anything that can turn a URL into the HTML of the page after its scripts
/// have run.
#[async_trait]
pub trait PageRenderer: Send + Sync {
    async fn render(&self, url: &str) -> Result<String>;
    fn name(&self) -> &str;
}

/// Pick the renderer the config asks for: Browserless when a URL is set,
/// a local Chromium process otherwise.
pub fn renderer_from_config(config: &AppConfig) -> Box<dyn PageRenderer> {
    match config.browserless_url.as_deref() {
        Some(base_url) => Box::new(BrowserlessRenderer::new(
            base_url,
            config.browserless_token.as_deref(),
            config.page_wait,
        )),
        None => Box::new(ChromeRenderer::new(&config.chrome_bin, config.page_wait)),
    }
}

// --- Headless Chromium ---

/// Max attempts for transient Chrome failures (timeouts, "Cannot fork", empty DOM).
const CHROME_MAX_ATTEMPTS: u32 = 3;
/// Base backoff between attempts. Actual delay is base * 3^attempt + jitter.
const CHROME_RETRY_BASE: Duration = Duration::from_secs(3);
/// Hard limit on one Chrome process, on top of the page wait.
const CHROME_PROCESS_TIMEOUT: Duration = Duration::from_secs(30);

/// Renders with a fresh `chromium --headless --dump-dom` process per page.
/// Each call gets its own throwaway profile directory, so nothing is shared
/// between pages and the process is gone when the call returns.
pub struct ChromeRenderer {
    chrome_bin: String,
    page_wait: Duration,
}

impl ChromeRenderer {
    pub fn new(chrome_bin: &str, page_wait: Duration) -> Self {
        info!(
            chrome_bin,
            page_wait_ms = page_wait.as_millis() as u64,
            "Using ChromeRenderer (dump-dom)"
        );
        Self {
            chrome_bin: chrome_bin.to_string(),
            page_wait,
        }
    }

    async fn backoff(&self, url: &str, attempt: u32, reason: &str) {
        let backoff = CHROME_RETRY_BASE * 3u32.pow(attempt);
        let jitter = Duration::from_millis(rand::rng().random_range(0..1000));
        warn!(
            url,
            attempt = attempt + 1,
            backoff_secs = backoff.as_secs(),
            reason,
            "Chrome render failed, retrying after backoff"
        );
        tokio::time::sleep(backoff + jitter).await;
    }

    async fn run_chrome(&self, url: &str) -> Result<Vec<u8>> {
        let parsed = url::Url::parse(url).context("Invalid URL")?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            anyhow::bail!("Only http/https URLs are allowed, got: {}", parsed.scheme());
        }

        let budget = format!("--virtual-time-budget={}", self.page_wait.as_millis());
        let timeout = CHROME_PROCESS_TIMEOUT + self.page_wait;

        for attempt in 0..CHROME_MAX_ATTEMPTS {
            let last = attempt + 1 == CHROME_MAX_ATTEMPTS;
            let tmp_dir = tempfile::tempdir().context("Failed to create temp profile dir")?;

            let result = tokio::time::timeout(
                timeout,
                tokio::process::Command::new(&self.chrome_bin)
                    .args([
                        "--headless",
                        "--no-sandbox",
                        "--disable-gpu",
                        "--disable-dev-shm-usage",
                        "--window-size=1920,1080",
                        &format!("--user-data-dir={}", tmp_dir.path().display()),
                        &budget,
                        "--dump-dom",
                        url,
                    ])
                    .kill_on_drop(true)
                    .output(),
            )
            .await;

            match result {
                Ok(Ok(output)) if output.status.success() => {
                    if !output.stdout.is_empty() {
                        return Ok(output.stdout);
                    }
                    if last {
                        anyhow::bail!("Chrome returned an empty DOM for {url}");
                    }
                    self.backoff(url, attempt, "empty DOM").await;
                }
                Ok(Ok(output)) => {
                    let stderr = String::from_utf8_lossy(&output.stderr);
                    let transient = stderr.contains("Cannot fork")
                        || stderr.contains("Resource temporarily unavailable");
                    if !transient || last {
                        anyhow::bail!("Chrome exited with {} for {url}: {stderr}", output.status);
                    }
                    self.backoff(url, attempt, "cannot fork").await;
                }
                Ok(Err(e)) => {
                    let msg = e.to_string();
                    let transient = msg.contains("Cannot fork")
                        || msg.contains("Resource temporarily unavailable");
                    if !transient || last {
                        anyhow::bail!("Failed to run Chrome for {url}: {e}");
                    }
                    self.backoff(url, attempt, "launch failed").await;
                }
                Err(_) => {
                    if last {
                        anyhow::bail!("Chrome timed out after {}s for {url}", timeout.as_secs());
                    }
                    self.backoff(url, attempt, "timed out").await;
                }
            }
        }

        anyhow::bail!("Chrome gave up on {url}")
    }
}

#[async_trait]
impl PageRenderer for ChromeRenderer {
    async fn render(&self, url: &str) -> Result<String> {
        info!(url, renderer = "chrome", "Rendering page");

        let html = self.run_chrome(url).await?;
        let text = String::from_utf8_lossy(&html).into_owned();

        info!(url, renderer = "chrome", bytes = text.len(), "Page rendered");
        Ok(text)
    }

    fn name(&self) -> &str {
        "chrome"
    }
}

// --- Browserless ---

pub struct BrowserlessRenderer {
    client: browserless_client::BrowserlessClient,
    page_wait: Duration,
}

impl BrowserlessRenderer {
    pub fn new(base_url: &str, token: Option<&str>, page_wait: Duration) -> Self {
        info!(base_url, "Using BrowserlessRenderer");
        Self {
            client: browserless_client::BrowserlessClient::new(base_url, token),
            page_wait,
        }
    }
}

#[async_trait]
impl PageRenderer for BrowserlessRenderer {
    async fn render(&self, url: &str) -> Result<String> {
        info!(url, renderer = "browserless", "Rendering page");

        let html = self
            .client
            .content(url, Some(self.page_wait))
            .await
            .context("Browserless content request failed")?;

        info!(url, renderer = "browserless", bytes = html.len(), "Page rendered");
        Ok(html)
    }

    fn name(&self) -> &str {
        "browserless"
    }
}
