use std::time::Duration;

use url::Url;

use crate::error::TagScoutError;

const DEFAULT_VIDEO_API_URL: &str = "https://tiktok-scraper2.p.rapidapi.com";
const DEFAULT_SCRAPTIK_API_URL: &str = "https://scraptik.p.rapidapi.com";
const DEFAULT_PAGE_WAIT_MS: u64 = 5_000;

/// Application configuration loaded from environment variables.
/// Secrets and endpoints only; per-run parameters come from the command line.
#[derive(Debug, Clone)]
pub struct AppConfig {
    // RapidAPI
    pub rapidapi_key: String,
    pub video_api_url: String,
    pub scraptik_api_url: String,

    // Browser (Browserless when set, local Chromium otherwise)
    pub browserless_url: Option<String>,
    pub browserless_token: Option<String>,
    pub chrome_bin: String,

    /// How long a hashtag page is given to render before its DOM is read.
    pub page_wait: Duration,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, TagScoutError> {
        dotenvy::dotenv().ok();

        let config = Self::from_lookup(|key| std::env::var(key).ok())?;
        config.log_keys();
        Ok(config)
    }

    /// Build from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, TagScoutError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let rapidapi_key = get("RAPIDAPI_KEY").ok_or_else(|| {
            TagScoutError::Config("RAPIDAPI_KEY environment variable is required".to_string())
        })?;

        let page_wait_ms = match get("PAGE_WAIT_MS") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|_| {
                TagScoutError::Config(format!("PAGE_WAIT_MS must be a number, got {raw:?}"))
            })?,
            None => DEFAULT_PAGE_WAIT_MS,
        };

        let video_api_url = get("VIDEO_API_URL").unwrap_or_else(|| DEFAULT_VIDEO_API_URL.to_string());
        check_endpoint("VIDEO_API_URL", &video_api_url)?;
        let scraptik_api_url =
            get("SCRAPTIK_API_URL").unwrap_or_else(|| DEFAULT_SCRAPTIK_API_URL.to_string());
        check_endpoint("SCRAPTIK_API_URL", &scraptik_api_url)?;

        Ok(Self {
            rapidapi_key,
            video_api_url,
            scraptik_api_url,
            browserless_url: get("BROWSERLESS_URL"),
            browserless_token: get("BROWSERLESS_TOKEN"),
            chrome_bin: get("CHROME_BIN").unwrap_or_else(|| "chromium".to_string()),
            page_wait: Duration::from_millis(page_wait_ms),
        })
    }

    fn log_keys(&self) {
        fn preview_opt(val: &Option<String>) -> String {
            match val {
                Some(v) if !v.is_empty() => preview(v),
                _ => "<not set>".to_string(),
            }
        }

        tracing::info!("Config loaded:");
        tracing::info!("  RAPIDAPI_KEY: {}", preview(&self.rapidapi_key));
        tracing::info!("  VIDEO_API_URL: {}", self.video_api_url);
        tracing::info!("  SCRAPTIK_API_URL: {}", self.scraptik_api_url);
        tracing::info!("  BROWSERLESS_URL: {}", self.browserless_url.as_deref().unwrap_or("<not set>"));
        tracing::info!("  BROWSERLESS_TOKEN: {}", preview_opt(&self.browserless_token));
        tracing::info!("  PAGE_WAIT_MS: {}", self.page_wait.as_millis());
    }
}

fn preview(val: &str) -> String {
    let head: String = val.chars().take(5).collect();
    format!("{}...({} chars)", head, val.chars().count())
}

/// An API base URL must be absolute and name a host.
fn check_endpoint(key: &str, raw: &str) -> Result<(), TagScoutError> {
    let url = Url::parse(raw)
        .map_err(|e| TagScoutError::Config(format!("{key} is not a valid URL ({raw:?}): {e}")))?;
    if url.host_str().is_none() {
        return Err(TagScoutError::Config(format!("{key} has no host: {raw:?}")));
    }
    Ok(())
}
