pub mod error;

pub use error::{BrowserlessError, Result};

use std::time::Duration;

use serde::Serialize;

/// Body of a Browserless `/content` request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentRequest<'a> {
    pub url: &'a str,
    /// Extra milliseconds to let client-side scripts settle after navigation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wait_for_timeout: Option<u64>,
    pub goto_options: GotoOptions,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GotoOptions {
    pub wait_until: &'static str,
}

impl Default for GotoOptions {
    fn default() -> Self {
        Self {
            wait_until: "networkidle2",
        }
    }
}

pub struct BrowserlessClient {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl BrowserlessClient {
    pub fn new(base_url: &str, token: Option<&str>) -> Self {
        // Navigation plus the settle wait runs server-side, so allow more
        // than a plain API call would need.
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.map(String::from),
        }
    }

    /// Fetch fully-rendered HTML content for a URL via Browserless /content endpoint,
    /// waiting `settle` after the page reports network idle.
    pub async fn content(&self, url: &str, settle: Option<Duration>) -> Result<String> {
        let endpoint = format!("{}/content", self.base_url);

        let body = ContentRequest {
            url,
            wait_for_timeout: settle.map(|d| d.as_millis() as u64),
            goto_options: GotoOptions::default(),
        };

        let mut req = self.client.post(&endpoint).json(&body);
        if let Some(ref token) = self.token {
            req = req.query(&[("token", token)]);
        }

        let resp = req.send().await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(BrowserlessError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let html = resp.text().await?;
        if html.trim().is_empty() {
            return Err(BrowserlessError::EmptyDocument(url.to_string()));
        }

        tracing::debug!(url, bytes = html.len(), "Browserless content fetched");
        Ok(html)
    }
}
