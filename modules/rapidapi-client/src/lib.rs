pub mod error;
pub mod types;

pub use error::{RapidApiError, Result};
pub use types::{
    Category, CategoryListQuery, CategoryListResponse, ChallengeInfo, HashtagVideosResponse,
    TrendingCreatorsResponse, TrendingUser, VideoAuthor, VideoItem, VideoMusic, VideoStats,
};

use std::time::Duration;

use serde::de::DeserializeOwned;
use url::Url;

/// Default base URL of the tiktok-scraper2 API (hashtag video listing).
pub const VIDEO_API_URL: &str = "https://tiktok-scraper2.p.rapidapi.com";

/// Default base URL of the ScrapTik API (trending creators, categories).
pub const SCRAPTIK_API_URL: &str = "https://scraptik.p.rapidapi.com";

/// One RapidAPI-hosted API: where to send requests and which
/// `x-rapidapi-host` value to authenticate them with.
#[derive(Debug, Clone)]
pub struct Endpoint {
    base_url: String,
    host: String,
}

impl Endpoint {
    /// Build an endpoint, deriving the RapidAPI host header from the URL.
    /// The header carries the host and any non-default port, nothing else.
    pub fn new(base_url: &str) -> Result<Self> {
        let mut url = Url::parse(base_url)
            .map_err(|e| RapidApiError::InvalidUrl(format!("{base_url}: {e}")))?;
        let host = match (url.host_str(), url.port()) {
            (Some(host), Some(port)) => format!("{host}:{port}"),
            (Some(host), None) => host.to_string(),
            (None, _) => {
                return Err(RapidApiError::InvalidUrl(format!("{base_url}: no host")));
            }
        };
        url.set_query(None);
        url.set_fragment(None);

        Ok(Self {
            base_url: url.as_str().trim_end_matches('/').to_string(),
            host,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn host(&self) -> &str {
        &self.host
    }
}

pub struct RapidApiClient {
    client: reqwest::Client,
    api_key: String,
    videos: Endpoint,
    scraptik: Endpoint,
}

impl RapidApiClient {
    pub fn new(api_key: String) -> Result<Self> {
        Ok(Self::with_endpoints(
            api_key,
            Endpoint::new(VIDEO_API_URL)?,
            Endpoint::new(SCRAPTIK_API_URL)?,
        ))
    }

    /// Point the client at non-default hosts (self-hosted mirrors, mock servers).
    pub fn with_endpoints(api_key: String, videos: Endpoint, scraptik: Endpoint) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            api_key,
            videos,
            scraptik,
        }
    }

    /// Fetch one page of videos posted under a challenge (hashtag) id.
    pub async fn hashtag_videos(
        &self,
        hashtag_id: &str,
        count: u32,
        cursor: Option<i64>,
    ) -> Result<HashtagVideosResponse> {
        let mut query = vec![
            ("hashtag_id", hashtag_id.to_string()),
            ("count", count.to_string()),
        ];
        if let Some(cursor) = cursor {
            query.push(("cursor", cursor.to_string()));
        }

        let resp: HashtagVideosResponse = self
            .get_json(&self.videos, "/hashtag/videos", &query)
            .await?;
        tracing::debug!(
            hashtag_id,
            items = resp.item_list.len(),
            has_more = resp.has_more,
            "Fetched hashtag videos page"
        );
        Ok(resp)
    }

    /// Fetch the trending creators list for a region.
    pub async fn trending_creators(&self, region: &str) -> Result<TrendingCreatorsResponse> {
        let query = [("region", region.to_string())];
        let resp: TrendingCreatorsResponse = self
            .get_json(&self.scraptik, "/trending-creators", &query)
            .await?;
        tracing::debug!(region, users = resp.user_list.len(), "Fetched trending creators");
        Ok(resp)
    }

    /// Fetch one page of hashtag challenge categories.
    pub async fn category_list(&self, params: &CategoryListQuery) -> Result<CategoryListResponse> {
        let query = [
            ("count", params.count.to_string()),
            ("cursor", params.cursor.to_string()),
            ("region", params.region.clone()),
        ];
        let resp: CategoryListResponse = self
            .get_json(&self.scraptik, "/category-list", &query)
            .await?;
        tracing::debug!(
            region = %params.region,
            cursor = params.cursor,
            categories = resp.category_list.len(),
            "Fetched category list page"
        );
        Ok(resp)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &Endpoint,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let url = format!("{}{}", endpoint.base_url, path);
        let resp = self
            .client
            .get(&url)
            .header("x-rapidapi-host", &endpoint.host)
            .header("x-rapidapi-key", &self.api_key)
            .query(query)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(RapidApiError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = resp.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}
