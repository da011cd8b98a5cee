// SocialApi: the third-party TikTok data APIs behind one trait, so the
// fetchers can run against MockSocialApi in tests.

use anyhow::Result;
use async_trait::async_trait;

use rapidapi_client::{
    CategoryListQuery, CategoryListResponse, HashtagVideosResponse, RapidApiClient,
    TrendingCreatorsResponse,
};

#[async_trait]
pub trait SocialApi: Send + Sync {
    /// One page of videos listed under a challenge id.
    async fn hashtag_videos(
        &self,
        challenge_id: &str,
        count: u32,
        cursor: Option<i64>,
    ) -> Result<HashtagVideosResponse>;

    /// Trending creators for a region.
    async fn trending_creators(&self, region: &str) -> Result<TrendingCreatorsResponse>;

    /// One page of hashtag challenge categories.
    async fn category_list(&self, query: &CategoryListQuery) -> Result<CategoryListResponse>;
}

#[async_trait]
impl SocialApi for RapidApiClient {
    async fn hashtag_videos(
        &self,
        challenge_id: &str,
        count: u32,
        cursor: Option<i64>,
    ) -> Result<HashtagVideosResponse> {
        Ok(self.hashtag_videos(challenge_id, count, cursor).await?)
    }

    async fn trending_creators(&self, region: &str) -> Result<TrendingCreatorsResponse> {
        Ok(self.trending_creators(region).await?)
    }

    async fn category_list(&self, query: &CategoryListQuery) -> Result<CategoryListResponse> {
        Ok(self.category_list(query).await?)
    }
}
