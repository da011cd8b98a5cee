// Test mocks for the scrape pipeline.
//
// Two mocks matching the two trait boundaries:
// - MockRenderer (PageRenderer): HashMap-based URL→HTML
// - MockSocialApi (SocialApi): HashMap-based request→response
//
// Both return `Err` for anything not registered and remember what was asked
// of them.

use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::Result;
use async_trait::async_trait;

use rapidapi_client::{
    Category, CategoryListQuery, CategoryListResponse, ChallengeInfo, HashtagVideosResponse,
    TrendingCreatorsResponse, TrendingUser, VideoAuthor, VideoItem, VideoMusic, VideoStats,
};

use crate::renderer::PageRenderer;
use crate::social::SocialApi;

// ---------------------------------------------------------------------------
// MockRenderer
// ---------------------------------------------------------------------------

pub struct MockRenderer {
    pages: HashMap<String, String>,
    rendered: Mutex<Vec<String>>,
}

impl MockRenderer {
    pub fn new() -> Self {
        Self {
            pages: HashMap::new(),
            rendered: Mutex::new(Vec::new()),
        }
    }

    pub fn on_page(mut self, url: &str, html: &str) -> Self {
        self.pages.insert(url.to_string(), html.to_string());
        self
    }

    /// URLs passed to `render`, in call order.
    pub fn rendered(&self) -> Vec<String> {
        self.rendered.lock().unwrap().clone()
    }
}

impl Default for MockRenderer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PageRenderer for MockRenderer {
    async fn render(&self, url: &str) -> Result<String> {
        self.rendered.lock().unwrap().push(url.to_string());
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("MockRenderer: no page registered for {url}"))
    }

    fn name(&self) -> &str {
        "mock"
    }
}

// ---------------------------------------------------------------------------
// MockSocialApi
// ---------------------------------------------------------------------------

pub struct MockSocialApi {
    videos: HashMap<(String, Option<i64>), HashtagVideosResponse>,
    trending: HashMap<String, Vec<TrendingUser>>,
    categories: HashMap<(String, i64), CategoryListResponse>,
    video_calls: Mutex<Vec<String>>,
}

impl MockSocialApi {
    pub fn new() -> Self {
        Self {
            videos: HashMap::new(),
            trending: HashMap::new(),
            categories: HashMap::new(),
            video_calls: Mutex::new(Vec::new()),
        }
    }

    pub fn on_videos(
        mut self,
        challenge_id: &str,
        cursor: Option<i64>,
        resp: HashtagVideosResponse,
    ) -> Self {
        self.videos.insert((challenge_id.to_string(), cursor), resp);
        self
    }

    pub fn on_trending(mut self, region: &str, users: Vec<TrendingUser>) -> Self {
        self.trending.insert(region.to_string(), users);
        self
    }

    pub fn on_categories(mut self, region: &str, cursor: i64, resp: CategoryListResponse) -> Self {
        self.categories.insert((region.to_string(), cursor), resp);
        self
    }

    /// Challenge ids passed to `hashtag_videos`, in call order.
    pub fn video_calls(&self) -> Vec<String> {
        self.video_calls.lock().unwrap().clone()
    }
}

impl Default for MockSocialApi {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SocialApi for MockSocialApi {
    async fn hashtag_videos(
        &self,
        challenge_id: &str,
        _count: u32,
        cursor: Option<i64>,
    ) -> Result<HashtagVideosResponse> {
        self.video_calls.lock().unwrap().push(challenge_id.to_string());
        self.videos
            .get(&(challenge_id.to_string(), cursor))
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("MockSocialApi: no videos for {challenge_id} at {cursor:?}"))
    }

    async fn trending_creators(&self, region: &str) -> Result<TrendingCreatorsResponse> {
        self.trending
            .get(region)
            .map(|users| TrendingCreatorsResponse {
                user_list: users.clone(),
            })
            .ok_or_else(|| anyhow::anyhow!("MockSocialApi: no trending creators for {region}"))
    }

    async fn category_list(&self, query: &CategoryListQuery) -> Result<CategoryListResponse> {
        self.categories
            .get(&(query.region.clone(), query.cursor))
            .cloned()
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "MockSocialApi: no categories for {} at {}",
                    query.region,
                    query.cursor
                )
            })
    }
}

// ---------------------------------------------------------------------------
// Fixture helpers
// ---------------------------------------------------------------------------

/// A complete video item with the given engagement counters.
pub fn video_item(id: &str, likes: i64, comments: i64, shares: i64, views: i64) -> VideoItem {
    VideoItem {
        id: Some(id.to_string()),
        desc: Some(format!("video {id} #fyp")),
        music: Some(VideoMusic { duration: Some(15) }),
        author: Some(VideoAuthor {
            id: Some(format!("author-{id}")),
            nickname: Some(format!("creator {id}")),
        }),
        stats_v2: Some(VideoStats {
            digg_count: Some(likes),
            comment_count: Some(comments),
            share_count: Some(shares),
            play_count: Some(views),
        }),
    }
}

/// A category list page holding the given challenge names.
pub fn category_page(names: &[&str], cursor: Option<i64>, has_more: bool) -> CategoryListResponse {
    CategoryListResponse {
        category_list: names
            .iter()
            .map(|name| Category {
                challenge_info: Some(ChallengeInfo {
                    cha_name: Some(name.to_string()),
                    use_count: Some(10),
                    view_count: Some(1000),
                    desc: Some(format!("{name} challenge")),
                }),
            })
            .collect(),
        cursor,
        has_more,
    }
}
