use serde::{Deserialize, Serialize};

use crate::count::RawCount;

/// Everything scraped from one hashtag page in a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HashtagRecord {
    pub hashtag: String,
    /// Numeric challenge id from the page's metadata, if present.
    pub challenge_id: Option<String>,
    /// Count as displayed on the page, or the unknown sentinel.
    pub post_count_raw: RawCount,
    /// `post_count_raw` normalized to a number.
    pub post_count: f64,
    /// Creators listed on this hashtag's page.
    pub usernames: Vec<String>,
}

impl HashtagRecord {
    pub fn new(hashtag: &str, challenge_id: Option<String>, post_count_raw: RawCount) -> Self {
        let post_count = post_count_raw.normalize();
        Self {
            hashtag: hashtag.to_string(),
            challenge_id,
            post_count_raw,
            post_count,
            usernames: Vec::new(),
        }
    }

    /// Record for a page that could not be rendered at all.
    pub fn unavailable(hashtag: &str) -> Self {
        Self::new(hashtag, None, RawCount::unknown())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoRecord {
    pub video_id: String,
    /// Challenge the video was listed under.
    pub challenge_id: String,
    /// Seconds.
    pub duration: i64,
    pub view_count: i64,
    /// (likes + comments + shares) / views, as a percentage.
    pub engagement_rate: f64,
    pub author_id: String,
    pub author_nickname: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatorRecord {
    pub name: String,
    pub follower_count: i64,
    pub total_like_count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChallengeCategoryRecord {
    pub name: String,
    pub user_count: i64,
    pub view_count: i64,
    pub description: String,
}

/// Engagement as a percentage of views. Zero views gives 0 rather than a
/// division by zero.
pub fn engagement_rate(likes: i64, comments: i64, shares: i64, views: i64) -> f64 {
    if views == 0 {
        return 0.0;
    }
    (likes as f64 + comments as f64 + shares as f64) / views as f64 * 100.0
}
