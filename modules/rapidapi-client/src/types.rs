use serde::{Deserialize, Serialize};

// --- tiktok-scraper2: hashtag video listing ---

/// Response of `GET /hashtag/videos`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HashtagVideosResponse {
    #[serde(rename = "itemList", default)]
    pub item_list: Vec<VideoItem>,
    #[serde(default, deserialize_with = "flex::opt_i64")]
    pub cursor: Option<i64>,
    #[serde(rename = "hasMore", default, deserialize_with = "flex::bool_ish")]
    pub has_more: bool,
}

/// A single video from the hashtag listing. Every field is optional because
/// the upstream scraper omits whatever it failed to collect.
#[derive(Debug, Clone, Deserialize)]
pub struct VideoItem {
    #[serde(default, deserialize_with = "flex::opt_string")]
    pub id: Option<String>,
    pub desc: Option<String>,
    pub music: Option<VideoMusic>,
    pub author: Option<VideoAuthor>,
    #[serde(rename = "statsV2")]
    pub stats_v2: Option<VideoStats>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VideoMusic {
    #[serde(default, deserialize_with = "flex::opt_i64")]
    pub duration: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VideoAuthor {
    #[serde(default, deserialize_with = "flex::opt_string")]
    pub id: Option<String>,
    pub nickname: Option<String>,
}

/// Engagement counters. The API sends these as decimal strings.
#[derive(Debug, Clone, Deserialize)]
pub struct VideoStats {
    #[serde(rename = "diggCount", default, deserialize_with = "flex::opt_i64")]
    pub digg_count: Option<i64>,
    #[serde(rename = "commentCount", default, deserialize_with = "flex::opt_i64")]
    pub comment_count: Option<i64>,
    #[serde(rename = "shareCount", default, deserialize_with = "flex::opt_i64")]
    pub share_count: Option<i64>,
    #[serde(rename = "playCount", default, deserialize_with = "flex::opt_i64")]
    pub play_count: Option<i64>,
}

// --- scraptik: trending creators ---

/// Response of `GET /trending-creators`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TrendingCreatorsResponse {
    #[serde(default)]
    pub user_list: Vec<TrendingUser>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrendingUser {
    pub nickname: Option<String>,
    #[serde(default, deserialize_with = "flex::opt_i64")]
    pub follower_count: Option<i64>,
    #[serde(default, deserialize_with = "flex::opt_i64")]
    pub total_like_count: Option<i64>,
}

// --- scraptik: challenge categories ---

/// Query parameters for `GET /category-list`.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryListQuery {
    pub count: u32,
    pub cursor: i64,
    pub region: String,
}

/// Response of `GET /category-list`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryListResponse {
    #[serde(default)]
    pub category_list: Vec<Category>,
    #[serde(default, deserialize_with = "flex::opt_i64")]
    pub cursor: Option<i64>,
    #[serde(default, deserialize_with = "flex::bool_ish")]
    pub has_more: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Category {
    pub challenge_info: Option<ChallengeInfo>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChallengeInfo {
    pub cha_name: Option<String>,
    #[serde(default, deserialize_with = "flex::opt_i64")]
    pub use_count: Option<i64>,
    #[serde(default, deserialize_with = "flex::opt_i64")]
    pub view_count: Option<i64>,
    pub desc: Option<String>,
}

/// Lenient scalar decoding. Both APIs mix JSON numbers, numeric strings and
/// 0/1 booleans for the same field across endpoints.
mod flex {
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Bool(bool),
        Int(i64),
        Float(f64),
        Str(String),
    }

    pub fn opt_i64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i64>, D::Error> {
        Ok(match Option::<Scalar>::deserialize(d)? {
            Some(Scalar::Int(i)) => Some(i),
            Some(Scalar::Float(f)) if f.is_finite() => Some(f as i64),
            Some(Scalar::Str(s)) => s.trim().parse().ok(),
            _ => None,
        })
    }

    pub fn opt_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        Ok(match Option::<Scalar>::deserialize(d)? {
            Some(Scalar::Str(s)) => Some(s),
            Some(Scalar::Int(i)) => Some(i.to_string()),
            Some(Scalar::Float(f)) => Some(f.to_string()),
            _ => None,
        })
    }

    pub fn bool_ish<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
        Ok(match Option::<Scalar>::deserialize(d)? {
            Some(Scalar::Bool(b)) => b,
            Some(Scalar::Int(i)) => i != 0,
            Some(Scalar::Str(s)) => matches!(s.as_str(), "true" | "1"),
            _ => false,
        })
    }
}
