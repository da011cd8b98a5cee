//! Best-effort API fetches. A failed call is logged and counted, and the run
//! carries on with whatever rows the other calls produced.

use tracing::{debug, info, warn};

use rapidapi_client::{CategoryListQuery, ChallengeInfo, TrendingUser, VideoItem};
use tagscout_common::{
    engagement_rate, ChallengeCategoryRecord, CreatorRecord, VideoRecord,
};

use crate::social::SocialApi;

/// Rows from a group of calls plus how many of those calls failed.
#[derive(Debug, Clone)]
pub struct Fetched<T> {
    pub rows: Vec<T>,
    pub failures: usize,
}

impl<T> Default for Fetched<T> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            failures: 0,
        }
    }
}

/// Convert one listed video into a row. Items missing an id, author id,
/// play count or duration are dropped.
pub fn video_record(challenge_id: &str, item: VideoItem) -> Option<VideoRecord> {
    let video_id = item.id?;
    let stats = item.stats_v2?;
    let author = item.author?;
    let duration = item.music?.duration?;
    let view_count = stats.play_count?;
    let author_id = author.id?;

    let rate = engagement_rate(
        stats.digg_count.unwrap_or(0),
        stats.comment_count.unwrap_or(0),
        stats.share_count.unwrap_or(0),
        view_count,
    );

    Some(VideoRecord {
        video_id,
        challenge_id: challenge_id.to_string(),
        duration,
        view_count,
        engagement_rate: rate,
        author_id,
        author_nickname: author.nickname.unwrap_or_default(),
        description: item.desc.unwrap_or_default(),
    })
}

pub fn creator_record(user: TrendingUser) -> Option<CreatorRecord> {
    Some(CreatorRecord {
        name: user.nickname?,
        follower_count: user.follower_count.unwrap_or(0),
        total_like_count: user.total_like_count.unwrap_or(0),
    })
}

pub fn category_record(info: ChallengeInfo) -> Option<ChallengeCategoryRecord> {
    Some(ChallengeCategoryRecord {
        name: info.cha_name?,
        user_count: info.use_count.unwrap_or(0),
        view_count: info.view_count.unwrap_or(0),
        description: info.desc.unwrap_or_default(),
    })
}

/// Fetch up to `max_pages` pages of videos for each challenge id.
pub async fn fetch_videos(
    api: &dyn SocialApi,
    challenge_ids: &[String],
    page_size: u32,
    max_pages: u32,
) -> Fetched<VideoRecord> {
    let mut out = Fetched::default();

    for challenge_id in challenge_ids {
        let mut cursor = None;
        let mut fetched = 0usize;

        for page in 0..max_pages.max(1) {
            let resp = match api.hashtag_videos(challenge_id, page_size, cursor).await {
                Ok(resp) => resp,
                Err(e) => {
                    warn!(challenge_id = %challenge_id, page, error = %e, "Video listing request failed");
                    out.failures += 1;
                    break;
                }
            };

            let listed = resp.item_list.len();
            for item in resp.item_list {
                match video_record(challenge_id, item) {
                    Some(row) => {
                        out.rows.push(row);
                        fetched += 1;
                    }
                    None => debug!(challenge_id = %challenge_id, "Dropping video with missing fields"),
                }
            }

            match resp.cursor {
                Some(next) if resp.has_more && listed > 0 && cursor != Some(next) => {
                    cursor = Some(next)
                }
                _ => break,
            }
        }

        info!(challenge_id = %challenge_id, videos = fetched, "Fetched challenge videos");
    }

    out
}

pub async fn fetch_trending_creators(api: &dyn SocialApi, region: &str) -> Fetched<CreatorRecord> {
    let mut out = Fetched::default();

    match api.trending_creators(region).await {
        Ok(resp) => {
            out.rows = resp.user_list.into_iter().filter_map(creator_record).collect();
            info!(region, creators = out.rows.len(), "Fetched trending creators");
        }
        Err(e) => {
            warn!(region, error = %e, "Trending creators request failed");
            out.failures += 1;
        }
    }

    out
}

/// Fetch up to `max_pages` pages of challenge categories, starting at cursor 0.
pub async fn fetch_challenge_categories(
    api: &dyn SocialApi,
    region: &str,
    page_size: u32,
    max_pages: u32,
) -> Fetched<ChallengeCategoryRecord> {
    let mut out = Fetched::default();
    let mut query = CategoryListQuery {
        count: page_size,
        cursor: 0,
        region: region.to_string(),
    };

    for page in 0..max_pages.max(1) {
        let resp = match api.category_list(&query).await {
            Ok(resp) => resp,
            Err(e) => {
                warn!(region, page, error = %e, "Category list request failed");
                out.failures += 1;
                break;
            }
        };

        let listed = resp.category_list.len();
        out.rows.extend(
            resp.category_list
                .into_iter()
                .filter_map(|c| c.challenge_info)
                .filter_map(category_record),
        );

        match resp.cursor {
            Some(next) if resp.has_more && listed > 0 && next != query.cursor => {
                query.cursor = next
            }
            _ => break,
        }
    }

    info!(region, categories = out.rows.len(), "Fetched challenge categories");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{video_item, MockSocialApi};
    use rapidapi_client::{HashtagVideosResponse, VideoStats};

    #[test]
    fn video_record_computes_engagement() {
        let row = video_record("c1", video_item("v1", 5, 3, 2, 100)).unwrap();
        assert_eq!(row.video_id, "v1");
        assert_eq!(row.challenge_id, "c1");
        assert_eq!(row.view_count, 100);
        assert_eq!(row.engagement_rate, 10.0);
    }

    #[test]
    fn zero_views_give_zero_engagement() {
        let row = video_record("c1", video_item("v1", 40, 3, 2, 0)).unwrap();
        assert_eq!(row.engagement_rate, 0.0);
    }

    #[test]
    fn saturated_like_count_does_not_panic() {
        let row = video_record("c1", video_item("v", i64::MAX, 1, 0, 10)).unwrap();
        assert!(row.engagement_rate.is_finite());
    }

    #[test]
    fn video_without_stats_is_dropped() {
        let mut item = video_item("v1", 1, 1, 1, 10);
        item.stats_v2 = None;
        assert!(video_record("c1", item).is_none());

        let mut item = video_item("v2", 1, 1, 1, 10);
        item.stats_v2 = Some(VideoStats {
            digg_count: Some(1),
            comment_count: None,
            share_count: None,
            play_count: None,
        });
        assert!(video_record("c1", item).is_none());
    }

    #[tokio::test]
    async fn failed_call_yields_no_rows() {
        let api = MockSocialApi::new();
        let videos = fetch_videos(&api, &["404".to_string()], 30, 1).await;
        assert!(videos.rows.is_empty());
        assert_eq!(videos.failures, 1);

        let creators = fetch_trending_creators(&api, "es").await;
        assert!(creators.rows.is_empty());
        assert_eq!(creators.failures, 1);

        let categories = fetch_challenge_categories(&api, "es", 25, 1).await;
        assert!(categories.rows.is_empty());
        assert_eq!(categories.failures, 1);
    }

    #[tokio::test]
    async fn pagination_follows_cursor_up_to_limit() {
        let api = MockSocialApi::new()
            .on_videos(
                "c1",
                None,
                HashtagVideosResponse {
                    item_list: vec![video_item("a", 1, 0, 0, 10)],
                    cursor: Some(30),
                    has_more: true,
                },
            )
            .on_videos(
                "c1",
                Some(30),
                HashtagVideosResponse {
                    item_list: vec![video_item("b", 1, 0, 0, 10)],
                    cursor: Some(60),
                    has_more: true,
                },
            );

        let one_page = fetch_videos(&api, &["c1".to_string()], 30, 1).await;
        assert_eq!(one_page.rows.len(), 1);
        assert_eq!(one_page.failures, 0);

        // Third page is not registered, so it fails after two good pages.
        let three_pages = fetch_videos(&api, &["c1".to_string()], 30, 3).await;
        let ids: Vec<&str> = three_pages.rows.iter().map(|r| r.video_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(three_pages.failures, 1);
    }

    #[tokio::test]
    async fn repeated_video_cursor_stops_paging() {
        let api = MockSocialApi::new()
            .on_videos(
                "c1",
                None,
                HashtagVideosResponse {
                    item_list: vec![video_item("a", 1, 0, 0, 10)],
                    cursor: Some(30),
                    has_more: true,
                },
            )
            .on_videos(
                "c1",
                Some(30),
                HashtagVideosResponse {
                    item_list: vec![video_item("b", 1, 0, 0, 10)],
                    cursor: Some(30),
                    has_more: true,
                },
            );

        let videos = fetch_videos(&api, &["c1".to_string()], 30, 5).await;
        let ids: Vec<&str> = videos.rows.iter().map(|r| r.video_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(videos.failures, 0);
        assert_eq!(api.video_calls().len(), 2);
    }

    #[tokio::test]
    async fn creators_without_name_are_dropped() {
        let api = MockSocialApi::new().on_trending(
            "es",
            vec![
                TrendingUser {
                    nickname: Some("Ana".into()),
                    follower_count: Some(1000),
                    total_like_count: Some(50_000),
                },
                TrendingUser {
                    nickname: None,
                    follower_count: Some(1),
                    total_like_count: Some(1),
                },
            ],
        );

        let creators = fetch_trending_creators(&api, "es").await;
        assert_eq!(creators.rows.len(), 1);
        assert_eq!(creators.rows[0].name, "Ana");
        assert_eq!(creators.rows[0].total_like_count, 50_000);
    }
}
