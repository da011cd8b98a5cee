//! End-to-end pipeline runs over mock pages and a mock API.

use std::sync::Arc;

use rapidapi_client::{HashtagVideosResponse, TrendingUser};
use tagscout::hashtag_page::hashtag_url;
use tagscout::pipeline::{Pipeline, PipelineOptions, RunOutput};
use tagscout::report::write_report;
use tagscout::testing::{category_page, video_item, MockRenderer, MockSocialApi};
use tagscout_common::RawCount;

const WHITECLAW_ID: &str = "1598201934432261";
const SUMMERVIBES_ID: &str = "42513";
const HARDSELTZER_ID: &str = "7777";

fn renderer() -> MockRenderer {
    MockRenderer::new()
        .on_page(
            &hashtag_url("Whiteclaw", "es"),
            include_str!("fixtures/tag_whiteclaw.html"),
        )
        .on_page(
            &hashtag_url("SummerVibes", "es"),
            include_str!("fixtures/tag_summervibes.html"),
        )
        .on_page(
            &hashtag_url("HardSeltzer", "es"),
            include_str!("fixtures/tag_hardseltzer.html"),
        )
}

fn api() -> MockSocialApi {
    MockSocialApi::new()
        .on_videos(
            WHITECLAW_ID,
            None,
            HashtagVideosResponse {
                item_list: vec![video_item("w1", 5, 3, 2, 100), video_item("w2", 1, 0, 0, 0)],
                cursor: None,
                has_more: false,
            },
        )
        .on_videos(
            SUMMERVIBES_ID,
            None,
            HashtagVideosResponse {
                item_list: vec![video_item("s1", 10, 0, 0, 1000)],
                cursor: None,
                has_more: false,
            },
        )
        .on_videos(
            HARDSELTZER_ID,
            None,
            HashtagVideosResponse {
                item_list: vec![video_item("h1", 1, 1, 1, 10)],
                cursor: None,
                has_more: false,
            },
        )
        .on_trending(
            "es",
            vec![TrendingUser {
                nickname: Some("Ana Verano".into()),
                follower_count: Some(1_250_000),
                total_like_count: Some(48_000_000),
            }],
        )
        .on_categories("es", 0, category_page(&["verano2024", "recetas"], Some(25), true))
}

fn hashtags(tags: &[&str]) -> Vec<String> {
    tags.iter().map(|t| t.to_string()).collect()
}

async fn run(
    renderer: Arc<MockRenderer>,
    api: Arc<MockSocialApi>,
    top_n: usize,
    tags: &[&str],
) -> RunOutput {
    let options = PipelineOptions {
        top_n,
        ..PipelineOptions::default()
    };
    Pipeline::new(renderer, api, options).run(&hashtags(tags)).await
}

#[tokio::test]
async fn ranks_pages_and_fetches_only_top_challenges() {
    let renderer = Arc::new(renderer());
    let api = Arc::new(api());

    let output = run(
        renderer.clone(),
        api.clone(),
        2,
        &["HardSeltzer", "Whiteclaw", "SummerVibes"],
    )
    .await;

    let ranked: Vec<&str> = output.hashtags.iter().map(|r| r.hashtag.as_str()).collect();
    assert_eq!(ranked, vec!["Whiteclaw", "SummerVibes", "HardSeltzer"]);
    assert_eq!(output.top_hashtags, vec!["Whiteclaw", "SummerVibes"]);
    assert_eq!(output.hashtags[0].post_count, 2_400_000_000.0);
    assert_eq!(output.hashtags[1].post_count, 87_300_000.0);
    assert_eq!(output.hashtags[2].post_count, 950_000.0);

    assert_eq!(api.video_calls(), vec![WHITECLAW_ID, SUMMERVIBES_ID]);
    assert_eq!(output.videos.len(), 3);
    assert!(output.videos.iter().all(|v| v.challenge_id != HARDSELTZER_ID));

    let w1 = output.videos.iter().find(|v| v.video_id == "w1").unwrap();
    assert_eq!(w1.engagement_rate, 10.0);
    let w2 = output.videos.iter().find(|v| v.video_id == "w2").unwrap();
    assert_eq!(w2.engagement_rate, 0.0);

    assert_eq!(output.creators.len(), 1);
    assert_eq!(output.categories.len(), 2);
    assert_eq!(output.analysis.video_count, 3);

    assert_eq!(renderer.rendered().len(), 3);
    assert_eq!(output.stats.pages_scraped, 3);
    assert_eq!(output.stats.pages_failed, 0);
    assert_eq!(output.stats.challenge_ids_queried, 2);
    assert_eq!(output.stats.api_failures, 0);
    assert!(output.stats.finished_at.is_some());
}

#[tokio::test]
async fn usernames_stay_with_their_hashtag() {
    let output = run(
        Arc::new(renderer()),
        Arc::new(api()),
        20,
        &["Whiteclaw", "SummerVibes"],
    )
    .await;

    let whiteclaw = output.hashtags.iter().find(|r| r.hashtag == "Whiteclaw").unwrap();
    assert_eq!(whiteclaw.usernames, vec!["clawqueen", "mango.mike", "lakeday"]);
    assert_eq!(whiteclaw.challenge_id.as_deref(), Some(WHITECLAW_ID));
    assert_eq!(whiteclaw.post_count_raw, RawCount::Text("2.4B views".into()));

    let summer = output.hashtags.iter().find(|r| r.hashtag == "SummerVibes").unwrap();
    assert_eq!(summer.usernames, vec!["sol.y.playa"]);
}

#[tokio::test]
async fn unrendered_page_gets_sentinel_and_is_counted() {
    let renderer = Arc::new(renderer());
    let output = run(
        renderer.clone(),
        Arc::new(api()),
        20,
        &["Ghost", "Whiteclaw", "#whiteclaw"],
    )
    .await;

    // Duplicate spelling scraped once.
    assert_eq!(renderer.rendered().len(), 2);
    assert_eq!(output.stats.hashtags_requested, 2);
    assert_eq!(output.stats.pages_failed, 1);

    let ghost = output.hashtags.iter().find(|r| r.hashtag == "Ghost").unwrap();
    assert_eq!(ghost.post_count_raw, RawCount::unknown());
    assert_eq!(ghost.challenge_id, None);
    assert!(ghost.usernames.is_empty());
    assert_eq!(output.hashtags.last().unwrap().hashtag, "Ghost");
}

#[tokio::test]
async fn api_failures_are_skipped_not_fatal() {
    let output = run(
        Arc::new(renderer()),
        Arc::new(MockSocialApi::new()),
        20,
        &["Whiteclaw", "SummerVibes"],
    )
    .await;

    assert!(output.videos.is_empty());
    assert!(output.creators.is_empty());
    assert!(output.categories.is_empty());
    // two challenge ids + creators + categories
    assert_eq!(output.stats.api_failures, 4);
    assert_eq!(output.analysis.video_count, 0);
    assert_eq!(output.hashtags.len(), 2);
}

#[tokio::test]
async fn report_writes_every_table() {
    let output = run(
        Arc::new(renderer()),
        Arc::new(api()),
        20,
        &["Whiteclaw", "SummerVibes", "HardSeltzer"],
    )
    .await;

    let dir = tempfile::tempdir().unwrap();
    let out_dir = dir.path().join("report");
    let files = write_report(&out_dir, &output).unwrap();
    assert_eq!(files.len(), 6);

    let hashtags: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(out_dir.join("hashtags.json")).unwrap())
            .unwrap();
    assert_eq!(hashtags[0]["hashtag"], "Whiteclaw");
    assert_eq!(hashtags[0]["post_count_raw"], "2.4B views");

    let run: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(out_dir.join("run.json")).unwrap()).unwrap();
    assert_eq!(run["region"], "es");
    assert_eq!(run["videos"], 4);
    assert_eq!(run["top_hashtags"][2], "HardSeltzer");

    let analysis: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(out_dir.join("analysis.json")).unwrap())
            .unwrap();
    assert_eq!(analysis["video_count"], 4);
    assert_eq!(analysis["correlations"]["columns"][0], "duration");
}

fn tag_page(challenge_id: &str, count: &str) -> String {
    format!(
        r#"<html><head>
            <meta property="al:android:url" content="snssdk1233://challenge/detail/{challenge_id}">
        </head><body>
            <h2 data-e2e="challenge-vvcount">{count}</h2>
        </body></html>"#
    )
}

#[tokio::test]
async fn shared_challenge_id_is_fetched_once() {
    let renderer = MockRenderer::new()
        .on_page(&hashtag_url("Whiteclaw", "es"), &tag_page(WHITECLAW_ID, "2.4B views"))
        .on_page(&hashtag_url("WhiteClawSummer", "es"), &tag_page(WHITECLAW_ID, "1M views"));
    let api = Arc::new(api());

    let output = run(
        Arc::new(renderer),
        api.clone(),
        20,
        &["Whiteclaw", "WhiteClawSummer"],
    )
    .await;

    assert_eq!(api.video_calls(), vec![WHITECLAW_ID]);
    assert_eq!(output.stats.challenge_ids_queried, 1);
    let ids: Vec<&str> = output.videos.iter().map(|v| v.video_id.as_str()).collect();
    assert_eq!(ids, vec!["w1", "w2"]);
}

#[tokio::test]
async fn zero_views_page_still_counts_as_found() {
    let renderer = MockRenderer::new()
        .on_page(&hashtag_url("Brandnew", "es"), &tag_page("55", "0 views"))
        .on_page(
            &hashtag_url("Quiet", "es"),
            "<html><body><h1>Couldn't find this hashtag</h1></body></html>",
        );

    let output = run(Arc::new(renderer), Arc::new(api()), 20, &["Brandnew", "Quiet"]).await;

    assert_eq!(output.stats.pages_scraped, 2);
    assert_eq!(output.stats.counts_found, 1);
    let brandnew = output.hashtags.iter().find(|r| r.hashtag == "Brandnew").unwrap();
    assert_eq!(brandnew.post_count, 0.0);
    assert_eq!(brandnew.post_count_raw, RawCount::Text("0 views".into()));
}
