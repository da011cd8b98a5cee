use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use tagscout_common::{
    ChallengeCategoryRecord, CreatorRecord, HashtagRecord, RawCount, VideoRecord,
};

use crate::analysis::{analyze, Analysis};
use crate::fetchers::{fetch_challenge_categories, fetch_trending_creators, fetch_videos};
use crate::hashtag_page::scrape_hashtag;
use crate::ranking::sort_by_count;
use crate::renderer::PageRenderer;
use crate::social::SocialApi;

/// Per-run knobs. Defaults match a single-page, top-20 run for Spain.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub region: String,
    pub top_n: usize,
    pub video_page_size: u32,
    pub category_page_size: u32,
    pub max_pages: u32,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            region: "es".to_string(),
            top_n: 20,
            video_page_size: 30,
            category_page_size: 25,
            max_pages: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RunStats {
    pub run_id: Uuid,
    pub region: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub hashtags_requested: usize,
    pub pages_scraped: usize,
    pub pages_failed: usize,
    pub counts_found: usize,
    pub challenge_ids_queried: usize,
    pub videos: usize,
    pub creators: usize,
    pub categories: usize,
    pub api_failures: usize,
}

impl RunStats {
    fn new(region: &str) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            region: region.to_string(),
            started_at: Utc::now(),
            finished_at: None,
            hashtags_requested: 0,
            pages_scraped: 0,
            pages_failed: 0,
            counts_found: 0,
            challenge_ids_queried: 0,
            videos: 0,
            creators: 0,
            categories: 0,
            api_failures: 0,
        }
    }
}

impl std::fmt::Display for RunStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "\n=== TagScout Run Complete ===")?;
        writeln!(f, "Run:                {}", self.run_id)?;
        writeln!(f, "Region:             {}", self.region)?;
        writeln!(f, "Hashtags requested: {}", self.hashtags_requested)?;
        writeln!(f, "Pages scraped:      {}", self.pages_scraped)?;
        writeln!(f, "Pages failed:       {}", self.pages_failed)?;
        writeln!(f, "Counts found:       {}", self.counts_found)?;
        writeln!(f, "Challenges queried: {}", self.challenge_ids_queried)?;
        writeln!(f, "Videos:             {}", self.videos)?;
        writeln!(f, "Trending creators:  {}", self.creators)?;
        writeln!(f, "Categories:         {}", self.categories)?;
        writeln!(f, "API failures:       {}", self.api_failures)?;
        if let Some(finished) = self.finished_at {
            let secs = (finished - self.started_at).num_milliseconds() as f64 / 1000.0;
            writeln!(f, "Elapsed:            {secs:.1}s")?;
        }
        Ok(())
    }
}

/// Everything a run produced, ready for tabular output.
#[derive(Debug, Clone, Serialize)]
pub struct RunOutput {
    pub stats: RunStats,
    /// All scraped hashtags, largest post count first.
    pub hashtags: Vec<HashtagRecord>,
    /// Names of the hashtags whose videos were fetched.
    pub top_hashtags: Vec<String>,
    pub videos: Vec<VideoRecord>,
    pub creators: Vec<CreatorRecord>,
    pub categories: Vec<ChallengeCategoryRecord>,
    pub analysis: Analysis,
}

pub struct Pipeline {
    renderer: Arc<dyn PageRenderer>,
    api: Arc<dyn SocialApi>,
    options: PipelineOptions,
}

impl Pipeline {
    pub fn new(
        renderer: Arc<dyn PageRenderer>,
        api: Arc<dyn SocialApi>,
        options: PipelineOptions,
    ) -> Self {
        Self {
            renderer,
            api,
            options,
        }
    }

    /// Scrape every hashtag page, rank, then pull videos for the top
    /// hashtags plus the region's trending creators and categories.
    pub async fn run(&self, hashtags: &[String]) -> RunOutput {
        let opts = &self.options;
        let mut stats = RunStats::new(&opts.region);

        let hashtags = dedup_hashtags(hashtags);
        stats.hashtags_requested = hashtags.len();
        info!(
            run_id = %stats.run_id,
            hashtags = hashtags.len(),
            region = %opts.region,
            renderer = self.renderer.name(),
            "Starting hashtag scrape"
        );

        // Phase 1: hashtag pages
        let mut records = Vec::with_capacity(hashtags.len());
        for hashtag in &hashtags {
            match scrape_hashtag(self.renderer.as_ref(), hashtag, &opts.region).await {
                Ok(record) => {
                    stats.pages_scraped += 1;
                    if matches!(record.post_count_raw, RawCount::Text(_)) {
                        stats.counts_found += 1;
                    }
                    records.push(record);
                }
                Err(e) => {
                    warn!(hashtag = %hashtag, error = %e, "Hashtag page failed to render");
                    stats.pages_failed += 1;
                    records.push(HashtagRecord::unavailable(hashtag));
                }
            }
        }

        // Phase 2: ranking
        sort_by_count(&mut records);
        let top: Vec<&HashtagRecord> = records.iter().take(opts.top_n).collect();
        let top_hashtags: Vec<String> = top.iter().map(|r| r.hashtag.clone()).collect();
        info!(top = ?top_hashtags, "Ranked hashtags");

        // Phase 3: videos for the top hashtags, each challenge id once
        let mut challenge_ids: Vec<String> = Vec::with_capacity(top.len());
        for record in &top {
            match &record.challenge_id {
                Some(id) if challenge_ids.contains(id) => {
                    debug!(hashtag = %record.hashtag, challenge_id = %id, "Challenge id already queued");
                }
                Some(id) => challenge_ids.push(id.clone()),
                None => debug!(hashtag = %record.hashtag, "No challenge id, skipping video fetch"),
            }
        }
        stats.challenge_ids_queried = challenge_ids.len();

        let videos = fetch_videos(
            self.api.as_ref(),
            &challenge_ids,
            opts.video_page_size,
            opts.max_pages,
        )
        .await;

        // Phase 4: region-wide listings
        let creators = fetch_trending_creators(self.api.as_ref(), &opts.region).await;
        let categories = fetch_challenge_categories(
            self.api.as_ref(),
            &opts.region,
            opts.category_page_size,
            opts.max_pages,
        )
        .await;

        stats.api_failures = videos.failures + creators.failures + categories.failures;
        stats.videos = videos.rows.len();
        stats.creators = creators.rows.len();
        stats.categories = categories.rows.len();

        // Phase 5: analysis
        let analysis = analyze(&videos.rows);

        stats.finished_at = Some(Utc::now());
        info!(
            run_id = %stats.run_id,
            videos = stats.videos,
            creators = stats.creators,
            categories = stats.categories,
            pages_failed = stats.pages_failed,
            api_failures = stats.api_failures,
            "Run finished"
        );

        RunOutput {
            stats,
            hashtags: records,
            top_hashtags,
            videos: videos.rows,
            creators: creators.rows,
            categories: categories.rows,
            analysis,
        }
    }
}

/// Trim, drop a leading `#`, and keep the first spelling of each hashtag
/// (compared case-insensitively).
pub fn dedup_hashtags(hashtags: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    hashtags
        .iter()
        .map(|h| h.trim().trim_start_matches('#').to_string())
        .filter(|h| !h.is_empty())
        .filter(|h| seen.insert(h.to_lowercase()))
        .collect()
}
