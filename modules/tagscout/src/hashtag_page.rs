//! Extraction of creators, challenge id and view count from a rendered
//! TikTok hashtag page.

use std::sync::LazyLock;

use anyhow::Result;
use regex::Regex;
use scraper::{Html, Selector};
use tracing::{debug, info};
use url::Url;

use tagscout_common::{HashtagRecord, RawCount};

use crate::renderer::PageRenderer;

static TAG_PAGE_BASE: LazyLock<Url> =
    LazyLock::new(|| Url::parse("https://www.tiktok.com/tag").unwrap());
static USERNAME_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"p[data-e2e="challenge-item-username"]"#).unwrap());
static COUNT_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"h2[data-e2e="challenge-vvcount"]"#).unwrap());
static META_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("meta[content]").unwrap());
static CHALLENGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"://challenge/detail/(\d+)").unwrap());

/// What one hashtag page shows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HashtagPage {
    pub usernames: Vec<String>,
    pub challenge_id: Option<String>,
    /// Text of the view-count heading, e.g. "1.2M views".
    pub count_text: Option<String>,
}

/// Page URL for a hashtag. The tag is one percent-encoded path segment.
pub fn hashtag_url(hashtag: &str, region: &str) -> String {
    let tag = hashtag.trim().trim_start_matches('#');
    let mut url = TAG_PAGE_BASE.clone();
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.push(tag);
    }
    url.query_pairs_mut().append_pair("lang", region);
    url.into()
}

pub fn parse_hashtag_page(html: &str) -> HashtagPage {
    let document = Html::parse_document(html);

    let usernames = document
        .select(&USERNAME_SELECTOR)
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|name| !name.is_empty())
        .collect();

    // The app deep link (e.g. "snssdk1233://challenge/detail/1234") sits in an
    // al:* meta tag; the first one wins.
    let challenge_id = document
        .select(&META_SELECTOR)
        .filter_map(|el| el.value().attr("content"))
        .find_map(|content| CHALLENGE_RE.captures(content).map(|c| c[1].to_string()));

    let count_text = document
        .select(&COUNT_SELECTOR)
        .map(|el| el.text().collect::<String>().trim().to_string())
        .find(|text| !text.is_empty());

    HashtagPage {
        usernames,
        challenge_id,
        count_text,
    }
}

impl HashtagPage {
    /// Key the page's contents to its hashtag.
    pub fn into_record(self, hashtag: &str) -> HashtagRecord {
        let raw = match self.count_text {
            Some(text) => RawCount::Text(text),
            None => RawCount::unknown(),
        };
        let mut record = HashtagRecord::new(hashtag, self.challenge_id, raw);
        record.usernames = self.usernames;
        record
    }
}

/// Render a hashtag page and extract its record. Render failures propagate;
/// elements missing from a rendered page do not.
pub async fn scrape_hashtag(
    renderer: &dyn PageRenderer,
    hashtag: &str,
    region: &str,
) -> Result<HashtagRecord> {
    let url = hashtag_url(hashtag, region);
    let html = renderer.render(&url).await?;
    let page = parse_hashtag_page(&html);

    if page.count_text.is_none() {
        debug!(hashtag, "No view count element on page");
    }
    if page.challenge_id.is_none() {
        debug!(hashtag, "No challenge id in page metadata");
    }

    let record = page.into_record(hashtag);
    info!(
        hashtag,
        post_count = record.post_count,
        usernames = record.usernames.len(),
        challenge_id = record.challenge_id.as_deref().unwrap_or("-"),
        "Scraped hashtag page"
    );
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockRenderer;

    const PAGE: &str = r##"
        <html><head>
            <meta property="og:title" content="#whiteclaw">
            <meta property="al:ios:url" content="snssdk1233://challenge/detail/1624087421123589?refer=web">
            <meta property="al:android:url" content="snssdk1233://challenge/detail/999">
        </head><body>
            <h2 data-e2e="challenge-vvcount">  1.2M posts </h2>
            <div><p data-e2e="challenge-item-username">sunny.days</p></div>
            <div><p data-e2e="challenge-item-username"> beachbum </p></div>
            <div><p data-e2e="challenge-item-username"></p></div>
            <p data-e2e="video-desc">not a username</p>
        </body></html>
    "##;

    #[test]
    fn extracts_usernames_id_and_count() {
        let page = parse_hashtag_page(PAGE);
        assert_eq!(page.usernames, vec!["sunny.days", "beachbum"]);
        assert_eq!(page.challenge_id.as_deref(), Some("1624087421123589"));
        assert_eq!(page.count_text.as_deref(), Some("1.2M posts"));
    }

    #[test]
    fn empty_page_yields_nothing() {
        let page = parse_hashtag_page("<html><body><h1>Couldn't find this hashtag</h1></body></html>");
        assert_eq!(page, HashtagPage::default());
    }

    #[test]
    fn missing_count_becomes_unknown_sentinel() {
        let record = parse_hashtag_page("<html></html>").into_record("quiet");
        assert_eq!(record.post_count_raw, RawCount::unknown());
        assert_eq!(record.post_count, 0.0);
    }

    #[test]
    fn url_strips_leading_hash() {
        assert_eq!(
            hashtag_url("#HardSeltzer", "es"),
            "https://www.tiktok.com/tag/HardSeltzer?lang=es"
        );
    }

    #[test]
    fn url_encodes_reserved_characters_in_tag() {
        assert_eq!(
            hashtag_url("a/b?c#d", "es"),
            "https://www.tiktok.com/tag/a%2Fb%3Fc%23d?lang=es"
        );
        assert_eq!(
            hashtag_url("#verano 2024", "es"),
            "https://www.tiktok.com/tag/verano%202024?lang=es"
        );
    }

    #[tokio::test]
    async fn scrape_keys_usernames_to_hashtag() {
        let renderer =
            MockRenderer::new().on_page(&hashtag_url("whiteclaw", "es"), PAGE);

        let record = scrape_hashtag(&renderer, "whiteclaw", "es").await.unwrap();
        assert_eq!(record.hashtag, "whiteclaw");
        assert_eq!(record.post_count, 1_200_000.0);
        assert_eq!(record.usernames.len(), 2);
    }

    #[tokio::test]
    async fn render_failure_propagates() {
        let renderer = MockRenderer::new();
        assert!(scrape_hashtag(&renderer, "nope", "es").await.is_err());
    }
}
