use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static SHORTHAND_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+(?:\.\d+)?)([KMB]?)").unwrap());

/// A post/view count as scraped: either the display string ("12.3K posts")
/// or a number that is already known.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawCount {
    Number(f64),
    Text(String),
}

impl RawCount {
    /// The one sentinel for "count not available on the page".
    pub fn unknown() -> Self {
        RawCount::Number(0.0)
    }

    /// Numeric value of the count. Numbers pass through unchanged; text goes
    /// through [`normalize_count`].
    pub fn normalize(&self) -> f64 {
        match self {
            RawCount::Number(n) => *n,
            RawCount::Text(text) => normalize_count(text),
        }
    }
}

impl From<&str> for RawCount {
    fn from(text: &str) -> Self {
        RawCount::Text(text.to_string())
    }
}

impl From<String> for RawCount {
    fn from(text: String) -> Self {
        RawCount::Text(text)
    }
}

impl From<f64> for RawCount {
    fn from(n: f64) -> Self {
        RawCount::Number(n)
    }
}

/// Convert a shorthand display count to a number.
///
/// Only the first whitespace-separated token is read, so "1.2M posts" works.
/// `K`, `M` and `B` scale by a thousand, a million and a billion. Anything
/// that does not start with a number is 0.
pub fn normalize_count(text: &str) -> f64 {
    let Some(token) = text.split_whitespace().next() else {
        return 0.0;
    };

    let Some(caps) = SHORTHAND_RE.captures(token) else {
        tracing::debug!(text, "Unrecognized count format, treating as 0");
        return 0.0;
    };

    let number: f64 = match caps[1].parse() {
        Ok(n) => n,
        Err(_) => return 0.0,
    };

    match &caps[2] {
        "K" => number * 1_000.0,
        "M" => number * 1_000_000.0,
        "B" => number * 1_000_000_000.0,
        _ => number,
    }
}
