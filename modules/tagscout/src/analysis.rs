//! Descriptive statistics over the collected videos: the numbers behind the
//! distribution, correlation and word-cloud charts.

use std::collections::HashMap;

use serde::Serialize;

use tagscout_common::VideoRecord;

/// Words kept for the word-cloud table.
const TOP_WORDS: usize = 50;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSummary {
    pub count: usize,
    pub mean: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub median: Option<f64>,
}

/// Pairwise Pearson correlations. `values[i][j]` is `None` when either
/// column is constant or there are fewer than two rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    pub values: Vec<Vec<Option<f64>>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WordFrequency {
    pub word: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analysis {
    pub video_count: usize,
    pub duration: ColumnSummary,
    pub engagement_rate: ColumnSummary,
    pub view_count: ColumnSummary,
    pub description_words: ColumnSummary,
    pub correlations: CorrelationMatrix,
    pub top_words: Vec<WordFrequency>,
}

pub fn analyze(videos: &[VideoRecord]) -> Analysis {
    let duration: Vec<f64> = videos.iter().map(|v| v.duration as f64).collect();
    let engagement: Vec<f64> = videos.iter().map(|v| v.engagement_rate).collect();
    let views: Vec<f64> = videos.iter().map(|v| v.view_count as f64).collect();
    let words: Vec<f64> = videos
        .iter()
        .map(|v| word_count(&v.description) as f64)
        .collect();

    let correlations = correlation_matrix(&[
        ("duration", duration.as_slice()),
        ("engagement_rate", engagement.as_slice()),
        ("view_count", views.as_slice()),
    ]);

    Analysis {
        video_count: videos.len(),
        duration: summarize(&duration),
        engagement_rate: summarize(&engagement),
        view_count: summarize(&views),
        description_words: summarize(&words),
        correlations,
        top_words: word_frequencies(videos.iter().map(|v| v.description.as_str()), TOP_WORDS),
    }
}

pub fn summarize(values: &[f64]) -> ColumnSummary {
    if values.is_empty() {
        return ColumnSummary {
            count: 0,
            mean: None,
            min: None,
            max: None,
            median: None,
        };
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let n = sorted.len();
    let median = if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    };

    ColumnSummary {
        count: n,
        mean: Some(sorted.iter().sum::<f64>() / n as f64),
        min: sorted.first().copied(),
        max: sorted.last().copied(),
        median: Some(median),
    }
}

/// Pearson correlation coefficient of two equal-length columns.
pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    let n = xs.len();
    if n < 2 || n != ys.len() {
        return None;
    }

    let mean_x = xs.iter().sum::<f64>() / n as f64;
    let mean_y = ys.iter().sum::<f64>() / n as f64;

    let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }
    Some((cov / (var_x * var_y).sqrt()).clamp(-1.0, 1.0))
}

pub fn correlation_matrix(columns: &[(&str, &[f64])]) -> CorrelationMatrix {
    let values = columns
        .iter()
        .enumerate()
        .map(|(i, (_, xs))| {
            columns
                .iter()
                .enumerate()
                .map(|(j, (_, ys))| {
                    let r = pearson(xs, ys);
                    if i == j {
                        r.map(|_| 1.0)
                    } else {
                        r
                    }
                })
                .collect()
        })
        .collect();

    CorrelationMatrix {
        columns: columns.iter().map(|(name, _)| name.to_string()).collect(),
        values,
    }
}

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Most frequent words across texts, by count then alphabetically.
/// Lower-cased, surrounding punctuation stripped, `#` kept on hashtags,
/// single characters dropped.
pub fn word_frequencies<'a>(
    texts: impl IntoIterator<Item = &'a str>,
    limit: usize,
) -> Vec<WordFrequency> {
    let mut counts: HashMap<String, usize> = HashMap::new();

    for text in texts {
        for raw in text.split_whitespace() {
            let word = raw
                .trim_matches(|c: char| !c.is_alphanumeric() && c != '#')
                .trim_end_matches('#')
                .to_lowercase();
            if word.trim_start_matches('#').chars().count() < 2 {
                continue;
            }
            *counts.entry(word).or_default() += 1;
        }
    }

    let mut words: Vec<WordFrequency> = counts
        .into_iter()
        .map(|(word, count)| WordFrequency { word, count })
        .collect();
    words.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.word.cmp(&b.word)));
    words.truncate(limit);
    words
}
