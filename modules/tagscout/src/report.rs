use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use crate::pipeline::RunOutput;

/// Write each table of a run as pretty JSON into `dir`, creating it if
/// needed. Returns the files written.
pub fn write_report(dir: &Path, output: &RunOutput) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output dir {}", dir.display()))?;

    let written = vec![
        write_json(dir, "hashtags.json", &output.hashtags)?,
        write_json(dir, "videos.json", &output.videos)?,
        write_json(dir, "creators.json", &output.creators)?,
        write_json(dir, "challenges.json", &output.categories)?,
        write_json(dir, "analysis.json", &output.analysis)?,
        write_json(dir, "run.json", &RunSummary::from(output))?,
    ];

    info!(dir = %dir.display(), files = written.len(), "Report written");
    Ok(written)
}

#[derive(Serialize)]
struct RunSummary<'a> {
    #[serde(flatten)]
    stats: &'a crate::pipeline::RunStats,
    top_hashtags: &'a [String],
}

impl<'a> From<&'a RunOutput> for RunSummary<'a> {
    fn from(output: &'a RunOutput) -> Self {
        Self {
            stats: &output.stats,
            top_hashtags: &output.top_hashtags,
        }
    }
}

fn write_json<T: Serialize + ?Sized>(dir: &Path, name: &str, value: &T) -> Result<PathBuf> {
    let path = dir.join(name);
    let json = serde_json::to_string_pretty(value)?;
    fs::write(&path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}
