use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use rapidapi_client::{Endpoint, RapidApiClient};
use tagscout::pipeline::{Pipeline, PipelineOptions};
use tagscout::renderer::{renderer_from_config, PageRenderer};
use tagscout::report::write_report;
use tagscout_common::AppConfig;

/// Collect TikTok hashtag, video and creator metadata.
#[derive(Parser)]
#[command(name = "tagscout")]
#[command(version)]
struct Cli {
    /// Hashtags to scrape (with or without the leading #)
    #[arg(required = true)]
    hashtags: Vec<String>,

    /// Region / language code used for page and API requests
    #[arg(long, default_value = "es")]
    region: String,

    /// How many of the highest-count hashtags to fetch videos for
    #[arg(long, default_value_t = 20)]
    top: usize,

    /// Videos requested per page
    #[arg(long, default_value_t = 30)]
    video_count: u32,

    /// Categories requested per page
    #[arg(long, default_value_t = 25)]
    category_count: u32,

    /// Pages to follow per paginated listing
    #[arg(long, default_value_t = 1)]
    max_pages: u32,

    /// Directory the JSON tables are written to
    #[arg(long, default_value = "tagscout-output")]
    out: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("tagscout=info".parse()?))
        .init();

    let cli = Cli::parse();
    info!("TagScout starting...");

    let config = AppConfig::from_env()?;

    let renderer: Arc<dyn PageRenderer> = Arc::from(renderer_from_config(&config));
    let api = Arc::new(RapidApiClient::with_endpoints(
        config.rapidapi_key.clone(),
        Endpoint::new(&config.video_api_url)?,
        Endpoint::new(&config.scraptik_api_url)?,
    ));

    let options = PipelineOptions {
        region: cli.region,
        top_n: cli.top,
        video_page_size: cli.video_count,
        category_page_size: cli.category_count,
        max_pages: cli.max_pages,
    };

    let output = Pipeline::new(renderer, api, options).run(&cli.hashtags).await;
    write_report(&cli.out, &output)?;

    info!("{}", output.stats);
    Ok(())
}
