use anyhow::Context;
use clap::Parser;
use news_aggregator::{AggregatorConfig, JsonWriter, NewsAggregator, Scheduler};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const DEFAULT_OUTPUT: &str = "data/butuan_news.json";

#[derive(Debug, Parser)]
#[command(name = "news-aggregator", about = "Butuan City news aggregator")]
struct Cli {
    /// Where to write the JSON feed
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Keep running and refresh the feed on a fixed interval
    #[arg(short, long)]
    schedule: bool,

    /// Minutes between scheduled runs
    #[arg(long, default_value_t = 60)]
    interval_minutes: u64,

    /// Maximum number of sources fetched at the same time
    #[arg(long)]
    max_concurrent: Option<usize>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let mut config = AggregatorConfig::from_env();
    if let Some(max) = cli.max_concurrent {
        config.max_concurrent_fetches = max;
    }

    let aggregator = Arc::new(
        NewsAggregator::from_config(&config).context("Failed to set up news sources")?,
    );
    let writer = Arc::new(JsonWriter::new(cli.output));

    let job = move || {
        let aggregator = aggregator.clone();
        let writer = writer.clone();
        async move {
            aggregator
                .run_to_writer(&writer)
                .await
                .with_context(|| format!("Failed to write {}", writer.path().display()))?;
            Ok(())
        }
    };

    if cli.schedule {
        let scheduler = Scheduler::new(Duration::from_secs(cli.interval_minutes.max(1) * 60));
        scheduler.run_forever(job, shutdown_signal()).await;
    } else {
        Scheduler::hourly().run_once(job).await?;
    }

    info!("News aggregator finished");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}
