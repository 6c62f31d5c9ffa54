//! Snapkeeper - camera snapshot maintenance daemon
//!
//! Entry point wiring configuration, logging and the scan/cache/prune
//! pipeline, then driving it on a fixed interval until shutdown.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use snapkeeper::app_mode::RunMode;
use snapkeeper::cli::CliOptions;
use snapkeeper::config::Config;
use snapkeeper::jobs::Scheduler;
use snapkeeper::services::{
    CachePruner, RetryConfig, SnapshotScanner, ThumbnailCache, ThumbnailCacheConfig,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "snapkeeper=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Snapkeeper");

    let options = CliOptions::from_args();
    let run_mode = options.run_mode_override.unwrap_or_else(RunMode::from_env);

    tokio::fs::create_dir_all(&config.cache_path)
        .await
        .with_context(|| format!("Failed to create cache directory {}", config.cache_path))?;

    let thumbnailer = ThumbnailCache::new(ThumbnailCacheConfig {
        cache_dir: PathBuf::from(&config.cache_path),
        temp_dir: std::env::temp_dir(),
        url_prefix: config.source_url_prefix.clone(),
        width: config.thumbnail_width,
        height: config.thumbnail_height,
        retry: RetryConfig::default(),
    });
    let scanner = SnapshotScanner::new(
        PathBuf::from(&config.source_path),
        config.retention_days,
        config.cache_window_days,
        thumbnailer,
    );
    let pruner = CachePruner::new(PathBuf::from(&config.cache_path), config.max_cache_files);
    let scheduler = Scheduler::new(
        scanner,
        pruner,
        Duration::from_secs(config.scan_interval_secs),
    );
    tracing::info!(
        source = %config.source_path,
        cache = %config.cache_path,
        mode = ?run_mode,
        "Snapshot pipeline initialized"
    );

    let shutdown = CancellationToken::new();
    match run_mode {
        RunMode::Service => {
            let token = shutdown.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    tracing::info!("Received Ctrl-C, shutting down");
                    token.cancel();
                }
            });
            scheduler.run(shutdown).await;
        }
        RunMode::Interactive => {
            let handle = tokio::spawn(scheduler.run(shutdown.clone()));
            println!("Running interactively; press Enter to stop");
            let mut line = String::new();
            let mut stdin = BufReader::new(tokio::io::stdin());
            let _ = stdin.read_line(&mut line).await;
            shutdown.cancel();
            let _ = handle.await;
        }
    }

    tracing::info!("Snapkeeper stopped");
    Ok(())
}
