//! Application configuration management

use std::env;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables
///
/// Every field has a default matching the deployment this daemon grew out of,
/// so a bare `snapkeeper` invocation works against `./data`.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory the camera writes snapshots into
    pub source_path: String,

    /// Directory receiving `<key>.jpg` thumbnails and `<key>.txt` sidecars
    pub cache_path: String,

    /// URL prefix recorded in sidecars for the original snapshot
    pub source_url_prefix: String,

    /// Days a snapshot may age (by capture timestamp) before deletion
    pub retention_days: i64,

    /// Maximum file-creation age in days eligible for thumbnail caching
    pub cache_window_days: u64,

    /// Maximum number of thumbnails tracked by the cache registry
    pub max_cache_files: usize,

    /// Thumbnail width in pixels
    pub thumbnail_width: u32,

    /// Thumbnail height in pixels
    pub thumbnail_height: u32,

    /// Seconds between the end of one pass and the start of the next
    pub scan_interval_secs: u64,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            source_path: env::var("SOURCE_PATH")
                .unwrap_or_else(|_| "./data/snapshots".to_string()),

            cache_path: env::var("CACHE_PATH").unwrap_or_else(|_| "./data/cache".to_string()),

            source_url_prefix: env::var("SOURCE_URL_PREFIX")
                .unwrap_or_else(|_| "/frontcamera/".to_string()),

            retention_days: env::var("RETENTION_DAYS")
                .unwrap_or_else(|_| "14".to_string())
                .parse()
                .context("Invalid RETENTION_DAYS")?,

            cache_window_days: env::var("CACHE_WINDOW_DAYS")
                .unwrap_or_else(|_| "2".to_string())
                .parse()
                .context("Invalid CACHE_WINDOW_DAYS")?,

            max_cache_files: env::var("MAX_CACHE_FILES")
                .unwrap_or_else(|_| "99".to_string())
                .parse()
                .context("Invalid MAX_CACHE_FILES")?,

            thumbnail_width: env::var("THUMBNAIL_WIDTH")
                .unwrap_or_else(|_| "336".to_string())
                .parse()
                .context("Invalid THUMBNAIL_WIDTH")?,

            thumbnail_height: env::var("THUMBNAIL_HEIGHT")
                .unwrap_or_else(|_| "190".to_string())
                .parse()
                .context("Invalid THUMBNAIL_HEIGHT")?,

            scan_interval_secs: env::var("SCAN_INTERVAL_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .context("Invalid SCAN_INTERVAL_SECS")?,
        })
    }
}
