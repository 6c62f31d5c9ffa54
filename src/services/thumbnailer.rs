//! Thumbnail cache builder
//!
//! Produces a resized thumbnail plus a metadata sidecar for recent snapshots.
//! The image is staged at a temporary path and moved into the cache directory
//! with bounded retries, so the pruner never observes a partially written
//! thumbnail.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use image::imageops::FilterType;
use tracing::{debug, info};

use super::filename_parser::ParsedSnapshot;
use super::retry::{RetryConfig, retry_async};

/// Thumbnail cache configuration
#[derive(Debug, Clone)]
pub struct ThumbnailCacheConfig {
    /// Directory receiving `<key>.jpg` thumbnails and `<key>.txt` sidecars
    pub cache_dir: PathBuf,
    /// Staging directory for not-yet-promoted thumbnails
    pub temp_dir: PathBuf,
    /// URL prefix recorded in sidecars for the original snapshot
    pub url_prefix: String,
    /// Thumbnail width in pixels
    pub width: u32,
    /// Thumbnail height in pixels
    pub height: u32,
    /// Retry policy for the temp-to-cache move
    pub retry: RetryConfig,
}

/// Service building cache entries for recent snapshots
pub struct ThumbnailCache {
    config: ThumbnailCacheConfig,
}

impl ThumbnailCache {
    pub fn new(config: ThumbnailCacheConfig) -> Self {
        Self { config }
    }

    /// Path of the cache thumbnail for a compact key
    pub fn thumbnail_path(&self, compact_key: &str) -> PathBuf {
        self.config.cache_dir.join(format!("{compact_key}.jpg"))
    }

    /// Path of the metadata sidecar for a compact key
    pub fn sidecar_path(&self, compact_key: &str) -> PathBuf {
        self.config.cache_dir.join(format!("{compact_key}.txt"))
    }

    /// Build the cache entry for a snapshot unless one already exists.
    ///
    /// Returns `Ok(false)` when the thumbnail is already cached. On any
    /// failure the final cache path stays absent, so the snapshot is
    /// re-evaluated on the next pass. A failed move leaves its temp file
    /// behind; the next build for the same key overwrites it.
    pub async fn ensure_cached(&self, snapshot: &ParsedSnapshot) -> Result<bool> {
        let cache_path = self.thumbnail_path(&snapshot.compact_key);
        if tokio::fs::try_exists(&cache_path).await.unwrap_or(false) {
            debug!(key = %snapshot.compact_key, "Thumbnail already cached");
            return Ok(false);
        }

        let temp_path = self
            .config
            .temp_dir
            .join(format!("{}.jpg", snapshot.compact_key));
        self.resize_to(&snapshot.path, &temp_path).await?;

        retry_async(
            || tokio::fs::rename(&temp_path, &cache_path),
            &self.config.retry,
            "promote thumbnail",
        )
        .await
        .with_context(|| {
            format!(
                "Failed to move {} to {}",
                temp_path.display(),
                cache_path.display()
            )
        })?;

        self.write_sidecar(snapshot).await?;

        info!(
            key = %snapshot.compact_key,
            source = %snapshot.file_name,
            "Cached thumbnail"
        );
        Ok(true)
    }

    /// Resize the source snapshot to the configured dimensions at `dest`.
    async fn resize_to(&self, source: &Path, dest: &Path) -> Result<()> {
        let source = source.to_path_buf();
        let dest = dest.to_path_buf();
        let (width, height) = (self.config.width, self.config.height);

        tokio::task::spawn_blocking(move || -> Result<()> {
            let img = image::open(&source)
                .with_context(|| format!("Failed to decode {}", source.display()))?;
            img.resize_exact(width, height, FilterType::Lanczos3)
                .save(&dest)
                .with_context(|| format!("Failed to write thumbnail {}", dest.display()))?;
            Ok(())
        })
        .await
        .context("Resize task panicked")?
    }

    /// Write the two-line metadata sidecar next to the cached thumbnail.
    async fn write_sidecar(&self, snapshot: &ParsedSnapshot) -> Result<()> {
        let body = format!(
            "OriginalFile: {}{}\nDateTime: {}\n",
            self.config.url_prefix,
            snapshot.file_name,
            snapshot.captured_at.format("%Y-%m-%dT%H:%M:%S%.3fZ"),
        );
        let path = self.sidecar_path(&snapshot.compact_key);
        tokio::fs::write(&path, body)
            .await
            .with_context(|| format!("Failed to write sidecar {}", path.display()))
    }
}
