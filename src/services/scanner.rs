//! Snapshot retention scanner
//!
//! Walks the camera source directory once per pass, deletes snapshots whose
//! capture timestamp is past the retention window, and hands recent ones to
//! the thumbnail cache. Already-evaluated files are tracked for the process
//! lifetime so they are not re-examined every pass.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::{debug, info, warn};

use super::filename_parser::parse_snapshot;
use super::thumbnailer::ThumbnailCache;

/// Snapshot file extensions we recognize
const SNAPSHOT_EXTENSIONS: &[&str] = &["jpg"];

/// Counters for one scan pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassSummary {
    pub enumerated: usize,
    pub deleted: usize,
    pub thumbnails_built: usize,
    pub skipped_unparsed: usize,
}

/// Scanner service enforcing retention and feeding the thumbnail cache
pub struct SnapshotScanner {
    source_dir: PathBuf,
    retention: chrono::Duration,
    cache_window: Duration,
    thumbnailer: ThumbnailCache,
    /// Paths already evaluated in this process lifetime; not persisted
    tracked: HashSet<PathBuf>,
}

impl SnapshotScanner {
    pub fn new(
        source_dir: PathBuf,
        retention_days: i64,
        cache_window_days: u64,
        thumbnailer: ThumbnailCache,
    ) -> Self {
        Self {
            source_dir,
            retention: chrono::Duration::days(retention_days),
            cache_window: Duration::from_secs(cache_window_days * 24 * 60 * 60),
            thumbnailer,
            tracked: HashSet::new(),
        }
    }

    /// Whether a path has already been evaluated this process lifetime
    pub fn is_tracked(&self, path: &Path) -> bool {
        self.tracked.contains(path)
    }

    /// Run one retention/cache pass over the source directory.
    ///
    /// Only enumeration failures abort the pass; every other failure is
    /// isolated to the file that caused it.
    pub async fn process_files(&mut self) -> Result<PassSummary> {
        let mut summary = PassSummary::default();
        let now = Utc::now();

        let mut entries = tokio::fs::read_dir(&self.source_dir)
            .await
            .with_context(|| format!("Failed to enumerate {}", self.source_dir.display()))?;

        while let Some(entry) = entries
            .next_entry()
            .await
            .with_context(|| format!("Failed to enumerate {}", self.source_dir.display()))?
        {
            let path = entry.path();
            match entry.file_type().await {
                Ok(file_type) if file_type.is_file() => {}
                _ => continue,
            }
            if !is_snapshot_file(&path) {
                continue;
            }
            summary.enumerated += 1;

            let Some(snapshot) = parse_snapshot(&path) else {
                summary.skipped_unparsed += 1;
                continue;
            };

            // Capture age decides deletion; the camera clock is UTC.
            if now - snapshot.captured_at > self.retention {
                match tokio::fs::remove_file(&path).await {
                    Ok(()) => {
                        info!(path = %path.display(), "Deleted expired snapshot");
                        summary.deleted += 1;
                        self.tracked.remove(&path);
                    }
                    Err(e) => {
                        warn!(
                            path = %path.display(),
                            error = %e,
                            "Failed to delete expired snapshot"
                        );
                    }
                }
                continue;
            }

            if self.tracked.contains(&path) {
                continue;
            }

            // Creation age decides cache eligibility. The filesystem clock is
            // locale/DST adjusted, a different clock from the capture
            // timestamp; the two must not be collapsed.
            let created = match entry.metadata().await {
                Ok(meta) => meta.created().or_else(|_| meta.modified()).ok(),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Failed to read snapshot metadata");
                    None
                }
            };
            let Some(created) = created else {
                continue;
            };

            // A creation time in the future counts as age zero.
            let age = SystemTime::now().duration_since(created).unwrap_or_default();
            if age <= self.cache_window {
                match self.thumbnailer.ensure_cached(&snapshot).await {
                    Ok(built) => {
                        if built {
                            summary.thumbnails_built += 1;
                        }
                        self.tracked.insert(path);
                    }
                    Err(e) => {
                        // Not tracked, so the next pass retries this file.
                        warn!(
                            path = %path.display(),
                            error = %e,
                            "Thumbnail caching failed"
                        );
                    }
                }
            } else {
                debug!(path = %path.display(), "Outside cache window");
                self.tracked.insert(path);
            }
        }

        Ok(summary)
    }
}

fn is_snapshot_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| SNAPSHOT_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
}
