//! Cache registry pruning
//!
//! Maintains an ordered registry of cached thumbnail names and drops the
//! oldest entries once the registry grows past its cap. Thumbnail names embed
//! the capture timestamp, so lexical order is chronological order. Eviction
//! is registry bookkeeping only: the thumbnail and its sidecar stay on disk.

use std::collections::BTreeSet;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{debug, warn};

/// Pruner maintaining the bounded cache registry
pub struct CachePruner {
    cache_dir: PathBuf,
    max_entries: usize,
    registry: BTreeSet<String>,
}

impl CachePruner {
    pub fn new(cache_dir: PathBuf, max_entries: usize) -> Self {
        Self {
            cache_dir,
            max_entries,
            registry: BTreeSet::new(),
        }
    }

    /// Number of thumbnail names currently tracked
    pub fn tracked(&self) -> usize {
        self.registry.len()
    }

    /// Whether a thumbnail name is currently tracked
    pub fn contains(&self, name: &str) -> bool {
        self.registry.contains(name)
    }

    /// Sweep the cache directory and evict the oldest registry entries
    /// beyond the cap. Failures are logged and never abort the pass.
    pub async fn sweep(&mut self) {
        match self.sweep_inner().await {
            Ok(evicted) if evicted > 0 => {
                debug!(
                    evicted = evicted,
                    tracked = self.registry.len(),
                    "Pruned cache registry"
                );
            }
            Ok(_) => {}
            Err(e) => {
                warn!(error = %e, "Cache prune sweep failed");
            }
        }
    }

    async fn sweep_inner(&mut self) -> Result<usize> {
        let mut entries = tokio::fs::read_dir(&self.cache_dir)
            .await
            .with_context(|| format!("Failed to enumerate {}", self.cache_dir.display()))?;

        while let Some(entry) = entries
            .next_entry()
            .await
            .with_context(|| format!("Failed to enumerate {}", self.cache_dir.display()))?
        {
            let path = entry.path();
            let is_thumbnail = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("jpg"));
            if !is_thumbnail {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                self.registry.insert(name.to_string());
            }
        }

        let mut evicted = 0;
        while self.registry.len() > self.max_entries {
            if let Some(oldest) = self.registry.pop_first() {
                debug!(name = %oldest, "Dropped oldest entry from cache registry");
                evicted += 1;
            }
        }

        Ok(evicted)
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn write_thumbnail(dir: &TempDir, name: &str) {
        std::fs::write(dir.path().join(name), b"jpeg bytes").unwrap();
    }

    #[tokio::test]
    async fn test_registry_is_capped_and_files_survive() {
        let cache_dir = TempDir::new().unwrap();
        for name in [
            "20240101_120000.jpg",
            "20240102_120000.jpg",
            "20240103_120000.jpg",
            "20240104_120000.jpg",
            "20240105_120000.jpg",
        ] {
            write_thumbnail(&cache_dir, name);
        }

        let mut pruner = CachePruner::new(cache_dir.path().to_path_buf(), 3);
        pruner.sweep().await;

        assert_eq!(pruner.tracked(), 3);
        // The lexically smallest names are the ones evicted.
        assert!(!pruner.contains("20240101_120000.jpg"));
        assert!(!pruner.contains("20240102_120000.jpg"));
        assert!(pruner.contains("20240103_120000.jpg"));
        assert!(pruner.contains("20240105_120000.jpg"));

        // Eviction is bookkeeping only; all five thumbnails stay on disk.
        assert_eq!(std::fs::read_dir(cache_dir.path()).unwrap().count(), 5);
    }

    #[tokio::test]
    async fn test_sidecars_are_not_registered() {
        let cache_dir = TempDir::new().unwrap();
        write_thumbnail(&cache_dir, "20240101_120000.jpg");
        write_thumbnail(&cache_dir, "20240101_120000.txt");

        let mut pruner = CachePruner::new(cache_dir.path().to_path_buf(), 99);
        pruner.sweep().await;

        assert_eq!(pruner.tracked(), 1);
        assert!(pruner.contains("20240101_120000.jpg"));
    }

    #[tokio::test]
    async fn test_repeat_sweeps_are_idempotent() {
        let cache_dir = TempDir::new().unwrap();
        write_thumbnail(&cache_dir, "20240101_120000.jpg");
        write_thumbnail(&cache_dir, "20240102_120000.jpg");

        let mut pruner = CachePruner::new(cache_dir.path().to_path_buf(), 99);
        pruner.sweep().await;
        pruner.sweep().await;

        assert_eq!(pruner.tracked(), 2);
    }

    #[tokio::test]
    async fn test_missing_cache_directory_is_not_fatal() {
        let cache_dir = TempDir::new().unwrap();
        let missing = cache_dir.path().join("missing");

        let mut pruner = CachePruner::new(missing, 99);
        pruner.sweep().await;

        assert_eq!(pruner.tracked(), 0);
    }
}
