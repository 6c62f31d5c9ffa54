//! Core services for the snapshot pipeline

pub mod cache_pruner;
pub mod filename_parser;
pub mod retry;
pub mod scanner;
pub mod thumbnailer;

pub use cache_pruner::CachePruner;
pub use filename_parser::{ParsedSnapshot, parse_snapshot};
pub use retry::{RetryConfig, retry_async};
pub use scanner::{PassSummary, SnapshotScanner};
pub use thumbnailer::{ThumbnailCache, ThumbnailCacheConfig};
