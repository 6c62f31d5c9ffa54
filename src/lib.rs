//! Snapkeeper - camera snapshot retention and thumbnail cache daemon
//!
//! Periodically scans a directory of camera-generated snapshots, deletes
//! images older than the retention window, and maintains a bounded cache of
//! thumbnails with metadata sidecars for recent captures. One pass is a full
//! scan/cache/prune cycle; the scheduler in [`jobs`] drives passes on a fixed
//! interval and never overlaps them.

pub mod app_mode;
pub mod cli;
pub mod config;
pub mod jobs;
pub mod services;
