//! Application run modes for service and interactive operation.

use std::env;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Long-running daemon, stopped by Ctrl-C
    Service,
    /// One start/stop cycle, stopped by operator input on stdin
    Interactive,
}

impl RunMode {
    pub fn from_env() -> Self {
        match env::var("RUN_MODE").ok().as_deref() {
            Some("interactive") => RunMode::Interactive,
            _ => RunMode::Service,
        }
    }

    pub fn from_arg(value: &str) -> Option<Self> {
        match value {
            "interactive" => Some(RunMode::Interactive),
            "service" => Some(RunMode::Service),
            _ => None,
        }
    }
}
