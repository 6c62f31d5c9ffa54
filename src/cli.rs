//! Minimal CLI parsing for run mode overrides.

use std::env;

use crate::app_mode::RunMode;

#[derive(Debug, Default)]
pub struct CliOptions {
    pub run_mode_override: Option<RunMode>,
}

impl CliOptions {
    pub fn from_args() -> Self {
        Self::parse(env::args().skip(1))
    }

    fn parse(args: impl Iterator<Item = String>) -> Self {
        let mut options = CliOptions::default();
        for arg in args {
            match arg.as_str() {
                "--interactive" => options.run_mode_override = Some(RunMode::Interactive),
                "--service" => options.run_mode_override = Some(RunMode::Service),
                _ if arg.starts_with("--run-mode=") => {
                    if let Some(value) = arg.split_once('=').map(|(_, v)| v) {
                        options.run_mode_override = RunMode::from_arg(value);
                    }
                }
                _ => {}
            }
        }
        options
    }
}
