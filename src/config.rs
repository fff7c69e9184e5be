//! Runtime configuration for the vanity key generator.

use std::num::NonZeroUsize;
use std::time::Duration;

use clap::error::ErrorKind;
use clap::Parser;

use crate::search::SearchRequest;

/// WireGuard Vanity Key Generator
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Find keypair with public key starting with prefix (base64: A-Z a-z 0-9 + /)
    #[arg(long)]
    pub prefix: Option<String>,

    /// Number of parallel workers (default: available threads - 1)
    #[arg(long, requires = "prefix")]
    pub jobs: Option<NonZeroUsize>,

    /// Ignore letter case when matching prefix
    #[arg(long, requires = "prefix")]
    pub ignore_case: bool,
}

impl Config {
    /// Validates the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if matches!(self.prefix.as_deref(), Some("")) {
            return Err(ConfigError::MissingValue("--prefix"));
        }
        Ok(())
    }

    /// Builds the search this configuration asks for, if any.
    pub fn search_request(&self, settings: &Settings) -> Option<SearchRequest> {
        let prefix = self.prefix.as_ref()?;
        Some(
            SearchRequest::new(prefix.clone())
                .ignore_case(self.ignore_case)
                .jobs(self.jobs.map(NonZeroUsize::get))
                .report_every(settings.report_every_attempts)
                .report_interval(settings.report_interval),
        )
    }
}

/// Progress reporting cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    /// Attempts between a worker's progress messages
    pub report_every_attempts: u64,
    /// Interval between status line updates
    pub report_interval: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            report_every_attempts: 20_000,
            report_interval: Duration::from_millis(1_000),
        }
    }
}

/// Exit code for a command line clap rejected: 0 after `--help` or
/// `--version`, 1 for every parse error.
pub fn cli_exit_code(err: &clap::Error) -> i32 {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
        _ => 1,
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} requires a value")]
    MissingValue(&'static str),
}
