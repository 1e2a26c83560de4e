//! Error enums for each fallible boundary. All inputs that make a
//! simulation step well-defined are assumed valid once the run starts;
//! the only faults this crate reports are at configuration and I/O edges.

use std::path::PathBuf;
use strum_macros::Display;

/// Malformed or missing data file, or an unknown policy/spacing name.
#[derive(Debug, Display)]
pub enum ConfigError {
    #[strum(to_string = "failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[strum(to_string = "malformed data file {path:?}: {reason}")]
    Malformed { path: PathBuf, reason: String },
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::Malformed { .. } => None,
        }
    }
}

/// Errors surfaced while interpreting command-line arguments.
#[derive(Debug, Display)]
pub enum CliError {
    #[strum(to_string = "Unknown policy: {0}. Valid options: sticky, greedy, fifo, roundrobin, random, sjf, shortestjobfirst, srtf, shortestremainingtime")]
    UnknownPolicy(String),
    #[strum(to_string = "Unknown spacing strategy: {0}. Valid options: bent-pipe, bentpipe, close-spaced, close, closed, frame-spaced, frame, orbit-spaced, orbit, close-orbit-spaced")]
    UnknownSpacing(String),
    #[strum(to_string = "{0}")]
    Config(ConfigError),
    #[strum(to_string = "{0}")]
    Log(LogError),
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Config(e) => Some(e),
            CliError::Log(e) => Some(e),
            CliError::UnknownPolicy(_) | CliError::UnknownSpacing(_) => None,
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(value: ConfigError) -> Self {
        CliError::Config(value)
    }
}

impl From<LogError> for CliError {
    fn from(value: LogError) -> Self {
        CliError::Log(value)
    }
}

/// Failure to write a CSV analytics stream.
#[derive(Debug)]
pub struct LogError {
    pub stream: String,
    pub source: csv::Error,
}

impl std::fmt::Display for LogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "failed to write log stream {}: {}", self.stream, self.source)
    }
}

impl std::error::Error for LogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}
