//! Infrastructure configuration - where data lives and how loud we log.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Filesystem locations for the corpus pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Directory scanned for `*.compound.txt` inputs.
    /// Default: ~/.local/share/anticipation/compound
    #[serde(default = "PathsConfig::default_input_dir")]
    pub input_dir: PathBuf,

    /// Directory receiving one `tokenized-events-{shard}.txt` per worker.
    /// Default: ~/.local/share/anticipation/tokenized
    #[serde(default = "PathsConfig::default_output_dir")]
    pub output_dir: PathBuf,
}

impl PathsConfig {
    fn default_input_dir() -> PathBuf {
        directories::BaseDirs::new()
            .map(|dirs| dirs.home_dir().join(".local/share/anticipation/compound"))
            .unwrap_or_else(|| PathBuf::from(".local/share/anticipation/compound"))
    }

    fn default_output_dir() -> PathBuf {
        directories::BaseDirs::new()
            .map(|dirs| dirs.home_dir().join(".local/share/anticipation/tokenized"))
            .unwrap_or_else(|| PathBuf::from(".local/share/anticipation/tokenized"))
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            input_dir: Self::default_input_dir(),
            output_dir: Self::default_output_dir(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Log level or `EnvFilter` directive (trace, debug, info, warn, error).
    /// Default: info
    #[serde(default = "TelemetryConfig::default_log_level")]
    pub log_level: String,
}

impl TelemetryConfig {
    fn default_log_level() -> String {
        "info".to_string()
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: Self::default_log_level(),
        }
    }
}
