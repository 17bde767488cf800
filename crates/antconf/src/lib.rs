//! Configuration loading for the anticipatory tokenizer.
//!
//! The core library and the `antok` binary both read their settings from
//! [`AntConfig`]. Dependencies are kept minimal because everything imports
//! this crate.
//!
//! # Config File Locations
//!
//! Files are loaded in order (later wins):
//! 1. `/etc/anticipation/config.toml` (system)
//! 2. `~/.config/anticipation/config.toml` (user)
//! 3. `./anticipation.toml` (local override, or the `--config` path)
//! 4. Environment variables: `ANTICIPATION_INPUT_DIR`, `ANTICIPATION_OUTPUT_DIR`,
//!    `ANTICIPATION_SEED`, `ANTICIPATION_WORKERS`, `ANTICIPATION_CONDITIONING`,
//!    `ANTICIPATION_LOG_LEVEL`, `RUST_LOG`
//!
//! # Example Config
//!
//! ```toml
//! [paths]
//! input_dir = "~/lakh/compound"
//! output_dir = "~/lakh/tokenized"
//!
//! [tokenize]
//! seed = 0
//! workers = 16
//! conditioning = "instruments"
//! variants_per_melody = 10
//! max_noise_level = 0.35
//!
//! [telemetry]
//! log_level = "info"
//! ```

pub mod infra;
pub mod loader;
pub mod tokenize;

pub use infra::{PathsConfig, TelemetryConfig};
pub use loader::{discover_config_files_with_override, ConfigSources};
pub use tokenize::{Conditioning, TokenizeConfig};

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    Parse { path: PathBuf, message: String },
}

/// Complete tokenizer configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AntConfig {
    #[serde(default)]
    pub paths: PathsConfig,

    #[serde(default)]
    pub tokenize: TokenizeConfig,

    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl AntConfig {
    /// Load configuration from all sources.
    pub fn load() -> Result<Self, ConfigError> {
        let (config, _sources) = Self::load_with_sources_from(None)?;
        Ok(config)
    }

    /// Load configuration from a specific file path, then apply env overrides.
    ///
    /// If `config_path` is provided, it takes precedence over the local
    /// `./anticipation.toml` override. System and user configs still load first.
    pub fn load_from(config_path: Option<&std::path::Path>) -> Result<Self, ConfigError> {
        let (config, _sources) = Self::load_with_sources_from(config_path)?;
        Ok(config)
    }

    /// Load configuration from optional path and return information about sources.
    pub fn load_with_sources_from(
        config_path: Option<&std::path::Path>,
    ) -> Result<(Self, ConfigSources), ConfigError> {
        let mut sources = ConfigSources::default();
        let mut config = AntConfig::default();

        for path in loader::discover_config_files_with_override(config_path) {
            let file_config = loader::load_from_file(&path)?;
            config = loader::merge_configs(config, file_config);
            sources.files.push(path);
        }

        loader::apply_env_overrides(&mut config, &mut sources);

        Ok((config, sources))
    }

    /// Serialize config to TOML string.
    pub fn to_toml(&self) -> String {
        let mut output = String::new();

        output.push_str("# Anticipatory tokenizer configuration\n\n");

        output.push_str("[paths]\n");
        output.push_str(&format!(
            "input_dir = \"{}\"\n",
            self.paths.input_dir.display()
        ));
        output.push_str(&format!(
            "output_dir = \"{}\"\n",
            self.paths.output_dir.display()
        ));

        let t = &self.tokenize;
        output.push_str("\n[tokenize]\n");
        output.push_str(&format!("seed = {}\n", t.seed));
        output.push_str(&format!("workers = {}\n", t.workers));
        output.push_str(&format!("conditioning = \"{}\"\n", t.conditioning));
        output.push_str(&format!("melody_program_min = {}\n", t.melody_program_min));
        output.push_str(&format!("melody_program_max = {}\n", t.melody_program_max));
        output.push_str(&format!("max_melodies = {}\n", t.max_melodies));
        output.push_str(&format!("variants_per_melody = {}\n", t.variants_per_melody));
        output.push_str(&format!("max_noise_level = {:?}\n", t.max_noise_level));
        output.push_str(&format!("min_melody_events = {}\n", t.min_melody_events));
        output.push_str(&format!(
            "melody_onset_bound_seconds = {}\n",
            t.melody_onset_bound_seconds
        ));
        output.push_str(&format!(
            "melody_offset_bound_seconds = {}\n",
            t.melody_offset_bound_seconds
        ));

        output.push_str("\n[telemetry]\n");
        output.push_str(&format!("log_level = \"{}\"\n", self.telemetry.log_level));

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = AntConfig::default();
        assert_eq!(config.tokenize.workers, 1);
        assert_eq!(config.tokenize.max_melodies, 3);
        assert_eq!(config.tokenize.conditioning, Conditioning::Instruments);
        assert_eq!(config.telemetry.log_level, "info");
    }

    #[test]
    fn test_to_toml_round_trips() {
        let config = AntConfig::default();
        let rendered = config.to_toml();
        assert!(rendered.contains("[paths]"));
        assert!(rendered.contains("[tokenize]"));
        assert!(rendered.contains("conditioning = \"instruments\""));

        let parsed: AntConfig = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed, config);
    }
}
