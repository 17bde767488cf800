//! Config file discovery, loading, and environment variable overlay.

use crate::{AntConfig, ConfigError, PathsConfig, TelemetryConfig, TokenizeConfig};
use std::env;
use std::path::{Path, PathBuf};

/// Information about where config values came from.
#[derive(Debug, Clone, Default)]
pub struct ConfigSources {
    /// Config files that were loaded (in order)
    pub files: Vec<PathBuf>,
    /// Environment variables that overrode config values
    pub env_overrides: Vec<String>,
}

/// Discover config files, optionally with a CLI override path.
///
/// Returns paths in load order (system, user, local/cli), only those that
/// exist. If `cli_path` is provided and exists, it replaces the local override.
pub fn discover_config_files_with_override(cli_path: Option<&Path>) -> Vec<PathBuf> {
    let mut files = Vec::new();

    let system = PathBuf::from("/etc/anticipation/config.toml");
    if system.exists() {
        files.push(system);
    }

    if let Some(config_dir) = directories::BaseDirs::new().map(|d| d.config_dir().to_path_buf()) {
        let user = config_dir.join("anticipation/config.toml");
        if user.exists() {
            files.push(user);
        }
    }

    if let Some(path) = cli_path {
        if path.exists() {
            files.push(path.to_path_buf());
            return files;
        }
    }

    let local = PathBuf::from("anticipation.toml");
    if local.exists() {
        files.push(local);
    }

    files
}

/// Load config from a TOML file.
pub fn load_from_file(path: &Path) -> Result<AntConfig, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    parse_toml(&contents, path)
}

/// Parse config from TOML string. Missing keys take their defaults.
fn parse_toml(contents: &str, path: &Path) -> Result<AntConfig, ConfigError> {
    let mut config: AntConfig =
        toml::from_str(contents).map_err(|e: toml::de::Error| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    // Paths go through the same ~ / $VAR expansion as env overrides
    config.paths.input_dir = expand_path(&config.paths.input_dir.to_string_lossy());
    config.paths.output_dir = expand_path(&config.paths.output_dir.to_string_lossy());

    Ok(config)
}

/// Pick `overlay` when it differs from the compiled default, else `base`.
fn pick<T: PartialEq>(base: T, overlay: T, default: T) -> T {
    if overlay != default {
        overlay
    } else {
        base
    }
}

/// Merge two configs, with `overlay` taking precedence field by field.
///
/// An overlay field only wins when it differs from the compiled default, so
/// a later file cannot reset a key to its default value: a local `seed = 0`
/// leaves a user-config `seed = 5` in place. Use an env override for that.
pub fn merge_configs(base: AntConfig, overlay: AntConfig) -> AntConfig {
    let paths = PathsConfig::default();
    let tok = TokenizeConfig::default();
    let tel = TelemetryConfig::default();

    AntConfig {
        paths: PathsConfig {
            input_dir: pick(base.paths.input_dir, overlay.paths.input_dir, paths.input_dir),
            output_dir: pick(base.paths.output_dir, overlay.paths.output_dir, paths.output_dir),
        },
        tokenize: TokenizeConfig {
            seed: pick(base.tokenize.seed, overlay.tokenize.seed, tok.seed),
            workers: pick(base.tokenize.workers, overlay.tokenize.workers, tok.workers),
            conditioning: pick(
                base.tokenize.conditioning,
                overlay.tokenize.conditioning,
                tok.conditioning,
            ),
            melody_program_min: pick(
                base.tokenize.melody_program_min,
                overlay.tokenize.melody_program_min,
                tok.melody_program_min,
            ),
            melody_program_max: pick(
                base.tokenize.melody_program_max,
                overlay.tokenize.melody_program_max,
                tok.melody_program_max,
            ),
            max_melodies: pick(
                base.tokenize.max_melodies,
                overlay.tokenize.max_melodies,
                tok.max_melodies,
            ),
            variants_per_melody: pick(
                base.tokenize.variants_per_melody,
                overlay.tokenize.variants_per_melody,
                tok.variants_per_melody,
            ),
            max_noise_level: pick(
                base.tokenize.max_noise_level,
                overlay.tokenize.max_noise_level,
                tok.max_noise_level,
            ),
            min_melody_events: pick(
                base.tokenize.min_melody_events,
                overlay.tokenize.min_melody_events,
                tok.min_melody_events,
            ),
            melody_onset_bound_seconds: pick(
                base.tokenize.melody_onset_bound_seconds,
                overlay.tokenize.melody_onset_bound_seconds,
                tok.melody_onset_bound_seconds,
            ),
            melody_offset_bound_seconds: pick(
                base.tokenize.melody_offset_bound_seconds,
                overlay.tokenize.melody_offset_bound_seconds,
                tok.melody_offset_bound_seconds,
            ),
        },
        telemetry: TelemetryConfig {
            log_level: pick(
                base.telemetry.log_level,
                overlay.telemetry.log_level,
                tel.log_level,
            ),
        },
    }
}

/// Apply environment variable overrides to config.
pub fn apply_env_overrides(config: &mut AntConfig, sources: &mut ConfigSources) {
    apply_overrides_from(config, sources, |key| env::var(key).ok());
}

/// Apply overrides from any `key -> value` lookup.
fn apply_overrides_from<F>(config: &mut AntConfig, sources: &mut ConfigSources, var: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(v) = var("ANTICIPATION_INPUT_DIR") {
        config.paths.input_dir = expand_path(&v);
        sources.env_overrides.push("ANTICIPATION_INPUT_DIR".to_string());
    }
    if let Some(v) = var("ANTICIPATION_OUTPUT_DIR") {
        config.paths.output_dir = expand_path(&v);
        sources.env_overrides.push("ANTICIPATION_OUTPUT_DIR".to_string());
    }

    if let Some(v) = var("ANTICIPATION_SEED") {
        if let Ok(seed) = v.parse() {
            config.tokenize.seed = seed;
            sources.env_overrides.push("ANTICIPATION_SEED".to_string());
        }
    }
    if let Some(v) = var("ANTICIPATION_WORKERS") {
        if let Ok(workers) = v.parse() {
            config.tokenize.workers = workers;
            sources.env_overrides.push("ANTICIPATION_WORKERS".to_string());
        }
    }
    if let Some(v) = var("ANTICIPATION_CONDITIONING") {
        if let Ok(conditioning) = v.parse() {
            config.tokenize.conditioning = conditioning;
            sources.env_overrides.push("ANTICIPATION_CONDITIONING".to_string());
        }
    }

    if let Some(v) = var("ANTICIPATION_LOG_LEVEL") {
        config.telemetry.log_level = v;
        sources.env_overrides.push("ANTICIPATION_LOG_LEVEL".to_string());
    }
    // Also support RUST_LOG
    if let Some(v) = var("RUST_LOG") {
        config.telemetry.log_level = v;
        sources.env_overrides.push("RUST_LOG".to_string());
    }
}

/// Expand ~ and environment variables in a path.
pub fn expand_path(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = directories::BaseDirs::new().map(|d| d.home_dir().to_path_buf()) {
            home.join(stripped)
        } else {
            PathBuf::from(path)
        }
    } else if let Some(stripped) = path.strip_prefix('$') {
        // Handle $VAR/rest/of/path
        if let Some(slash_pos) = stripped.find('/') {
            let var_name = &stripped[..slash_pos];
            if let Ok(var_value) = env::var(var_name) {
                PathBuf::from(var_value).join(&stripped[slash_pos + 1..])
            } else {
                PathBuf::from(path)
            }
        } else {
            env::var(stripped)
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(path))
        }
    } else {
        PathBuf::from(path)
    }
}
