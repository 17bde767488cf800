//! Tokenizer settings - knobs of the window/emission driver.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which prefix precedes every emitted window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Conditioning {
    /// A single `ANTICIPATE` marker.
    Anticipate,
    /// A 16-slot instrument vector with the melody instrument first.
    #[default]
    Instruments,
}

impl Conditioning {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Anticipate => "anticipate",
            Self::Instruments => "instruments",
        }
    }
}

impl fmt::Display for Conditioning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Conditioning {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "anticipate" => Ok(Self::Anticipate),
            "instruments" => Ok(Self::Instruments),
            other => Err(format!(
                "unknown conditioning '{}' (expected 'anticipate' or 'instruments')",
                other
            )),
        }
    }
}

/// Settings for melody extraction, augmentation and window filtering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenizeConfig {
    /// Base seed; worker `i` seeds its generator with `seed + i`.
    #[serde(default)]
    pub seed: u64,

    /// Number of shards processed in parallel.
    #[serde(default = "TokenizeConfig::default_workers")]
    pub workers: usize,

    #[serde(default)]
    pub conditioning: Conditioning,

    /// Lowest GM program treated as a melody instrument.
    #[serde(default = "TokenizeConfig::default_melody_program_min")]
    pub melody_program_min: u32,

    /// Highest GM program (inclusive) treated as a melody instrument.
    #[serde(default = "TokenizeConfig::default_melody_program_max")]
    pub melody_program_max: u32,

    /// Melody instruments chosen per file, without replacement.
    #[serde(default = "TokenizeConfig::default_max_melodies")]
    pub max_melodies: usize,

    /// Distorted variants produced per chosen melody.
    #[serde(default = "TokenizeConfig::default_variants_per_melody")]
    pub variants_per_melody: usize,

    /// Exclusive upper bound of the per-variant noise level draw.
    #[serde(default = "TokenizeConfig::default_max_noise_level")]
    pub max_noise_level: f64,

    /// Minimum number of melody events for a window to be kept.
    #[serde(default = "TokenizeConfig::default_min_melody_events")]
    pub min_melody_events: usize,

    /// The melody must start within this many seconds of the window start.
    #[serde(default = "TokenizeConfig::default_melody_bound_seconds")]
    pub melody_onset_bound_seconds: u32,

    /// The melody must end within this many seconds of the window end.
    #[serde(default = "TokenizeConfig::default_melody_bound_seconds")]
    pub melody_offset_bound_seconds: u32,
}

impl TokenizeConfig {
    fn default_workers() -> usize {
        1
    }

    fn default_melody_program_min() -> u32 {
        24
    }

    fn default_melody_program_max() -> u32 {
        79
    }

    fn default_max_melodies() -> usize {
        3
    }

    fn default_variants_per_melody() -> usize {
        10
    }

    fn default_max_noise_level() -> f64 {
        0.35
    }

    fn default_min_melody_events() -> usize {
        20
    }

    fn default_melody_bound_seconds() -> u32 {
        2
    }

    /// Whether an instrument id falls in the melodic program range.
    pub fn is_melody_program(&self, instrument: u32) -> bool {
        (self.melody_program_min..=self.melody_program_max).contains(&instrument)
    }
}

impl Default for TokenizeConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            workers: Self::default_workers(),
            conditioning: Conditioning::default(),
            melody_program_min: Self::default_melody_program_min(),
            melody_program_max: Self::default_melody_program_max(),
            max_melodies: Self::default_max_melodies(),
            variants_per_melody: Self::default_variants_per_melody(),
            max_noise_level: Self::default_max_noise_level(),
            min_melody_events: Self::default_min_melody_events(),
            melody_onset_bound_seconds: Self::default_melody_bound_seconds(),
            melody_offset_bound_seconds: Self::default_melody_bound_seconds(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn melody_range_is_inclusive() {
        let config = TokenizeConfig::default();
        assert!(!config.is_melody_program(23));
        assert!(config.is_melody_program(24));
        assert!(config.is_melody_program(79));
        assert!(!config.is_melody_program(80));
    }

    #[test]
    fn conditioning_parses() {
        assert_eq!("anticipate".parse::<Conditioning>(), Ok(Conditioning::Anticipate));
        assert_eq!("instruments".parse::<Conditioning>(), Ok(Conditioning::Instruments));
        assert!("piano".parse::<Conditioning>().is_err());
    }
}
