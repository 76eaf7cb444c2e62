//! Engine configuration: every tunable correlation knob, loaded from an
//! optional TOML file with built-in defaults, validated at construction.
//!
//! ## Loading order
//!
//! 1. `CORRELATE_CONFIG` environment variable (path to TOML file)
//! 2. `correlate.toml` in the current working directory
//! 3. Built-in defaults ([`defaults`])
//!
//! This is deliberately not a process-wide singleton: the repetition
//! tracker is the one piece of mutable engine state meant to be shared,
//! and an `EngineConfig` is immutable once built, so there is no reason to
//! reach for global state here either.

pub mod defaults;
mod validation;

use crate::errors::EngineError;
use crate::repetition::RepetitionConfig;
use crate::types::{ProfileMetadata, WeightProfile};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

/// Which weight profile a run should use; resolves to a validated
/// [`WeightProfile`] via [`WeightProfileSelector::resolve`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "profile", rename_all = "kebab-case")]
pub enum WeightProfileSelector {
    Standard,
    TimeFocused,
    VolumeFocused,
    PatternFocused,
    Custom {
        w_time: f64,
        w_volume: f64,
        w_pattern: f64,
        #[serde(default)]
        case_id: Option<String>,
        #[serde(default)]
        creator: Option<String>,
        #[serde(default)]
        description: Option<String>,
    },
}

impl Default for WeightProfileSelector {
    fn default() -> Self {
        WeightProfileSelector::Standard
    }
}

impl WeightProfileSelector {
    pub fn resolve(&self) -> Result<WeightProfile, EngineError> {
        match self {
            WeightProfileSelector::Standard => Ok(WeightProfile::standard()),
            WeightProfileSelector::TimeFocused => Ok(WeightProfile::time_focused()),
            WeightProfileSelector::VolumeFocused => Ok(WeightProfile::volume_focused()),
            WeightProfileSelector::PatternFocused => Ok(WeightProfile::pattern_focused()),
            WeightProfileSelector::Custom {
                w_time,
                w_volume,
                w_pattern,
                case_id,
                creator,
                description,
            } => WeightProfile::custom(
                "custom",
                *w_time,
                *w_volume,
                *w_pattern,
                ProfileMetadata {
                    case_id: case_id.clone(),
                    creator: creator.clone(),
                    description: description.clone(),
                },
            ),
        }
    }
}

/// All tunable engine behavior, as a plain, serializable struct.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub correlation_window_seconds: u64,
    pub min_confidence_threshold: f64,
    pub min_cluster_observations: usize,
    pub enable_repetition_weighting: bool,
    pub min_repetitions_for_boost: u64,
    pub repetition_boost_factor: f64,
    pub max_repetition_boost: f64,
    pub default_weight_profile: WeightProfileSelector,
    /// When true, an unresolved relay fingerprint is a hard `UnknownRelay`
    /// error instead of a lenient drop-and-audit.
    pub strict_relay_resolution: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            correlation_window_seconds: defaults::CORRELATION_WINDOW_SECONDS,
            min_confidence_threshold: defaults::MIN_CONFIDENCE_THRESHOLD,
            min_cluster_observations: defaults::MIN_CLUSTER_OBSERVATIONS,
            enable_repetition_weighting: defaults::ENABLE_REPETITION_WEIGHTING,
            min_repetitions_for_boost: defaults::MIN_REPETITIONS_FOR_BOOST,
            repetition_boost_factor: defaults::REPETITION_BOOST_FACTOR,
            max_repetition_boost: defaults::MAX_REPETITION_BOOST,
            default_weight_profile: WeightProfileSelector::default(),
            strict_relay_resolution: defaults::STRICT_RELAY_RESOLUTION,
        }
    }
}

impl EngineConfig {
    /// Load configuration per the order documented above. `path` overrides
    /// both the environment variable and the cwd-relative default.
    pub fn load(path: Option<&Path>) -> Result<Self, EngineError> {
        let resolved_path = path.map(PathBuf::from).or_else(|| {
            env::var_os("CORRELATE_CONFIG")
                .map(PathBuf::from)
                .or_else(|| {
                    let candidate = PathBuf::from("correlate.toml");
                    candidate.exists().then_some(candidate)
                })
        });

        let config = match resolved_path {
            Some(path) => {
                let raw = std::fs::read_to_string(&path).map_err(|e| {
                    EngineError::input_validation(
                        "config.path",
                        format!("failed to read {}: {e}", path.display()),
                    )
                })?;
                Self::from_toml_str(&raw)?
            }
            None => Self::default(),
        };

        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a TOML string, rejecting unknown top-level keys.
    ///
    /// Two-pass: parse once into a generic `toml::Value` to walk the key
    /// tree and reject anything unrecognized, then again with ordinary
    /// `serde` deserialization.
    pub fn from_toml_str(raw: &str) -> Result<Self, EngineError> {
        let value: toml::Value = raw
            .parse()
            .map_err(|e| EngineError::input_validation("config", format!("invalid TOML: {e}")))?;
        validation::reject_unknown_keys(&value)?;

        let config: EngineConfig = toml::from_str(raw)
            .map_err(|e| EngineError::input_validation("config", format!("{e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if self.correlation_window_seconds == 0 {
            return Err(EngineError::input_validation(
                "correlation_window_seconds",
                "must be greater than zero",
            ));
        }
        if !(0.0..=100.0).contains(&self.min_confidence_threshold) {
            return Err(EngineError::input_validation(
                "min_confidence_threshold",
                "must be within [0,100]",
            ));
        }
        if self.min_cluster_observations == 0 {
            return Err(EngineError::input_validation(
                "min_cluster_observations",
                "must be at least 1",
            ));
        }
        if self.repetition_boost_factor < 1.0 {
            return Err(EngineError::input_validation(
                "repetition_boost_factor",
                "must be >= 1.0",
            ));
        }
        if self.max_repetition_boost < 1.0 {
            return Err(EngineError::input_validation(
                "max_repetition_boost",
                "must be >= 1.0",
            ));
        }
        self.default_weight_profile.resolve()?;
        Ok(())
    }

    pub fn weight_profile(&self) -> Result<WeightProfile, EngineError> {
        self.default_weight_profile.resolve()
    }

    pub fn repetition_config(&self) -> RepetitionConfig {
        RepetitionConfig {
            enabled: self.enable_repetition_weighting,
            min_repetitions_for_boost: self.min_repetitions_for_boost,
            boost_factor: self.repetition_boost_factor,
            max_boost: self.max_repetition_boost,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        EngineConfig::default().validate().unwrap();
    }

    #[test]
    fn custom_profile_sum_mismatch_is_rejected() {
        let toml = r#"
            [default_weight_profile]
            profile = "custom"
            w_time = 0.5
            w_volume = 0.5
            w_pattern = 0.5
        "#;
        let result = EngineConfig::from_toml_str(toml);
        assert!(result.is_err());
    }

    #[test]
    fn unknown_key_is_rejected() {
        let toml = "typo_field = 42";
        let result = EngineConfig::from_toml_str(toml);
        assert!(result.is_err());
    }

    #[test]
    fn zero_window_is_rejected() {
        let mut config = EngineConfig::default();
        config.correlation_window_seconds = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn parses_overridden_values() {
        let toml = r#"
            correlation_window_seconds = 120
            min_confidence_threshold = 25.0

            [default_weight_profile]
            profile = "time-focused"
        "#;
        let config = EngineConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.correlation_window_seconds, 120);
        assert_eq!(config.min_confidence_threshold, 25.0);
        assert_eq!(config.weight_profile().unwrap().name, "time-focused");
    }

    #[test]
    fn load_reads_an_explicit_toml_file() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            correlation_window_seconds = 45
            min_cluster_observations = 5
            "#
        )
        .unwrap();

        let config = EngineConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.correlation_window_seconds, 45);
        assert_eq!(config.min_cluster_observations, 5);
    }
}
