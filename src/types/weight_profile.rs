//! Named weight triples that parameterize how the three signal scores combine.

use crate::errors::EngineError;
use serde::{Deserialize, Serialize};

/// Tolerance for the "weights sum to 1.0" invariant.
const WEIGHT_SUM_EPSILON: f64 = 1e-6;

/// Free-form metadata a custom profile carries into reasoning strings.
/// Never consulted by the scoring math.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileMetadata {
    pub case_id: Option<String>,
    pub creator: Option<String>,
    pub description: Option<String>,
}

/// A validated (w_time, w_volume, w_pattern) triple with wi in [0,1], sum 1.0 ± epsilon.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeightProfile {
    pub name: String,
    pub w_time: f64,
    pub w_volume: f64,
    pub w_pattern: f64,
    pub metadata: Option<ProfileMetadata>,
}

impl WeightProfile {
    fn new_preset(name: &str, w_time: f64, w_volume: f64, w_pattern: f64) -> Self {
        Self {
            name: name.to_string(),
            w_time,
            w_volume,
            w_pattern,
            metadata: None,
        }
    }

    pub fn standard() -> Self {
        Self::new_preset("standard", 0.40, 0.30, 0.30)
    }

    pub fn time_focused() -> Self {
        Self::new_preset("time-focused", 0.60, 0.20, 0.20)
    }

    pub fn volume_focused() -> Self {
        Self::new_preset("volume-focused", 0.25, 0.50, 0.25)
    }

    pub fn pattern_focused() -> Self {
        Self::new_preset("pattern-focused", 0.25, 0.25, 0.50)
    }

    /// Build and validate a custom profile. Fails with `InputValidation` if any
    /// weight is outside [0,1] or the three do not sum to 1.0 within epsilon.
    pub fn custom(
        name: impl Into<String>,
        w_time: f64,
        w_volume: f64,
        w_pattern: f64,
        metadata: ProfileMetadata,
    ) -> Result<Self, EngineError> {
        let profile = Self {
            name: name.into(),
            w_time,
            w_volume,
            w_pattern,
            metadata: Some(metadata),
        };
        profile.validate()?;
        Ok(profile)
    }

    /// Re-validate a profile regardless of how it was constructed — guards
    /// against profiles built via struct literal rather than a constructor.
    pub fn validate(&self) -> Result<(), EngineError> {
        for (label, w) in [
            ("w_time", self.w_time),
            ("w_volume", self.w_volume),
            ("w_pattern", self.w_pattern),
        ] {
            if !(0.0..=1.0).contains(&w) {
                return Err(EngineError::input_validation(
                    "weight_profile",
                    format!("{label} must be within [0,1], got {w}"),
                ));
            }
        }

        let sum = self.w_time + self.w_volume + self.w_pattern;
        if (sum - 1.0).abs() > WEIGHT_SUM_EPSILON {
            return Err(EngineError::input_validation(
                "weight_profile",
                format!("weights must sum to 1.0 ± {WEIGHT_SUM_EPSILON}, got {sum}"),
            ));
        }

        Ok(())
    }
}
