//! Unknown top-level key detection for the TOML config file.
//!
//! This config has a handful of top-level keys, so an unknown key is
//! rejected outright as `InputValidation` rather than warned about.

use crate::errors::EngineError;

fn known_top_level_keys() -> &'static [&'static str] {
    &[
        "correlation_window_seconds",
        "min_confidence_threshold",
        "min_cluster_observations",
        "enable_repetition_weighting",
        "min_repetitions_for_boost",
        "repetition_boost_factor",
        "max_repetition_boost",
        "default_weight_profile",
        "strict_relay_resolution",
    ]
}

pub fn reject_unknown_keys(value: &toml::Value) -> Result<(), EngineError> {
    let table = match value.as_table() {
        Some(table) => table,
        None => return Ok(()),
    };

    let known = known_top_level_keys();
    for key in table.keys() {
        if !known.contains(&key.as_str()) {
            return Err(EngineError::input_validation(
                "config",
                format!("unknown configuration key '{key}'"),
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_known_keys() {
        let value: toml::Value = "correlation_window_seconds = 100".parse().unwrap();
        assert!(reject_unknown_keys(&value).is_ok());
    }

    #[test]
    fn rejects_unknown_keys() {
        let value: toml::Value = "not_a_real_key = 1".parse().unwrap();
        assert!(reject_unknown_keys(&value).is_err());
    }
}
