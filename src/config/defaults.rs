//! Built-in default values for every engine configuration knob.

pub const CORRELATION_WINDOW_SECONDS: u64 = 300;
pub const MIN_CONFIDENCE_THRESHOLD: f64 = 30.0;
pub const MIN_CLUSTER_OBSERVATIONS: usize = 3;
pub const ENABLE_REPETITION_WEIGHTING: bool = true;
pub const MIN_REPETITIONS_FOR_BOOST: u64 = 2;
pub const REPETITION_BOOST_FACTOR: f64 = 1.5;
pub const MAX_REPETITION_BOOST: f64 = 2.0;
/// Halves the visible repetition boost at application time, so repetition
/// alone can never saturate a score: a fixed contract, not a tunable.
pub const REPETITION_SOFT_APPLICATION_FACTOR: f64 = 0.5;
pub const DEFAULT_WEIGHT_PROFILE_NAME: &str = "standard";
pub const STRICT_RELAY_RESOLUTION: bool = false;
