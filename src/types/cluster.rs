//! `CorrelationCluster` — a group of `SessionPair`s that share a hypothesized guard.

use super::RelayFingerprint;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrelationCluster {
    pub cluster_id: String,
    pub pair_ids: HashSet<String>,
    /// Usually a single fingerprint; modeled as a set per the data model.
    pub probable_guards: HashSet<RelayFingerprint>,
    pub observation_count: usize,
    pub consistency_score: f64,
    pub guard_persistence_score: f64,
    pub cluster_confidence: f64,
}
