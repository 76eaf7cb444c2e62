//! Repetition Tracker — a frequency map over pattern keys, used to boost the
//! confidence of observations that recur across a batch.
//!
//! The tracker is the one piece of mutable engine state in the correlation
//! run. A `DashMap` gives a lock-free counter map for when one tracker is
//! shared across concurrent runs; reads are frequent and small, writes are
//! append-only increments.

use crate::types::Observation;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};

/// Bucket width for the volume component of a pattern key: a contract, not a tunable.
const VOLUME_BUCKET_SIZE: u64 = 100_000;
/// Delimiter for pattern-key components. Fingerprints are hex, so `:` cannot collide.
const PATTERN_KEY_DELIMITER: char = ':';

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepetitionConfig {
    pub enabled: bool,
    pub min_repetitions_for_boost: u64,
    pub boost_factor: f64,
    pub max_boost: f64,
}

impl Default for RepetitionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            min_repetitions_for_boost: 2,
            boost_factor: 1.5,
            max_boost: 2.0,
        }
    }
}

/// Summary statistics over the patterns seen so far.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepetitionStats {
    pub total_unique_patterns: usize,
    pub repeated_pattern_count: usize,
    pub max_repetitions: u64,
    pub average_repetitions: f64,
    pub top_patterns: Vec<(String, u64)>,
}

/// Mutable frequency map over pattern keys, plus a diagnostic index of
/// observations seen per relay.
#[derive(Debug, Default)]
pub struct RepetitionTracker {
    config: RepetitionConfig,
    counts: DashMap<String, u64>,
    observations_by_relay: DashMap<String, Vec<String>>,
}

impl RepetitionTracker {
    pub fn new(config: RepetitionConfig) -> Self {
        Self {
            config,
            counts: DashMap::new(),
            observations_by_relay: DashMap::new(),
        }
    }

    /// The pattern key for an observation: `fingerprint:kind:volume_bucket`.
    pub fn pattern_key(&self, observation: &Observation) -> String {
        let bucket = (observation.bytes / VOLUME_BUCKET_SIZE) * VOLUME_BUCKET_SIZE;
        format!(
            "{}{d}{:?}{d}{bucket}",
            observation.relay_fingerprint,
            observation.kind,
            d = PATTERN_KEY_DELIMITER
        )
    }

    /// Record one observation, incrementing its pattern key's frequency.
    /// No-op when repetition weighting is disabled.
    pub fn ingest(&self, observation: &Observation) {
        if !self.config.enabled {
            return;
        }
        let key = self.pattern_key(observation);
        *self.counts.entry(key).or_insert(0) += 1;
        self.observations_by_relay
            .entry(observation.relay_fingerprint.to_string())
            .or_default()
            .push(observation.id.clone());
    }

    pub fn ingest_all<'a>(&self, observations: impl IntoIterator<Item = &'a Observation>) {
        for observation in observations {
            self.ingest(observation);
        }
    }

    /// Per-observation boost, read-only: does not mutate the frequency map.
    ///
    /// `boost = 1.0` below `min_repetitions_for_boost`, otherwise
    /// `min(max_boost, 1 + log2(count) * (boost_factor - 1))`.
    pub fn boost_for(&self, observation: &Observation) -> f64 {
        if !self.config.enabled {
            return 1.0;
        }
        let key = self.pattern_key(observation);
        let count = self.counts.get(&key).map(|c| *c).unwrap_or(0);
        self.boost_for_count(count)
    }

    fn boost_for_count(&self, count: u64) -> f64 {
        if count < self.config.min_repetitions_for_boost {
            return 1.0;
        }
        let boost = 1.0 + (count as f64).log2() * (self.config.boost_factor - 1.0);
        boost.min(self.config.max_boost)
    }

    /// The combined boost the assembler applies to a candidate pair: the
    /// arithmetic mean of the entry's and exit's individual boosts.
    pub fn combined_boost(&self, entry: &Observation, exit: &Observation) -> f64 {
        if !self.config.enabled {
            return 1.0;
        }
        (self.boost_for(entry) + self.boost_for(exit)) / 2.0
    }

    pub fn stats(&self, top_n: usize) -> RepetitionStats {
        let total_unique_patterns = self.counts.len();
        let mut repeated = 0usize;
        let mut max_repetitions = 0u64;
        let mut sum = 0u64;
        let mut all: Vec<(String, u64)> = Vec::with_capacity(total_unique_patterns);

        for entry in self.counts.iter() {
            let count = *entry.value();
            sum += count;
            max_repetitions = max_repetitions.max(count);
            if count >= 2 {
                repeated += 1;
            }
            all.push((entry.key().clone(), count));
        }

        all.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        all.truncate(top_n);

        let average_repetitions = if total_unique_patterns == 0 {
            0.0
        } else {
            sum as f64 / total_unique_patterns as f64
        };

        RepetitionStats {
            total_unique_patterns,
            repeated_pattern_count: repeated,
            max_repetitions,
            average_repetitions,
            top_patterns: all,
        }
    }
}
