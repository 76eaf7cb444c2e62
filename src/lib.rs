//! Traffic correlation and scoring engine.
//!
//! Correlates entry-side and exit-side network-edge observations against a
//! time-aware relay topology snapshot, producing ranked, explainable
//! `SessionPair` and `CorrelationCluster` hypotheses.
//!
//! ## Architecture
//!
//! - **Topology View** (`topology`): immutable read model of the relay network.
//! - **Signal Functions** (`signals`): pure time/volume/pattern scoring.
//! - **Pair Assembler** (`assembler`): candidate generation, scoring, reasoning.
//! - **Repetition Tracker** (`repetition`): frequency-based boost.
//! - **Cluster Builder** (`cluster_builder`): groups pairs by hypothesized guard.
//!
//! The HTTP surface, the relay-directory fetcher, the synthetic-observation
//! generator, and persistence are out of scope — external collaborators that
//! hand the engine a [`topology::TopologySnapshot`] and two observation lists.

pub mod assembler;
pub mod cluster_builder;
pub mod config;
pub mod errors;
pub mod repetition;
pub mod signals;
pub mod topology;
pub mod types;

use assembler::{AssemblyOutcome, PairAssembler};
use cluster_builder::ClusterBuilder;
use config::EngineConfig;
use errors::EngineError;
use repetition::RepetitionTracker;
use topology::TopologySnapshot;
use types::{AuditEntry, CorrelationCluster, Observation, SessionPair};

pub use types::{RelayFingerprint, WeightProfile};

/// Everything one correlation run produces: ranked pairs, clusters, and the
/// audit trail of candidates that did not survive to become a pair.
#[derive(Debug, Clone)]
pub struct CorrelationResult {
    pub pairs: Vec<SessionPair>,
    pub clusters: Vec<CorrelationCluster>,
    pub audit: Vec<AuditEntry>,
}

/// Correlation and scoring engine — orchestrates the five components over
/// one topology snapshot and two observation lists.
pub struct CorrelationEngine;

impl CorrelationEngine {
    /// Run one correlation pass. `tracker` is taken by reference so callers
    /// can share repetition counts across multiple runs, or pass a fresh
    /// tracker for an isolated run.
    pub fn run(
        entries: &[Observation],
        exits: &[Observation],
        topology: &TopologySnapshot,
        tracker: &RepetitionTracker,
        config: &EngineConfig,
    ) -> Result<CorrelationResult, EngineError> {
        let weight_profile = config.weight_profile()?;

        tracing::info!(
            entries = entries.len(),
            exits = exits.len(),
            profile = %weight_profile.name,
            "starting correlation run"
        );

        let AssemblyOutcome { pairs, audit } =
            PairAssembler::assemble(entries, exits, topology, tracker, &weight_profile, config)?;

        let clusters = ClusterBuilder::build(&pairs, config.min_cluster_observations);

        tracing::info!(
            pairs = pairs.len(),
            clusters = clusters.len(),
            dropped = audit.len(),
            "correlation run complete"
        );

        Ok(CorrelationResult {
            pairs,
            clusters,
            audit,
        })
    }
}
