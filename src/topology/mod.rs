//! Topology View — an immutable, time-stamped read model of the relay network.
//!
//! Built once per correlation run from a list of relay records and never
//! mutated afterwards; every query is side-effect free and safe to call from
//! any number of concurrent readers. A frozen map plus a couple of
//! precomputed aggregates.

use crate::errors::EngineError;
use crate::types::{Relay, RelayFingerprint};
use std::collections::HashMap;

/// An immutable snapshot of the public relay network at a point in time.
#[derive(Debug, Clone)]
pub struct TopologySnapshot {
    relays: HashMap<RelayFingerprint, Relay>,
    guard_weight_total: f64,
    exit_weight_total: f64,
}

impl TopologySnapshot {
    /// Build a snapshot from relay records. Fails with `InputValidation` if
    /// two records share a fingerprint or a consensus weight is negative.
    pub fn build(relays: Vec<Relay>) -> Result<Self, EngineError> {
        let mut map = HashMap::with_capacity(relays.len());
        let mut guard_weight_total = 0.0;
        let mut exit_weight_total = 0.0;

        for relay in relays {
            if relay.consensus_weight < 0.0 {
                return Err(EngineError::input_validation(
                    "relay.consensus_weight",
                    format!(
                        "relay {} has negative consensus weight {}",
                        relay.fingerprint, relay.consensus_weight
                    ),
                ));
            }
            if relay.is_guard() {
                guard_weight_total += relay.consensus_weight;
            }
            if relay.is_exit() {
                exit_weight_total += relay.consensus_weight;
            }
            if map.insert(relay.fingerprint.clone(), relay).is_some() {
                return Err(EngineError::input_validation(
                    "relay.fingerprint",
                    "duplicate relay fingerprint in topology snapshot",
                ));
            }
        }

        Ok(Self {
            relays: map,
            guard_weight_total,
            exit_weight_total,
        })
    }

    pub fn len(&self) -> usize {
        self.relays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.relays.is_empty()
    }

    /// Look up a relay by fingerprint. `Err(UnknownRelay)`-shaped in the sense
    /// that callers decide whether to treat it as lenient-drop or a hard
    /// failure; this method itself only ever returns `None`.
    pub fn get(&self, fingerprint: &RelayFingerprint) -> Option<&Relay> {
        self.relays.get(fingerprint)
    }

    /// P_guard(r) = weight(r) / sum(weight(r')) over all guard-capable r'.
    pub fn guard_selection_probability(&self, fingerprint: &RelayFingerprint) -> Option<f64> {
        let relay = self.relays.get(fingerprint)?;
        if !relay.is_guard() || self.guard_weight_total <= 0.0 {
            return Some(0.0);
        }
        Some(relay.consensus_weight / self.guard_weight_total)
    }

    pub fn guard_weight_total(&self) -> f64 {
        self.guard_weight_total
    }

    pub fn exit_weight_total(&self) -> f64 {
        self.exit_weight_total
    }

    /// Path feasibility: guard has the guard flag, exit has the exit flag,
    /// and the two relays do not share a /16 subnet. Returns `None` if
    /// either fingerprint is unresolved.
    pub fn path_feasible(
        &self,
        guard_fp: &RelayFingerprint,
        exit_fp: &RelayFingerprint,
    ) -> Option<bool> {
        let guard = self.relays.get(guard_fp)?;
        let exit = self.relays.get(exit_fp)?;
        Some(guard.is_guard() && exit.is_exit() && guard.subnet16 != exit.subnet16)
    }
}
