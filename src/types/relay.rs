//! Relay records and the capability flags that gate path feasibility.

use super::RelayFingerprint;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Capability a relay may advertise in the consensus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Capability {
    Guard,
    Exit,
    Middle,
}

/// A single relay as published in the topology snapshot.
///
/// Built by the external fetcher collaborator; the engine only ever reads
/// these through a [`crate::topology::TopologySnapshot`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Relay {
    pub fingerprint: RelayFingerprint,
    pub capabilities: HashSet<Capability>,
    /// Relative share of path selection; must be non-negative.
    pub consensus_weight: f64,
    /// First two octets of the relay's IPv4 address, e.g. "203.0".
    pub subnet16: String,
    /// Raw consensus status flags as published (e.g. "Running", "Valid"),
    /// kept for diagnostics but not consulted by path feasibility.
    pub status_flags: Vec<String>,
    pub as_number: Option<u32>,
    pub country: Option<String>,
}

impl Relay {
    pub fn is_guard(&self) -> bool {
        self.capabilities.contains(&Capability::Guard)
    }

    pub fn is_exit(&self) -> bool {
        self.capabilities.contains(&Capability::Exit)
    }

    pub fn has_capability(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }
}
