//! Entry/exit network-edge observations — the raw input to correlation.

use super::RelayFingerprint;
use serde::{Deserialize, Serialize};

/// Which side of the overlay network an observation was captured on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObservationKind {
    EntryObserved,
    ExitObserved,
}

/// A single entry-side or exit-side traffic observation.
///
/// `packet_timings` holds inter-arrival deltas in milliseconds, ordered;
/// absent when the capture point did not record packet-level timing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Observation {
    pub id: String,
    /// Monotonic microsecond timestamp, absolute within its source.
    pub timestamp_us: u64,
    pub kind: ObservationKind,
    pub relay_fingerprint: RelayFingerprint,
    pub bytes: u64,
    pub packet_timings: Option<Vec<f64>>,
}

impl Observation {
    /// The capability a resolved relay must carry for this observation to be feasible:
    /// [`crate::types::Capability::Guard`] for an entry observation,
    /// [`crate::types::Capability::Exit`] for an exit one.
    pub fn required_capability(&self) -> super::Capability {
        match self.kind {
            ObservationKind::EntryObserved => super::Capability::Guard,
            ObservationKind::ExitObserved => super::Capability::Exit,
        }
    }
}
