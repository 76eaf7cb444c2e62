//! Shared fixtures for integration tests.

use correlate::config::EngineConfig;
use correlate::repetition::RepetitionTracker;
use correlate::topology::TopologySnapshot;
use correlate::types::{Capability, Observation, ObservationKind, Relay, RelayFingerprint};
use std::collections::HashSet;

pub fn relay(fingerprint: &str, capabilities: &[Capability], weight: f64, subnet16: &str) -> Relay {
    Relay {
        fingerprint: RelayFingerprint::new(fingerprint),
        capabilities: capabilities.iter().copied().collect::<HashSet<_>>(),
        consensus_weight: weight,
        subnet16: subnet16.to_string(),
        status_flags: vec!["Running".to_string(), "Valid".to_string()],
        as_number: None,
        country: None,
    }
}

/// A small but varied topology: two guards, two exits, one middle-only relay,
/// spread across distinct /16s so guard/exit pairs are always path-feasible
/// unless deliberately placed on the same subnet.
pub fn sample_topology() -> TopologySnapshot {
    TopologySnapshot::build(vec![
        relay("G1", &[Capability::Guard], 30.0, "10.0"),
        relay("G2", &[Capability::Guard], 70.0, "10.1"),
        relay("X1", &[Capability::Exit], 40.0, "20.0"),
        relay("X2", &[Capability::Exit], 60.0, "20.1"),
        relay("M1", &[Capability::Middle], 10.0, "30.0"),
    ])
    .expect("sample topology should build")
}

pub fn entry_observation(id: &str, timestamp_us: u64, relay: &str, bytes: u64) -> Observation {
    Observation {
        id: id.to_string(),
        timestamp_us,
        kind: ObservationKind::EntryObserved,
        relay_fingerprint: RelayFingerprint::new(relay),
        bytes,
        packet_timings: None,
    }
}

pub fn exit_observation(id: &str, timestamp_us: u64, relay: &str, bytes: u64) -> Observation {
    Observation {
        id: id.to_string(),
        timestamp_us,
        kind: ObservationKind::ExitObserved,
        relay_fingerprint: RelayFingerprint::new(relay),
        bytes,
        packet_timings: None,
    }
}

pub fn fresh_tracker(config: &EngineConfig) -> RepetitionTracker {
    RepetitionTracker::new(config.repetition_config())
}
