//! Cluster Builder — groups accepted `SessionPair`s by hypothesized guard
//! fingerprint into `CorrelationCluster`s.

use crate::types::{CorrelationCluster, RelayFingerprint, SessionPair};
use std::collections::HashMap;

pub struct ClusterBuilder;

impl ClusterBuilder {
    /// Group pairs by hypothesized guard; emit a cluster for every group with
    /// at least `min_cluster_observations` pairs. Smaller groups are simply
    /// omitted — "below min_cluster_observations" is not an error.
    pub fn build(pairs: &[SessionPair], min_cluster_observations: usize) -> Vec<CorrelationCluster> {
        let mut groups: HashMap<&RelayFingerprint, Vec<&SessionPair>> = HashMap::new();
        for pair in pairs {
            groups.entry(&pair.hypothesized_guard).or_default().push(pair);
        }

        let mut clusters: Vec<CorrelationCluster> = groups
            .into_iter()
            .filter(|(_, group)| group.len() >= min_cluster_observations)
            .map(|(guard, group)| Self::build_cluster(guard, &group))
            .collect();

        clusters.sort_by(|a, b| a.cluster_id.cmp(&b.cluster_id));
        clusters
    }

    fn build_cluster(guard: &RelayFingerprint, group: &[&SessionPair]) -> CorrelationCluster {
        let observation_count = group.len();
        let consistency_score =
            group.iter().map(|p| p.final_correlation).sum::<f64>() / observation_count as f64;
        let guard_persistence_score = (10.0 * observation_count as f64).min(100.0);
        let cluster_confidence = 0.6 * consistency_score + 0.4 * guard_persistence_score;

        CorrelationCluster {
            cluster_id: format!("cluster_{guard}"),
            pair_ids: group.iter().map(|p| p.pair_id.clone()).collect(),
            probable_guards: std::iter::once(guard.clone()).collect(),
            observation_count,
            consistency_score,
            guard_persistence_score,
            cluster_confidence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Observation, ObservationKind, ScoreBreakdown, SignalBreakdown};

    fn pair(id: &str, guard: &str, final_correlation: f64) -> SessionPair {
        let observation = |suffix: &str, kind| Observation {
            id: format!("{id}_{suffix}"),
            timestamp_us: 0,
            kind,
            relay_fingerprint: RelayFingerprint::new(guard),
            bytes: 0,
            packet_timings: None,
        };
        let breakdown = SignalBreakdown {
            score: 0.0,
            weight: 0.0,
            contribution: 0.0,
            reasoning: String::new(),
        };
        SessionPair {
            pair_id: id.to_string(),
            entry: observation("entry", ObservationKind::EntryObserved),
            exit: observation("exit", ObservationKind::ExitObserved),
            base_correlation: final_correlation,
            repetition_boost: 1.0,
            final_correlation,
            hypothesized_guard: RelayFingerprint::new(guard),
            guard_confidence: final_correlation,
            reasoning: vec!["test".to_string(); 6],
            score_breakdown: ScoreBreakdown {
                time: breakdown.clone(),
                volume: breakdown.clone(),
                pattern: breakdown,
                base: final_correlation,
                repetition_boost: 1.0,
                final_correlation,
            },
        }
    }

    #[test]
    fn below_minimum_is_discarded() {
        let pairs = vec![pair("p1", "G1", 80.0), pair("p2", "G1", 80.0)];
        let clusters = ClusterBuilder::build(&pairs, 3);
        assert!(clusters.is_empty());
    }

    #[test]
    fn cluster_formation_scenario() {
        // 5 pairs sharing guard G1, all with final correlation 80.
        let pairs: Vec<SessionPair> = (0..5).map(|i| pair(&format!("p{i}"), "G1", 80.0)).collect();
        let clusters = ClusterBuilder::build(&pairs, 3);
        assert_eq!(clusters.len(), 1);
        let cluster = &clusters[0];
        assert_eq!(cluster.observation_count, 5);
        assert!((cluster.consistency_score - 80.0).abs() < 1e-9);
        assert!((cluster.guard_persistence_score - 50.0).abs() < 1e-9);
        assert!((cluster.cluster_confidence - 68.0).abs() < 1e-9);
    }

    #[test]
    fn distinct_guards_form_distinct_clusters() {
        let mut pairs: Vec<SessionPair> = (0..3).map(|i| pair(&format!("a{i}"), "G1", 50.0)).collect();
        pairs.extend((0..3).map(|i| pair(&format!("b{i}"), "G2", 90.0)));
        let clusters = ClusterBuilder::build(&pairs, 3);
        assert_eq!(clusters.len(), 2);
    }
}
