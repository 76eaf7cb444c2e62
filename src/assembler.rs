//! Pair Assembler — pairs entry and exit observations, filters by time
//! window and topology feasibility, scores survivors with the three signal
//! functions, applies the repetition boost, and emits `SessionPair`s with
//! full reasoning.

use crate::config::{defaults, EngineConfig};
use crate::errors::EngineError;
use crate::repetition::RepetitionTracker;
use crate::signals;
use crate::topology::TopologySnapshot;
use crate::types::{
    AuditEntry, ConfidenceBucket, DropReason, Observation, ScoreBreakdown, SessionPair,
    SignalBreakdown, WeightProfile,
};
use rayon::prelude::*;
use std::collections::HashSet;
use tracing::debug;

/// Pairs and audit trail produced by one assembly run.
#[derive(Debug, Clone, Default)]
pub struct AssemblyOutcome {
    pub pairs: Vec<SessionPair>,
    pub audit: Vec<AuditEntry>,
}

enum CandidateOutcome {
    Emitted(SessionPair),
    Dropped(AuditEntry),
}

pub struct PairAssembler;

impl PairAssembler {
    /// Run the assembler over two observation lists: filter candidates by
    /// time window and topology feasibility, score survivors, apply the
    /// repetition boost, and emit ranked pairs. Ordering of the emitted pairs
    /// is deterministic regardless of the (possibly parallel) order
    /// candidates were scored in.
    pub fn assemble(
        entries: &[Observation],
        exits: &[Observation],
        topology: &TopologySnapshot,
        tracker: &RepetitionTracker,
        weight_profile: &WeightProfile,
        config: &EngineConfig,
    ) -> Result<AssemblyOutcome, EngineError> {
        weight_profile.validate()?;
        Self::check_no_duplicate_ids(entries, exits)?;

        tracker.ingest_all(entries);
        tracker.ingest_all(exits);

        let window_us = config.correlation_window_seconds.saturating_mul(1_000_000);
        let candidates = Self::candidates_within_window(entries, exits, window_us);
        debug!(
            candidate_count = candidates.len(),
            entries = entries.len(),
            exits = exits.len(),
            "assembling candidate pairs"
        );

        let outcomes: Vec<CandidateOutcome> = candidates
            .into_par_iter()
            .map(|(entry, exit)| {
                Self::score_candidate(entry, exit, topology, tracker, weight_profile, config)
            })
            .collect::<Result<Vec<_>, EngineError>>()?;

        let mut pairs = Vec::with_capacity(outcomes.len());
        let mut audit = Vec::new();
        for outcome in outcomes {
            match outcome {
                CandidateOutcome::Emitted(pair) => pairs.push(pair),
                CandidateOutcome::Dropped(entry) => audit.push(entry),
            }
        }

        Self::sort_pairs(&mut pairs);

        Ok(AssemblyOutcome { pairs, audit })
    }

    /// Sweep candidates on sorted exit timestamps rather than the full E × X cross
    /// product; produces the same candidate set as the naive nested loop.
    fn candidates_within_window<'a>(
        entries: &'a [Observation],
        exits: &'a [Observation],
        window_us: u64,
    ) -> Vec<(&'a Observation, &'a Observation)> {
        let mut sorted_exits: Vec<&Observation> = exits.iter().collect();
        sorted_exits.sort_by_key(|o| o.timestamp_us);

        let mut candidates = Vec::new();
        for entry in entries {
            let lo = entry.timestamp_us.saturating_sub(window_us);
            let hi = entry.timestamp_us.saturating_add(window_us);
            let start = sorted_exits.partition_point(|o| o.timestamp_us < lo);
            for exit in &sorted_exits[start..] {
                if exit.timestamp_us > hi {
                    break;
                }
                candidates.push((entry, *exit));
            }
        }
        candidates
    }

    fn check_no_duplicate_ids(
        entries: &[Observation],
        exits: &[Observation],
    ) -> Result<(), EngineError> {
        let mut seen = HashSet::with_capacity(entries.len() + exits.len());
        for observation in entries.iter().chain(exits.iter()) {
            if !seen.insert(observation.id.as_str()) {
                return Err(EngineError::internal_invariant(format!(
                    "duplicate observation id '{}'",
                    observation.id
                )));
            }
        }
        Ok(())
    }

    fn score_candidate(
        entry: &Observation,
        exit: &Observation,
        topology: &TopologySnapshot,
        tracker: &RepetitionTracker,
        weight_profile: &WeightProfile,
        config: &EngineConfig,
    ) -> Result<CandidateOutcome, EngineError> {
        let pair_id = SessionPair::make_pair_id(&entry.id, &exit.id);

        let entry_relay = topology.get(&entry.relay_fingerprint);
        let exit_relay = topology.get(&exit.relay_fingerprint);

        let (Some(entry_relay), Some(exit_relay)) = (entry_relay, exit_relay) else {
            let unresolved = if entry_relay.is_none() {
                entry.relay_fingerprint.clone()
            } else {
                exit.relay_fingerprint.clone()
            };
            if config.strict_relay_resolution {
                return Err(EngineError::UnknownRelay {
                    fingerprint: unresolved,
                    observation_id: if entry_relay.is_none() {
                        entry.id.clone()
                    } else {
                        exit.id.clone()
                    },
                });
            }
            return Ok(CandidateOutcome::Dropped(AuditEntry {
                entry_id: entry.id.clone(),
                exit_id: exit.id.clone(),
                reason: DropReason::UnknownRelay {
                    fingerprint: unresolved,
                },
            }));
        };

        let capability_mismatch = !entry_relay.has_capability(entry.required_capability())
            || !exit_relay.has_capability(exit.required_capability());

        let feasible = !capability_mismatch
            && topology
                .path_feasible(&entry.relay_fingerprint, &exit.relay_fingerprint)
                .ok_or_else(|| {
                    EngineError::internal_invariant(
                        "path feasibility check on resolved relays returned unresolved",
                    )
                })?;
        if !feasible {
            return Ok(CandidateOutcome::Dropped(AuditEntry {
                entry_id: entry.id.clone(),
                exit_id: exit.id.clone(),
                reason: DropReason::Infeasible,
            }));
        }

        let (s_t, reason_t) =
            signals::time_correlation(entry.timestamp_us, exit.timestamp_us, config.correlation_window_seconds);
        let (s_v, reason_v) = signals::volume_similarity(entry.bytes, exit.bytes);
        let (s_p, reason_p) = signals::pattern_similarity(
            entry.packet_timings.as_deref(),
            exit.packet_timings.as_deref(),
        );

        let contribution_t = weight_profile.w_time * s_t;
        let contribution_v = weight_profile.w_volume * s_v;
        let contribution_p = weight_profile.w_pattern * s_p;
        let base = contribution_t + contribution_v + contribution_p;

        let boost = tracker.combined_boost(entry, exit);
        let final_correlation =
            (base * (1.0 + (boost - 1.0) * defaults::REPETITION_SOFT_APPLICATION_FACTOR)).min(100.0);

        if final_correlation < config.min_confidence_threshold {
            return Ok(CandidateOutcome::Dropped(AuditEntry {
                entry_id: entry.id.clone(),
                exit_id: exit.id.clone(),
                reason: DropReason::BelowThreshold { final_correlation },
            }));
        }

        let p_guard = topology
            .guard_selection_probability(&entry.relay_fingerprint)
            .unwrap_or(0.0);
        let guard_confidence = 0.7 * final_correlation + 0.3 * (100.0 * p_guard);
        let bucket = ConfidenceBucket::classify(final_correlation);

        let reasoning = vec![
            format!(
                "Evaluating pairing of entry observation {} (relay {}) with exit observation {} (relay {})",
                entry.id, entry.relay_fingerprint, exit.id, exit.relay_fingerprint
            ),
            reason_t.clone(),
            reason_v.clone(),
            reason_p.clone(),
            format!(
                "Composite under '{}' profile: time {:.2}×{:.1}={:.2}, volume {:.2}×{:.1}={:.2}, pattern {:.2}×{:.1}={:.2}, base={:.2}",
                weight_profile.name,
                weight_profile.w_time, s_t, contribution_t,
                weight_profile.w_volume, s_v, contribution_v,
                weight_profile.w_pattern, s_p, contribution_p,
                base
            ),
            format!(
                "Repetition boost {:.3}x applied with soft-application factor {:.1}, final correlation {:.2}",
                boost, defaults::REPETITION_SOFT_APPLICATION_FACTOR, final_correlation
            ),
            format!(
                "Hypothesized guard relay {} (guard selection probability {:.4}, guard confidence {:.2})",
                entry.relay_fingerprint, p_guard, guard_confidence
            ),
            format!(
                "Verdict: {} confidence pairing (final correlation {:.2})",
                bucket.label(),
                final_correlation
            ),
        ];

        Ok(CandidateOutcome::Emitted(SessionPair {
            pair_id,
            entry: entry.clone(),
            exit: exit.clone(),
            base_correlation: base,
            repetition_boost: boost,
            final_correlation,
            hypothesized_guard: entry.relay_fingerprint.clone(),
            guard_confidence,
            reasoning,
            score_breakdown: ScoreBreakdown {
                time: SignalBreakdown {
                    score: s_t,
                    weight: weight_profile.w_time,
                    contribution: contribution_t,
                    reasoning: reason_t,
                },
                volume: SignalBreakdown {
                    score: s_v,
                    weight: weight_profile.w_volume,
                    contribution: contribution_v,
                    reasoning: reason_v,
                },
                pattern: SignalBreakdown {
                    score: s_p,
                    weight: weight_profile.w_pattern,
                    contribution: contribution_p,
                    reasoning: reason_p,
                },
                base,
                repetition_boost: boost,
                final_correlation,
            },
        }))
    }

    /// Stable, reproducible order: final descending, |Δt| ascending, pair id lexicographic.
    fn sort_pairs(pairs: &mut [SessionPair]) {
        pairs.sort_by(|a, b| {
            b.final_correlation
                .partial_cmp(&a.final_correlation)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| {
                    let delta_a = a.entry.timestamp_us.abs_diff(a.exit.timestamp_us);
                    let delta_b = b.entry.timestamp_us.abs_diff(b.exit.timestamp_us);
                    delta_a.cmp(&delta_b)
                })
                .then_with(|| a.pair_id.cmp(&b.pair_id))
        });
    }
}
