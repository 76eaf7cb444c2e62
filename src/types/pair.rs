//! `SessionPair` — the scored hypothesis that two observations belong to the
//! same session through a shared guard relay, plus the audit trail of
//! candidates that did not survive to become one.

use super::{Observation, RelayFingerprint};
use serde::{Deserialize, Serialize};

/// The three weighted sub-scores and their contribution to `base`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalBreakdown {
    pub score: f64,
    pub weight: f64,
    pub contribution: f64,
    pub reasoning: String,
}

/// Full numeric audit trail backing a `SessionPair`'s `final_correlation`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub time: SignalBreakdown,
    pub volume: SignalBreakdown,
    pub pattern: SignalBreakdown,
    pub base: f64,
    pub repetition_boost: f64,
    pub final_correlation: f64,
}

/// Confidence bucket used by the verdict sentence and by callers filtering results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceBucket {
    High,
    Medium,
    Low,
}

impl ConfidenceBucket {
    /// `high >= 70`, `medium in [40,70)`, `low in [threshold,40)`. Callers are
    /// expected to have already dropped anything below `threshold`.
    pub fn classify(final_correlation: f64) -> Self {
        if final_correlation >= 70.0 {
            ConfidenceBucket::High
        } else if final_correlation >= 40.0 {
            ConfidenceBucket::Medium
        } else {
            ConfidenceBucket::Low
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ConfidenceBucket::High => "high",
            ConfidenceBucket::Medium => "medium",
            ConfidenceBucket::Low => "low",
        }
    }
}

/// A scored (entry, exit) hypothesis, immutable once emitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionPair {
    pub pair_id: String,
    pub entry: Observation,
    pub exit: Observation,
    pub base_correlation: f64,
    pub repetition_boost: f64,
    pub final_correlation: f64,
    pub hypothesized_guard: RelayFingerprint,
    pub guard_confidence: f64,
    /// Ordered append-only reasoning trace, owned by this pair alone.
    pub reasoning: Vec<String>,
    pub score_breakdown: ScoreBreakdown,
}

impl SessionPair {
    pub fn confidence_bucket(&self) -> ConfidenceBucket {
        ConfidenceBucket::classify(self.final_correlation)
    }

    pub fn make_pair_id(entry_id: &str, exit_id: &str) -> String {
        format!("{entry_id}_{exit_id}")
    }
}

/// Why a candidate never became a `SessionPair`. Never an error — always a
/// data outcome recorded alongside the pairing run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DropReason {
    OutsideCorrelationWindow,
    UnknownRelay { fingerprint: RelayFingerprint },
    Infeasible,
    BelowThreshold { final_correlation: f64 },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub entry_id: String,
    pub exit_id: String,
    pub reason: DropReason,
}
