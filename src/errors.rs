//! Engine error taxonomy.
//!
//! Only two kinds ever leave the engine as `Result::Err`: [`EngineError::InputValidation`]
//! and [`EngineError::InternalInvariant`]. `UnknownRelay` also propagates, but only when the
//! engine is run in strict mode — in lenient mode (the default) an unresolved relay drops the
//! candidate and is recorded in the audit trail instead. `BelowThreshold` and `Infeasible` are
//! never errors; they are [`crate::types::DropReason`] values attached to an audit entry.

use crate::types::RelayFingerprint;
use thiserror::Error;

/// Hard failures that can be returned from the engine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// Malformed input: an unknown observation type, negative bytes, a weight
    /// profile whose weights do not sum to 1.0 within tolerance, or an
    /// unrecognized configuration key.
    #[error("input validation failed for {field}: {message}")]
    InputValidation { field: String, message: String },

    /// An observation's relay fingerprint is absent from the topology snapshot,
    /// surfaced because the engine is running in strict mode.
    #[error("unknown relay {fingerprint} referenced by observation {observation_id}")]
    UnknownRelay {
        fingerprint: RelayFingerprint,
        observation_id: String,
    },

    /// An invariant documented in the data model was violated during
    /// computation. Indicates a bug rather than bad input.
    #[error("internal invariant violated: {message}")]
    InternalInvariant { message: String },
}

impl EngineError {
    pub fn input_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InputValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn internal_invariant(message: impl Into<String>) -> Self {
        Self::InternalInvariant {
            message: message.into(),
        }
    }
}
