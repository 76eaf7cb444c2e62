//! Signal Functions — three pure functions mapping an (entry, exit)
//! observation pair to a score in [0,100] plus a human-readable explanation.
//!
//! Each returns `(score, explanation)` rather than a bare score: the
//! explanation is part of the contract, propagated verbatim into a
//! `SessionPair`'s reasoning trace. Do not collapse these to a single
//! numeric return.

pub mod pattern;
pub mod time;
pub mod volume;

pub use pattern::score as pattern_similarity;
pub use time::score as time_correlation;
pub use volume::score as volume_similarity;
