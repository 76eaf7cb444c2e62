use serde::{Deserialize, Serialize};
use std::fmt;

/// An opaque relay identifier (40-char hex in the public relay directory).
///
/// Wrapped rather than left as a bare `String` so that passing a pattern key
/// or an observation id where a fingerprint is expected is a compile error.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RelayFingerprint(String);

impl RelayFingerprint {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RelayFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for RelayFingerprint {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for RelayFingerprint {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}
