use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// An opaque, content-addressed key used by the dedup table, the
/// classification cache and the intent-router cache. Two fingerprints
/// built from the same inputs are guaranteed equal; that's all callers
/// may rely on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fingerprint(pub String);

impl Fingerprint {
    pub fn of<T: Hash>(value: &T) -> Self {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        Self(format!("{:016x}", hasher.finish()))
    }

    pub fn of_parts(parts: &[&str]) -> Self {
        let mut hasher = DefaultHasher::new();
        for part in parts {
            part.hash(&mut hasher);
            0u8.hash(&mut hasher); // separator, prevents "ab"+"c" == "a"+"bc"
        }
        Self(format!("{:016x}", hasher.finish()))
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
