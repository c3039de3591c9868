//! Replay identifiers.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Opaque provider identifier for one replay.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReplayId(String);

impl ReplayId {
    pub fn new(id: String) -> Self {
        Self(id)
    }

    /// Get the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReplayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for ReplayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ReplayId({})", self.0)
    }
}

impl From<String> for ReplayId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ReplayId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Remove repeated IDs, keeping the first occurrence of each.
pub fn dedup_preserving_order(ids: Vec<ReplayId>) -> Vec<ReplayId> {
    let mut seen: HashSet<ReplayId> = HashSet::with_capacity(ids.len());
    ids.into_iter().filter(|id| seen.insert(id.clone())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replay_id_display() {
        let id = ReplayId::new("2b1c0e2f-aaaa".to_string());
        assert_eq!(format!("{}", id), "2b1c0e2f-aaaa");
        assert!(format!("{:?}", id).contains("2b1c0e2f-aaaa"));
    }

    #[test]
    fn test_replay_id_serialization_is_plain_string() {
        let id = ReplayId::from("abc");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"abc\"");

        let parsed: ReplayId = serde_json::from_str("\"abc\"").unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_dedup_preserves_first_seen_order() {
        let ids: Vec<ReplayId> = ["c", "a", "c", "b", "a"]
            .into_iter()
            .map(ReplayId::from)
            .collect();

        let deduped = dedup_preserving_order(ids);
        let as_str: Vec<&str> = deduped.iter().map(|id| id.as_str()).collect();

        assert_eq!(as_str, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_dedup_empty() {
        assert!(dedup_preserving_order(Vec::new()).is_empty());
    }
}
