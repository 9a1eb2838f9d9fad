//! Process-wide operational flag and its pending vote set.

use crate::core::Identity;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Operational status of the whole system.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OperationalStatus {
    /// Whether mutating operations are accepted
    pub is_operational: bool,
    /// Votes towards flipping the flag
    pub pending_votes: HashSet<Identity>,
}

impl OperationalStatus {
    /// Systems start out operational.
    pub fn new() -> Self {
        Self {
            is_operational: true,
            pending_votes: HashSet::new(),
        }
    }

    pub(crate) fn apply(&mut self, status: bool) {
        self.is_operational = status;
        self.pending_votes.clear();
    }
}

impl Default for OperationalStatus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_operational() {
        let status = OperationalStatus::default();
        assert!(status.is_operational);
        assert!(status.pending_votes.is_empty());
    }

    #[test]
    fn test_apply_resets_votes() {
        let mut status = OperationalStatus::new();
        status.pending_votes.insert(Identity::from_label("a"));

        status.apply(false);

        assert!(!status.is_operational);
        assert!(status.pending_votes.is_empty());
    }
}
