//! The fixed owner set.

use super::error::{GateError, GateResult};
use crate::identity::Identity;
use std::collections::HashSet;

/// Number of owners every gate is created with.
pub const OWNER_COUNT: usize = 4;

/// Exactly `OWNER_COUNT` distinct, non-zero identities in registration order.
///
/// Built once, never mutated. Membership checks are O(1).
#[derive(Debug, Clone)]
pub struct OwnerSet {
    ordered: [Identity; OWNER_COUNT],
    members: HashSet<Identity>,
}

impl OwnerSet {
    /// Validate and register the candidates.
    ///
    /// Zero identities are rejected before duplicates: `[A, A, 0, B]` fails
    /// with `InvalidIdentity`. Duplicates are reported against the first
    /// repeat in input order.
    pub fn new(candidates: [Identity; OWNER_COUNT]) -> GateResult<Self> {
        if candidates.iter().any(Identity::is_zero) {
            return Err(GateError::InvalidIdentity);
        }

        let mut members = HashSet::with_capacity(OWNER_COUNT);
        for candidate in &candidates {
            if !members.insert(*candidate) {
                return Err(GateError::DuplicateOwner(*candidate));
            }
        }

        Ok(Self {
            ordered: candidates,
            members,
        })
    }

    pub fn contains(&self, identity: &Identity) -> bool {
        self.members.contains(identity)
    }

    /// Owners in registration order.
    pub fn as_array(&self) -> &[Identity; OWNER_COUNT] {
        &self.ordered
    }

    pub fn iter(&self) -> impl Iterator<Item = &Identity> {
        self.ordered.iter()
    }
}
