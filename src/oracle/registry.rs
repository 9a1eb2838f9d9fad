//! Oracle registration and shard index assignment.

use crate::core::{now, Amount, Error, Identity, Result, Timestamp};
use crate::oracle::entropy::EntropySource;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// An external reporter entitled to answer requests under its indexes.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Oracle {
    /// Reporter identity
    pub identity: Identity,
    /// Assigned shard indexes; need not be distinct
    pub indexes: [u8; 3],
    /// Registration time
    pub registered_at: Timestamp,
}

impl Oracle {
    /// Whether this oracle may answer requests under `index`.
    pub fn holds_index(&self, index: u8) -> bool {
        self.indexes.contains(&index)
    }
}

/// Registry of oracles, immutable once registered.
#[derive(Clone, Debug)]
pub struct OracleRegistry {
    oracles: HashMap<Identity, Oracle>,
    registration_fee: Amount,
    index_space: u8,
}

impl OracleRegistry {
    /// Create an empty registry.
    pub fn new(registration_fee: Amount, index_space: u8) -> Self {
        Self {
            oracles: HashMap::new(),
            registration_fee,
            index_space,
        }
    }

    /// Register an oracle against payment of the registration fee.
    pub fn register(
        &mut self,
        identity: Identity,
        fee: Amount,
        entropy: &mut dyn EntropySource,
    ) -> Result<[u8; 3]> {
        if fee < self.registration_fee {
            return Err(Error::InsufficientFee {
                required: self.registration_fee,
                provided: fee,
            });
        }
        if self.oracles.contains_key(&identity) {
            return Err(Error::AlreadyRegistered);
        }

        let indexes = [
            entropy.draw_index(&identity, self.index_space),
            entropy.draw_index(&identity, self.index_space),
            entropy.draw_index(&identity, self.index_space),
        ];
        self.oracles.insert(
            identity,
            Oracle {
                identity,
                indexes,
                registered_at: now(),
            },
        );

        tracing::info!(%identity, ?indexes, "oracle registered");
        Ok(indexes)
    }

    /// Indexes assigned to an oracle.
    pub fn indexes_of(&self, identity: &Identity) -> Result<[u8; 3]> {
        self.oracles
            .get(identity)
            .map(|o| o.indexes)
            .ok_or(Error::NotRegisteredOracle)
    }

    /// Get an oracle record.
    pub fn get(&self, identity: &Identity) -> Option<&Oracle> {
        self.oracles.get(identity)
    }

    /// Whether the identity holds an oracle record.
    pub fn is_registered(&self, identity: &Identity) -> bool {
        self.oracles.contains_key(identity)
    }

    /// Number of registered oracles.
    pub fn len(&self) -> usize {
        self.oracles.len()
    }

    /// Whether no oracle is registered.
    pub fn is_empty(&self) -> bool {
        self.oracles.is_empty()
    }

    /// Oracles holding the given index.
    pub fn holders_of(&self, index: u8) -> impl Iterator<Item = &Oracle> {
        self.oracles.values().filter(move |o| o.holds_index(index))
    }
}
