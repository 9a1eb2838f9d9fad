//! Airline records and the membership registry.

use crate::core::{now, Identity, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// A governance participant.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Airline {
    /// Account address
    pub address: Identity,
    /// Display name
    pub name: String,
    /// Admitted to the membership set
    pub registered: bool,
    /// Deposited the minimum stake
    pub funded: bool,
    /// Airlines that voted to admit this one
    pub registration_votes: HashSet<Identity>,
    /// First time this airline was mentioned
    pub created_at: Timestamp,
}

impl Airline {
    /// Create an airline that is neither registered nor funded.
    pub fn new(address: Identity, name: &str) -> Self {
        Self {
            address,
            name: name.to_string(),
            registered: false,
            funded: false,
            registration_votes: HashSet::new(),
            created_at: now(),
        }
    }

    /// Whether this airline may exercise governance rights.
    pub fn is_participant(&self) -> bool {
        self.registered && self.funded
    }

    /// Number of registration votes received so far.
    pub fn vote_count(&self) -> usize {
        self.registration_votes.len()
    }
}

/// Identity store for airlines.
///
/// Tracks the registered count separately so threshold checks stay O(1).
#[derive(Clone, Debug, Default)]
pub struct AirlineRegistry {
    airlines: HashMap<Identity, Airline>,
    registered_count: usize,
}

impl AirlineRegistry {
    /// Create a registry with the founding airline pre-registered and unfunded.
    pub fn with_founder(founder: Identity, name: &str) -> Self {
        let mut registry = Self::default();
        let mut airline = Airline::new(founder, name);
        airline.registered = true;
        registry.airlines.insert(founder, airline);
        registry.registered_count = 1;
        registry
    }

    /// Get an airline record.
    pub fn get(&self, address: &Identity) -> Option<&Airline> {
        self.airlines.get(address)
    }

    /// Whether the address belongs to a registered airline.
    pub fn is_registered(&self, address: &Identity) -> bool {
        self.airlines.get(address).is_some_and(|a| a.registered)
    }

    /// Whether the address belongs to a funded airline.
    pub fn is_funded(&self, address: &Identity) -> bool {
        self.airlines.get(address).is_some_and(|a| a.funded)
    }

    /// Number of registered airlines.
    pub fn registered_count(&self) -> usize {
        self.registered_count
    }

    /// Whether `voter` already voted to admit `target`.
    pub fn has_voted(&self, target: &Identity, voter: &Identity) -> bool {
        self.airlines
            .get(target)
            .is_some_and(|a| a.registration_votes.contains(voter))
    }

    /// Iterate over registered airlines.
    pub fn registered(&self) -> impl Iterator<Item = &Airline> {
        self.airlines.values().filter(|a| a.registered)
    }

    /// Get or create a record. A non-empty `name` fills in a record created
    /// without one (funding before registration).
    pub(crate) fn entry(&mut self, address: Identity, name: &str) -> &mut Airline {
        let airline = self
            .airlines
            .entry(address)
            .or_insert_with(|| Airline::new(address, name));
        if airline.name.is_empty() && !name.is_empty() {
            airline.name = name.to_string();
        }
        airline
    }

    pub(crate) fn mark_registered(&mut self, address: Identity, name: &str) {
        let airline = self.entry(address, name);
        if !airline.registered {
            airline.registered = true;
            airline.registration_votes.clear();
            self.registered_count += 1;
        }
    }

    pub(crate) fn mark_funded(&mut self, address: Identity) {
        self.entry(address, "").funded = true;
    }
}
