//! Governance engine: membership growth, funding gate, operational control.
//!
//! Below the multiparty threshold a single funded airline acts alone. At or
//! above it, admissions and status changes need `votes * 2 >= registered`.

use crate::config::SuretyConfig;
use crate::core::{Amount, Error, Identity, Result};
use crate::governance::airline::{Airline, AirlineRegistry};
use crate::governance::custody::{FundCustody, PooledFund};
use crate::governance::status::OperationalStatus;
use serde::{Deserialize, Serialize};

/// Result of a registration call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegistrationOutcome {
    /// Target is now a registered airline
    Registered,
    /// Vote recorded, threshold not yet met
    Pending {
        /// Votes recorded for the target
        votes: usize,
        /// Registered airlines at the time of the vote
        registered: usize,
    },
}

/// Result of an operating status call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusChangeOutcome {
    /// Flag switched to the contained value
    Applied(bool),
    /// Vote recorded, threshold not yet met
    Pending {
        /// Votes recorded for the change
        votes: usize,
        /// Registered airlines at the time of the vote
        registered: usize,
    },
}

/// Governance engine owning airline and operational state.
pub struct GovernanceEngine {
    airlines: AirlineRegistry,
    status: OperationalStatus,
    custody: Box<dyn FundCustody>,
    multi_party_min: usize,
    min_funding: Amount,
}

/// Majority rule; exactly half suffices.
fn majority(votes: usize, registered: usize) -> bool {
    votes * 2 >= registered
}

impl GovernanceEngine {
    /// Create an engine with a founding airline and an in-memory fund pool.
    pub fn new(config: &SuretyConfig, founder: Identity, founder_name: &str) -> Self {
        Self::with_custody(config, founder, founder_name, Box::new(PooledFund::new()))
    }

    /// Create an engine delegating deposits to the given custody.
    pub fn with_custody(
        config: &SuretyConfig,
        founder: Identity,
        founder_name: &str,
        custody: Box<dyn FundCustody>,
    ) -> Self {
        Self {
            airlines: AirlineRegistry::with_founder(founder, founder_name),
            status: OperationalStatus::new(),
            custody,
            multi_party_min: config.multi_party_airline_min,
            min_funding: config.min_funding,
        }
    }

    /// Whether mutating operations are accepted.
    pub fn is_operational(&self) -> bool {
        self.status.is_operational
    }

    /// Fail with `NotOperational` unless the system is operational.
    pub fn require_operational(&self) -> Result<()> {
        if self.status.is_operational {
            Ok(())
        } else {
            Err(Error::NotOperational)
        }
    }

    fn require_participant(&self, caller: &Identity) -> Result<()> {
        if !self.airlines.is_registered(caller) {
            return Err(Error::CallerNotRegistered);
        }
        if !self.airlines.is_funded(caller) {
            return Err(Error::CallerNotFunded);
        }
        Ok(())
    }

    fn multi_party(&self) -> bool {
        self.airlines.registered_count() >= self.multi_party_min
    }

    /// Register a new airline, or vote for it once the network is large enough.
    pub fn register_airline(
        &mut self,
        target: Identity,
        name: &str,
        caller: &Identity,
    ) -> Result<RegistrationOutcome> {
        self.require_operational()?;
        self.require_participant(caller)?;
        if self.airlines.is_registered(&target) {
            return Err(Error::AlreadyRegistered);
        }

        if !self.multi_party() {
            self.airlines.mark_registered(target, name);
            tracing::info!(airline = %target, name, %caller, "airline registered");
            return Ok(RegistrationOutcome::Registered);
        }

        if self.airlines.has_voted(&target, caller) {
            return Err(Error::AlreadyVoted);
        }

        let registered = self.airlines.registered_count();
        let airline = self.airlines.entry(target, name);
        airline.registration_votes.insert(*caller);
        let votes = airline.vote_count();

        if majority(votes, registered) {
            self.airlines.mark_registered(target, name);
            tracing::info!(airline = %target, name, votes, registered, "airline registered by vote");
            Ok(RegistrationOutcome::Registered)
        } else {
            tracing::debug!(
                airline = %target,
                %caller,
                votes,
                registered,
                "registration vote recorded"
            );
            Ok(RegistrationOutcome::Pending { votes, registered })
        }
    }

    /// Fund an airline. Funding is irreversible.
    pub fn fund_airline(
        &mut self,
        target: Identity,
        amount: Amount,
        caller: &Identity,
    ) -> Result<()> {
        self.require_operational()?;
        if !self.airlines.is_registered(caller) {
            return Err(Error::CallerNotRegistered);
        }
        if amount < self.min_funding {
            return Err(Error::InsufficientFunds {
                required: self.min_funding,
                provided: amount,
            });
        }
        if self.airlines.is_funded(&target) {
            return Err(Error::AlreadyFunded);
        }

        self.custody.deposit(caller, &target, amount);
        self.airlines.mark_funded(target);
        tracing::info!(airline = %target, %caller, amount, "airline funded");
        Ok(())
    }

    /// Change the operational flag, or vote for the change.
    ///
    /// This is the only mutating operation accepted while not operational.
    pub fn set_operating_status(
        &mut self,
        new_status: bool,
        caller: &Identity,
    ) -> Result<StatusChangeOutcome> {
        self.require_participant(caller)?;
        if new_status == self.status.is_operational {
            return Err(Error::NoStatusChange);
        }

        if !self.multi_party() {
            self.status.apply(new_status);
            tracing::info!(operational = new_status, %caller, "operating status changed");
            return Ok(StatusChangeOutcome::Applied(new_status));
        }

        if self.status.pending_votes.contains(caller) {
            return Err(Error::AlreadyVoted);
        }

        self.status.pending_votes.insert(*caller);
        let votes = self.status.pending_votes.len();
        let registered = self.airlines.registered_count();

        if majority(votes, registered) {
            self.status.apply(new_status);
            tracing::info!(
                operational = new_status,
                votes,
                registered,
                "operating status changed by vote"
            );
            Ok(StatusChangeOutcome::Applied(new_status))
        } else {
            tracing::debug!(
                operational = new_status,
                %caller,
                votes,
                registered,
                "status vote recorded"
            );
            Ok(StatusChangeOutcome::Pending { votes, registered })
        }
    }

    /// Get an airline record.
    pub fn airline(&self, address: &Identity) -> Option<&Airline> {
        self.airlines.get(address)
    }

    /// Whether the address belongs to a registered airline.
    pub fn is_registered_airline(&self, address: &Identity) -> bool {
        self.airlines.is_registered(address)
    }

    /// Whether the address belongs to a funded airline.
    pub fn is_funded_airline(&self, address: &Identity) -> bool {
        self.airlines.is_funded(address)
    }

    /// Number of registered airlines.
    pub fn registered_airline_count(&self) -> usize {
        self.airlines.registered_count()
    }

    /// Votes recorded towards the next status change.
    pub fn pending_status_votes(&self) -> usize {
        self.status.pending_votes.len()
    }

    /// Total amount held in custody.
    pub fn pooled_funds(&self) -> Amount {
        self.custody.balance()
    }
}
