//! The flight-surety state aggregate.
//!
//! [`FlightSurety`] owns governance, oracle and consensus state and is the
//! only entry point for the operations invoked by the host ledger. The host
//! serializes calls; each one either commits completely and then emits its
//! notifications, or is rejected with all state untouched.

use crate::config::SuretyConfig;
use crate::consensus::{
    ConsensusEngine, FlightKey, RequestKey, ResponseOutcome, StatusCode, StatusRequest,
};
use crate::core::{Amount, Identity, Result};
use crate::events::{EventNotifier, EventSubscriber, Notification, SuretyEvent};
use crate::governance::{
    Airline, FundCustody, GovernanceEngine, RegistrationOutcome, StatusChangeOutcome,
};
use crate::oracle::{EntropySource, KeccakEntropy, OracleRegistry};
use std::sync::Arc;
use tokio::sync::broadcast;

/// Airline governance and flight-status consensus over one ledger.
pub struct FlightSurety {
    config: SuretyConfig,
    governance: GovernanceEngine,
    oracles: OracleRegistry,
    consensus: ConsensusEngine,
    notifier: EventNotifier,
    entropy: Box<dyn EntropySource>,
}

fn logged<T>(operation: &'static str, caller: &Identity, result: Result<T>) -> Result<T> {
    if let Err(err) = &result {
        tracing::debug!(operation, %caller, reason = err.code(), "operation rejected");
    }
    result
}

impl FlightSurety {
    /// Create with OS-backed entropy and an in-memory fund pool.
    pub fn new(config: SuretyConfig, founder: Identity, founder_name: &str) -> Result<Self> {
        Self::with_entropy(
            config,
            founder,
            founder_name,
            Box::new(KeccakEntropy::from_os_rng()),
        )
    }

    /// Create with an injected entropy source.
    pub fn with_entropy(
        config: SuretyConfig,
        founder: Identity,
        founder_name: &str,
        entropy: Box<dyn EntropySource>,
    ) -> Result<Self> {
        config.validate()?;
        let governance = GovernanceEngine::new(&config, founder, founder_name);
        Ok(Self::assemble(config, governance, entropy))
    }

    /// Create with injected entropy and fund custody.
    pub fn with_custody(
        config: SuretyConfig,
        founder: Identity,
        founder_name: &str,
        entropy: Box<dyn EntropySource>,
        custody: Box<dyn FundCustody>,
    ) -> Result<Self> {
        config.validate()?;
        let governance = GovernanceEngine::with_custody(&config, founder, founder_name, custody);
        Ok(Self::assemble(config, governance, entropy))
    }

    fn assemble(
        config: SuretyConfig,
        governance: GovernanceEngine,
        entropy: Box<dyn EntropySource>,
    ) -> Self {
        tracing::info!(?config, "flight surety initialized");
        Self {
            oracles: OracleRegistry::new(config.registration_fee, config.index_space_size),
            consensus: ConsensusEngine::new(config.min_responses, config.index_space_size),
            notifier: EventNotifier::new(config.event_capacity),
            governance,
            entropy,
            config,
        }
    }

    /// Read-only parameters.
    pub fn config(&self) -> &SuretyConfig {
        &self.config
    }

    // Governance

    /// Register an airline, or record the caller's vote for it.
    pub fn register_airline(
        &mut self,
        target: Identity,
        name: &str,
        caller: &Identity,
    ) -> Result<RegistrationOutcome> {
        logged(
            "register_airline",
            caller,
            self.governance.register_airline(target, name, caller),
        )
    }

    /// Deposit the minimum stake for an airline. Funding is irreversible.
    pub fn fund_airline(
        &mut self,
        target: Identity,
        amount: Amount,
        caller: &Identity,
    ) -> Result<()> {
        logged(
            "fund_airline",
            caller,
            self.governance.fund_airline(target, amount, caller),
        )
    }

    /// Change the operational flag, or record the caller's vote for the change.
    pub fn set_operating_status(
        &mut self,
        new_status: bool,
        caller: &Identity,
    ) -> Result<StatusChangeOutcome> {
        logged(
            "set_operating_status",
            caller,
            self.governance.set_operating_status(new_status, caller),
        )
    }

    /// Whether mutating operations are accepted.
    pub fn is_operational(&self) -> bool {
        self.governance.is_operational()
    }

    /// Whether the address belongs to a registered airline.
    pub fn is_registered_airline(&self, address: &Identity) -> bool {
        self.governance.is_registered_airline(address)
    }

    /// Whether the address belongs to a funded airline.
    pub fn is_funded_airline(&self, address: &Identity) -> bool {
        self.governance.is_funded_airline(address)
    }

    /// Number of registered airlines.
    pub fn registered_airline_count(&self) -> usize {
        self.governance.registered_airline_count()
    }

    /// Get an airline record.
    pub fn airline(&self, address: &Identity) -> Option<&Airline> {
        self.governance.airline(address)
    }

    /// Votes recorded towards the next status change.
    pub fn pending_status_votes(&self) -> usize {
        self.governance.pending_status_votes()
    }

    /// Total amount deposited by funding.
    pub fn pooled_funds(&self) -> Amount {
        self.governance.pooled_funds()
    }

    // Oracles

    /// Register the caller as an oracle and return its assigned indexes.
    pub fn register_oracle(&mut self, caller: &Identity, fee: Amount) -> Result<[u8; 3]> {
        let result = self
            .governance
            .require_operational()
            .and_then(|()| self.oracles.register(*caller, fee, self.entropy.as_mut()));
        logged("register_oracle", caller, result)
    }

    /// Indexes assigned to the calling oracle.
    pub fn get_my_indexes(&self, caller: &Identity) -> Result<[u8; 3]> {
        self.oracles.indexes_of(caller)
    }

    /// Whether the identity is a registered oracle.
    pub fn is_registered_oracle(&self, identity: &Identity) -> bool {
        self.oracles.is_registered(identity)
    }

    /// Number of registered oracles.
    pub fn oracle_count(&self) -> usize {
        self.oracles.len()
    }

    // Flight status

    /// Open a status request and notify the oracles holding its index.
    pub fn fetch_flight_status(
        &mut self,
        airline: Identity,
        flight: &str,
        timestamp: u64,
        caller: &Identity,
    ) -> Result<RequestKey> {
        logged("fetch_flight_status", caller, self.governance.require_operational())?;

        let key = self.consensus.fetch_flight_status(
            airline,
            flight,
            timestamp,
            caller,
            self.entropy.as_mut(),
        );
        self.notifier.emit(SuretyEvent::oracle_request(&key));
        Ok(key)
    }

    /// Record an oracle's answer to an open request.
    pub fn submit_oracle_response(
        &mut self,
        index: u8,
        airline: Identity,
        flight: &str,
        timestamp: u64,
        status: StatusCode,
        caller: &Identity,
    ) -> Result<ResponseOutcome> {
        logged(
            "submit_oracle_response",
            caller,
            self.governance.require_operational(),
        )?;

        let key = RequestKey::new(index, airline, flight, timestamp);
        let outcome = logged(
            "submit_oracle_response",
            caller,
            self.consensus
                .submit_oracle_response(&self.oracles, key, status, caller),
        )?;

        self.notifier
            .emit(SuretyEvent::oracle_report(&outcome.key, outcome.status));
        if outcome.consensus_reached {
            self.notifier
                .emit(SuretyEvent::flight_status_info(&outcome.key, outcome.status));
        }
        Ok(outcome)
    }

    /// Get a status request by key.
    pub fn request(&self, key: &RequestKey) -> Option<&StatusRequest> {
        self.consensus.request(key)
    }

    /// Settled status of a flight, once consensus is reached.
    pub fn flight_status(&self, flight: &FlightKey) -> Option<StatusCode> {
        self.consensus.flight_status(flight)
    }

    // Notifications

    /// Receive every notification emitted from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.notifier.subscribe()
    }

    /// Register a sink invoked synchronously for each notification.
    pub fn add_subscriber(&mut self, subscriber: Arc<dyn EventSubscriber>) {
        self.notifier.add_subscriber(subscriber);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Error;
    use crate::oracle::FixedEntropy;

    fn founder() -> Identity {
        Identity::from_label("founder")
    }

    fn surety(entropy: Vec<u8>) -> FlightSurety {
        FlightSurety::with_entropy(
            SuretyConfig::default(),
            founder(),
            "AirOne",
            Box::new(FixedEntropy::new(entropy)),
        )
        .unwrap()
    }

    #[test]
    fn test_initial_state() {
        let surety = surety(vec![]);
        assert!(surety.is_operational());
        assert_eq!(surety.registered_airline_count(), 1);
        assert!(surety.is_registered_airline(&founder()));
        assert_eq!(surety.config().min_responses, 3);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = SuretyConfig {
            min_responses: 0,
            ..Default::default()
        };
        let result = FlightSurety::new(config, founder(), "AirOne");
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_fund_then_register_records_name() {
        let mut surety = surety(vec![]);
        let target = Identity::from_label("dAirline");
        surety.fund_airline(founder(), 10, &founder()).unwrap();

        surety.fund_airline(target, 10, &founder()).unwrap();
        surety.register_airline(target, "dAirline", &founder()).unwrap();

        assert_eq!(surety.airline(&target).unwrap().name, "dAirline");
    }

    #[test]
    fn test_oracle_registration_and_lookup() {
        let mut surety = surety(vec![1, 2, 3]);
        let oracle = Identity::from_label("oracle");

        let indexes = surety.register_oracle(&oracle, 1).unwrap();

        assert_eq!(indexes, [1, 2, 3]);
        assert_eq!(surety.get_my_indexes(&oracle).unwrap(), [1, 2, 3]);
        assert!(surety.is_registered_oracle(&oracle));
        assert_eq!(surety.oracle_count(), 1);
        assert!(matches!(
            surety.get_my_indexes(&founder()),
            Err(Error::NotRegisteredOracle)
        ));
    }

    #[test]
    fn test_not_operational_blocks_oracle_operations() {
        let mut surety = surety(vec![1, 2, 3]);
        surety.fund_airline(founder(), 10, &founder()).unwrap();
        surety.set_operating_status(false, &founder()).unwrap();

        let oracle = Identity::from_label("oracle");
        assert!(matches!(
            surety.register_oracle(&oracle, 1),
            Err(Error::NotOperational)
        ));
        assert!(matches!(
            surety.fetch_flight_status(founder(), "FL100", 1, &founder()),
            Err(Error::NotOperational)
        ));
        assert!(matches!(
            surety.submit_oracle_response(1, founder(), "FL100", 1, StatusCode::OnTime, &oracle),
            Err(Error::NotOperational)
        ));
        assert_eq!(surety.oracle_count(), 0);
    }

    #[test]
    fn test_rejected_response_emits_nothing() {
        let mut surety = surety(vec![1, 2, 3, 1]);
        let oracle = Identity::from_label("oracle");
        surety.register_oracle(&oracle, 1).unwrap();
        let mut receiver = surety.subscribe();

        let err = surety
            .submit_oracle_response(1, founder(), "FL100", 1, StatusCode::OnTime, &oracle)
            .unwrap_err();

        assert!(matches!(err, Error::NoMatchingRequest));
        assert!(receiver.try_recv().is_err());
    }

    #[test]
    fn test_events_for_accepted_response() {
        let mut surety = surety(vec![1, 2, 3, 2]);
        let oracle = Identity::from_label("oracle");
        surety.register_oracle(&oracle, 1).unwrap();
        let mut receiver = surety.subscribe();

        let key = surety
            .fetch_flight_status(founder(), "FL100", 1, &founder())
            .unwrap();
        assert_eq!(key.index, 2);
        surety
            .submit_oracle_response(2, founder(), "FL100", 1, StatusCode::OnTime, &oracle)
            .unwrap();

        let first = receiver.try_recv().unwrap();
        let second = receiver.try_recv().unwrap();
        assert_eq!(first.event, SuretyEvent::oracle_request(&key));
        assert_eq!(second.event, SuretyEvent::oracle_report(&key, StatusCode::OnTime));
        assert!(receiver.try_recv().is_err());
    }
}
