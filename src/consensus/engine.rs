//! Flight-status consensus engine.
//!
//! Opens requests under a randomly drawn shard index and turns matching
//! oracle responses into a single status once one code collects
//! `min_responses` distinct responders. The first code to reach the threshold
//! wins; later responses are accepted but never re-trigger consensus.

use crate::consensus::request::{FlightKey, RequestKey, StatusCode, StatusRequest};
use crate::core::{Error, Identity, Result};
use crate::oracle::{EntropySource, OracleRegistry};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Result of an accepted oracle response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseOutcome {
    /// Request the response was recorded against
    pub key: RequestKey,
    /// Reported status
    pub status: StatusCode,
    /// Responders for `status` after this response
    pub tally: usize,
    /// Whether this response triggered consensus
    pub consensus_reached: bool,
}

/// Consensus engine owning requests and settled flight statuses.
pub struct ConsensusEngine {
    requests: HashMap<RequestKey, StatusRequest>,
    flight_statuses: HashMap<FlightKey, StatusCode>,
    min_responses: usize,
    index_space: u8,
}

impl ConsensusEngine {
    /// Create an engine with the given quorum and index space.
    pub fn new(min_responses: usize, index_space: u8) -> Self {
        Self {
            requests: HashMap::new(),
            flight_statuses: HashMap::new(),
            min_responses,
            index_space,
        }
    }

    /// Open a status request, or reuse the one already open under the drawn index.
    pub fn fetch_flight_status(
        &mut self,
        airline: Identity,
        flight: &str,
        timestamp: u64,
        caller: &Identity,
        entropy: &mut dyn EntropySource,
    ) -> RequestKey {
        let index = entropy.draw_index(caller, self.index_space);
        let key = RequestKey::new(index, airline, flight, timestamp);

        let mut reused = true;
        self.requests.entry(key.clone()).or_insert_with(|| {
            reused = false;
            StatusRequest::new(*caller)
        });

        tracing::debug!(%key, reused, "status request opened");
        key
    }

    /// Record an oracle's response to an open request.
    pub fn submit_oracle_response(
        &mut self,
        oracles: &OracleRegistry,
        key: RequestKey,
        status: StatusCode,
        caller: &Identity,
    ) -> Result<ResponseOutcome> {
        let oracle = oracles.get(caller).ok_or(Error::NotRegisteredOracle)?;
        if !oracle.holds_index(key.index) {
            return Err(Error::IndexMismatch(key.index));
        }

        let request = match self.requests.get_mut(&key) {
            Some(request) if request.open => request,
            _ => return Err(Error::NoMatchingRequest),
        };
        if request.has_responded(caller) {
            return Err(Error::AlreadyResponded);
        }

        let tally = request.record(*caller, status);
        tracing::debug!(%key, %caller, code = status.as_u8(), tally, "oracle response accepted");

        let consensus_reached = request.consensus.is_none() && tally >= self.min_responses;
        if consensus_reached {
            request.consensus = Some(status);
            self.flight_statuses.insert(key.flight_key(), status);
            tracing::info!(%key, code = status.as_u8(), tally, "flight status consensus reached");
        }

        Ok(ResponseOutcome {
            key,
            status,
            tally,
            consensus_reached,
        })
    }

    /// Get a request.
    pub fn request(&self, key: &RequestKey) -> Option<&StatusRequest> {
        self.requests.get(key)
    }

    /// Settled status of a flight.
    pub fn flight_status(&self, flight: &FlightKey) -> Option<StatusCode> {
        self.flight_statuses.get(flight).copied()
    }

    /// Number of requests ever opened.
    pub fn request_count(&self) -> usize {
        self.requests.len()
    }

    /// Requests still waiting for consensus.
    pub fn pending_requests(&self) -> impl Iterator<Item = (&RequestKey, &StatusRequest)> {
        self.requests.iter().filter(|(_, r)| r.consensus.is_none())
    }
}
