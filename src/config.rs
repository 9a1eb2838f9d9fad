//! Read-only parameters of the governance and consensus rules.
//!
//! Loaded once at initialization; the engines never mutate them.

use crate::core::{Amount, Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Registered-airline count at which unilateral action gives way to voting.
pub const MULTI_PARTY_AIRLINE_MIN: usize = 4;

/// Minimum stake an airline must deposit to become funded.
pub const MIN_FUNDING: Amount = 10;

/// Cost of registering an oracle.
pub const REGISTRATION_FEE: Amount = 1;

/// Size of the oracle index space `[0, K)`.
pub const INDEX_SPACE_SIZE: u8 = 10;

/// Matching responses required for consensus on a flight status.
pub const MIN_RESPONSES: usize = 3;

/// Default capacity of the notification broadcast channel.
pub const EVENT_CAPACITY: usize = 256;

/// Flight-surety configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuretyConfig {
    /// Multiparty threshold (M)
    pub multi_party_airline_min: usize,
    /// Minimum airline funding
    pub min_funding: Amount,
    /// Oracle registration fee
    pub registration_fee: Amount,
    /// Oracle index space size (K)
    pub index_space_size: u8,
    /// Responses required for consensus
    pub min_responses: usize,
    /// Buffered notifications per subscriber
    pub event_capacity: usize,
}

impl Default for SuretyConfig {
    fn default() -> Self {
        Self {
            multi_party_airline_min: MULTI_PARTY_AIRLINE_MIN,
            min_funding: MIN_FUNDING,
            registration_fee: REGISTRATION_FEE,
            index_space_size: INDEX_SPACE_SIZE,
            min_responses: MIN_RESPONSES,
            event_capacity: EVENT_CAPACITY,
        }
    }
}

impl SuretyConfig {
    /// Parse and validate a JSON configuration. Missing fields take defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Check that the parameters describe a usable system.
    pub fn validate(&self) -> Result<()> {
        if self.multi_party_airline_min == 0 {
            return Err(Error::InvalidConfig(
                "multi_party_airline_min must be at least 1".into(),
            ));
        }
        if self.index_space_size == 0 {
            return Err(Error::InvalidConfig(
                "index_space_size must be at least 1".into(),
            ));
        }
        if self.min_responses == 0 {
            return Err(Error::InvalidConfig(
                "min_responses must be at least 1".into(),
            ));
        }
        if self.event_capacity == 0 {
            return Err(Error::InvalidConfig(
                "event_capacity must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
