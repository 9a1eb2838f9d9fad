//! Flight-Status Consensus Module
//!
//! Converts independent, untrusted oracle reports into one trusted fact:
//! - Status requests keyed by shard index and flight
//! - Duplicate-free response tallies per status code
//! - First-to-threshold consensus detection

pub mod engine;
pub mod request;

pub use engine::{ConsensusEngine, ResponseOutcome};
pub use request::{FlightKey, RequestKey, StatusCode, StatusRequest};
