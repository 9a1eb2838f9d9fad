//! Governance Module
//!
//! Multiparty membership rules for airlines:
//! - Airline registry and the founding airline
//! - Funding gate for governance rights
//! - Threshold voting for admissions and operational status

pub mod airline;
pub mod custody;
pub mod engine;
pub mod status;

pub use airline::{Airline, AirlineRegistry};
pub use custody::{FundCustody, PooledFund};
pub use engine::{GovernanceEngine, RegistrationOutcome, StatusChangeOutcome};
pub use status::OperationalStatus;
