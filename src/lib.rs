//! # Flight Surety
//!
//! Decision logic for a shared, append-only ledger of flight-status facts:
//! - **Governance**: airline membership, funding gate, multiparty voting
//! - **Oracles**: registration with fixed shard indexes
//! - **Consensus**: turning independent oracle reports into one trusted status
//! - **Events**: notifications for oracle processes and other collaborators
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use flight_surety::{FlightSurety, Identity, StatusCode, SuretyConfig};
//!
//! let founder = Identity::from_label("AirOne");
//! let mut surety = FlightSurety::new(SuretyConfig::default(), founder, "AirOne").unwrap();
//!
//! // Oracles register, then answer requests under the indexes they hold.
//! let oracle = Identity::from_label("oracle-1");
//! let indexes = surety.register_oracle(&oracle, 1).unwrap();
//!
//! let key = surety
//!     .fetch_flight_status(founder, "ND1309", 1_700_000_000, &founder)
//!     .unwrap();
//! if indexes.contains(&key.index) {
//!     surety
//!         .submit_oracle_response(
//!             key.index,
//!             founder,
//!             "ND1309",
//!             1_700_000_000,
//!             StatusCode::OnTime,
//!             &oracle,
//!         )
//!         .unwrap();
//! }
//! ```

pub mod config;
pub mod consensus;
pub mod core;
pub mod events;
pub mod governance;
pub mod monitoring;
pub mod oracle;
pub mod surety;

pub use config::SuretyConfig;
pub use consensus::{FlightKey, RequestKey, ResponseOutcome, StatusCode};
pub use crate::core::error::{Error, Result};
pub use crate::core::types::{Amount, Identity};
pub use events::{Notification, SuretyEvent};
pub use governance::{RegistrationOutcome, StatusChangeOutcome};
pub use surety::FlightSurety;
