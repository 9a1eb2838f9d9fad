//! Notifications pushed to external collaborators.

use crate::consensus::{RequestKey, StatusCode};
use crate::core::{now, Identity, Timestamp};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A state transition observable from outside the core.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SuretyEvent {
    /// Oracles holding `index` should answer for the flight
    OracleRequest {
        index: u8,
        airline: Identity,
        flight: String,
        timestamp: u64,
    },
    /// An oracle response was accepted
    OracleReport {
        airline: Identity,
        flight: String,
        timestamp: u64,
        status: StatusCode,
    },
    /// Consensus reached on the flight's status
    FlightStatusInfo {
        airline: Identity,
        flight: String,
        timestamp: u64,
        status: StatusCode,
    },
}

impl SuretyEvent {
    pub fn oracle_request(key: &RequestKey) -> Self {
        SuretyEvent::OracleRequest {
            index: key.index,
            airline: key.airline,
            flight: key.flight.clone(),
            timestamp: key.timestamp,
        }
    }

    pub fn oracle_report(key: &RequestKey, status: StatusCode) -> Self {
        SuretyEvent::OracleReport {
            airline: key.airline,
            flight: key.flight.clone(),
            timestamp: key.timestamp,
            status,
        }
    }

    pub fn flight_status_info(key: &RequestKey, status: StatusCode) -> Self {
        SuretyEvent::FlightStatusInfo {
            airline: key.airline,
            flight: key.flight.clone(),
            timestamp: key.timestamp,
            status,
        }
    }

    /// Event name as seen by subscribers.
    pub fn name(&self) -> &'static str {
        match self {
            SuretyEvent::OracleRequest { .. } => "OracleRequest",
            SuretyEvent::OracleReport { .. } => "OracleReport",
            SuretyEvent::FlightStatusInfo { .. } => "FlightStatusInfo",
        }
    }
}

/// Envelope around an emitted event.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub emitted_at: Timestamp,
    pub event: SuretyEvent,
}

impl Notification {
    pub fn new(event: SuretyEvent) -> Self {
        Self {
            id: Uuid::new_v4(),
            emitted_at: now(),
            event,
        }
    }

    /// Format as JSON.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_from_key() {
        let key = RequestKey::new(3, Identity::from_label("AIR1"), "FL100", 1_700_000_000);

        let event = SuretyEvent::oracle_request(&key);
        assert_eq!(event.name(), "OracleRequest");
        assert!(matches!(event, SuretyEvent::OracleRequest { index: 3, .. }));

        let event = SuretyEvent::flight_status_info(&key, StatusCode::LateAirline);
        assert_eq!(event.name(), "FlightStatusInfo");
    }

    #[test]
    fn test_notification_json_shape() {
        let key = RequestKey::new(3, Identity::from_label("AIR1"), "FL100", 1_700_000_000);
        let notification = Notification::new(SuretyEvent::oracle_report(&key, StatusCode::OnTime));

        let value: serde_json::Value = serde_json::from_str(&notification.to_json()).unwrap();
        assert_eq!(value["event"]["type"], "OracleReport");
        assert_eq!(value["event"]["flight"], "FL100");
        assert_eq!(value["event"]["status"], 10);
    }
}
