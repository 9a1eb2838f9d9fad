//! Flight status codes, request keys and per-request response tallies.

use crate::core::{now, Error, Identity, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Flight status reported by oracles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum StatusCode {
    Unknown = 0,
    OnTime = 10,
    LateAirline = 20,
    LateWeather = 30,
    LateTechnical = 40,
    LateOther = 50,
}

impl StatusCode {
    /// All known codes, in numeric order.
    pub const ALL: [StatusCode; 6] = [
        StatusCode::Unknown,
        StatusCode::OnTime,
        StatusCode::LateAirline,
        StatusCode::LateWeather,
        StatusCode::LateTechnical,
        StatusCode::LateOther,
    ];

    /// Numeric wire value.
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Whether the flight was late for any reason.
    pub fn is_late(self) -> bool {
        !matches!(self, StatusCode::Unknown | StatusCode::OnTime)
    }
}

impl TryFrom<u8> for StatusCode {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        StatusCode::ALL
            .into_iter()
            .find(|code| code.as_u8() == value)
            .ok_or(Error::InvalidStatusCode(value))
    }
}

impl From<StatusCode> for u8 {
    fn from(code: StatusCode) -> Self {
        code.as_u8()
    }
}

impl std::fmt::Display for StatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatusCode::Unknown => write!(f, "Unknown"),
            StatusCode::OnTime => write!(f, "On Time"),
            StatusCode::LateAirline => write!(f, "Late Airline"),
            StatusCode::LateWeather => write!(f, "Late Weather"),
            StatusCode::LateTechnical => write!(f, "Late Technical"),
            StatusCode::LateOther => write!(f, "Late Other"),
        }
    }
}

/// Identifies a flight independently of the shard it was requested under.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FlightKey {
    pub airline: Identity,
    pub flight: String,
    pub timestamp: u64,
}

impl FlightKey {
    /// Create a key for a scheduled flight.
    pub fn new(airline: Identity, flight: &str, timestamp: u64) -> Self {
        Self {
            airline,
            flight: flight.to_string(),
            timestamp,
        }
    }
}

/// Identifies a status request: a flight under one shard index.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestKey {
    pub index: u8,
    pub airline: Identity,
    pub flight: String,
    pub timestamp: u64,
}

impl RequestKey {
    /// Create a key for a request opened under `index`.
    pub fn new(index: u8, airline: Identity, flight: &str, timestamp: u64) -> Self {
        Self {
            index,
            airline,
            flight: flight.to_string(),
            timestamp,
        }
    }

    /// The flight this request asks about.
    pub fn flight_key(&self) -> FlightKey {
        FlightKey {
            airline: self.airline,
            flight: self.flight.clone(),
            timestamp: self.timestamp,
        }
    }
}

impl std::fmt::Display for RequestKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{}@{}#{}",
            self.airline, self.flight, self.timestamp, self.index
        )
    }
}

/// An open request collecting oracle responses.
///
/// Requests are never closed; responses keep being accepted after consensus.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StatusRequest {
    /// Whether responses are accepted
    pub open: bool,
    /// Identity that opened the request
    pub requester: Identity,
    /// Responders grouped by reported code
    pub responses: HashMap<StatusCode, HashSet<Identity>>,
    /// Code that first reached the response threshold
    pub consensus: Option<StatusCode>,
    /// Creation time
    pub opened_at: Timestamp,
}

impl StatusRequest {
    /// Create an open request with no responses.
    pub fn new(requester: Identity) -> Self {
        Self {
            open: true,
            requester,
            responses: HashMap::new(),
            consensus: None,
            opened_at: now(),
        }
    }

    /// Whether the identity answered this request with any code.
    pub fn has_responded(&self, responder: &Identity) -> bool {
        self.responses.values().any(|set| set.contains(responder))
    }

    /// Responses recorded for one code.
    pub fn tally(&self, code: StatusCode) -> usize {
        self.responses.get(&code).map_or(0, HashSet::len)
    }

    /// Responses recorded across all codes.
    pub fn total_responses(&self) -> usize {
        self.responses.values().map(HashSet::len).sum()
    }

    /// Record a response and return the new tally for its code.
    pub(crate) fn record(&mut self, responder: Identity, code: StatusCode) -> usize {
        let set = self.responses.entry(code).or_default();
        set.insert(responder);
        set.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_code_conversion() {
        assert_eq!(StatusCode::try_from(20).unwrap(), StatusCode::LateAirline);
        assert_eq!(StatusCode::LateWeather.as_u8(), 30);
        assert!(matches!(
            StatusCode::try_from(25),
            Err(Error::InvalidStatusCode(25))
        ));
    }

    #[test]
    fn test_status_code_serde_is_numeric() {
        let json = serde_json::to_string(&StatusCode::OnTime).unwrap();
        assert_eq!(json, "10");
        let code: StatusCode = serde_json::from_str("40").unwrap();
        assert_eq!(code, StatusCode::LateTechnical);
        assert!(serde_json::from_str::<StatusCode>("41").is_err());
    }

    #[test]
    fn test_status_code_lateness() {
        assert!(!StatusCode::OnTime.is_late());
        assert!(!StatusCode::Unknown.is_late());
        assert!(StatusCode::LateAirline.is_late());
        assert_eq!(StatusCode::LateAirline.to_string(), "Late Airline");
    }

    #[test]
    fn test_request_tracks_responders_across_codes() {
        let a = Identity::from_label("a");
        let b = Identity::from_label("b");
        let mut request = StatusRequest::new(Identity::from_label("passenger"));

        assert_eq!(request.record(a, StatusCode::OnTime), 1);
        assert_eq!(request.record(b, StatusCode::LateAirline), 1);

        assert!(request.has_responded(&a));
        assert!(request.has_responded(&b));
        assert_eq!(request.tally(StatusCode::OnTime), 1);
        assert_eq!(request.tally(StatusCode::LateOther), 0);
        assert_eq!(request.total_responses(), 2);
    }

    #[test]
    fn test_request_key_maps_to_flight() {
        let airline = Identity::from_label("AIR1");
        let key = RequestKey::new(4, airline, "FL100", 1_700_000_000);
        assert_eq!(key.flight_key(), FlightKey::new(airline, "FL100", 1_700_000_000));
    }
}
