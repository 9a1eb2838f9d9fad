//! Common types used across flight-surety modules.

use crate::core::error::Error;
use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};
use std::str::FromStr;

/// Currency amount in the ledger's smallest unit.
pub type Amount = u128;

/// A 256-bit hash value (Keccak-256).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Hash256(pub [u8; 32]);

impl Hash256 {
    /// Create a new Hash256 from bytes.
    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Hash a sequence of byte chunks, in order.
    pub fn keccak(chunks: &[&[u8]]) -> Self {
        let mut hasher = Keccak256::new();
        for chunk in chunks {
            hasher.update(chunk);
        }
        Self(hasher.finalize().into())
    }

    /// Get the bytes of the hash.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl std::fmt::Display for Hash256 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// A caller identity: a 20-byte account address on the host ledger.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Identity(pub [u8; 20]);

impl Identity {
    /// Create an identity from raw address bytes.
    pub fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Derive a stable address from a human label.
    ///
    /// Takes the trailing 20 bytes of the label's Keccak-256 digest.
    pub fn from_label(label: &str) -> Self {
        let digest = Hash256::keccak(&[label.as_bytes()]);
        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(&digest.0[12..]);
        Self(bytes)
    }

    /// Parse from a hex string, with or without a `0x` prefix.
    pub fn from_hex(s: &str) -> Result<Self, Error> {
        let trimmed = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);
        let bytes = hex::decode(trimmed)?;
        let arr: [u8; 20] = bytes.try_into().map_err(|b: Vec<u8>| {
            Error::InvalidIdentity(format!("expected 20 bytes, got {}", b.len()))
        })?;
        Ok(Self(arr))
    }

    /// Get the address bytes.
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Convert to a `0x`-prefixed hex string.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

impl std::fmt::Display for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl From<Identity> for String {
    fn from(identity: Identity) -> Self {
        identity.to_hex()
    }
}

impl TryFrom<String> for Identity {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl FromStr for Identity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

/// Timestamp wrapper for consistent serialization.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Get current UTC timestamp.
pub fn now() -> Timestamp {
    chrono::Utc::now()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keccak_empty_input() {
        // Well-known Keccak-256 digest of the empty string.
        let hash = Hash256::keccak(&[]);
        assert_eq!(
            hash.to_hex(),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }

    #[test]
    fn test_keccak_chunking_is_concatenation() {
        let joined = Hash256::keccak(&[b"AIR1FL100".as_slice()]);
        let split = Hash256::keccak(&[b"AIR1".as_slice(), b"FL100".as_slice()]);
        assert_eq!(joined, split);
    }

    #[test]
    fn test_identity_from_label_is_stable() {
        let a = Identity::from_label("AIR1");
        let b = Identity::from_label("AIR1");
        let c = Identity::from_label("AIR2");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_identity_parse_with_and_without_prefix() {
        let id = Identity::from_hex("0xad868d1c3e2081f91bc45324178ce2e2e44022df").unwrap();
        let bare: Identity = "ad868d1c3e2081f91bc45324178ce2e2e44022df".parse().unwrap();
        assert_eq!(id, bare);
        assert_eq!(id.to_string(), "0xad868d1c3e2081f91bc45324178ce2e2e44022df");
    }

    #[test]
    fn test_identity_serializes_as_hex() {
        let id = Identity::from_hex("0xad868d1c3e2081f91bc45324178ce2e2e44022df").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"0xad868d1c3e2081f91bc45324178ce2e2e44022df\"");
        assert_eq!(serde_json::from_str::<Identity>(&json).unwrap(), id);
    }

    #[test]
    fn test_identity_rejects_wrong_length() {
        let err = Identity::from_hex("0xdeadbeef").unwrap_err();
        assert_eq!(err.code(), "InvalidIdentity");

        let err = Identity::from_hex("not-hex").unwrap_err();
        assert_eq!(err.code(), "InvalidIdentity");
    }
}
