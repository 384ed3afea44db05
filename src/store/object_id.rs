//! Document identifiers.
//!
//! An identifier is 12 bytes rendered as 24 lowercase hex characters:
//! a 4-byte big-endian timestamp (seconds), a 5-byte per-process random
//! value and a 3-byte counter. Identifiers minted by one process therefore
//! sort in creation order.

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::OnceLock;
use std::time::{SystemTime, UNIX_EPOCH};

use rand::Rng;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Length of the hex encoding.
pub const HEX_LEN: usize = 24;

const COUNTER_MASK: u32 = 0x00ff_ffff;

static PROCESS_UNIQUE: OnceLock<[u8; 5]> = OnceLock::new();
static COUNTER: OnceLock<AtomicU32> = OnceLock::new();

/// Error returned when a string is not a valid identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid employee id `{input}`: expected a 24 character hex string")]
pub struct ObjectIdError {
    input: String,
}

/// A 12-byte document identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId([u8; 12]);

impl ObjectId {
    /// Mint a fresh identifier.
    pub fn new() -> Self {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs() as u32;

        let unique = PROCESS_UNIQUE.get_or_init(|| rand::thread_rng().gen());
        let counter = COUNTER
            .get_or_init(|| AtomicU32::new(rand::thread_rng().gen_range(0..=COUNTER_MASK)))
            .fetch_add(1, Ordering::Relaxed)
            & COUNTER_MASK;

        let mut bytes = [0u8; 12];
        bytes[..4].copy_from_slice(&secs.to_be_bytes());
        bytes[4..9].copy_from_slice(unique);
        bytes[9..].copy_from_slice(&counter.to_be_bytes()[1..]);
        Self(bytes)
    }

    /// Parse the 24 character hex form.
    pub fn parse_str(input: &str) -> Result<Self, ObjectIdError> {
        let invalid = || ObjectIdError {
            input: input.to_string(),
        };

        if input.len() != HEX_LEN || !input.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let mut bytes = [0u8; 12];
        for (i, byte) in bytes.iter_mut().enumerate() {
            *byte = u8::from_str_radix(&input[i * 2..i * 2 + 2], 16).map_err(|_| invalid())?;
        }
        Ok(Self(bytes))
    }

    /// Seconds since the Unix epoch at which this id was minted.
    pub fn timestamp(&self) -> u32 {
        u32::from_be_bytes([self.0[0], self.0[1], self.0[2], self.0[3]])
    }

    /// Lowercase hex form.
    pub fn to_hex(&self) -> String {
        self.to_string()
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in self.0 {
            write!(f, "{:02x}", b)?;
        }
        Ok(())
    }
}

impl FromStr for ObjectId {
    type Err = ObjectIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

impl Serialize for ObjectId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for ObjectId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse_str(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_parse_valid() {
        let id = ObjectId::parse_str("63f6fa23925a8e8f91cc0855").unwrap();
        assert_eq!(id.to_string(), "63f6fa23925a8e8f91cc0855");
        assert_eq!(id.timestamp(), 0x63f6fa23);
    }

    #[test]
    fn test_parse_uppercase_renders_lowercase() {
        let id: ObjectId = "63F6FA23925A8E8F91CC0855".parse().unwrap();
        assert_eq!(id.to_hex(), "63f6fa23925a8e8f91cc0855");
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        for input in [
            "",
            "abc",
            "63f6fa23925a8e8f91cc085",
            "63f6fa23925a8e8f91cc08555",
            "63f6fa23925a8e8f91cc085z",
            "+3f6fa23925a8e8f91cc0855",
            "not-an-id-not-an-id-1234",
            "é3f6fa23925a8e8f91cc085",
        ] {
            let err = ObjectId::parse_str(input).unwrap_err();
            assert!(err.to_string().contains("24 character hex string"), "{input}");
        }
    }

    #[test]
    fn test_generated_ids_are_unique() {
        let ids: Vec<ObjectId> = (0..1000).map(|_| ObjectId::new()).collect();
        let unique: HashSet<_> = ids.iter().collect();
        assert_eq!(unique.len(), ids.len());

        let first = ids.first().unwrap();
        let last = ids.last().unwrap();
        assert!(first.timestamp() <= last.timestamp());
    }

    #[test]
    fn test_generated_id_round_trips_through_hex() {
        let id = ObjectId::new();
        let hex = id.to_hex();
        assert_eq!(hex.len(), HEX_LEN);
        assert!(hex.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert_eq!(ObjectId::parse_str(&hex).unwrap(), id);
    }

    #[test]
    fn test_serde_as_string() {
        let id = ObjectId::parse_str("63f6fa23925a8e8f91cc0855").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"63f6fa23925a8e8f91cc0855\"");
        let back: ObjectId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
        assert!(serde_json::from_str::<ObjectId>("\"nope\"").is_err());
    }
}
