//! Snowflake ID - 64-bit time-ordered identifier used for every entity
//!
//! Layout:
//! - Bits 63-22: milliseconds since [`Snowflake::EPOCH`]
//! - Bits 21-12: worker ID (0-1023)
//! - Bits 11-0:  per-millisecond sequence (0-4095)

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Entity identifier stored as BIGINT and exposed as a string in JSON
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Snowflake(i64);

impl Snowflake {
    /// 2024-01-01 00:00:00 UTC in milliseconds
    pub const EPOCH: i64 = 1_704_067_200_000;

    const WORKER_BITS: i64 = 10;
    const SEQUENCE_BITS: i64 = 12;
    const SEQUENCE_MASK: i64 = (1 << Self::SEQUENCE_BITS) - 1;

    #[inline]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    #[inline]
    pub const fn into_inner(self) -> i64 {
        self.0
    }

    /// Milliseconds since the Unix epoch at which this id was minted
    #[inline]
    pub fn timestamp(&self) -> i64 {
        (self.0 >> (Self::WORKER_BITS + Self::SEQUENCE_BITS)) + Self::EPOCH
    }

    #[inline]
    pub fn worker_id(&self) -> u16 {
        ((self.0 >> Self::SEQUENCE_BITS) & ((1 << Self::WORKER_BITS) - 1)) as u16
    }

    #[inline]
    pub fn sequence(&self) -> u16 {
        (self.0 & Self::SEQUENCE_MASK) as u16
    }
}

/// Error returned when a path or body value is not a valid id
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid id format")]
pub struct SnowflakeParseError;

impl FromStr for Snowflake {
    type Err = SnowflakeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i64>()
            .ok()
            .filter(|v| *v > 0)
            .map(Snowflake)
            .ok_or(SnowflakeParseError)
    }
}

impl fmt::Display for Snowflake {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for Snowflake {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl From<Snowflake> for i64 {
    fn from(id: Snowflake) -> Self {
        id.0
    }
}

impl Serialize for Snowflake {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Snowflake {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Int(i64),
            Str(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Int(v) => Ok(Snowflake(v)),
            Raw::Str(s) => s.parse().map_err(serde::de::Error::custom),
        }
    }
}

/// Lock-free id generator, one per process (worker)
pub struct SnowflakeGenerator {
    worker_id: u16,
    state: AtomicI64,
}

impl SnowflakeGenerator {
    /// # Panics
    /// Panics if `worker_id >= 1024`
    pub fn new(worker_id: u16) -> Self {
        assert!(worker_id < 1024, "Worker ID must be < 1024");
        Self {
            worker_id,
            state: AtomicI64::new(0),
        }
    }

    /// Generate a new unique id.
    ///
    /// `state` packs `(elapsed_ms << 12) | sequence`; a CAS loop bumps it so two
    /// threads can never observe the same pair.
    pub fn generate(&self) -> Snowflake {
        loop {
            let now = Self::elapsed_ms();
            let current = self.state.load(Ordering::Acquire);
            let last_ms = current >> Snowflake::SEQUENCE_BITS;

            let next = if now > last_ms {
                now << Snowflake::SEQUENCE_BITS
            } else if (current & Snowflake::SEQUENCE_MASK) < Snowflake::SEQUENCE_MASK {
                current + 1
            } else {
                // sequence exhausted for this millisecond (or clock went back)
                (last_ms + 1) << Snowflake::SEQUENCE_BITS
            };

            if self
                .state
                .compare_exchange(current, next, Ordering::AcqRel, Ordering::Relaxed)
                .is_ok()
            {
                let ms = next >> Snowflake::SEQUENCE_BITS;
                let seq = next & Snowflake::SEQUENCE_MASK;
                return Snowflake(
                    (ms << (Snowflake::WORKER_BITS + Snowflake::SEQUENCE_BITS))
                        | (i64::from(self.worker_id) << Snowflake::SEQUENCE_BITS)
                        | seq,
                );
            }
        }
    }

    pub fn worker_id(&self) -> u16 {
        self.worker_id
    }

    fn elapsed_ms() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as i64)
            .unwrap_or(Snowflake::EPOCH)
            - Snowflake::EPOCH
    }
}

impl Default for SnowflakeGenerator {
    fn default() -> Self {
        Self::new(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generated_ids_are_unique_and_ordered() {
        let generator = SnowflakeGenerator::new(3);
        let ids: Vec<Snowflake> = (0..10_000).map(|_| generator.generate()).collect();

        let unique: HashSet<_> = ids.iter().copied().collect();
        assert_eq!(unique.len(), ids.len());
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
        assert!(ids.iter().all(|id| id.worker_id() == 3));
    }

    #[test]
    fn test_timestamp_is_recent() {
        let id = SnowflakeGenerator::default().generate();
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_millis() as i64;
        assert!((now - id.timestamp()).abs() < 5_000);
    }

    #[test]
    fn test_parse() {
        assert_eq!("42".parse::<Snowflake>().unwrap(), Snowflake::new(42));
        assert!("abc".parse::<Snowflake>().is_err());
        assert!("0".parse::<Snowflake>().is_err());
        assert!("-5".parse::<Snowflake>().is_err());
    }

    #[test]
    fn test_json_uses_strings() {
        let id = Snowflake::new(1_234_567_890_123);
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"1234567890123\"");

        let from_str: Snowflake = serde_json::from_str("\"77\"").unwrap();
        let from_int: Snowflake = serde_json::from_str("77").unwrap();
        assert_eq!(from_str, from_int);
    }
}
