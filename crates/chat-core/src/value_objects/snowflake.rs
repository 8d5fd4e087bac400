//! Snowflake ID - 64-bit time-ordered identifier for users, groups and messages
//!
//! Structure:
//! - Bits 63-22: Timestamp (milliseconds since custom epoch)
//! - Bits 21-12: Worker ID (0-1023)
//! - Bits 11-0:  Sequence number (0-4095)

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Highest worker id that fits in the 10 worker bits
pub const MAX_WORKER_ID: u16 = 1023;

/// Time-ordered 64-bit identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Snowflake(i64);

impl Snowflake {
    /// Custom epoch: 2024-01-01 00:00:00 UTC (milliseconds)
    pub const EPOCH: i64 = 1_704_067_200_000;

    #[inline]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    #[inline]
    pub const fn into_inner(self) -> i64 {
        self.0
    }

    /// Milliseconds since the Unix epoch at which the id was minted
    #[inline]
    pub fn timestamp(&self) -> i64 {
        (self.0 >> 22) + Self::EPOCH
    }

    #[inline]
    pub fn worker_id(&self) -> u16 {
        ((self.0 >> 12) & 0x3FF) as u16
    }

    /// Parse from the decimal string form used on the wire
    pub fn parse(s: &str) -> Result<Self, SnowflakeParseError> {
        s.trim()
            .parse::<i64>()
            .map(Snowflake)
            .map_err(|_| SnowflakeParseError::InvalidFormat)
    }
}

/// Error when parsing a Snowflake from string
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SnowflakeParseError {
    #[error("invalid snowflake format")]
    InvalidFormat,
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

impl std::str::FromStr for Snowflake {
    type Err = SnowflakeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Snowflake::parse(s)
    }
}

// Serialized as a string so browser clients never lose precision
impl Serialize for Snowflake {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for Snowflake {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};

        struct SnowflakeVisitor;

        impl Visitor<'_> for SnowflakeVisitor {
            type Value = Snowflake;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a string or integer user/group/message id")
            }

            fn visit_i64<E: de::Error>(self, value: i64) -> Result<Snowflake, E> {
                Ok(Snowflake(value))
            }

            fn visit_u64<E: de::Error>(self, value: u64) -> Result<Snowflake, E> {
                i64::try_from(value)
                    .map(Snowflake)
                    .map_err(|_| de::Error::custom("snowflake out of range"))
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<Snowflake, E> {
                Snowflake::parse(value).map_err(|_| de::Error::custom("invalid snowflake string"))
            }
        }

        deserializer.deserialize_any(SnowflakeVisitor)
    }
}

/// Thread-safe Snowflake generator, up to 4096 ids per millisecond per worker.
pub struct SnowflakeGenerator {
    worker_id: u16,
    sequence: AtomicI64,
    last_timestamp: AtomicI64,
}

impl SnowflakeGenerator {
    /// Create a generator; worker ids above [`MAX_WORKER_ID`] are masked into range.
    pub fn new(worker_id: u16) -> Self {
        Self {
            worker_id: worker_id & MAX_WORKER_ID,
            sequence: AtomicI64::new(0),
            last_timestamp: AtomicI64::new(0),
        }
    }

    pub fn generate(&self) -> Snowflake {
        loop {
            let mut timestamp = current_millis();
            let last = self.last_timestamp.load(Ordering::Acquire);

            // Never hand out ids from the past if the clock stepped backwards
            if timestamp < last {
                timestamp = last;
            }

            let sequence = if timestamp == last {
                let seq = self.sequence.fetch_add(1, Ordering::Relaxed) & 0xFFF;
                if seq == 0 {
                    while current_millis() <= last {
                        std::hint::spin_loop();
                    }
                    timestamp = current_millis();
                    self.sequence.store(1, Ordering::Relaxed);
                    0
                } else {
                    seq
                }
            } else {
                self.sequence.store(1, Ordering::Relaxed);
                0
            };

            if self
                .last_timestamp
                .compare_exchange(last, timestamp, Ordering::Release, Ordering::Relaxed)
                .is_ok()
            {
                let id = ((timestamp - Snowflake::EPOCH) << 22)
                    | (i64::from(self.worker_id) << 12)
                    | sequence;
                return Snowflake::new(id);
            }
        }
    }

    pub fn worker_id(&self) -> u16 {
        self.worker_id
    }
}

impl Default for SnowflakeGenerator {
    fn default() -> Self {
        Self::new(0)
    }
}

impl fmt::Debug for SnowflakeGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnowflakeGenerator")
            .field("worker_id", &self.worker_id)
            .finish_non_exhaustive()
    }
}

#[inline]
fn current_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}
