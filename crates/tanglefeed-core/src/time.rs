//! Sample timestamps.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// A point in time, in milliseconds since the Unix epoch.
///
/// Accepted on the wire as a JSON integer or as a string of decimal digits.
/// Always serialized as an integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize)]
#[serde(transparent)]
pub struct Timestamp(pub u64);

impl Timestamp {
    pub fn from_millis(millis: u64) -> Self {
        Self(millis)
    }

    pub fn as_millis(self) -> u64 {
        self.0
    }

    /// The current wall clock time. Clocks before the epoch read as zero.
    pub fn now() -> Self {
        Self::from(SystemTime::now())
    }

    pub fn to_system_time(self) -> SystemTime {
        UNIX_EPOCH + Duration::from_millis(self.0)
    }
}

impl From<SystemTime> for Timestamp {
    fn from(time: SystemTime) -> Self {
        let millis = time
            .duration_since(UNIX_EPOCH)
            .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
            .unwrap_or(0);
        Self(millis)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WireTime {
    Millis(u64),
    Text(String),
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match WireTime::deserialize(deserializer)? {
            WireTime::Millis(millis) => Ok(Self(millis)),
            WireTime::Text(text) => text
                .trim()
                .parse()
                .map(Self)
                .map_err(|_| serde::de::Error::custom(format!("invalid timestamp: {text:?}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_integer_and_string() {
        let a: Timestamp = serde_json::from_str("1700000000000").unwrap();
        let b: Timestamp = serde_json::from_str("\"1700000000000\"").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.as_millis(), 1_700_000_000_000);
    }

    #[test]
    fn rejects_non_numeric_strings() {
        assert!(serde_json::from_str::<Timestamp>("\"yesterday\"").is_err());
        assert!(serde_json::from_str::<Timestamp>("-5").is_err());
    }

    #[test]
    fn system_time_conversion() {
        let ts = Timestamp::from_millis(1_500);
        assert_eq!(ts.to_system_time(), UNIX_EPOCH + Duration::from_millis(1_500));
        assert_eq!(Timestamp::from(ts.to_system_time()), ts);
    }

    #[test]
    fn serializes_as_integer() {
        assert_eq!(serde_json::to_string(&Timestamp(42)).unwrap(), "42");
    }
}
