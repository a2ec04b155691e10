//! Serde helpers for contest-relative durations.
//!
//! Contest-relative offsets (submission time, freeze time, contest length)
//! are `std::time::Duration` in memory and whole milliseconds on the wire,
//! one canonical unit for every field.

use std::time::Duration;

pub mod duration_ms {
    use super::*;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let ms = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(ms))
    }
}

pub mod opt_duration_ms {
    use super::*;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<Duration>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(d) => serializer.serialize_some(&(d.as_millis() as u64)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Duration>, D::Error> {
        let ms = Option::<u64>::deserialize(deserializer)?;
        Ok(ms.map(Duration::from_millis))
    }
}

/// Round a duration down to a whole minute.
pub fn down_to_minute(d: Duration) -> Duration {
    Duration::from_secs(d.as_secs() / 60 * 60)
}

/// Round a duration up to a whole minute.
pub fn up_to_minute(d: Duration) -> Duration {
    let down = down_to_minute(d);
    if down == d {
        down
    } else {
        down + Duration::from_secs(60)
    }
}
