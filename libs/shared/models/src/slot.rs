use std::fmt;

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Opaque slot identifier: `slot-<provider_id>-<epoch_millis_utc>`.
///
/// The identifier is the only channel carrying slot timing between the
/// availability response and a booking request; there is no server-side slot
/// table. Encode and decode are exact inverses for every future instant
/// representable in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SlotId {
    raw: String,
    start: DateTime<Utc>,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid slot ID format: {0}")]
pub struct MalformedSlotId(pub String);

impl SlotId {
    pub fn new(provider_id: &str, start: DateTime<Utc>) -> Self {
        Self {
            raw: format!("slot-{}-{}", provider_id, start.timestamp_millis()),
            start,
        }
    }

    /// The timestamp is always the *last* `-`-separated segment, so provider
    /// ids containing the delimiter (e.g. `provider-1`) still decode.
    pub fn parse(raw: &str) -> Result<Self, MalformedSlotId> {
        if raw.split('-').count() < 3 {
            return Err(MalformedSlotId(raw.to_string()));
        }

        let (_, trailing) = raw
            .rsplit_once('-')
            .ok_or_else(|| MalformedSlotId(raw.to_string()))?;

        let millis: i64 = trailing
            .parse()
            .map_err(|_| MalformedSlotId(raw.to_string()))?;

        let start = DateTime::from_timestamp_millis(millis)
            .ok_or_else(|| MalformedSlotId(raw.to_string()))?;

        Ok(Self {
            raw: raw.to_string(),
            start,
        })
    }

    /// UTC start instant encoded in the identifier.
    pub fn start_time(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
