//! Timestamp wire format.
//!
//! Instants are stored in UTC as RFC 3339. Instants RFC 3339 cannot express
//! (negative years) use ISO 8601 with a six-digit year instead, so every
//! `OffsetDateTime` the store holds can be written and read back.

use serde::{Deserialize, Deserializer, Serializer};
use time::format_description::well_known::{Iso8601, Rfc3339};
use time::{OffsetDateTime, UtcOffset};

/// Same instant in UTC. Falls back to the original offset when the shifted
/// date would leave the representable range.
pub fn to_utc(value: OffsetDateTime) -> OffsetDateTime {
    value.checked_to_offset(UtcOffset::UTC).unwrap_or(value)
}

fn fits_rfc3339(value: OffsetDateTime) -> bool {
    value.offset().seconds_past_minute() == 0 && (0..=9999).contains(&value.year())
}

fn parse(raw: &str) -> Result<OffsetDateTime, time::error::Parse> {
    OffsetDateTime::parse(raw, &Rfc3339)
        .or_else(|_| OffsetDateTime::parse(raw, &Iso8601::PARSING))
}

pub fn serialize<S: Serializer>(
    value: &OffsetDateTime,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let value = to_utc(*value);
    if fits_rfc3339(value) {
        time::serde::rfc3339::serialize(&value, serializer)
    } else {
        time::serde::iso8601::serialize(&value, serializer)
    }
}

pub fn deserialize<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<OffsetDateTime, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse(&raw).map_err(serde::de::Error::custom)
}

pub mod option {
    use serde::{Deserialize, Deserializer, Serializer};
    use time::OffsetDateTime;

    pub fn serialize<S: Serializer>(
        value: &Option<OffsetDateTime>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(value) => super::serialize(value, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<OffsetDateTime>, D::Error> {
        Option::<String>::deserialize(deserializer)?
            .map(|raw| super::parse(&raw).map_err(serde::de::Error::custom))
            .transpose()
    }
}
