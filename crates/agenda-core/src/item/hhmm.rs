//! Serde helpers for `HH:MM` clock times.
//!
//! Times are written as 24-hour `HH:MM`. Reading also accepts `HH:MM:SS`
//! and single-digit fields such as `9:5`.

use chrono::NaiveTime;
use serde::{de, Deserialize, Deserializer, Serializer};

const FORMAT: &str = "%H:%M";

/// Parse a clock time in `HH:MM` (or `HH:MM:SS`) form.
pub fn parse(value: &str) -> Option<NaiveTime> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, FORMAT)
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .ok()
}

/// Render a clock time as `HH:MM`.
pub fn format(time: NaiveTime) -> String {
    time.format(FORMAT).to_string()
}

pub fn serialize<S>(value: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format(*value))
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse(&raw).ok_or_else(|| de::Error::custom(format!("invalid HH:MM time: {raw:?}")))
}

pub mod option {
    use chrono::NaiveTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<NaiveTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(time) => serializer.serialize_some(&super::format(*time)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            Some(raw) if raw.trim().is_empty() => Ok(None),
            Some(raw) => super::parse(&raw)
                .map(Some)
                .ok_or_else(|| de::Error::custom(format!("invalid HH:MM time: {raw:?}"))),
            None => Ok(None),
        }
    }
}
