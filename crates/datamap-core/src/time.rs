//! Epoch timestamp parsing used by the built-in `int_datetime` converter
//!
//! Upstream sources emit epoch values in seconds or milliseconds with no
//! unit marker. An integer is read as seconds first; when that lands outside
//! the calendar range (years 1 to 9999) it is read again as milliseconds.

use crate::error::{Error, Result};
use chrono::{DateTime, Datelike, FixedOffset, Offset, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

const MIN_YEAR: i32 = 1;
const MAX_YEAR: i32 = 9999;

/// Name under which the timestamp converter reports errors
pub const PARSE_TIMESTAMP: &str = "parse_timestamp";

/// Reference offset timestamps are rendered in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimestampConfig {
    offset: FixedOffset,
}

impl TimestampConfig {
    /// Render timestamps in UTC
    pub fn utc() -> Self {
        Self { offset: Utc.fix() }
    }

    /// Render timestamps at a fixed offset from UTC
    pub fn with_offset(offset: FixedOffset) -> Self {
        Self { offset }
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }
}

impl Default for TimestampConfig {
    fn default() -> Self {
        Self::utc()
    }
}

impl FromStr for TimestampConfig {
    type Err = Error;

    /// Accepts `UTC`, `Z`, or a `%z`-style offset such as `+01:00`
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("utc") || trimmed.eq_ignore_ascii_case("z") {
            return Ok(Self::utc());
        }
        trimmed
            .parse::<FixedOffset>()
            .map(Self::with_offset)
            .map_err(|e| Error::configuration(format!("Invalid timezone offset '{}': {}", s, e)))
    }
}

impl TryFrom<String> for TimestampConfig {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<TimestampConfig> for String {
    fn from(config: TimestampConfig) -> Self {
        config.to_string()
    }
}

impl fmt::Display for TimestampConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.offset.local_minus_utc() == 0 {
            write!(f, "UTC")
        } else {
            write!(f, "{}", self.offset)
        }
    }
}

/// Interpret an epoch integer, seconds first and milliseconds as fallback
pub fn timestamp_to_datetime(raw: i64, config: &TimestampConfig) -> Result<DateTime<FixedOffset>> {
    let utc = DateTime::<Utc>::from_timestamp(raw, 0)
        .filter(in_calendar_range)
        .or_else(|| DateTime::<Utc>::from_timestamp_millis(raw).filter(in_calendar_range))
        .ok_or_else(|| {
            Error::conversion(
                PARSE_TIMESTAMP,
                format!("{} is out of range as seconds and as milliseconds since the epoch", raw),
                Some(Value::from(raw)),
            )
        })?;
    Ok(utc.with_timezone(&config.offset))
}

/// Convert an integer JSON value into an RFC 3339 timestamp string
///
/// Anything that is not an integer is returned unchanged.
pub fn parse_timestamp(value: &Value, config: &TimestampConfig) -> Result<Value> {
    let Value::Number(number) = value else {
        return Ok(value.clone());
    };
    if !(number.is_i64() || number.is_u64()) {
        return Ok(value.clone());
    }
    let raw = number.as_i64().ok_or_else(|| {
        Error::conversion(
            PARSE_TIMESTAMP,
            format!("{} does not fit a 64-bit epoch value", number),
            Some(value.clone()),
        )
    })?;

    let datetime = timestamp_to_datetime(raw, config)?;
    Ok(Value::String(datetime.to_rfc3339_opts(SecondsFormat::AutoSi, true)))
}

fn in_calendar_range(datetime: &DateTime<Utc>) -> bool {
    (MIN_YEAR..=MAX_YEAR).contains(&datetime.year())
}
