//! Built-in converters
//!
//! `int_datetime` is the only converter seeded into every registry. The
//! string/number/boolean converters are opt-in and can be registered under
//! any key, either directly or by name through [`by_name`].
//!
//! Copyright (c) 2025 Datamap Team
//! Licensed under the Apache-2.0 license

use super::Converter;
use crate::error::Error;
use crate::time::{self, TimestampConfig};
use serde_json::{Number, Value};

/// Registry key of the epoch timestamp converter
pub const INT_DATETIME: &str = "int_datetime";

pub const IDENTITY: &str = "identity";
pub const STRING_TO_NUMBER: &str = "string_to_number";
pub const STRING_TO_INTEGER: &str = "string_to_integer";
pub const STRING_TO_BOOLEAN: &str = "string_to_boolean";
pub const NUMBER_TO_STRING: &str = "number_to_string";

/// Epoch seconds or milliseconds to an RFC 3339 string
pub fn timestamp(config: TimestampConfig) -> Converter {
    Converter::new(time::PARSE_TIMESTAMP, move |value| time::parse_timestamp(value, &config))
}

/// Returns its input unchanged
pub fn identity() -> Converter {
    Converter::identity()
}

/// `"0.7"` -> `0.7`
pub fn string_to_number() -> Converter {
    Converter::new(STRING_TO_NUMBER, |value| {
        let Some(s) = value.as_str() else {
            return Ok(value.clone());
        };
        let parsed = s
            .trim()
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .ok_or_else(|| rejected(STRING_TO_NUMBER, "number", value))?;
        Ok(Value::Number(parsed))
    })
}

/// `"42"` -> `42`; the empty string becomes `0`
pub fn string_to_integer() -> Converter {
    Converter::new(STRING_TO_INTEGER, |value| {
        let Some(s) = value.as_str() else {
            return Ok(value.clone());
        };
        let s = s.trim();
        if s.is_empty() {
            return Ok(Value::from(0));
        }
        s.parse::<i64>()
            .map(Value::from)
            .map_err(|_| rejected(STRING_TO_INTEGER, "integer", value))
    })
}

/// `"yes"`, `"on"`, `"1"`, `"true"` and their negatives, case-insensitive
pub fn string_to_boolean() -> Converter {
    Converter::new(STRING_TO_BOOLEAN, |value| {
        let Some(s) = value.as_str() else {
            return Ok(value.clone());
        };
        match s.trim().to_lowercase().as_str() {
            "true" | "yes" | "1" | "on" => Ok(Value::Bool(true)),
            "false" | "no" | "0" | "off" => Ok(Value::Bool(false)),
            _ => Err(rejected(STRING_TO_BOOLEAN, "boolean", value)),
        }
    })
}

/// `42` -> `"42"`
pub fn number_to_string() -> Converter {
    Converter::new(NUMBER_TO_STRING, |value| match value {
        Value::Number(n) => Ok(Value::String(n.to_string())),
        other => Ok(other.clone()),
    })
}

/// Look up a built-in converter by its name
pub fn by_name(name: &str, config: TimestampConfig) -> Option<Converter> {
    let converter = match name.to_lowercase().as_str() {
        IDENTITY => identity(),
        INT_DATETIME | time::PARSE_TIMESTAMP => timestamp(config),
        STRING_TO_NUMBER => string_to_number(),
        STRING_TO_INTEGER => string_to_integer(),
        STRING_TO_BOOLEAN => string_to_boolean(),
        NUMBER_TO_STRING => number_to_string(),
        _ => return None,
    };
    Some(converter)
}

/// Names accepted by [`by_name`]
pub fn names() -> &'static [&'static str] {
    &[
        IDENTITY,
        INT_DATETIME,
        STRING_TO_NUMBER,
        STRING_TO_INTEGER,
        STRING_TO_BOOLEAN,
        NUMBER_TO_STRING,
    ]
}

fn rejected(converter: &str, target: &str, value: &Value) -> Error {
    Error::conversion(
        converter,
        format!("cannot convert {} to {}", value, target),
        Some(value.clone()),
    )
}
