//! Key normalization: case conversion, renaming and removal
//!
//! Each stage works on a copy of the record. The record-level functions
//! take a [`Record`] directly; the value-level variants accept any JSON value
//! and reject non-objects with [`Error::InvalidArgument`].

use crate::error::{Error, Result};
use crate::types::Record;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

const EXPECTED_OBJECT: &str = "an object";

/// Convert a camelCase or PascalCase key to snake_case
///
/// `ABCWord` -> `abc_word`, `createdBy` -> `created_by`, `v1Id` -> `v1_id`,
/// `asset-name` -> `asset_name`.
pub fn to_snake_case(key: &str) -> String {
    static ACRONYM: OnceLock<Regex> = OnceLock::new();
    static BOUNDARY: OnceLock<Regex> = OnceLock::new();
    let acronym = ACRONYM.get_or_init(|| Regex::new(r"([A-Z]+)([A-Z][a-z])").expect("valid acronym pattern"));
    let boundary = BOUNDARY.get_or_init(|| Regex::new(r"([a-z\d])([A-Z])").expect("valid boundary pattern"));

    let word = acronym.replace_all(key, "${1}_${2}");
    let word = boundary.replace_all(&word, "${1}_${2}");
    word.replace('-', "_").to_lowercase()
}

/// A single `old -> new` key rename
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyRename {
    pub from: String,
    pub to: String,
}

impl KeyRename {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

impl<A: Into<String>, B: Into<String>> From<(A, B)> for KeyRename {
    fn from((from, to): (A, B)) -> Self {
        Self::new(from, to)
    }
}

impl FromStr for KeyRename {
    type Err = Error;

    /// Parse an `old=new` pair
    fn from_str(s: &str) -> Result<Self> {
        match s.split_once('=') {
            Some((from, to)) if !from.trim().is_empty() && !to.trim().is_empty() => {
                Ok(Self::new(from.trim(), to.trim()))
            }
            _ => Err(Error::configuration(format!(
                "Invalid rename '{}', expected OLD=NEW",
                s
            ))),
        }
    }
}

impl fmt::Display for KeyRename {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.from, self.to)
    }
}

/// Snake-case every key; colliding keys are last-write-wins
pub fn normalize_key_case(record: &Record) -> Record {
    record
        .iter()
        .map(|(key, value)| (to_snake_case(key), value.clone()))
        .collect()
}

/// Move values from each rename's source key to its destination key
///
/// A missing source yields `null` at the destination, unless `suppress_null`
/// is set, in which case null or missing values are not inserted at all.
pub fn rename_record_keys(record: &Record, renames: &[KeyRename], suppress_null: bool) -> Record {
    let mut renamed = record.clone();
    rename_in_place(&mut renamed, renames, suppress_null);
    renamed
}

pub(crate) fn rename_in_place(record: &mut Record, renames: &[KeyRename], suppress_null: bool) {
    for rename in renames {
        let value = record.shift_remove(&rename.from).unwrap_or(Value::Null);
        if suppress_null && value.is_null() {
            continue;
        }
        record.insert(rename.to.clone(), value);
    }
}

/// Drop the listed keys, borrowing the input when none of them are present
pub fn remove_record_keys<'a, S: AsRef<str>>(record: &'a Record, keys: &[S]) -> Cow<'a, Record> {
    if !keys.iter().any(|key| record.contains_key(key.as_ref())) {
        return Cow::Borrowed(record);
    }
    let mut trimmed = record.clone();
    remove_in_place(&mut trimmed, keys);
    Cow::Owned(trimmed)
}

pub(crate) fn remove_in_place<S: AsRef<str>>(record: &mut Record, keys: &[S]) {
    for key in keys {
        record.shift_remove(key.as_ref());
    }
}

/// Snake-case the keys of a JSON object
pub fn normalize_keys(data: &Value) -> Result<Value> {
    let record = expect_object(data)?;
    Ok(Value::Object(normalize_key_case(record)))
}

/// Apply renames to a JSON object
pub fn rename_keys(data: &Value, renames: &[KeyRename], suppress_null: bool) -> Result<Value> {
    let record = expect_object(data)?;
    if record.is_empty() || renames.is_empty() {
        return Ok(data.clone());
    }
    Ok(Value::Object(rename_record_keys(record, renames, suppress_null)))
}

/// Remove keys from a JSON object
pub fn remove_keys<'a, S: AsRef<str>>(data: &'a Value, keys: &[S]) -> Result<Cow<'a, Value>> {
    let record = expect_object(data)?;
    Ok(match remove_record_keys(record, keys) {
        Cow::Borrowed(_) => Cow::Borrowed(data),
        Cow::Owned(trimmed) => Cow::Owned(Value::Object(trimmed)),
    })
}

fn expect_object(data: &Value) -> Result<&Record> {
    data.as_object()
        .ok_or_else(|| Error::invalid_argument(data, EXPECTED_OBJECT))
}
