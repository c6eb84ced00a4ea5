//! Record flattening
//!
//! Nested records are collapsed into a single level. Each nested key is
//! merged with its parent path by a pluggable [`KeyMergeStrategy`]; lists
//! and scalars are leaves.

use crate::types::Record;
use regex::Regex;
use serde_json::Value;
use std::fmt::Debug;
use std::sync::OnceLock;

/// Combines a parent path and a child key into a flattened key
pub trait KeyMergeStrategy: Send + Sync + Debug {
    fn merge(&self, parent: Option<&str>, key: &str) -> String;
}

/// `type` + `id` -> `typeId`
#[derive(Debug, Clone, Copy, Default)]
pub struct CamelCaseMerge;

impl KeyMergeStrategy for CamelCaseMerge {
    fn merge(&self, parent: Option<&str>, key: &str) -> String {
        match parent {
            Some(parent) if !parent.is_empty() => format!("{}{}", parent, camelize(key)),
            _ => key.to_string(),
        }
    }
}

/// `type` + `id` -> `type.id` for a `.` separator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelimitedMerge {
    separator: String,
}

impl DelimitedMerge {
    pub fn new(separator: impl Into<String>) -> Self {
        Self {
            separator: separator.into(),
        }
    }

    pub fn separator(&self) -> &str {
        &self.separator
    }
}

impl KeyMergeStrategy for DelimitedMerge {
    fn merge(&self, parent: Option<&str>, key: &str) -> String {
        match parent {
            Some(parent) if !parent.is_empty() => format!("{}{}{}", parent, self.separator, key),
            _ => key.to_string(),
        }
    }
}

/// Split on every non-alphanumeric run and upper-case the first character of
/// each segment: `created_by` -> `CreatedBy`, `source-type` -> `SourceType`
pub fn camelize(word: &str) -> String {
    static SEPARATOR: OnceLock<Regex> = OnceLock::new();
    let separator = SEPARATOR.get_or_init(|| Regex::new(r"[^A-Za-z0-9]+").expect("valid camelize pattern"));
    separator
        .split(word)
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            let mut chars = segment.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

/// Flatten with the default camel-case merge and no parent path
pub fn flatten(record: &Record) -> Record {
    flatten_with(record, None, &CamelCaseMerge)
}

/// Flatten under an optional parent path with a chosen merge strategy
pub fn flatten_with(record: &Record, parent: Option<&str>, strategy: &dyn KeyMergeStrategy) -> Record {
    let mut flat = Record::new();
    flatten_into(&mut flat, record, parent, strategy);
    flat
}

fn flatten_into(out: &mut Record, record: &Record, parent: Option<&str>, strategy: &dyn KeyMergeStrategy) {
    for (key, value) in record {
        let merged = strategy.merge(parent, key);
        match value {
            Value::Object(nested) => flatten_into(out, nested, Some(&merged), strategy),
            leaf => {
                // Later paths overwrite earlier ones; the key keeps its first position
                out.insert(merged, leaf.clone());
            }
        }
    }
}
