//! Property-based testing strategies for generating test data
//!
//! This module provides proptest strategies for generating random
//! record trees as they arrive from external sources.

#![cfg(test)]

use crate::types::Record;
use proptest::collection::{hash_map, vec};
use proptest::prelude::*;
use serde_json::Value;

/// Lower-case keys, so camel-case merged paths never collide
pub fn key_strategy() -> impl Strategy<Value = String> {
    "[a-z]{1,6}"
}

/// Strategy for generating non-record values
pub fn leaf_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        "[a-zA-Z0-9 ]{0,12}".prop_map(Value::String),
        vec(any::<i32>().prop_map(Value::from), 0..3).prop_map(Value::Array),
    ]
}

/// Strategy for generating values that may nest records a few levels deep
pub fn value_tree_strategy() -> impl Strategy<Value = Value> {
    leaf_strategy().prop_recursive(3, 32, 4, |inner| {
        hash_map(key_strategy(), inner, 0..4)
            .prop_map(|entries| Value::Object(entries.into_iter().collect()))
    })
}

/// Strategy for generating top-level records
pub fn record_strategy() -> impl Strategy<Value = Record> {
    hash_map(key_strategy(), value_tree_strategy(), 0..6)
        .prop_map(|entries| entries.into_iter().collect())
}

/// Number of non-record values reachable from a record
pub fn count_leaves(record: &Record) -> usize {
    record
        .values()
        .map(|value| match value {
            Value::Object(nested) => count_leaves(nested),
            _ => 1,
        })
        .sum()
}
