//! Keyed converter storage

use super::{built_in, Converter};
use crate::error::Result;
use crate::time::TimestampConfig;
use serde_json::Value;
use std::collections::HashMap;

/// Converters keyed by lower-cased lookup key
#[derive(Debug, Clone, Default)]
pub struct ConverterRegistry {
    converters: HashMap<String, Converter>,
}

impl ConverterRegistry {
    /// An empty registry with no built-ins
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry seeded with `int_datetime`, rendering timestamps in UTC
    pub fn with_builtins() -> Self {
        Self::with_timestamp_config(TimestampConfig::default())
    }

    /// A registry seeded with `int_datetime` at the given reference offset
    pub fn with_timestamp_config(config: TimestampConfig) -> Self {
        let mut registry = Self::new();
        registry.register(built_in::INT_DATETIME, built_in::timestamp(config));
        registry
    }

    /// Register a converter; the key is lower-cased and replaces any previous entry
    pub fn register(&mut self, key: impl AsRef<str>, converter: Converter) -> Option<Converter> {
        self.converters.insert(key.as_ref().to_lowercase(), converter)
    }

    /// Register a closure, named after its key
    pub fn register_fn<F>(&mut self, key: impl AsRef<str>, func: F) -> Option<Converter>
    where
        F: Fn(&Value) -> Result<Value> + Send + Sync + 'static,
    {
        let key = key.as_ref().to_lowercase();
        let converter = Converter::new(key.clone(), func);
        self.converters.insert(key, converter)
    }

    pub fn get(&self, key: &str) -> Option<&Converter> {
        self.converters
            .get(key)
            .or_else(|| self.converters.get(&key.to_lowercase()))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.converters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.converters.is_empty()
    }

    /// Registered keys, sorted
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.converters.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }
}
