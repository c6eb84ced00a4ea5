//! Field value converters
//!
//! A converter is a pure function from a raw field value to the value the
//! target type expects. Converters are registered by key in a
//! [`ConverterRegistry`] and selected per field by the [`ConverterResolver`]
//! from the field's declared type names and the value's runtime type.
//!
//! # Examples
//!
//! ```
//! use datamap_core::mapping::converter::{Converter, ConverterRegistry};
//! use serde_json::json;
//!
//! let mut registry = ConverterRegistry::with_builtins();
//! registry.register_fn("str_int", |value| {
//!     Ok(match value.as_str() {
//!         Some("") => json!(0),
//!         Some(s) => s.parse::<i64>().map(|n| json!(n)).unwrap_or_else(|_| value.clone()),
//!         None => value.clone(),
//!     })
//! });
//!
//! let converter = registry.get("STR_INT").unwrap();
//! assert_eq!(converter.convert(&json!("")).unwrap(), json!(0));
//! ```
//!
//! Copyright (c) 2025 Datamap Team
//! Licensed under the Apache-2.0 license

pub mod built_in;
pub mod registry;
pub mod resolver;

pub use registry::ConverterRegistry;
pub use resolver::{converter_keys, resolve_converter, ConverterResolver};

use crate::Result;
use serde_json::Value;
use std::fmt;
use std::sync::{Arc, OnceLock};

type ConvertFn = dyn Fn(&Value) -> Result<Value> + Send + Sync;

/// A named, shareable conversion function
#[derive(Clone)]
pub struct Converter {
    name: Arc<str>,
    func: Arc<ConvertFn>,
}

impl Converter {
    pub fn new<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&Value) -> Result<Value> + Send + Sync + 'static,
    {
        Self {
            name: Arc::from(name.into()),
            func: Arc::new(func),
        }
    }

    /// The fallback converter, returning its input unchanged
    pub fn identity() -> Self {
        static IDENTITY: OnceLock<Converter> = OnceLock::new();
        IDENTITY
            .get_or_init(|| Converter::new(built_in::IDENTITY, |value| Ok(value.clone())))
            .clone()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_identity(&self) -> bool {
        self.same_as(&Self::identity())
    }

    /// True if both handles share the same underlying function
    pub fn same_as(&self, other: &Converter) -> bool {
        Arc::ptr_eq(&self.func, &other.func)
    }

    pub fn convert(&self, value: &Value) -> Result<Value> {
        (self.func)(value)
    }
}

impl fmt::Debug for Converter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Converter").field("name", &self.name).finish()
    }
}
