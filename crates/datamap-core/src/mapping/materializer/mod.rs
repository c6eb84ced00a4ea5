//! Record materialization
//!
//! The [`Materializer`] turns raw records into typed records. A single record
//! goes through optional flattening, key normalization, renames and removals,
//! target type resolution, per-field conversion and construction. Arrays are
//! materialized eagerly; arbitrary iterators lazily, one element per pull.
//!
//! # Examples
//!
//! ```
//! use datamap_core::{FieldDescriptor, MaterializeOptions, Materializer, TargetType};
//! use serde_json::json;
//!
//! let materializer = Materializer::new();
//! let options = MaterializeOptions::builder()
//!     .target_type(TargetType::dynamic(
//!         "Attribute",
//!         vec![FieldDescriptor::new("created_on", "Optional[datetime]")],
//!     ))
//!     .flatten(true)
//!     .build()
//!     .unwrap();
//!
//! let result = materializer
//!     .materialize(&json!({"createdOn": 1668629719, "type": {"id": "1"}}), &options)
//!     .unwrap();
//!
//! assert_eq!(
//!     result.to_value(),
//!     json!({"created_on": "2022-11-16T20:15:19Z", "type_id": "1"})
//! );
//! ```
//!
//! Copyright (c) 2025 Datamap Team
//! Licensed under the Apache-2.0 license

pub mod options;

#[cfg(test)]
mod tests;

pub use options::{MaterializeOptions, MaterializeOptionsBuilder, DEFAULT_DISCRIMINATOR_KEY};

use crate::error::{json_kind, Error, Result};
use crate::mapping::converter::{Converter, ConverterRegistry, ConverterResolver};
use crate::mapping::flatten::flatten_with;
use crate::mapping::keys::{normalize_key_case, remove_in_place, rename_in_place};
use crate::mapping::namespace::NamespaceCatalog;
use crate::types::{Mappable, Materialized, Record, TargetType};
use anyhow::anyhow;
use serde_json::Value;
use tracing::{debug, trace, warn};

/// Mapping engine state: converters, the resolution cache and known namespaces
#[derive(Debug)]
pub struct Materializer {
    registry: ConverterRegistry,
    resolver: ConverterResolver,
    catalog: NamespaceCatalog,
}

impl Materializer {
    /// A materializer with the built-in converters and an empty catalog
    pub fn new() -> Self {
        Self::with_registry(ConverterRegistry::with_builtins())
    }

    pub fn with_registry(registry: ConverterRegistry) -> Self {
        Self {
            registry,
            resolver: ConverterResolver::new(),
            catalog: NamespaceCatalog::new(),
        }
    }

    pub fn with_catalog(mut self, catalog: NamespaceCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn registry(&self) -> &ConverterRegistry {
        &self.registry
    }

    /// Mutable registry access; cached resolutions are kept until
    /// [`ConverterResolver::clear_cache`]
    pub fn registry_mut(&mut self) -> &mut ConverterRegistry {
        &mut self.registry
    }

    pub fn register_converter(&mut self, key: impl AsRef<str>, converter: Converter) -> &mut Self {
        self.registry.register(key, converter);
        self
    }

    pub fn resolver(&self) -> &ConverterResolver {
        &self.resolver
    }

    pub fn catalog(&self) -> &NamespaceCatalog {
        &self.catalog
    }

    pub fn catalog_mut(&mut self) -> &mut NamespaceCatalog {
        &mut self.catalog
    }

    /// Materialize an object or an array of objects
    pub fn materialize(&self, data: &Value, options: &MaterializeOptions) -> Result<Materialized> {
        match data {
            Value::Object(record) => self.materialize_record(record, options),
            Value::Array(_) => self.materialize_collection(data, options).map(Materialized::Many),
            other => Err(Error::invalid_argument(other, "an object or an array")),
        }
    }

    /// Materialize every element of an array, stopping at the first error
    pub fn materialize_collection(&self, data: &Value, options: &MaterializeOptions) -> Result<Vec<Materialized>> {
        let items = data
            .as_array()
            .ok_or_else(|| Error::invalid_argument(data, "an array"))?;

        items
            .iter()
            .map(|item| match item {
                Value::Object(record) => self.materialize_record(record, options),
                other => Err(Error::invalid_argument(other, "an object")),
            })
            .collect()
    }

    /// Lazily materialize each element as it is pulled
    ///
    /// Elements may be objects or arrays of objects.
    pub fn materialize_iter<'a, I>(&'a self, data: I, options: &'a MaterializeOptions) -> MaterializeIter<'a, I::IntoIter>
    where
        I: IntoIterator<Item = Value>,
    {
        MaterializeIter {
            materializer: self,
            options,
            inner: data.into_iter(),
        }
    }

    /// Materialize an object straight into a [`Mappable`] type
    pub fn materialize_as<T: Mappable>(&self, data: &Value, options: &MaterializeOptions) -> Result<T> {
        let record = data
            .as_object()
            .ok_or_else(|| Error::invalid_argument(data, "an object"))?;
        let options = options.to_builder().target::<T>().build()?;

        let typed = match self.materialize_record(record, &options)? {
            Materialized::Typed(typed) => typed,
            Materialized::Record(record) => T::target_type().construct(record)?,
            Materialized::Many(_) => return Err(Error::invalid_argument(data, "an object")),
        };
        typed
            .downcast::<T>()
            .map_err(|typed| anyhow!("materialized '{}' is not a {}", typed.type_name(), T::TYPE_NAME).into())
    }

    /// Run the single-record pipeline
    pub fn materialize_record(&self, record: &Record, options: &MaterializeOptions) -> Result<Materialized> {
        if record.is_empty() {
            return Ok(Materialized::Record(record.clone()));
        }

        let mut normalized = if options.flatten() {
            normalize_key_case(&flatten_with(record, None, options.merge_strategy()))
        } else {
            normalize_key_case(record)
        };
        rename_in_place(&mut normalized, options.rename(), options.suppress_null());
        remove_in_place(&mut normalized, options.remove());

        match self.resolve_target(&normalized, options) {
            Some(target) => {
                let converted = self.convert_fields(&target, normalized)?;
                Ok(Materialized::Typed(target.construct(converted)?))
            }
            None => Ok(Materialized::Record(normalized)),
        }
    }

    fn resolve_target(&self, record: &Record, options: &MaterializeOptions) -> Option<TargetType> {
        if let Some(target) = options.target_type() {
            return Some(target.clone());
        }
        let namespace = options.namespace()?;
        let key = options.discriminator_key();

        let type_name = match record.get(key) {
            None | Some(Value::Null) => {
                warn!(discriminator = key, "No discriminator in record, continuing without a target type");
                return None;
            }
            Some(Value::String(name)) => name,
            Some(other) => {
                warn!(
                    discriminator = key,
                    found = json_kind(other),
                    "Discriminator is not a string, continuing without a target type"
                );
                return None;
            }
        };

        match self
            .catalog
            .resolve(namespace)
            .and_then(|namespace| namespace.lookup(type_name).cloned())
        {
            Ok(target) => {
                debug!(type_name = %type_name, "Discovered target type");
                Some(target)
            }
            Err(e) => {
                warn!(error = %e, "Type discovery failed, continuing without a target type");
                None
            }
        }
    }

    fn convert_fields(&self, target: &TargetType, mut record: Record) -> Result<Record> {
        for field in target.fields() {
            match record.get_mut(&field.name) {
                Some(value) => {
                    let converter = self.resolver.resolve(&self.registry, field, value);
                    if converter.is_identity() {
                        continue;
                    }
                    trace!(field = %field.name, converter = converter.name(), "Converting field");
                    *value = converter.convert(value)?;
                }
                None => {
                    if let Some(default) = &field.default {
                        record.insert(field.name.clone(), default.clone());
                    }
                }
            }
        }
        Ok(record)
    }
}

impl Default for Materializer {
    fn default() -> Self {
        Self::new()
    }
}

/// Lazy iterator returned by [`Materializer::materialize_iter`]
pub struct MaterializeIter<'a, I> {
    materializer: &'a Materializer,
    options: &'a MaterializeOptions,
    inner: I,
}

impl<I: Iterator<Item = Value>> Iterator for MaterializeIter<'_, I> {
    type Item = Result<Materialized>;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.inner.next()?;
        Some(self.materializer.materialize(&item, self.options))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}
