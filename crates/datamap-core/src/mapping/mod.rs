//! Mapping engine for converting loosely-structured records into typed records
//!
//! This module implements the record pipeline: flattening nested records,
//! normalizing keys, resolving the target type, and converting field values
//! through the converter registry before construction.
//!
//! Copyright (c) 2025 Datamap Team
//! Licensed under the Apache-2.0 license

pub mod converter;
pub mod flatten;
pub mod keys;
pub mod materializer;
pub mod namespace;
pub mod type_names;


pub use converter::{Converter, ConverterRegistry, ConverterResolver};
pub use flatten::{flatten, flatten_with, CamelCaseMerge, DelimitedMerge, KeyMergeStrategy};
pub use keys::{
    normalize_key_case, normalize_keys, remove_keys, remove_record_keys, rename_keys,
    rename_record_keys, to_snake_case, KeyRename,
};
pub use materializer::{MaterializeIter, MaterializeOptions, MaterializeOptionsBuilder, Materializer};
pub use namespace::{NamespaceCatalog, NamespaceRef, TypeNamespace};
pub use type_names::resolve_type_names;
