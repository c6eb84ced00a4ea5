//! Datamap Core - Mapping engine for loosely-structured records
//!
//! This crate turns records from external sources (nested JSON objects with
//! camelCase keys, epoch timestamps, inconsistent field names) into typed
//! records.
//!
//! # Main Components
//!
//! - **Error Handling**: Error types using `thiserror` and `anyhow`
//! - **Core Types**: Records, declared field types and target type descriptors
//! - **Mapping Engine**: Flattening, key normalization, converter resolution
//!   and record materialization
//! - **Timestamps**: Epoch seconds/milliseconds parsing
//!
//! # Example
//!
//! ```
//! use datamap_core::{FieldDescriptor, Mappable, MaterializeOptions, Materializer, Result};
//! use chrono::{DateTime, Utc};
//! use serde::Deserialize;
//! use serde_json::json;
//!
//! #[derive(Debug, Deserialize)]
//! struct Mention {
//!     id: String,
//!     date_added: DateTime<Utc>,
//! }
//!
//! impl Mappable for Mention {
//!     const TYPE_NAME: &'static str = "Mention";
//!
//!     fn fields() -> Vec<FieldDescriptor> {
//!         vec![
//!             FieldDescriptor::new("id", "str"),
//!             FieldDescriptor::new("date_added", "datetime"),
//!         ]
//!     }
//! }
//!
//! fn example() -> Result<()> {
//!     let materializer = Materializer::new();
//!     let options = MaterializeOptions::builder().flatten(true).build()?;
//!     let mention: Mention = materializer
//!         .materialize_as(&json!({"id": "m1", "date": {"added": 1668629719}}), &options)?;
//!     assert_eq!(mention.date_added.timestamp(), 1668629719);
//!     Ok(())
//! }
//! # example().unwrap();
//! ```

pub mod error;
pub mod mapping;
pub mod time;
pub mod types;

#[cfg(test)]
mod proptest_strategies;

// Re-export main types for convenience
pub use error::{Error, Result};
pub use types::{
    // Records and declared types
    Record, DeclaredType, FieldDescriptor,

    // Target types and results
    TargetType, Mappable, TypedRecord, Materialized,
};
pub use mapping::{
    // Flattening
    flatten, flatten_with, CamelCaseMerge, DelimitedMerge, KeyMergeStrategy,

    // Key normalization
    normalize_keys, rename_keys, remove_keys, KeyRename,

    // Converters
    resolve_type_names, Converter, ConverterRegistry, ConverterResolver,

    // Discovery and materialization
    NamespaceCatalog, NamespaceRef, TypeNamespace,
    MaterializeOptions, MaterializeOptionsBuilder, Materializer,
};
pub use time::{parse_timestamp, TimestampConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
