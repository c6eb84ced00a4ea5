//! Converter selection from declared field types and runtime values
//!
//! Candidate keys are tried in two tiers: first `{runtime}_{declared}` for
//! every declared type name, then each declared type name alone. The first
//! key present in the registry wins; otherwise the identity converter is used.

use super::{Converter, ConverterRegistry};
use crate::mapping::type_names::resolve_type_names;
use crate::types::{value_type_name, DeclaredType, FieldDescriptor};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use tracing::{debug, trace};

/// Lookup keys for a runtime type and declared names, in priority order
pub fn converter_keys<S: AsRef<str>>(runtime: &str, names: &[S]) -> Vec<String> {
    let pairs = names
        .iter()
        .map(|name| format!("{}_{}", runtime, name.as_ref()).to_lowercase());
    let plain = names.iter().map(|name| name.as_ref().to_lowercase());
    pairs.chain(plain).collect()
}

/// Pick the converter for one field value without caching
pub fn resolve_converter(registry: &ConverterRegistry, field: &FieldDescriptor, value: &Value) -> Converter {
    let runtime = value_type_name(value);
    let names = resolve_type_names(&field.declared);
    converter_keys(runtime, &names)
        .iter()
        .find_map(|key| registry.get(key))
        .cloned()
        .unwrap_or_else(Converter::identity)
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    field: String,
    declared: DeclaredType,
    runtime: &'static str,
}

/// Memoizing converter resolver
///
/// Results are cached per field name, declared type and runtime type.
/// Converters registered after a shape was resolved are not seen for that
/// shape until [`ConverterResolver::clear_cache`] is called.
///
/// The cache does not identify the registry it was filled from. Use one
/// resolver per registry, or clear the cache before resolving against a
/// different one. [`Materializer`](crate::Materializer) owns exactly one of each.
#[derive(Debug, Default)]
pub struct ConverterResolver {
    cache: Mutex<HashMap<CacheKey, Converter>>,
}

impl ConverterResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resolve(&self, registry: &ConverterRegistry, field: &FieldDescriptor, value: &Value) -> Converter {
        let key = CacheKey {
            field: field.name.clone(),
            declared: field.declared.clone(),
            runtime: value_type_name(value),
        };

        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(converter) = cache.get(&key) {
            trace!(field = %field.name, converter = converter.name(), "Converter cache hit");
            return converter.clone();
        }

        let converter = resolve_converter(registry, field, value);
        debug!(
            field = %field.name,
            declared = %field.declared,
            runtime = key.runtime,
            converter = converter.name(),
            "Resolved converter"
        );
        cache.insert(key, converter.clone());
        converter
    }

    /// Number of cached resolutions
    pub fn cached_len(&self) -> usize {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn clear_cache(&self) {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::converter::built_in;
    use serde_json::json;

    fn datetime_field() -> FieldDescriptor {
        FieldDescriptor::new("created_on", "Optional[datetime]")
    }

    #[test]
    fn test_converter_keys_order() {
        let keys = converter_keys("int", &["datetime", "NoneType"]);
        assert_eq!(keys, ["int_datetime", "int_nonetype", "datetime", "nonetype"]);
    }

    #[test]
    fn test_pair_tier_selects_timestamp() {
        let registry = ConverterRegistry::with_builtins();
        let converter = resolve_converter(&registry, &datetime_field(), &json!(1647520829437i64));
        assert_eq!(converter.name(), "parse_timestamp");
    }

    #[test]
    fn test_declarative_optional_selects_timestamp() {
        let registry = ConverterRegistry::with_builtins();
        let field = FieldDescriptor::new("created_on", DeclaredType::optional("datetime"));

        let converter = resolve_converter(&registry, &field, &json!(1647520829437i64));
        assert_eq!(converter.name(), "parse_timestamp");
        assert_eq!(
            converter.convert(&json!(1647520829437i64)).unwrap(),
            json!("2022-03-17T12:40:29.437Z")
        );
    }

    #[test]
    fn test_identity_fallback() {
        let registry = ConverterRegistry::with_builtins();
        let converter = resolve_converter(&registry, &datetime_field(), &json!("2022-03-17T12:40:29Z"));
        assert!(converter.is_identity());

        let converter = resolve_converter(&registry, &FieldDescriptor::new("id", "str"), &json!(1));
        assert!(converter.is_identity());
    }

    #[test]
    fn test_plain_tier_used_when_no_pair_matches() {
        let mut registry = ConverterRegistry::with_builtins();
        registry.register("uuid", built_in::string_to_integer());
        let field = FieldDescriptor::new("id", DeclaredType::named("UUID"));
        let converter = resolve_converter(&registry, &field, &json!("1"));
        assert_eq!(converter.name(), "string_to_integer");
    }

    #[test]
    fn test_pair_tier_beats_plain_tier_across_names() {
        let mut registry = ConverterRegistry::new();
        registry.register_fn("first", |v| Ok(v.clone()));
        registry.register_fn("str_second", |v| Ok(v.clone()));
        let field = FieldDescriptor::new("f", "Union[first,second]");
        assert_eq!(resolve_converter(&registry, &field, &json!("x")).name(), "str_second");
    }

    #[test]
    fn test_resolution_is_deterministic_and_cached() {
        let registry = ConverterRegistry::with_builtins();
        let resolver = ConverterResolver::new();
        let field = datetime_field();

        let first = resolver.resolve(&registry, &field, &json!(1));
        let second = resolver.resolve(&registry, &field, &json!(2));
        assert!(first.same_as(&second));
        assert_eq!(resolver.cached_len(), 1);

        resolver.resolve(&registry, &field, &json!(null));
        assert_eq!(resolver.cached_len(), 2);
    }

    #[test]
    fn test_cache_is_not_invalidated_by_registration() {
        let mut registry = ConverterRegistry::new();
        let resolver = ConverterResolver::new();
        let field = FieldDescriptor::new("age", "int");

        assert!(resolver.resolve(&registry, &field, &json!("")).is_identity());
        registry.register("str_int", built_in::string_to_integer());
        assert!(resolver.resolve(&registry, &field, &json!("")).is_identity());

        resolver.clear_cache();
        assert_eq!(resolver.resolve(&registry, &field, &json!("")).name(), "string_to_integer");
    }

    #[test]
    fn test_cache_is_tied_to_the_registry_it_was_filled_from() {
        let empty = ConverterRegistry::new();
        let seeded = ConverterRegistry::with_builtins();
        let resolver = ConverterResolver::new();
        let field = datetime_field();

        assert!(resolver.resolve(&empty, &field, &json!(1)).is_identity());
        assert!(resolver.resolve(&seeded, &field, &json!(1)).is_identity());

        resolver.clear_cache();
        assert_eq!(resolver.resolve(&seeded, &field, &json!(1)).name(), "parse_timestamp");
    }
}
