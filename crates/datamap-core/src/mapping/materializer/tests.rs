//! Tests for record materialization
//!
//! Covers the single-record pipeline, type discovery, collection and lazy
//! dispatch, conversion and construction failures.
//!
//! Copyright (c) 2025 Datamap Team
//! Licensed under the Apache-2.0 license

use super::*;
use crate::mapping::converter::built_in;
use crate::mapping::flatten::DelimitedMerge;
use crate::mapping::namespace::TypeNamespace;
use crate::types::FieldDescriptor;
use serde::Deserialize;
use serde_json::json;
use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;

#[derive(Debug, Deserialize, PartialEq)]
struct Asset {
    id: String,
    name: Option<String>,
    created_on: String,
    #[serde(default)]
    system: bool,
}

impl Mappable for Asset {
    const TYPE_NAME: &'static str = "Asset";

    fn fields() -> Vec<FieldDescriptor> {
        vec![
            FieldDescriptor::new("id", "str"),
            FieldDescriptor::new("name", "Optional[str]"),
            FieldDescriptor::new("created_on", "datetime"),
            FieldDescriptor::new("system", "bool").with_default(json!(false)),
        ]
    }
}

fn dynamic_attribute() -> TargetType {
    TargetType::dynamic(
        "DateAttribute",
        vec![
            FieldDescriptor::new("value", "datetime"),
            FieldDescriptor::new("created_on", "Optional[datetime]"),
            FieldDescriptor::new("system", "bool").with_default(json!(false)),
        ],
    )
}

fn assets_namespace() -> TypeNamespace {
    TypeNamespace::new("models.assets")
        .with_mappable::<Asset>()
        .with_type(dynamic_attribute())
}

fn options() -> MaterializeOptions {
    MaterializeOptions::default()
}

#[test]
fn test_empty_record_returned_unchanged() {
    let materializer = Materializer::new();
    let options = MaterializeOptions::builder()
        .target_type(dynamic_attribute())
        .rename("a", "b")
        .build()
        .unwrap();

    let result = materializer.materialize(&json!({}), &options).unwrap();
    assert_eq!(result.as_record(), Some(&Record::new()));
}

#[test]
fn test_untyped_record_is_normalized() {
    let materializer = Materializer::new();
    let options = MaterializeOptions::builder()
        .flatten(true)
        .rename("is_smarttag", "is_smart_tag")
        .remove("type_resource_type")
        .build()
        .unwrap();

    let data = json!({
        "id": "x",
        "isSmarttag": false,
        "type": {"id": "1", "resourceType": "DateAttributeType"}
    });
    let result = materializer.materialize(&data, &options).unwrap();

    assert_eq!(
        result.to_value(),
        json!({"id": "x", "type_id": "1", "is_smart_tag": false})
    );
}

#[test]
fn test_input_is_not_mutated() {
    let materializer = Materializer::new();
    let options = MaterializeOptions::builder()
        .target_type(dynamic_attribute())
        .remove("id")
        .build()
        .unwrap();

    let data = json!({"id": "x", "value": 1647648000000i64});
    let before = data.clone();
    materializer.materialize(&data, &options).unwrap();
    assert_eq!(data, before);
}

#[test]
fn test_explicit_target_converts_and_fills_defaults() {
    let materializer = Materializer::new();
    let options = MaterializeOptions::builder()
        .target_type(dynamic_attribute())
        .build()
        .unwrap();

    let data = json!({"value": 1647648000000i64, "createdOn": 1647520829437i64});
    let result = materializer.materialize(&data, &options).unwrap();

    let typed = result.as_typed().unwrap();
    assert_eq!(typed.type_name(), "DateAttribute");
    assert_eq!(
        Value::Object(typed.record().clone()),
        json!({
            "value": "2022-03-19T00:00:00Z",
            "created_on": "2022-03-17T12:40:29.437Z",
            "system": false
        })
    );
}

#[test]
fn test_reference_offset_from_registry() {
    let registry = ConverterRegistry::with_timestamp_config("+01:00".parse().unwrap());
    let materializer = Materializer::with_registry(registry);
    let options = MaterializeOptions::builder()
        .target_type(dynamic_attribute())
        .build()
        .unwrap();

    let result = materializer
        .materialize(&json!({"created_on": 1647520829437i64}), &options)
        .unwrap();
    assert_eq!(
        result.to_value()["created_on"],
        json!("2022-03-17T13:40:29.437+01:00")
    );
}

#[test]
fn test_discovery_through_namespace_handle() {
    let materializer = Materializer::new();
    let options = MaterializeOptions::builder()
        .namespace(assets_namespace())
        .build()
        .unwrap();

    let data = json!({"id": "a1", "resourceType": "Asset", "createdOn": 1668629719});
    let asset = materializer
        .materialize(&data, &options)
        .unwrap()
        .downcast::<Asset>()
        .unwrap();

    assert_eq!(
        asset,
        Asset {
            id: "a1".to_string(),
            name: None,
            created_on: "2022-11-16T20:15:19Z".to_string(),
            system: false,
        }
    );
}

#[test]
fn test_discovery_through_catalog_path() {
    let mut catalog = NamespaceCatalog::new();
    catalog.register(assets_namespace());
    let materializer = Materializer::new().with_catalog(catalog);
    let options = MaterializeOptions::builder()
        .namespace("models.assets")
        .discriminator_key("kind")
        .build()
        .unwrap();

    let result = materializer
        .materialize(&json!({"kind": "DateAttribute", "value": 1668629719}), &options)
        .unwrap();
    assert_eq!(result.as_typed().unwrap().type_name(), "DateAttribute");
}

#[test]
fn test_discovery_failures_fall_back_to_record() {
    let materializer = Materializer::new();
    let handle = MaterializeOptions::builder()
        .namespace(assets_namespace())
        .build()
        .unwrap();
    let unknown_path = MaterializeOptions::builder()
        .namespace("models.unknown")
        .build()
        .unwrap();

    let cases = [
        (json!({"id": "a1"}), &handle),
        (json!({"id": "a1", "resource_type": "Missing"}), &handle),
        (json!({"id": "a1", "resource_type": 7}), &handle),
        (json!({"id": "a1", "resource_type": null}), &handle),
        (json!({"id": "a1", "resource_type": "Asset"}), &unknown_path),
    ];
    for (data, options) in cases {
        let result = materializer.materialize(&data, options).unwrap();
        assert!(result.as_record().is_some(), "expected untyped record for {}", data);
    }
}

#[test]
fn test_explicit_target_wins_over_discovery() {
    let materializer = Materializer::new();
    let options = MaterializeOptions::builder()
        .namespace(assets_namespace())
        .target_type(dynamic_attribute())
        .build()
        .unwrap();

    let result = materializer
        .materialize(&json!({"resource_type": "Asset", "value": 1}), &options)
        .unwrap();
    assert_eq!(result.as_typed().unwrap().type_name(), "DateAttribute");
}

#[test]
fn test_collection_materialized_eagerly() {
    let materializer = Materializer::new();
    let data = json!([{"typeId": 1}, {"typeId": 2}]);

    let result = materializer.materialize(&data, &options()).unwrap();
    let items = result.as_many().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[1].to_value(), json!({"type_id": 2}));
}

#[test]
fn test_collection_rejects_non_records() {
    let materializer = Materializer::new();

    let err = materializer
        .materialize(&json!([{"a": 1}, "b"]), &options())
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Invalid argument type string passed as data, expected an object!"
    );

    let err = materializer
        .materialize_collection(&json!({"a": 1}), &options())
        .unwrap_err();
    assert!(matches!(err, Error::InvalidArgument { ref found, .. } if found == "object"));

    let err = materializer.materialize(&json!(42), &options()).unwrap_err();
    assert!(matches!(err, Error::InvalidArgument { ref found, .. } if found == "number"));
}

#[test]
fn test_lazy_iterator_pulls_on_demand() {
    let materializer = Materializer::new();
    let options = options();
    let pulled = Rc::new(Cell::new(0));
    let counter = Rc::clone(&pulled);

    let source = vec![json!({"aB": 1}), json!({"cD": 2})]
        .into_iter()
        .inspect(move |_| counter.set(counter.get() + 1));
    let mut results = materializer.materialize_iter(source, &options);
    assert_eq!(pulled.get(), 0);

    let first = results.next().unwrap().unwrap();
    assert_eq!(first.to_value(), json!({"a_b": 1}));
    assert_eq!(pulled.get(), 1);

    let second = results.next().unwrap().unwrap();
    assert_eq!(second.to_value(), json!({"c_d": 2}));
    assert_eq!(pulled.get(), 2);
    assert!(results.next().is_none());
}

#[test]
fn test_lazy_elements_may_be_collections() {
    let materializer = Materializer::new();
    let options = options();
    let pages = vec![json!([{"id": 1}, {"id": 2}]), json!([{"id": 3}])];

    let sizes: Vec<usize> = materializer
        .materialize_iter(pages, &options)
        .map(|page| page.unwrap().as_many().unwrap().len())
        .collect();
    assert_eq!(sizes, [2, 1]);
}

#[test]
fn test_lazy_errors_surface_per_element() {
    let materializer = Materializer::new();
    let options = options();
    let results: Vec<_> = materializer
        .materialize_iter(vec![json!({"a": 1}), json!(true)], &options)
        .collect();

    assert!(results[0].is_ok());
    assert!(matches!(results[1], Err(Error::InvalidArgument { .. })));
}

#[test]
fn test_conversion_error_propagates() {
    let mut materializer = Materializer::new();
    materializer.register_converter("str_int", built_in::string_to_integer());
    let options = MaterializeOptions::builder()
        .target_type(TargetType::dynamic("User", vec![FieldDescriptor::new("age", "int")]))
        .build()
        .unwrap();

    let ok = materializer.materialize(&json!({"age": ""}), &options).unwrap();
    assert_eq!(ok.to_value(), json!({"age": 0}));

    let err = materializer.materialize(&json!({"age": "old"}), &options).unwrap_err();
    assert!(matches!(err, Error::Conversion { ref converter, .. } if converter == "string_to_integer"));
}

#[test]
fn test_construction_error() {
    let materializer = Materializer::new();
    let options = MaterializeOptions::builder().target::<Asset>().build().unwrap();

    let err = materializer
        .materialize(&json!({"name": "no id", "created_on": 1}), &options)
        .unwrap_err();
    assert!(matches!(err, Error::Construction { ref type_name, .. } if type_name == "Asset"));
}

#[test]
fn test_materialize_as() {
    let materializer = Materializer::new();
    let options = MaterializeOptions::builder()
        .flatten(true)
        .merge_strategy(DelimitedMerge::new("_"))
        .build()
        .unwrap();

    let asset: Asset = materializer
        .materialize_as(&json!({"id": "a1", "created": {"on": 1668629719}}), &options)
        .unwrap();
    assert_eq!(asset.created_on, "2022-11-16T20:15:19Z");
    assert!(!asset.system);

    let err = materializer
        .materialize_as::<Asset>(&json!([]), &options)
        .unwrap_err();
    assert!(matches!(err, Error::InvalidArgument { .. }));
}

#[test]
fn test_resolutions_are_cached() {
    let materializer = Materializer::new();
    let options = MaterializeOptions::builder()
        .target_type(dynamic_attribute())
        .build()
        .unwrap();

    for value in [1, 2, 3] {
        materializer.materialize(&json!({"value": value}), &options).unwrap();
    }
    assert_eq!(materializer.resolver().cached_len(), 1);
}

#[test]
fn test_materializer_is_shareable() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Materializer>();

    let materializer = Arc::new(Materializer::new());
    let options = Arc::new(
        MaterializeOptions::builder()
            .target_type(dynamic_attribute())
            .build()
            .unwrap(),
    );

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let materializer = Arc::clone(&materializer);
            let options = Arc::clone(&options);
            std::thread::spawn(move || {
                materializer
                    .materialize(&json!({"value": 1668629719 + i}), &options)
                    .map(|result| result.to_value())
            })
        })
        .collect();

    for handle in handles {
        assert!(handle.join().unwrap().is_ok());
    }
}
