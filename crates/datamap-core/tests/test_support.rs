//! Shared fixtures for integration tests
//!
//! Record types and raw payloads modelled on the asset catalog, social
//! listening and user directory sources the engine is used with.

#![allow(dead_code)]

use chrono::{DateTime, FixedOffset};
use datamap_core::{
    Converter, DeclaredType, Error, FieldDescriptor, Mappable, Materializer, TypeNamespace,
};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

pub const ASSET_NAME: &str = "2022-03-17 #1";
pub const TYPE_NAME: &str = "Effective End Date";

/// Reference offset used by the fixtures (Brussels, winter time)
pub const BRUSSELS: &str = "+01:00";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DateAttribute {
    pub id: String,
    pub created_by: String,
    pub asset_id: String,
    pub asset_name: Option<String>,
    pub type_name: String,
    pub system: bool,
    pub value: DateTime<FixedOffset>,
    pub created_on: DateTime<FixedOffset>,
}

impl Mappable for DateAttribute {
    const TYPE_NAME: &'static str = "DateAttribute";

    fn fields() -> Vec<FieldDescriptor> {
        vec![
            FieldDescriptor::new("id", "str"),
            FieldDescriptor::new("created_by", "str"),
            FieldDescriptor::new("asset_id", "str"),
            FieldDescriptor::new("asset_name", "Optional[str]"),
            FieldDescriptor::new("type_name", "str"),
            FieldDescriptor::new("system", "bool"),
            FieldDescriptor::new("value", DeclaredType::named("datetime")),
            FieldDescriptor::new("created_on", DeclaredType::named("datetime"))
                .with_default(json!("1970-01-01T00:00:00Z")),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Mentions {
    pub id: String,
    pub unique_id: String,
    pub author_id: i64,
    pub original_author_id: i64,
    pub message_title: Option<String>,
    pub message_content: Option<String>,
    pub message_language: Option<String>,
    pub message_sentiment: Option<String>,
    pub source_category: Option<String>,
    pub source_service: Option<String>,
    pub source_type: Option<String>,
    pub source_id: Option<String>,
    pub source_in_reply_to_message_id: Option<String>,
    pub source_domain: Option<String>,
    pub source_url: Option<String>,
    pub location_city: Option<String>,
    pub topic_id: i64,
    pub project_id: i64,
    pub status: String,
    pub permalink: String,
    pub tags: Vec<String>,
    pub handle_time_seconds: Option<i64>,
    pub date_added: DateTime<FixedOffset>,
    pub date_published: Option<DateTime<FixedOffset>>,
}

impl Mappable for Mentions {
    const TYPE_NAME: &'static str = "Mentions";

    fn fields() -> Vec<FieldDescriptor> {
        vec![
            FieldDescriptor::new("author_id", "int"),
            FieldDescriptor::new("original_author_id", "int"),
            FieldDescriptor::new("topic_id", "int"),
            FieldDescriptor::new("project_id", "int"),
            FieldDescriptor::new("handle_time_seconds", "Optional[int]"),
            FieldDescriptor::new("date_added", DeclaredType::optional(DeclaredType::named("datetime"))),
            FieldDescriptor::new("date_published", DeclaredType::optional(DeclaredType::named("datetime"))),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Tag {
    pub id: i64,
    pub tag: String,
    pub filter: String,
    pub color_code: String,
    #[serde(default)]
    pub is_smart_tag: bool,
    #[serde(default)]
    pub is_visible: bool,
    pub is_category_model_tag: Option<Value>,
}

impl Mappable for Tag {
    const TYPE_NAME: &'static str = "Tag";

    fn fields() -> Vec<FieldDescriptor> {
        vec![
            FieldDescriptor::new("id", "int"),
            FieldDescriptor::new("tag", "str"),
            FieldDescriptor::new("filter", "str"),
            FieldDescriptor::new("color_code", "str"),
            FieldDescriptor::new("is_smart_tag", "bool").with_default(json!(false)),
            FieldDescriptor::new("is_visible", "bool").with_default(json!(false)),
            FieldDescriptor::new("is_category_model_tag", "Optional[Any]"),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub age: i64,
    pub username: String,
    pub name: String,
    pub surname: String,
    pub active: bool,
}

impl Mappable for User {
    const TYPE_NAME: &'static str = "User";

    fn fields() -> Vec<FieldDescriptor> {
        vec![
            FieldDescriptor::new("id", DeclaredType::named("UUID")),
            FieldDescriptor::new("age", "int"),
            FieldDescriptor::new("username", "str"),
            FieldDescriptor::new("name", "str"),
            FieldDescriptor::new("surname", "str"),
            FieldDescriptor::new("active", "bool"),
        ]
    }
}

/// Namespace holding every fixture type
pub fn fixtures_namespace() -> TypeNamespace {
    TypeNamespace::new("fixtures")
        .with_mappable::<DateAttribute>()
        .with_mappable::<Mentions>()
        .with_mappable::<Tag>()
        .with_mappable::<User>()
}

/// Materializer rendering timestamps at the fixture offset, with the user
/// directory converters registered
pub fn fixture_materializer() -> Materializer {
    let registry = datamap_core::ConverterRegistry::with_timestamp_config(
        BRUSSELS.parse().expect("valid offset"),
    );
    let mut materializer = Materializer::with_registry(registry);
    materializer
        .register_converter("str_uuid", parse_uuid())
        .register_converter("str_int", parse_str_to_int());
    materializer
}

/// Validates a UUID string, mapping the empty string to null
pub fn parse_uuid() -> Converter {
    Converter::new("parse_uuid", |value| match value.as_str() {
        Some("") | None => Ok(Value::Null),
        Some(s) => Uuid::parse_str(s)
            .map(|uuid| Value::String(uuid.to_string()))
            .map_err(|e| Error::conversion("parse_uuid", e.to_string(), Some(value.clone()))),
    })
}

/// Integer strings to integers, the empty string to zero
pub fn parse_str_to_int() -> Converter {
    Converter::new("parse_str_to_int", |value| match value.as_str() {
        Some("") | None => Ok(json!(0)),
        Some(s) => s
            .parse::<i64>()
            .map(Value::from)
            .map_err(|e| Error::conversion("parse_str_to_int", e.to_string(), Some(value.clone()))),
    })
}

pub fn date_attribute_payload() -> Value {
    json!({
        "id": "b0aa940d-61d9-4b83-94dc-1fd8f2b88dbb",
        "createdBy": "00000000-0000-0000-0000-000000900002",
        "createdOn": 1647520829437i64,
        "lastModifiedBy": "00000000-0000-0000-0000-000000900002",
        "lastModifiedOn": 1647520829438i64,
        "system": false,
        "resourceType": "DateAttribute",
        "type": {
            "id": "00000000-0000-0000-0000-000000000254",
            "resourceType": "DateAttributeType",
            "name": TYPE_NAME
        },
        "asset": {
            "id": "794d2c0b-efd2-446d-9c18-0be336fd61d9",
            "resourceType": "Asset",
            "name": ASSET_NAME
        },
        "value": 1647648000000i64
    })
}

pub fn mention_payload() -> Value {
    json!({
        "id": "43769358878509009",
        "unique_id": "46283_43769358878509009",
        "message": {"language": "fr", "sentiment": "negative"},
        "source": {
            "category": "social",
            "type": "SearchProviderTwitter",
            "service": "twitter",
            "id": "1592974618012573697",
            "domain": "twitter.com",
            "in_reply_to_message_id": "1592772575729700865"
        },
        "topic": {"id": 46283, "name": "CEO's"},
        "project": {"id": 3013, "name": "Politicians"},
        "status": "new",
        "permalink": "https://app.engagor.com/messages/1417/permalink/46283/43769358878509009/",
        "handled_by": null,
        "actions": [],
        "date": {"added": 1668629719},
        "tags": ["FR"],
        "timestamps": {"handle_time": 0},
        "author": {"id": 3313939576i64, "managed": false},
        "original_author": {"id": 3214031521i64},
        "assignment": {"user_ids": [], "team_ids": [], "comments": ""},
        "assignees": []
    })
}

/// Two pages of tags, as returned by a paginated listing
pub fn tag_pages() -> Vec<Value> {
    vec![
        json!([
            {
                "tag": "(LANGUAGE)",
                "id": 35792,
                "is_smarttag": false,
                "color_code": "rgb(83,146,255)",
                "filter": "usertag:\"(LANGUAGE)\"",
                "visible": true,
                "category_model_tag": false
            },
            {
                "tag": "2019 We Are Infrabel - Wave 1",
                "id": 7956854,
                "parent_id": 7956853,
                "is_smarttag": false,
                "color_code": "rgb(250,163,56)",
                "filter": "usertag:\"2019 We Are Infrabel - Wave 1\"",
                "visible": false,
                "category_model_tag": false
            }
        ]),
        json!([
            {
                "tag": "3ième voie Bruges-Dudzele",
                "id": 4557288,
                "is_smarttag": false,
                "color_code": "rgb(201,78,157)",
                "filter": "usertag:\"3ième voie Bruges-Dudzele\"",
                "visible": false,
                "category_model_tag": false
            },
            {
                "tag": "_Info Search",
                "id": 300976,
                "parent_id": 7956853,
                "is_smarttag": false,
                "color_code": "rgb(122,140,64)",
                "filter": "usertag:\"_Info Search\"",
                "visible": false,
                "category_model_tag": false
            }
        ]),
    ]
}

pub fn user_payload() -> Value {
    json!({
        "id": "b0aa940d-61d9-4b83-94dc-1fd8f2b88dbb",
        "age": "",
        "username": "BKD7702",
        "name": "David",
        "surname": "Blain",
        "active": true
    })
}
