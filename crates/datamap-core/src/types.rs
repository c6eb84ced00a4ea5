//! Core data types for the mapping engine
//!
//! Records are ordered JSON objects. Target types describe the record type a
//! raw record is materialized into: a name, per-field declared types and
//! defaults, and a constructor that builds the typed instance via serde.

use crate::error::{Error, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// An ordered key/value record as produced by an external data source
pub type Record = Map<String, Value>;

/// Concrete runtime type name of a JSON value, as used in converter keys
pub fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "nonetype",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_i64() || n.is_u64() => "int",
        Value::Number(_) => "float",
        Value::String(_) => "str",
        Value::Array(_) => "list",
        Value::Object(_) => "dict",
    }
}

/// Declared type of a field
///
/// Replaces runtime introspection of generic annotations: callers state the
/// type either as a string expression (`"Optional[int]"`) or as a
/// declarative named/generic descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DeclaredType {
    /// String-encoded type expression, e.g. `Union[int,NoneType]`
    Expr(String),
    /// Generic or union type with its type arguments
    Generic { name: String, args: Vec<DeclaredType> },
    /// Plain, non-generic type
    Named { name: String },
}

impl DeclaredType {
    /// A plain named type
    pub fn named(name: impl Into<String>) -> Self {
        DeclaredType::Named { name: name.into() }
    }

    /// A string-encoded type expression
    pub fn expr(expr: impl Into<String>) -> Self {
        DeclaredType::Expr(expr.into())
    }

    /// A generic type with arguments
    pub fn generic(name: impl Into<String>, args: Vec<DeclaredType>) -> Self {
        DeclaredType::Generic {
            name: name.into(),
            args,
        }
    }

    /// `Optional[T]`, i.e. `Union[T, NoneType]`
    pub fn optional(inner: impl Into<DeclaredType>) -> Self {
        Self::generic("Optional", vec![inner.into(), Self::named("NoneType")])
    }

    /// `Union[A, B, ...]`
    pub fn union<I, T>(members: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<DeclaredType>,
    {
        Self::generic("Union", members.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for DeclaredType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeclaredType::Expr(expr) => write!(f, "{}", expr),
            DeclaredType::Named { name } => write!(f, "{}", name),
            DeclaredType::Generic { name, args } => {
                write!(f, "{}[", name)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, "]")
            }
        }
    }
}

/// Bare strings are treated as type expressions, which also covers plain names
impl From<&str> for DeclaredType {
    fn from(expr: &str) -> Self {
        DeclaredType::Expr(expr.to_string())
    }
}

impl From<String> for DeclaredType {
    fn from(expr: String) -> Self {
        DeclaredType::Expr(expr)
    }
}

/// Metadata for one field of a target type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Field name, as it appears in the normalized record
    pub name: String,
    /// Declared type driving converter resolution
    pub declared: DeclaredType,
    /// Value inserted when the field is absent from the record
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, declared: impl Into<DeclaredType>) -> Self {
        Self {
            name: name.into(),
            declared: declared.into(),
            default: None,
        }
    }

    /// Set the default value used when the field is missing
    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }
}

type Constructor = dyn Fn(Record) -> Result<Box<dyn Any + Send + Sync>> + Send + Sync;

/// Descriptor of a record type that raw records are materialized into
#[derive(Clone)]
pub struct TargetType {
    name: Arc<str>,
    fields: Arc<[FieldDescriptor]>,
    construct: Arc<Constructor>,
}

impl TargetType {
    /// Target type constructed by deserializing the converted record into `T`
    pub fn of<T>(name: impl Into<String>, fields: Vec<FieldDescriptor>) -> Self
    where
        T: DeserializeOwned + Send + Sync + 'static,
    {
        let name: Arc<str> = Arc::from(name.into());
        let type_name = Arc::clone(&name);
        Self {
            name,
            fields: fields.into(),
            construct: Arc::new(move |record| {
                let instance: T = serde_json::from_value(Value::Object(record)).map_err(|source| {
                    Error::Construction {
                        type_name: type_name.to_string(),
                        source,
                    }
                })?;
                Ok(Box::new(instance) as Box<dyn Any + Send + Sync>)
            }),
        }
    }

    /// Target type whose instance is the converted record itself
    ///
    /// Used when field types come from configuration rather than Rust types.
    pub fn dynamic(name: impl Into<String>, fields: Vec<FieldDescriptor>) -> Self {
        Self {
            name: Arc::from(name.into()),
            fields: fields.into(),
            construct: Arc::new(|record| Ok(Box::new(record) as Box<dyn Any + Send + Sync>)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Look up a field descriptor by name
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Build a typed instance from a converted record
    pub fn construct(&self, record: Record) -> Result<TypedRecord> {
        let instance = (self.construct)(record.clone())?;
        Ok(TypedRecord {
            type_name: self.name.to_string(),
            record,
            instance,
        })
    }
}

impl fmt::Debug for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TargetType")
            .field("name", &self.name)
            .field("fields", &self.fields)
            .finish()
    }
}

/// A Rust type that declares its own target type descriptor
pub trait Mappable: DeserializeOwned + Send + Sync + 'static {
    /// Name used for discriminator lookups
    const TYPE_NAME: &'static str;

    /// Field descriptors driving conversion
    fn fields() -> Vec<FieldDescriptor>;

    fn target_type() -> TargetType {
        TargetType::of::<Self>(Self::TYPE_NAME, Self::fields())
    }
}

/// A typed instance together with the converted record it was built from
pub struct TypedRecord {
    type_name: String,
    record: Record,
    instance: Box<dyn Any + Send + Sync>,
}

impl TypedRecord {
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// The converted record fed to the constructor
    pub fn record(&self) -> &Record {
        &self.record
    }

    pub fn is<T: Any>(&self) -> bool {
        self.instance.is::<T>()
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.instance.downcast_ref::<T>()
    }

    /// Take the typed instance, or get `self` back if it is not a `T`
    pub fn downcast<T: Any>(self) -> std::result::Result<T, Self> {
        let TypedRecord {
            type_name,
            record,
            instance,
        } = self;
        match instance.downcast::<T>() {
            Ok(value) => Ok(*value),
            Err(instance) => Err(TypedRecord {
                type_name,
                record,
                instance,
            }),
        }
    }
}

impl fmt::Debug for TypedRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedRecord")
            .field("type_name", &self.type_name)
            .field("record", &self.record)
            .finish_non_exhaustive()
    }
}

/// Result of materializing raw data
#[derive(Debug)]
pub enum Materialized {
    /// A record that was constructed into a target type
    Typed(TypedRecord),
    /// A normalized record for which no target type was resolved
    Record(Record),
    /// Per-element results of a collection
    Many(Vec<Materialized>),
}

impl Materialized {
    pub fn as_typed(&self) -> Option<&TypedRecord> {
        match self {
            Materialized::Typed(typed) => Some(typed),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Materialized::Record(record) => Some(record),
            _ => None,
        }
    }

    pub fn as_many(&self) -> Option<&[Materialized]> {
        match self {
            Materialized::Many(items) => Some(items),
            _ => None,
        }
    }

    /// Downcast a typed result into `T`
    pub fn downcast<T: Any>(self) -> Option<T> {
        match self {
            Materialized::Typed(typed) => typed.downcast::<T>().ok(),
            _ => None,
        }
    }

    /// JSON view of the result; typed records render as their converted record
    pub fn to_value(&self) -> Value {
        match self {
            Materialized::Typed(typed) => Value::Object(typed.record.clone()),
            Materialized::Record(record) => Value::Object(record.clone()),
            Materialized::Many(items) => Value::Array(items.iter().map(Materialized::to_value).collect()),
        }
    }
}
