//! Explicit registries for discriminator-driven type discovery
//!
//! A [`TypeNamespace`] maps type names to target types. A
//! [`NamespaceCatalog`] maps dotted paths such as `models.assets` to
//! namespaces, so callers can refer to a namespace by path.

use crate::error::{Error, Result};
use crate::types::{Mappable, TargetType};
use std::collections::HashMap;
use std::sync::Arc;

/// A named set of target types
#[derive(Debug, Clone, Default)]
pub struct TypeNamespace {
    path: String,
    types: HashMap<String, TargetType>,
}

impl TypeNamespace {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            types: HashMap::new(),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Register a target type under its own name
    pub fn register(&mut self, target: TargetType) -> &mut Self {
        self.types.insert(target.name().to_string(), target);
        self
    }

    pub fn register_mappable<T: Mappable>(&mut self) -> &mut Self {
        self.register(T::target_type())
    }

    /// Builder-style registration
    pub fn with_type(mut self, target: TargetType) -> Self {
        self.register(target);
        self
    }

    pub fn with_mappable<T: Mappable>(self) -> Self {
        self.with_type(T::target_type())
    }

    pub fn lookup(&self, type_name: &str) -> Result<&TargetType> {
        self.types.get(type_name).ok_or_else(|| Error::TypeDiscovery {
            type_name: type_name.to_string(),
            namespace: self.path.clone(),
            message: "no such type in namespace".to_string(),
        })
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.types.contains_key(type_name)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Registered type names, sorted
    pub fn type_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.types.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// A namespace given directly or by dotted path
#[derive(Debug, Clone)]
pub enum NamespaceRef {
    Handle(Arc<TypeNamespace>),
    Path(String),
}

impl From<Arc<TypeNamespace>> for NamespaceRef {
    fn from(namespace: Arc<TypeNamespace>) -> Self {
        NamespaceRef::Handle(namespace)
    }
}

impl From<TypeNamespace> for NamespaceRef {
    fn from(namespace: TypeNamespace) -> Self {
        NamespaceRef::Handle(Arc::new(namespace))
    }
}

impl From<&str> for NamespaceRef {
    fn from(path: &str) -> Self {
        NamespaceRef::Path(path.to_string())
    }
}

impl From<String> for NamespaceRef {
    fn from(path: String) -> Self {
        NamespaceRef::Path(path)
    }
}

/// Dotted path to namespace registry
#[derive(Debug, Clone, Default)]
pub struct NamespaceCatalog {
    namespaces: HashMap<String, Arc<TypeNamespace>>,
}

impl NamespaceCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a namespace under its path, returning the shared handle
    pub fn register(&mut self, namespace: TypeNamespace) -> Arc<TypeNamespace> {
        let namespace = Arc::new(namespace);
        self.namespaces
            .insert(namespace.path().to_string(), Arc::clone(&namespace));
        namespace
    }

    pub fn get(&self, path: &str) -> Option<&Arc<TypeNamespace>> {
        self.namespaces.get(path)
    }

    /// Resolve a handle or path to a namespace
    pub fn resolve(&self, namespace: &NamespaceRef) -> Result<Arc<TypeNamespace>> {
        match namespace {
            NamespaceRef::Handle(handle) => Ok(Arc::clone(handle)),
            NamespaceRef::Path(path) => self.get(path).cloned().ok_or_else(|| Error::TypeDiscovery {
                type_name: String::new(),
                namespace: path.clone(),
                message: "unknown namespace path".to_string(),
            }),
        }
    }

    pub fn len(&self) -> usize {
        self.namespaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.namespaces.is_empty()
    }
}
