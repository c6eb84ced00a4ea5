//! Per-call materialization options and their builder
//!
//! Copyright (c) 2025 Datamap Team
//! Licensed under the Apache-2.0 license

use crate::error::{Error, Result};
use crate::mapping::flatten::{CamelCaseMerge, KeyMergeStrategy};
use crate::mapping::keys::KeyRename;
use crate::mapping::namespace::NamespaceRef;
use crate::types::{Mappable, TargetType};
use std::sync::Arc;

/// Record key read for discriminator-driven type discovery
pub const DEFAULT_DISCRIMINATOR_KEY: &str = "resource_type";

/// Options controlling how raw data is materialized
#[derive(Debug, Clone)]
pub struct MaterializeOptions {
    target_type: Option<TargetType>,
    discriminator_key: String,
    namespace: Option<NamespaceRef>,
    flatten: bool,
    merge_strategy: Arc<dyn KeyMergeStrategy>,
    rename: Vec<KeyRename>,
    remove: Vec<String>,
    suppress_null: bool,
}

impl Default for MaterializeOptions {
    fn default() -> Self {
        Self {
            target_type: None,
            discriminator_key: DEFAULT_DISCRIMINATOR_KEY.to_string(),
            namespace: None,
            flatten: false,
            merge_strategy: Arc::new(CamelCaseMerge),
            rename: Vec::new(),
            remove: Vec::new(),
            suppress_null: false,
        }
    }
}

impl MaterializeOptions {
    pub fn builder() -> MaterializeOptionsBuilder {
        MaterializeOptionsBuilder::new()
    }

    /// A builder pre-filled with these options
    pub fn to_builder(&self) -> MaterializeOptionsBuilder {
        MaterializeOptionsBuilder {
            options: self.clone(),
        }
    }

    pub fn target_type(&self) -> Option<&TargetType> {
        self.target_type.as_ref()
    }

    pub fn discriminator_key(&self) -> &str {
        &self.discriminator_key
    }

    pub fn namespace(&self) -> Option<&NamespaceRef> {
        self.namespace.as_ref()
    }

    pub fn flatten(&self) -> bool {
        self.flatten
    }

    pub fn merge_strategy(&self) -> &dyn KeyMergeStrategy {
        self.merge_strategy.as_ref()
    }

    pub fn rename(&self) -> &[KeyRename] {
        &self.rename
    }

    pub fn remove(&self) -> &[String] {
        &self.remove
    }

    pub fn suppress_null(&self) -> bool {
        self.suppress_null
    }
}

/// Fluent builder for [`MaterializeOptions`]
#[derive(Debug, Clone, Default)]
pub struct MaterializeOptionsBuilder {
    options: MaterializeOptions,
}

impl MaterializeOptionsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Materialize into this type, skipping discovery
    pub fn target_type(mut self, target: TargetType) -> Self {
        self.options.target_type = Some(target);
        self
    }

    /// Materialize into a [`Mappable`] Rust type
    pub fn target<T: Mappable>(self) -> Self {
        self.target_type(T::target_type())
    }

    /// Key holding the type name; defaults to `resource_type`
    pub fn discriminator_key(mut self, key: impl Into<String>) -> Self {
        self.options.discriminator_key = key.into();
        self
    }

    /// Namespace searched for the discriminated type name
    pub fn namespace(mut self, namespace: impl Into<NamespaceRef>) -> Self {
        self.options.namespace = Some(namespace.into());
        self
    }

    pub fn flatten(mut self, flatten: bool) -> Self {
        self.options.flatten = flatten;
        self
    }

    pub fn merge_strategy(mut self, strategy: impl KeyMergeStrategy + 'static) -> Self {
        self.options.merge_strategy = Arc::new(strategy);
        self
    }

    pub fn rename(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.options.rename.push(KeyRename::new(from, to));
        self
    }

    pub fn renames<I, R>(mut self, renames: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<KeyRename>,
    {
        self.options.rename.extend(renames.into_iter().map(Into::into));
        self
    }

    pub fn remove(mut self, key: impl Into<String>) -> Self {
        self.options.remove.push(key.into());
        self
    }

    pub fn removes<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options.remove.extend(keys.into_iter().map(Into::into));
        self
    }

    /// Skip inserting renamed keys whose value is null or missing
    pub fn suppress_null(mut self, suppress: bool) -> Self {
        self.options.suppress_null = suppress;
        self
    }

    pub fn build(self) -> Result<MaterializeOptions> {
        let options = self.options;
        if options.discriminator_key.is_empty() {
            return Err(Error::configuration("Discriminator key must not be empty"));
        }
        if let Some(rename) = options
            .rename
            .iter()
            .find(|rename| rename.from.is_empty() || rename.to.is_empty())
        {
            return Err(Error::configuration(format!(
                "Rename '{}' has an empty key",
                rename
            )));
        }
        if options.remove.iter().any(String::is_empty) {
            return Err(Error::configuration("Removal keys must not be empty"));
        }
        Ok(options)
    }
}
