//! Configuration management for the CLI
//!
//! Configuration comes from, in increasing precedence:
//! - Default values
//! - A configuration file (YAML, JSON or TOML, picked by extension)
//! - Environment variables (`DATAMAP_CONFIG`, `DATAMAP_PROFILE`, `DATAMAP_LOG_*`)
//! - Command-line arguments
//!
//! Besides output and logging settings, the file declares mapping profiles,
//! dynamic target types and converter bindings, which this module turns
//! into mapping engine objects.

use crate::cli::OutputFormat;
use crate::error::{Error, Result};
use datamap_core::mapping::converter::built_in;
use datamap_core::{
    ConverterRegistry, DelimitedMerge, FieldDescriptor, KeyRename, MaterializeOptions,
    MaterializeOptionsBuilder, NamespaceCatalog, TargetType, TimestampConfig, TypeNamespace,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Namespace the configured `types` are registered under
pub const CONFIG_NAMESPACE: &str = "config";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Reference offset timestamps are rendered in ("UTC", "+01:00", ...)
    pub timezone: TimestampConfig,

    /// Profile used by `map` when none is given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_profile: Option<String>,

    pub profiles: BTreeMap<String, ProfileConfig>,

    /// Target types: type name -> field name -> declared type
    pub types: BTreeMap<String, BTreeMap<String, FieldConfig>>,

    /// Converter bindings: lookup key (e.g. `str_int`) -> built-in converter name
    pub converters: BTreeMap<String, String>,

    pub output: OutputConfig,

    pub logging: LoggingConfig,
}

/// A named set of mapping options
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileConfig {
    pub flatten: bool,

    /// Join flattened keys with this separator instead of camel-casing them
    #[serde(skip_serializing_if = "Option::is_none")]
    pub separator: Option<String>,

    /// Renames applied in order after key normalization
    pub rename: Vec<KeyRename>,

    pub remove: Vec<String>,

    pub suppress_null: bool,

    /// Name of a configured type to materialize into
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,

    /// Record key holding the type name for discovery
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discriminator: Option<String>,
}

/// A configured field: either a bare type expression or one with a default
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldConfig {
    Expr(String),
    Detailed {
        #[serde(rename = "type")]
        declared: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        default: Option<Value>,
    },
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default output format, overridden by `--output`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<OutputFormat>,

    /// Use colored messages by default
    pub color: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log format (compact, full, json)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    /// Log file path
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: None,
            color: true,
        }
    }
}

impl FieldConfig {
    fn to_descriptor(&self, name: &str) -> FieldDescriptor {
        match self {
            FieldConfig::Expr(expr) => FieldDescriptor::new(name, expr.as_str()),
            FieldConfig::Detailed { declared, default } => {
                let field = FieldDescriptor::new(name, declared.as_str());
                match default {
                    Some(default) => field.with_default(default.clone()),
                    None => field,
                }
            }
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;

        let config = match path.extension().and_then(|s| s.to_str()) {
            Some("yaml") | Some("yml") => serde_yaml::from_str(&content)?,
            Some("toml") => toml::from_str(&content)?,
            _ => serde_json::from_str(&content)?,
        };

        tracing::debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Load configuration from default locations
    pub fn load() -> Result<Self> {
        for path in &Self::default_config_paths() {
            if path.exists() {
                match Self::from_file(path) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        eprintln!("Warning: Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file or default locations
    pub fn load_with_file(file: Option<&Path>) -> Result<Self> {
        match file {
            Some(path) => Self::from_file(path),
            None => Self::load(),
        }
    }

    /// Default configuration file paths, in lookup order
    pub fn default_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![
            PathBuf::from(".datamap.yaml"),
            PathBuf::from(".datamap.json"),
            PathBuf::from("datamap.yaml"),
            PathBuf::from("datamap.json"),
            PathBuf::from("datamap.toml"),
        ];

        if let Some(config_dir) = dirs::config_dir() {
            let datamap_dir = config_dir.join("datamap");
            paths.push(datamap_dir.join("config.yaml"));
            paths.push(datamap_dir.join("config.json"));
            paths.push(datamap_dir.join("config.toml"));
        }

        paths
    }

    /// Look up a profile by name
    pub fn profile(&self, name: &str) -> Result<&ProfileConfig> {
        self.profiles.get(name).ok_or_else(|| Error::ProfileNotFound {
            name: name.to_string(),
        })
    }

    /// The named profile, else the default profile, else an empty one
    pub fn active_profile(&self, name: Option<&str>) -> Result<ProfileConfig> {
        match name.or(self.default_profile.as_deref()) {
            Some(name) => self.profile(name).cloned(),
            None => Ok(ProfileConfig::default()),
        }
    }

    /// Build a configured type
    pub fn target_type(&self, name: &str) -> Result<TargetType> {
        let fields = self
            .types
            .get(name)
            .ok_or_else(|| Error::config(format!("Type '{}' is not defined in `types`", name)))?;

        Ok(TargetType::dynamic(
            name,
            fields
                .iter()
                .map(|(field, config)| config.to_descriptor(field))
                .collect(),
        ))
    }

    /// Namespace holding every configured type
    pub fn namespace(&self) -> Result<TypeNamespace> {
        let mut namespace = TypeNamespace::new(CONFIG_NAMESPACE);
        for name in self.types.keys() {
            namespace.register(self.target_type(name)?);
        }
        Ok(namespace)
    }

    pub fn catalog(&self) -> Result<NamespaceCatalog> {
        let mut catalog = NamespaceCatalog::new();
        catalog.register(self.namespace()?);
        Ok(catalog)
    }

    /// Registry seeded with the built-ins and the configured bindings
    pub fn registry(&self) -> Result<ConverterRegistry> {
        let mut registry = ConverterRegistry::with_timestamp_config(self.timezone);
        for (key, name) in &self.converters {
            let converter = built_in::by_name(name, self.timezone).ok_or_else(|| {
                Error::config(format!(
                    "Unknown converter '{}' for key '{}', expected one of: {}",
                    name,
                    key,
                    built_in::names().join(", ")
                ))
            })?;
            registry.register(key, converter);
        }
        Ok(registry)
    }

    /// Check cross references between sections
    pub fn validate(&self) -> Result<()> {
        if let Some(name) = &self.default_profile {
            self.profile(name)?;
        }
        for (name, profile) in &self.profiles {
            if let Some(target) = &profile.target {
                if !self.types.contains_key(target) {
                    return Err(Error::config(format!(
                        "Profile '{}' targets undefined type '{}'",
                        name, target
                    )));
                }
            }
            if profile.target.is_some() && profile.discriminator.is_some() {
                return Err(Error::config(format!(
                    "Profile '{}' sets both a target and a discriminator",
                    name
                )));
            }
            profile
                .options_builder()
                .build()
                .map_err(|e| Error::config(format!("Profile '{}': {}", name, e)))?;
        }
        self.registry()?;
        Ok(())
    }
}

impl ProfileConfig {
    /// Options for this profile, without target type resolution
    pub fn options_builder(&self) -> MaterializeOptionsBuilder {
        let mut builder = MaterializeOptions::builder()
            .flatten(self.flatten)
            .renames(self.rename.iter().cloned())
            .removes(self.remove.iter().cloned())
            .suppress_null(self.suppress_null);
        if let Some(separator) = &self.separator {
            builder = builder.merge_strategy(DelimitedMerge::new(separator.as_str()));
        }
        if let Some(key) = &self.discriminator {
            builder = builder.discriminator_key(key.as_str());
        }
        builder
    }
}

/// Builder for creating configurations programmatically
#[cfg(test)]
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config: Config,
}

#[cfg(test)]
impl ConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn timezone(mut self, timezone: TimestampConfig) -> Self {
        self.config.timezone = timezone;
        self
    }

    pub fn default_profile(mut self, name: impl Into<String>) -> Self {
        self.config.default_profile = Some(name.into());
        self
    }

    pub fn profile(mut self, name: impl Into<String>, profile: ProfileConfig) -> Self {
        self.config.profiles.insert(name.into(), profile);
        self
    }

    /// Add a type from `(field, type expression)` pairs
    pub fn add_type<I, F, T>(mut self, name: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = (F, T)>,
        F: Into<String>,
        T: Into<String>,
    {
        let fields = fields
            .into_iter()
            .map(|(field, declared)| (field.into(), FieldConfig::Expr(declared.into())))
            .collect();
        self.config.types.insert(name.into(), fields);
        self
    }

    pub fn converter(mut self, key: impl Into<String>, name: impl Into<String>) -> Self {
        self.config.converters.insert(key.into(), name.into());
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
