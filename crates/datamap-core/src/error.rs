//! Error types for the datamap core library
//!
//! This module defines the error handling system for the mapping engine,
//! using thiserror for ergonomic error definitions and anyhow for flexible
//! error contexts raised by user-supplied converters.

use serde_json::Value;
use thiserror::Error;

/// Main error type for mapping operations
#[derive(Error, Debug)]
pub enum Error {
    /// Input shape does not match the operation's contract
    #[error("Invalid argument type {found} passed as data, expected {expected}!")]
    InvalidArgument {
        found: String,
        expected: String,
    },

    /// Discriminator-driven type lookup failed
    #[error("Type discovery failed: {message} (type: '{type_name}', namespace: '{namespace}')")]
    TypeDiscovery {
        type_name: String,
        namespace: String,
        message: String,
    },

    /// A converter rejected its input
    #[error("Conversion failed in converter '{converter}': {message}")]
    Conversion {
        converter: String,
        message: String,
        value: Option<Value>,
    },

    /// The converted record could not be turned into the target type
    #[error("Cannot construct '{type_name}' from record: {source}")]
    Construction {
        type_name: String,
        #[source]
        source: serde_json::Error,
    },

    /// Invalid engine configuration
    #[error("Configuration error: {message}")]
    Configuration {
        message: String,
    },

    /// JSON parsing and serialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// Generic internal error with context
    #[error("Internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an invalid argument error naming the JSON type that was found
    pub fn invalid_argument(found: &Value, expected: impl Into<String>) -> Self {
        Error::InvalidArgument {
            found: json_kind(found).to_string(),
            expected: expected.into(),
        }
    }

    /// Create a conversion error for the named converter
    pub fn conversion(converter: impl Into<String>, message: impl Into<String>, value: Option<Value>) -> Self {
        Error::Conversion {
            converter: converter.into(),
            message: message.into(),
            value,
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration {
            message: message.into(),
        }
    }

    /// True for failures that the materializer downgrades to a warning
    pub fn is_type_discovery(&self) -> bool {
        matches!(self, Error::TypeDiscovery { .. })
    }
}

/// Name of a JSON value's shape, as used in error messages
pub fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// Conversion implementations
impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Internal {
            message: err.to_string(),
            source: err,
        }
    }
}
