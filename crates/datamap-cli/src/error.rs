//! Error types and handling for the CLI
//!
//! Every failure mode of the `datamap` binary maps to one variant here and
//! to a distinct process exit code.

use std::io;
use std::path::PathBuf;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for CLI operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error (file operations, etc.)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Error from the mapping engine
    #[error("Mapping error: {0}")]
    Core(#[from] datamap_core::Error),

    #[error("File not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    /// Input could not be parsed in the expected format
    #[error("Invalid file format for {}: expected {}", path.display(), expected)]
    InvalidFormat { path: PathBuf, expected: String },

    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid argument combination
    #[error("Invalid arguments: {0}")]
    InvalidArgs(String),

    #[error("Profile '{}' not found", name)]
    ProfileNotFound { name: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("TOML error: {0}")]
    Toml(String),

    /// Generic error with context
    #[error("{message}")]
    Other { message: String },
}

impl Error {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn invalid_args(message: impl Into<String>) -> Self {
        Self::InvalidArgs(message.into())
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Io(_) => 1,
            Self::Core(_) => 2,
            Self::FileNotFound { .. } => 3,
            Self::InvalidFormat { .. } => 4,
            Self::Config(_) => 5,
            Self::InvalidArgs(_) => 6,
            Self::ProfileNotFound { .. } => 7,
            Self::Json(_) => 12,
            Self::Yaml(_) => 13,
            Self::Toml(_) => 14,
            Self::Other { .. } => 99,
        }
    }

    /// Check if this error should display usage help
    pub fn should_show_help(&self) -> bool {
        matches!(self, Self::InvalidArgs(_))
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Self::Toml(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Self::Toml(err.to_string())
    }
}

/// Extension trait for adding context to fallible results
pub trait ErrorContext<T> {
    /// Add context with a closure (only evaluated on error)
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: Into<Error>,
{
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other {
                message: format!("{}: {}", f(), inner),
            }
        })
    }
}

/// Format an error for display to the user
pub fn format_error(error: &Error, use_color: bool) -> String {
    if use_color {
        use colored::Colorize;
        format!("{} {}", "Error:".red().bold(), error)
    } else {
        format!("Error: {}", error)
    }
}
