//! Error types for Strata
//!
//! All modules use `StrataResult<T>` as their return type.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

/// Result type alias for Strata operations
pub type StrataResult<T> = Result<T, StrataError>;

/// A failed unit lookup.
///
/// Built once per name and shared through the negative cache, so repeated
/// misses hand out the same record instead of rebuilding it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitNotFound {
    /// The requested unit name
    pub name: String,

    /// Human-readable summary of the sources that were searched
    pub searched: String,
}

impl fmt::Display for UnitNotFound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (searched: {})", self.name, self.searched)
    }
}

/// All errors that can occur in Strata
#[derive(Error, Debug)]
pub enum StrataError {
    // Resolution errors
    #[error("Unit not found: {0}")]
    UnitNotFound(Arc<UnitNotFound>),

    #[error("Unit defined twice: {0}")]
    DuplicateDefinition(String),

    // Source errors
    #[error("Invalid source {path}: {reason}")]
    InvalidSource { path: PathBuf, reason: String },

    #[error("Invalid size {size} for {locator} (max {max})")]
    Size { locator: String, size: u64, max: u64 },

    #[error("Archive error: {context}")]
    Archive {
        context: String,
        #[source]
        source: zip::result::ZipError,
    },

    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Failed to create config directory {path}: {source}")]
    ConfigDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    // General errors
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("{0}")]
    User(String),
}

impl StrataError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create an archive error with context
    pub fn archive(context: impl Into<String>, source: zip::result::ZipError) -> Self {
        Self::Archive {
            context: context.into(),
            source,
        }
    }

    /// Create an invalid source error
    pub fn invalid_source(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::InvalidSource {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Whether this is the expected "no source has it" outcome
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::UnitNotFound(_))
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::UnitNotFound(_) => {
                Some("Register the directory or archive that provides it (--dir / --archive)")
            }
            Self::InvalidSource { .. } => Some("Check that the path exists and is readable"),
            Self::ConfigInvalid { .. } => Some("Run: strata config show"),
            _ => None,
        }
    }
}
