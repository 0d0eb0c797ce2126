//! Package manifest parsing
//!
//! An archive may carry a `META-INF/package.toml` manifest describing the
//! package. It is read lazily, the first time a unit from that archive is
//! defined.

use crate::error::{StrataError, StrataResult};
use serde::{Deserialize, Serialize};

/// Archive entry holding the package manifest
pub const MANIFEST_ENTRY: &str = "META-INF/package.toml";

/// Parsed manifest file
#[derive(Debug, Clone, Default, Deserialize)]
struct PackageManifest {
    #[serde(default)]
    package: PackageMetadata,
}

/// Package section of the manifest
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackageMetadata {
    /// Human-readable package title
    pub title: Option<String>,

    /// Package version string
    pub version: Option<String>,

    /// Vendor or publisher
    pub vendor: Option<String>,

    /// Whether all units of the package must come from this archive
    pub sealed: bool,

    /// Location the seal refers to
    pub seal_base: Option<String>,
}

impl PackageMetadata {
    /// Parse metadata from manifest text
    pub fn parse(content: &str) -> StrataResult<Self> {
        let manifest: PackageManifest =
            toml::from_str(content).map_err(|e| StrataError::ConfigInvalid {
                path: MANIFEST_ENTRY.into(),
                reason: e.to_string(),
            })?;
        Ok(manifest.package)
    }

    /// True when the manifest said nothing
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
