//! Unit sources
//!
//! A source is a directory tree or a zip archive registered with the loader.
//! Each is enumerated exactly once when registered; unit bytes are only read
//! on demand through a [`Locator`].
//!
//! # Naming
//!
//! | Unit name | Relative path / archive entry |
//! |-----------|-------------------------------|
//! | `a.b.Foo` | `a/b/Foo.unit`                |
//! | `Top`     | `Top.unit`                    |

pub mod archive;
pub mod directory;
pub mod manifest;
pub mod reader;

pub use archive::ArchiveSource;
pub use directory::DirectorySource;
pub use manifest::PackageMetadata;
pub use reader::read_bytes;

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Default suffix for compiled unit files
pub const DEFAULT_UNIT_SUFFIX: &str = ".unit";

/// Where the bytes of one unit live
#[derive(Debug, Clone)]
pub enum Locator {
    /// A file inside a registered directory
    File { root: Arc<Path>, path: PathBuf },

    /// An entry inside a registered archive
    Archive {
        archive: Arc<ArchiveSource>,
        entry: String,
    },
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File { path, .. } => write!(f, "{}", path.display()),
            Self::Archive { archive, entry } => write!(f, "{}!/{}", archive.origin(), entry),
        }
    }
}

/// Derive a dotted unit name from a slash-separated relative path.
///
/// Returns `None` when the path does not carry the unit suffix or has an
/// empty segment.
pub fn unit_name_from_path(rel: &str, suffix: &str) -> Option<String> {
    let stem = rel.strip_suffix(suffix)?;
    if stem.is_empty() || stem.split('/').any(|seg| seg.is_empty() || seg.contains('.')) {
        return None;
    }
    Some(stem.replace('/', "."))
}

/// The archive entry (or relative path) a unit name maps to.
pub fn unit_entry_path(name: &str, suffix: &str) -> String {
    format!("{}{}", name.replace('.', "/"), suffix)
}

/// Normalize a resource name: strip leading slashes.
pub fn normalize_resource_name(name: &str) -> &str {
    name.trim_start_matches('/')
}
