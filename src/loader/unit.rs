//! Unit names, loaded units and security domains

use crate::source::PackageMetadata;
use sha2::{Digest, Sha256};
use std::borrow::Borrow;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::Path;
use std::sync::Arc;

/// Dotted, namespaced unit name (`org.example.Foo`).
///
/// Cheap to clone. Names handed out by the same cache share one allocation,
/// so equality usually short-circuits on pointer identity.
#[derive(Clone)]
pub struct UnitName(Arc<str>);

impl UnitName {
    pub(crate) fn from_arc(name: Arc<str>) -> Self {
        Self(name)
    }

    /// Borrow the name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether both names share one allocation
    pub fn same_instance(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl From<&str> for UnitName {
    fn from(name: &str) -> Self {
        Self(Arc::from(name))
    }
}

impl PartialEq for UnitName {
    fn eq(&self, other: &Self) -> bool {
        self.same_instance(other) || self.0 == other.0
    }
}

impl Eq for UnitName {}

impl Hash for UnitName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // must hash exactly like `str` for `Borrow<str>` lookups
        self.as_str().hash(state)
    }
}

impl Borrow<str> for UnitName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UnitName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for UnitName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", &*self.0)
    }
}

/// Where a loaded unit came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnitOrigin {
    /// Defined by the host loader
    Host,

    /// Read from a registered directory tree
    Directory(Arc<Path>),

    /// Extracted from a registered archive
    Archive(String),
}

impl fmt::Display for UnitOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Host => write!(f, "host"),
            Self::Directory(root) => write!(f, "dir:{}", root.display()),
            Self::Archive(origin) => write!(f, "archive:{}", origin),
        }
    }
}

/// Provenance tag shared by every unit from one origin
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SecurityDomain {
    /// Archive origin, or `None` for the default domain
    pub origin: Option<String>,

    /// Package metadata of the originating archive
    pub metadata: PackageMetadata,
}

impl SecurityDomain {
    /// Domain for an archive origin
    pub fn archive(origin: impl Into<String>, metadata: PackageMetadata) -> Self {
        Self {
            origin: Some(origin.into()),
            metadata,
        }
    }

    /// Whether this is the shared default domain
    pub fn is_default(&self) -> bool {
        self.origin.is_none()
    }
}

impl fmt::Display for SecurityDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.origin {
            None => write!(f, "default"),
            Some(origin) => match (&self.metadata.title, &self.metadata.version) {
                (Some(title), Some(version)) => write!(f, "{} ({} {})", origin, title, version),
                (Some(title), None) => write!(f, "{} ({})", origin, title),
                _ => write!(f, "{}", origin),
            },
        }
    }
}

/// A defined unit. Immutable once created.
#[derive(Debug)]
pub struct LoadedUnit {
    name: UnitName,
    bytes: Arc<[u8]>,
    origin: UnitOrigin,
    domain: Arc<SecurityDomain>,
    digest: String,
}

impl LoadedUnit {
    /// Define a unit from its complete bytes
    pub fn new(
        name: UnitName,
        bytes: impl Into<Arc<[u8]>>,
        origin: UnitOrigin,
        domain: Arc<SecurityDomain>,
    ) -> Self {
        let bytes = bytes.into();
        let digest = hex::encode(Sha256::digest(&bytes));
        Self {
            name,
            bytes,
            origin,
            domain,
            digest,
        }
    }

    /// Convenience for host loaders: a host-defined unit in the default domain
    pub fn host(name: &str, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self::new(
            UnitName::from(name),
            bytes,
            UnitOrigin::Host,
            Arc::new(SecurityDomain::default()),
        )
    }

    pub fn name(&self) -> &UnitName {
        &self.name
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn origin(&self) -> &UnitOrigin {
        &self.origin
    }

    pub fn domain(&self) -> &Arc<SecurityDomain> {
        &self.domain
    }

    /// SHA-256 of the unit bytes, hex encoded
    pub fn digest(&self) -> &str {
        &self.digest
    }
}
