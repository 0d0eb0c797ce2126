//! Resource locations

use serde::{Serialize, Serializer};
use std::fmt;
use std::path::PathBuf;

/// Location of a resolved resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceUrl {
    /// A file inside a registered directory
    File(PathBuf),

    /// An entry inside a registered archive
    Archive { origin: String, entry: String },

    /// A location issued by the host loader
    Host(String),
}

impl fmt::Display for ResourceUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "file://{}", path.display()),
            Self::Archive { origin, entry } => write!(f, "zip:{}!/{}", origin, entry),
            Self::Host(url) => f.write_str(url),
        }
    }
}

impl Serialize for ResourceUrl {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
