//! Probe-name filter
//!
//! Dynamic front ends speculatively probe for names that can never exist:
//! synthetic helper units (`Foo$1`, `Foo$Inner`) and conventional helper
//! suffixes (`FooBeanInfo`). Each variant is asked about roughly once, so
//! remembering the miss only grows the cache. These names are resolved
//! normally but their outcome is not memoized.

use serde::{Deserialize, Serialize};

/// Name patterns that are never memoized
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeFilter {
    /// Unit-name substrings marking synthetic helper lookups
    pub unit_markers: Vec<String>,

    /// Unit-name suffixes of helper lookups
    pub unit_suffixes: Vec<String>,

    /// Resource-name suffixes probed for but rarely present
    pub resource_suffixes: Vec<String>,
}

impl Default for ProbeFilter {
    fn default() -> Self {
        Self {
            unit_markers: vec!["$".to_string()],
            unit_suffixes: vec!["BeanInfo".to_string(), "Customizer".to_string()],
            resource_suffixes: vec![crate::source::DEFAULT_UNIT_SUFFIX.to_string()],
        }
    }
}

impl ProbeFilter {
    /// A filter that memoizes everything
    pub fn none() -> Self {
        Self {
            unit_markers: Vec::new(),
            unit_suffixes: Vec::new(),
            resource_suffixes: Vec::new(),
        }
    }

    /// Whether a failed unit lookup may go into the negative cache
    pub fn memoize_unit_miss(&self, name: &str) -> bool {
        !self.unit_markers.iter().any(|m| name.contains(m.as_str()))
            && !self.unit_suffixes.iter().any(|s| name.ends_with(s.as_str()))
    }

    /// Whether a resource lookup result may be cached at all
    pub fn memoize_resource(&self, name: &str) -> bool {
        !self
            .resource_suffixes
            .iter()
            .any(|s| name.ends_with(s.as_str()))
    }
}
