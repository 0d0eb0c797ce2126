//! Host (parent) loader capability
//!
//! The loader defers to its host for units and falls back to it for
//! resources. Anything that can answer these lookups can act as a host,
//! including another [`UnitLoader`](super::UnitLoader).

use super::resource::ResourceUrl;
use super::unit::LoadedUnit;
use crate::error::StrataResult;
use std::io::Read;
use std::sync::Arc;

/// Readable resource stream
pub type ResourceStream = Box<dyn Read + Send>;

/// Lookups a host loader answers
pub trait HostLoader: Send + Sync {
    /// Resolve a unit the host already knows
    fn load_unit(&self, name: &str) -> Option<Arc<LoadedUnit>>;

    /// First location of a resource
    fn find_resource(&self, name: &str) -> Option<ResourceUrl>;

    /// Every location of a resource, in host order
    fn find_all_resources(&self, name: &str) -> Vec<ResourceUrl>;

    /// Open a location this host issued
    fn open_resource(&self, _url: &ResourceUrl) -> StrataResult<Option<ResourceStream>> {
        Ok(None)
    }

    /// Resolve the dependencies of a freshly returned unit
    fn link(&self, _unit: &LoadedUnit) {}
}

/// A host that knows nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NoHost;

impl HostLoader for NoHost {
    fn load_unit(&self, _name: &str) -> Option<Arc<LoadedUnit>> {
        None
    }

    fn find_resource(&self, _name: &str) -> Option<ResourceUrl> {
        None
    }

    fn find_all_resources(&self, _name: &str) -> Vec<ResourceUrl> {
        Vec::new()
    }
}
