//! Code unit loader
//!
//! Resolves units and resources from a host loader plus the directory and
//! archive sources registered at runtime.
//!
//! # Precedence
//!
//! | Lookup | Order |
//! |--------|-------|
//! | units | cache → host → directories → archives |
//! | resources | cache → directories → archives → host |
//!
//! Units defer to the host so a name the host has already bound is never
//! defined a second time. Resources prefer local sources so deployment
//! content overrides what the host ships.
//!
//! # Concurrency
//!
//! Lookups never take a lock on the hot path: caches are sharded concurrent
//! maps and the source index is an immutable snapshot swapped atomically on
//! registration. Two threads may both read and define the same unit, but
//! only the first cache insert is ever returned.

pub mod cache;
pub mod host;
pub mod probe;
pub mod resource;
pub mod stats;
pub mod unit;

pub use cache::ResolutionCache;
pub use host::{HostLoader, NoHost, ResourceStream};
pub use probe::ProbeFilter;
pub use resource::ResourceUrl;
pub use stats::{LoaderStats, StatsSnapshot};
pub use unit::{LoadedUnit, SecurityDomain, UnitName, UnitOrigin};

use crate::config::Config;
use crate::error::{StrataError, StrataResult, UnitNotFound};
use crate::source::{
    self, normalize_resource_name, ArchiveSource, DirectorySource, Locator, DEFAULT_UNIT_SUFFIX,
};
use arc_swap::ArcSwap;
use dashmap::DashMap;
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::HashMap;
use std::fs::File;
use std::io::{Cursor, Read, Seek};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info, trace, warn};

/// Default upper bound for a single unit (64 MiB)
pub const DEFAULT_MAX_UNIT_SIZE: u64 = 64 * 1024 * 1024;

/// Runtime settings of a loader
#[derive(Debug, Clone)]
pub struct LoaderOptions {
    /// File suffix marking compiled units
    pub unit_suffix: String,

    /// Largest unit accepted, in bytes
    pub max_unit_size: u64,

    /// Remember failed unit lookups
    pub negative_cache: bool,

    /// Names whose outcome is never remembered
    pub probe: ProbeFilter,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            unit_suffix: DEFAULT_UNIT_SUFFIX.to_string(),
            max_unit_size: DEFAULT_MAX_UNIT_SIZE,
            negative_cache: true,
            probe: ProbeFilter::default(),
        }
    }
}

/// Kind of a registered source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Directory,
    Archive,
}

/// Summary of one registered source
#[derive(Debug, Clone, Serialize)]
pub struct SourceInfo {
    pub kind: SourceKind,
    pub location: String,
    /// Unit files found in the source
    pub units: usize,
    /// Units this source actually provides (not shadowed)
    pub indexed: usize,
}

/// Immutable view of the registered sources
#[derive(Debug, Clone, Default)]
struct SourceSet {
    directories: Vec<Arc<DirectorySource>>,
    archives: Vec<Arc<ArchiveSource>>,
    directory_units: HashMap<UnitName, Locator>,
    archive_units: HashMap<UnitName, Locator>,
    infos: Vec<SourceInfo>,
}

/// The loader
pub struct UnitLoader {
    host: Arc<dyn HostLoader>,
    options: LoaderOptions,
    cache: ResolutionCache,
    sources: ArcSwap<SourceSet>,
    register_lock: Mutex<()>,
    domains: DashMap<String, Arc<SecurityDomain>>,
    default_domain: Arc<SecurityDomain>,
    stats: LoaderStats,
    /// Bumped by every `clear_negative_cache`
    generation: AtomicU64,
}

impl UnitLoader {
    /// Create a loader over `host` with its own cache
    pub fn new(host: Arc<dyn HostLoader>, options: LoaderOptions) -> Self {
        Self::with_cache(host, options, ResolutionCache::new())
    }

    /// Create a loader around an explicitly provided cache
    pub fn with_cache(
        host: Arc<dyn HostLoader>,
        options: LoaderOptions,
        cache: ResolutionCache,
    ) -> Self {
        Self {
            host,
            options,
            cache,
            sources: ArcSwap::from_pointee(SourceSet::default()),
            register_lock: Mutex::new(()),
            domains: DashMap::new(),
            default_domain: Arc::new(SecurityDomain::default()),
            stats: LoaderStats::default(),
            generation: AtomicU64::new(0),
        }
    }

    /// Build a loader and register every source listed in `config`, in order.
    pub fn from_config(config: &Config, host: Arc<dyn HostLoader>) -> StrataResult<Self> {
        let loader = Self::new(host, LoaderOptions::from(config));
        for dir in &config.sources.directories {
            loader.register_directory(dir)?;
        }
        for archive in &config.sources.archives {
            loader.register_archive_path(archive)?;
        }
        Ok(loader)
    }

    pub fn options(&self) -> &LoaderOptions {
        &self.options
    }

    /// Load a unit by name.
    pub fn load_unit(&self, name: &str) -> StrataResult<Arc<LoadedUnit>> {
        self.load_unit_with(name, false)
    }

    /// Load a unit, optionally asking the host to link it right away.
    pub fn load_unit_with(&self, name: &str, resolve: bool) -> StrataResult<Arc<LoadedUnit>> {
        let unit = self.lookup_unit(name)?;
        if resolve {
            self.host.link(&unit);
        }
        Ok(unit)
    }

    /// Like [`load_unit`](Self::load_unit) but absence is `Ok(None)`.
    pub fn find_unit(&self, name: &str) -> StrataResult<Option<Arc<LoadedUnit>>> {
        match self.load_unit(name) {
            Ok(unit) => Ok(Some(unit)),
            Err(StrataError::UnitNotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Define a unit directly. Fails if the name is already defined.
    pub fn preload(&self, unit: LoadedUnit) -> StrataResult<Arc<LoadedUnit>> {
        let name = self.cache.intern(unit.name().as_str());
        self.cache.define_unit(name, Arc::new(unit))
    }

    fn lookup_unit(&self, name: &str) -> StrataResult<Arc<LoadedUnit>> {
        if let Some(unit) = self.cache.unit(name) {
            self.stats.cache_hit();
            trace!("Unit cache hit: {}", name);
            return Ok(unit);
        }

        if self.options.negative_cache {
            if let Some(miss) = self.cache.not_found(name) {
                self.stats.negative_hit();
                trace!("Negative cache hit: {}", name);
                return Err(StrataError::UnitNotFound(miss));
            }
        }

        // a miss against this snapshot is only remembered if no clear happened since
        let generation = self.generation.load(Ordering::SeqCst);
        let sources = self.sources.load_full();

        self.stats.host_lookup();
        if let Some(unit) = self.host.load_unit(name) {
            return Ok(self.cache.insert_unit(self.cache.intern(name), unit));
        }

        self.stats.local_search();
        let candidates = [
            sources.directory_units.get_key_value(name),
            sources.archive_units.get_key_value(name),
        ];
        for (key, locator) in candidates.into_iter().flatten() {
            self.stats.byte_read();
            match source::read_bytes(locator, self.options.max_unit_size) {
                Ok(bytes) => return Ok(self.define(key.clone(), bytes, locator)),
                Err(e) => warn!("Skipping {} for {}: {}", locator, name, e),
            }
        }

        Err(self.not_found(name, &sources, generation))
    }

    fn define(&self, name: UnitName, bytes: Vec<u8>, locator: &Locator) -> Arc<LoadedUnit> {
        let (origin, domain) = match locator {
            Locator::File { root, .. } => {
                (UnitOrigin::Directory(root.clone()), self.default_domain.clone())
            }
            Locator::Archive { archive, .. } => (
                UnitOrigin::Archive(archive.origin().to_string()),
                self.domain_for(archive),
            ),
        };

        self.stats.definition();
        let defined = Arc::new(LoadedUnit::new(name.clone(), bytes, origin, domain));
        let kept = self.cache.insert_unit(name, defined.clone());
        if !Arc::ptr_eq(&kept, &defined) {
            debug!("Lost definition race for {}, using cached unit", kept.name());
        }
        kept
    }

    /// One domain per archive origin; metadata is read on first use.
    fn domain_for(&self, archive: &ArchiveSource) -> Arc<SecurityDomain> {
        if let Some(domain) = self.domains.get(archive.origin()) {
            return domain.value().clone();
        }
        let domain = SecurityDomain::archive(archive.origin(), archive.metadata().clone());
        self.domains
            .entry(archive.origin().to_string())
            .or_insert_with(|| Arc::new(domain))
            .value()
            .clone()
    }

    fn not_found(&self, name: &str, sources: &SourceSet, generation: u64) -> StrataError {
        let miss = Arc::new(UnitNotFound {
            name: name.to_string(),
            searched: format!(
                "host, {} directories, {} archives",
                sources.directories.len(),
                sources.archives.len()
            ),
        });

        let memoize = self.options.negative_cache
            && self.options.probe.memoize_unit_miss(name)
            && self.generation.load(Ordering::SeqCst) == generation;
        let miss = if memoize {
            let kept = self.cache.remember_not_found(self.cache.intern(name), miss);
            // a clear that raced the insert wins
            if self.generation.load(Ordering::SeqCst) != generation {
                self.cache.forget_not_found(name, &kept);
            }
            kept
        } else {
            miss
        };
        debug!("Unit not found: {}", name);
        StrataError::UnitNotFound(miss)
    }

    /// Forget every remembered miss so the next lookup searches again.
    pub fn clear_negative_cache(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        let dropped = self.cache.clear_not_found();
        debug!("Cleared {} remembered misses", dropped);
    }

    /// First location of a resource: directories, then archives, then host.
    pub fn find_resource(&self, name: &str) -> Option<ResourceUrl> {
        let name = normalize_resource_name(name);
        let memoize = self.options.probe.memoize_resource(name);
        if memoize {
            if let Some(hit) = self.cache.resource(name) {
                return hit;
            }
        }

        let found = self.locate_resource(name);
        if memoize {
            self.cache.remember_resource(name, found)
        } else {
            found
        }
    }

    fn locate_resource(&self, name: &str) -> Option<ResourceUrl> {
        let sources = self.sources.load();
        for dir in &sources.directories {
            if let Some(path) = dir.resource_path(name) {
                return Some(ResourceUrl::File(path));
            }
        }
        for archive in &sources.archives {
            if archive.has_entry(name) {
                return Some(archive_url(archive, name));
            }
        }
        self.host.find_resource(name)
    }

    /// Every location of a resource, local sources first, host last.
    pub fn find_all_resources(&self, name: &str) -> Vec<ResourceUrl> {
        let name = normalize_resource_name(name);
        let memoize = self.options.probe.memoize_resource(name);
        if memoize {
            if let Some(hit) = self.cache.resource_list(name) {
                return hit.to_vec();
            }
        }

        let sources = self.sources.load();
        let mut found: Vec<ResourceUrl> = sources
            .directories
            .iter()
            .filter_map(|dir| dir.resource_path(name).map(ResourceUrl::File))
            .collect();
        found.extend(
            sources
                .archives
                .iter()
                .filter(|archive| archive.has_entry(name))
                .map(|archive| archive_url(archive, name)),
        );
        found.extend(self.host.find_all_resources(name));

        if memoize {
            self.cache.remember_resource_list(name, found).to_vec()
        } else {
            found
        }
    }

    /// Open the first location of a resource for reading.
    pub fn open_resource_stream(&self, name: &str) -> StrataResult<Option<ResourceStream>> {
        match self.find_resource(name) {
            Some(url) => self.open_url(&url),
            None => Ok(None),
        }
    }

    fn open_url(&self, url: &ResourceUrl) -> StrataResult<Option<ResourceStream>> {
        match url {
            ResourceUrl::File(path) => {
                let file = File::open(path)
                    .map_err(|e| StrataError::io(format!("opening {}", path.display()), e))?;
                let stream: ResourceStream = Box::new(file);
                Ok(Some(stream))
            }
            ResourceUrl::Archive { origin, entry } => {
                let sources = self.sources.load();
                match sources.archives.iter().find(|a| a.origin() == origin.as_str()) {
                    Some(archive) => {
                        let bytes = archive.read_resource(entry)?;
                        let stream: ResourceStream = Box::new(Cursor::new(bytes));
                        Ok(Some(stream))
                    }
                    None => self.host.open_resource(url),
                }
            }
            ResourceUrl::Host(_) => self.host.open_resource(url),
        }
    }

    /// Register a directory tree. Returns how many units it contributes.
    pub fn register_directory(&self, root: &Path) -> StrataResult<usize> {
        let dir = Arc::new(DirectorySource::scan(root, &self.options.unit_suffix)?);

        let _guard = self.register_lock.lock();
        let mut next = SourceSet::clone(&self.sources.load());
        let mut indexed = 0;
        for (name, path) in dir.units() {
            if self.cache.contains_unit(name) || next.directory_units.contains_key(name.as_str()) {
                debug!("Unit {} already known, shadowed in {}", name, dir.root().display());
                continue;
            }
            next.directory_units.insert(
                self.cache.intern(name),
                Locator::File {
                    root: dir.root().clone(),
                    path: path.clone(),
                },
            );
            indexed += 1;
        }

        next.infos.push(SourceInfo {
            kind: SourceKind::Directory,
            location: dir.root().display().to_string(),
            units: dir.units().len(),
            indexed,
        });
        info!(
            "Registered directory {} ({} units, {} shadowed)",
            dir.root().display(),
            indexed,
            dir.units().len() - indexed
        );
        next.directories.push(dir);
        self.sources.store(Arc::new(next));
        Ok(indexed)
    }

    /// Register a zip file on disk; its canonical path is the origin.
    pub fn register_archive_path(&self, path: &Path) -> StrataResult<usize> {
        let archive = ArchiveSource::open_path(path, &self.options.unit_suffix)?;
        Ok(self.add_archive(archive))
    }

    /// Register an archive read from any seekable handle.
    pub fn register_archive<R>(&self, handle: R, origin: impl Into<String>) -> StrataResult<usize>
    where
        R: Read + Seek + Send + 'static,
    {
        let archive = ArchiveSource::open(handle, origin, &self.options.unit_suffix)?;
        Ok(self.add_archive(archive))
    }

    fn add_archive(&self, archive: ArchiveSource) -> usize {
        let archive = Arc::new(archive);

        let _guard = self.register_lock.lock();
        let mut next = SourceSet::clone(&self.sources.load());
        let mut indexed = 0;
        for (name, entry) in archive.units() {
            if self.cache.contains_unit(name)
                || next.directory_units.contains_key(name.as_str())
                || next.archive_units.contains_key(name.as_str())
            {
                debug!("Unit {} already known, shadowed in {}", name, archive.origin());
                continue;
            }
            next.archive_units.insert(
                self.cache.intern(name),
                Locator::Archive {
                    archive: archive.clone(),
                    entry: entry.clone(),
                },
            );
            indexed += 1;
        }

        next.infos.push(SourceInfo {
            kind: SourceKind::Archive,
            location: archive.origin().to_string(),
            units: archive.units().len(),
            indexed,
        });
        info!(
            "Registered archive {} ({} units, {} shadowed)",
            archive.origin(),
            indexed,
            archive.units().len() - indexed
        );
        next.archives.push(archive);
        self.sources.store(Arc::new(next));
        indexed
    }

    /// Registered sources in registration order
    pub fn sources(&self) -> Vec<SourceInfo> {
        self.sources.load().infos.clone()
    }

    /// Whether some registered source provides `name`
    pub fn is_indexed(&self, name: &str) -> bool {
        let sources = self.sources.load();
        sources.directory_units.contains_key(name) || sources.archive_units.contains_key(name)
    }

    pub fn cached_unit_count(&self) -> usize {
        self.cache.unit_count()
    }

    pub fn negative_cache_len(&self) -> usize {
        self.cache.not_found_count()
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }
}

impl HostLoader for UnitLoader {
    fn load_unit(&self, name: &str) -> Option<Arc<LoadedUnit>> {
        match UnitLoader::find_unit(self, name) {
            Ok(unit) => unit,
            Err(e) => {
                warn!("Parent loader failed for {}: {}", name, e);
                None
            }
        }
    }

    fn find_resource(&self, name: &str) -> Option<ResourceUrl> {
        UnitLoader::find_resource(self, name)
    }

    fn find_all_resources(&self, name: &str) -> Vec<ResourceUrl> {
        UnitLoader::find_all_resources(self, name)
    }

    fn open_resource(&self, url: &ResourceUrl) -> StrataResult<Option<ResourceStream>> {
        self.open_url(url)
    }

    fn link(&self, unit: &LoadedUnit) {
        self.host.link(unit);
    }
}

impl From<&Config> for LoaderOptions {
    fn from(config: &Config) -> Self {
        let suffix = &config.loader.unit_suffix;
        let mut probe = config.probe.clone();
        if probe.resource_suffixes == ProbeFilter::default().resource_suffixes {
            probe.resource_suffixes = vec![suffix.clone()];
        }
        Self {
            unit_suffix: suffix.clone(),
            max_unit_size: config.loader.max_unit_size,
            negative_cache: config.loader.negative_cache,
            probe,
        }
    }
}

fn archive_url(archive: &ArchiveSource, entry: &str) -> ResourceUrl {
    ResourceUrl::Archive {
        origin: archive.origin().to_string(),
        entry: entry.to_string(),
    }
}
