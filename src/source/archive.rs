//! Archive sources
//!
//! A zip package is enumerated once at registration. Unit entries are
//! recorded by name so their bytes can be extracted later, in resolution
//! order; nothing is decompressed up front. Package metadata is parsed the
//! first time it is asked for.

use super::manifest::{PackageMetadata, MANIFEST_ENTRY};
use super::reader::{check_resource_size, check_size, read_exact_bounded};
use super::unit_name_from_path;
use crate::error::{StrataError, StrataResult};
use parking_lot::Mutex;
use std::collections::HashSet;
use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;
use std::sync::OnceLock;
use tracing::{debug, warn};
use zip::ZipArchive;

/// Upper bound for the manifest entry
const MAX_MANIFEST_SIZE: u64 = 64 * 1024;

/// Any seekable byte stream an archive can be read from
pub trait ArchiveReader: Read + Seek + Send {}

impl<T: Read + Seek + Send> ArchiveReader for T {}

type Handle = ZipArchive<Box<dyn ArchiveReader + Send>>;

/// One registered zip package
pub struct ArchiveSource {
    origin: String,
    handle: Mutex<Handle>,
    units: Vec<(String, String)>,
    resources: HashSet<String>,
    metadata: OnceLock<PackageMetadata>,
}

impl ArchiveSource {
    /// Open an archive from any seekable reader and index its entries.
    pub fn open<R>(reader: R, origin: impl Into<String>, suffix: &str) -> StrataResult<Self>
    where
        R: Read + Seek + Send + 'static,
    {
        let origin = origin.into();
        let boxed: Box<dyn ArchiveReader + Send> = Box::new(reader);
        let handle = ZipArchive::new(boxed)
            .map_err(|e| StrataError::invalid_source(&origin, format!("not a zip archive: {}", e)))?;

        let mut units = Vec::new();
        let mut resources = HashSet::new();
        for entry in handle.file_names() {
            if entry.ends_with('/') {
                continue;
            }
            resources.insert(entry.to_string());
            if let Some(name) = unit_name_from_path(entry, suffix) {
                units.push((name, entry.to_string()));
            }
        }
        units.sort();

        debug!(
            "Indexed archive {}: {} units, {} entries",
            origin,
            units.len(),
            resources.len()
        );

        Ok(Self {
            origin,
            handle: Mutex::new(handle),
            units,
            resources,
            metadata: OnceLock::new(),
        })
    }

    /// Open a zip file on disk; its path becomes the origin.
    pub fn open_path(path: &Path, suffix: &str) -> StrataResult<Self> {
        if !path.is_file() {
            return Err(StrataError::invalid_source(path, "archive file does not exist"));
        }
        let path = path
            .canonicalize()
            .map_err(|e| StrataError::invalid_source(path, e.to_string()))?;
        let file =
            File::open(&path).map_err(|e| StrataError::invalid_source(&path, e.to_string()))?;
        Self::open(BufReader::new(file), path.display().to_string(), suffix)
    }

    /// Where this archive came from
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// `(unit name, entry name)` pairs, sorted by name
    pub fn units(&self) -> &[(String, String)] {
        &self.units
    }

    /// Whether a file entry with this exact name exists
    pub fn has_entry(&self, entry: &str) -> bool {
        self.resources.contains(entry)
    }

    /// Number of file entries
    pub fn entry_count(&self) -> usize {
        self.resources.len()
    }

    /// Extract one entry completely.
    pub fn read_entry(&self, entry: &str, max: u64) -> StrataResult<Vec<u8>> {
        let what = format!("{}!/{}", self.origin, entry);
        let mut handle = self.handle.lock();
        let file = handle
            .by_name(entry)
            .map_err(|e| StrataError::archive(format!("opening {}", what), e))?;
        let size = check_size(&what, file.size(), max)?;
        read_exact_bounded(file, size, &what)
    }

    /// Extract a resource entry. Unlike units, it may be empty and is not
    /// held to the unit size limit.
    pub fn read_resource(&self, entry: &str) -> StrataResult<Vec<u8>> {
        let what = format!("{}!/{}", self.origin, entry);
        let mut handle = self.handle.lock();
        let file = handle
            .by_name(entry)
            .map_err(|e| StrataError::archive(format!("opening {}", what), e))?;
        let size = check_resource_size(&what, file.size())?;
        read_exact_bounded(file, size, &what)
    }

    /// Package metadata, parsed on first use
    pub fn metadata(&self) -> &PackageMetadata {
        self.metadata.get_or_init(|| self.load_metadata())
    }

    /// Whether [`metadata`](Self::metadata) has been computed yet
    pub fn metadata_loaded(&self) -> bool {
        self.metadata.get().is_some()
    }

    fn load_metadata(&self) -> PackageMetadata {
        if !self.has_entry(MANIFEST_ENTRY) {
            return PackageMetadata::default();
        }

        let parsed = self
            .read_entry(MANIFEST_ENTRY, MAX_MANIFEST_SIZE)
            .and_then(|bytes| {
                String::from_utf8(bytes)
                    .map_err(|e| StrataError::User(format!("manifest is not UTF-8: {}", e)))
            })
            .and_then(|text| PackageMetadata::parse(&text));

        match parsed {
            Ok(meta) => meta,
            Err(e) => {
                warn!("Ignoring manifest of {}: {}", self.origin, e);
                PackageMetadata::default()
            }
        }
    }
}

impl fmt::Debug for ArchiveSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArchiveSource")
            .field("origin", &self.origin)
            .field("units", &self.units.len())
            .field("entries", &self.resources.len())
            .finish()
    }
}
