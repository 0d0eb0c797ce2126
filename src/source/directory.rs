//! Directory sources
//!
//! A directory tree is walked once at registration; every file carrying the
//! unit suffix is recorded under the dotted name of its relative path.

use super::unit_name_from_path;
use crate::error::{StrataError, StrataResult};
use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use tracing::debug;
use walkdir::WalkDir;

/// One registered directory tree
#[derive(Debug)]
pub struct DirectorySource {
    root: Arc<Path>,
    units: Vec<(String, PathBuf)>,
}

impl DirectorySource {
    /// Walk `root` and index its unit files.
    pub fn scan(root: &Path, suffix: &str) -> StrataResult<Self> {
        if !root.exists() {
            return Err(StrataError::invalid_source(root, "directory does not exist"));
        }
        if !root.is_dir() {
            return Err(StrataError::invalid_source(root, "not a directory"));
        }
        let root = root
            .canonicalize()
            .map_err(|e| StrataError::invalid_source(root, e.to_string()))?;

        let mut seen = HashSet::new();
        let mut units = Vec::new();
        for entry in WalkDir::new(&root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
        {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    debug!("Skipping unreadable entry under {}: {}", root.display(), e);
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let Some(rel) = rel_path_slash(entry.path(), &root) else {
                continue;
            };
            let Some(name) = unit_name_from_path(&rel, suffix) else {
                continue;
            };
            if !seen.insert(name.clone()) {
                debug!("Duplicate unit {} in {}, keeping first", name, root.display());
                continue;
            }
            units.push((name, entry.into_path()));
        }

        debug!("Indexed directory {}: {} units", root.display(), units.len());

        Ok(Self {
            root: Arc::from(root.as_path()),
            units,
        })
    }

    /// Canonical root of the tree
    pub fn root(&self) -> &Arc<Path> {
        &self.root
    }

    /// `(unit name, absolute file path)` pairs in walk order
    pub fn units(&self) -> &[(String, PathBuf)] {
        &self.units
    }

    /// Path of a resource inside this tree, if it exists as a file.
    ///
    /// Names that would escape the root are never resolved.
    pub fn resource_path(&self, name: &str) -> Option<PathBuf> {
        let rel = Path::new(name);
        if rel
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
        {
            return None;
        }
        let path = self.root.join(rel);
        path.is_file().then_some(path)
    }
}

/// Relative path with `/` separators, or `None` for non-UTF-8 paths
fn rel_path_slash(path: &Path, root: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let parts: Option<Vec<&str>> = rel.components().map(|c| c.as_os_str().to_str()).collect();
    Some(parts?.join("/"))
}
