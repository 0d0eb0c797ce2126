//! Byte source reader
//!
//! Reads the complete bytes of a unit from a [`Locator`]. A unit is either
//! read whole or not at all: the declared size is validated first, the
//! buffer is allocated once, and a short or overlong read is an error.

use super::Locator;
use crate::error::{StrataError, StrataResult};
use std::fmt::Display;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Read every byte behind `locator`, rejecting sizes outside `1..=max`.
pub fn read_bytes(locator: &Locator, max: u64) -> StrataResult<Vec<u8>> {
    match locator {
        Locator::File { path, .. } => read_file(path, max),
        Locator::Archive { archive, entry } => archive.read_entry(entry, max),
    }
}

fn read_file(path: &Path, max: u64) -> StrataResult<Vec<u8>> {
    let file =
        File::open(path).map_err(|e| StrataError::io(format!("opening {}", path.display()), e))?;
    let declared = file
        .metadata()
        .map_err(|e| StrataError::io(format!("reading metadata of {}", path.display()), e))?
        .len();
    let size = check_size(&path.display(), declared, max)?;
    read_exact_bounded(file, size, &path.display())
}

/// Validate a declared size against the configured maximum and the
/// largest allocation the platform allows.
pub(crate) fn check_size(what: &dyn Display, size: u64, max: u64) -> StrataResult<usize> {
    let limit = max.min(isize::MAX as u64);
    if size == 0 || size > limit {
        return Err(StrataError::Size {
            locator: what.to_string(),
            size,
            max: limit,
        });
    }
    usize::try_from(size).map_err(|_| StrataError::Size {
        locator: what.to_string(),
        size,
        max: limit,
    })
}

/// Validate the size of a resource. Resources may be empty and are only
/// bounded by what the platform can allocate.
pub(crate) fn check_resource_size(what: &dyn Display, size: u64) -> StrataResult<usize> {
    let limit = isize::MAX as u64;
    if size > limit {
        return Err(StrataError::Size {
            locator: what.to_string(),
            size,
            max: limit,
        });
    }
    usize::try_from(size).map_err(|_| StrataError::Size {
        locator: what.to_string(),
        size,
        max: limit,
    })
}

/// Read exactly `size` bytes into a single allocation.
pub(crate) fn read_exact_bounded<R: Read>(
    reader: R,
    size: usize,
    what: &dyn Display,
) -> StrataResult<Vec<u8>> {
    let mut buf = Vec::with_capacity(size);
    // one extra byte so a source that grew since its size was taken is caught
    reader
        .take(size as u64 + 1)
        .read_to_end(&mut buf)
        .map_err(|e| StrataError::io(format!("reading {}", what), e))?;

    if buf.len() != size {
        return Err(StrataError::io(
            format!("reading {}", what),
            io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("expected {} bytes, got {}", size, buf.len()),
            ),
        ));
    }
    Ok(buf)
}
