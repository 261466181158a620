//! Non-recursive enumeration of a source directory.
//!
//! Every entry is kept regardless of its kind: files, directories, symlinks
//! and special files all form part of the population to sample from. The
//! order of the returned listing is whatever the filesystem yields.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::fs_op::error::SubsetError;
use crate::fs_op::stat::PathType;

/// A single entry directly contained in a source directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Base name, kept as an `OsString` so non UTF-8 names survive the move.
    pub name: OsString,
    pub path: PathBuf,
    /// Kind of the entry itself; symlinks are not followed.
    pub kind: PathType,
}

/// Read the entries directly contained in `source`.
///
/// A missing or empty path, or one that is not a directory, yields
/// `SourceNotFound`; an unreadable directory yields `PermissionDenied`.
pub fn list_entries(source: &Path) -> Result<Vec<Entry>, SubsetError> {
    if source.as_os_str().is_empty() {
        return Err(SubsetError::SourceNotFound {
            path: source.to_path_buf(),
            source: Some(io::Error::new(io::ErrorKind::InvalidInput, "empty path")),
        });
    }
    if PathType::of(source) != PathType::Directory {
        return Err(SubsetError::SourceNotFound {
            path: source.to_path_buf(),
            source: None,
        });
    }

    let rd = fs::read_dir(source).map_err(|e| SubsetError::source_io(source, e))?;
    let mut entries = Vec::new();
    for entry in rd {
        let e = entry.map_err(|e| SubsetError::source_io(source, e))?;
        let kind = match e.file_type() {
            Ok(ft) => PathType::from_file_type(ft),
            Err(_) => PathType::of_entry(e.path()),
        };
        entries.push(Entry {
            name: e.file_name(),
            path: e.path(),
            kind,
        });
    }
    debug!("listed {} entries in {}", entries.len(), source.display());
    Ok(entries)
}
