use std::fs;
use std::path::Path;

/// Lightweight classification of a filesystem path's kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathType {
    /// The path does not exist.
    NotFound,
    /// The path exists and is a directory.
    Directory,
    /// The path exists and is a regular file.
    File,
    /// The path is a symbolic link (only reported when links are not followed).
    Symlink,
    /// The path exists but is neither a regular file nor a directory
    /// (socket, FIFO, block device, ...).
    Other,
}

impl PathType {
    /// Classify `path`, following symlinks.
    ///
    /// A dangling symlink is reported as `NotFound`.
    pub fn of<P: AsRef<Path>>(path: P) -> Self {
        match fs::metadata(path.as_ref()) {
            Ok(md) => Self::from_file_type(md.file_type()),
            Err(_) => PathType::NotFound,
        }
    }

    /// Classify `path` without following a trailing symlink.
    pub fn of_entry<P: AsRef<Path>>(path: P) -> Self {
        match fs::symlink_metadata(path.as_ref()) {
            Ok(md) => Self::from_file_type(md.file_type()),
            Err(_) => PathType::NotFound,
        }
    }

    pub fn from_file_type(ft: fs::FileType) -> Self {
        if ft.is_symlink() {
            PathType::Symlink
        } else if ft.is_dir() {
            PathType::Directory
        } else if ft.is_file() {
            PathType::File
        } else {
            PathType::Other
        }
    }
}

/// Return `true` if something occupies `path`, including a dangling symlink.
pub fn entry_exists<P: AsRef<Path>>(path: P) -> bool {
    PathType::of_entry(path) != PathType::NotFound
}
