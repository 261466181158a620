use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::fs_op::copy::{copy_symlink, copy_tree};
use crate::fs_op::error::SubsetError;
use crate::fs_op::helpers::{atomic_copy_file, resolve_target};
use crate::fs_op::listing::Entry;
use crate::fs_op::stat::{self, PathType};

/// Move `entry` into `dest_dir`, keeping its base name.
///
/// Refuses to replace anything already present at the target. A plain
/// rename is tried first; when the destination lives on another filesystem
/// the entry is copied according to its listed kind and the original
/// removed. Returns the new path.
pub fn move_entry(entry: &Entry, dest_dir: &Path) -> Result<PathBuf, SubsetError> {
    let src = entry.path.as_path();
    let target = resolve_target(dest_dir, &entry.name);
    if stat::entry_exists(&target) {
        return Err(SubsetError::DestinationCollision { path: target });
    }

    match fs::rename(src, &target) {
        Ok(()) => Ok(target),
        Err(e) if is_cross_device(&e) => {
            debug!("{} crosses filesystems, copying instead", src.display());
            copy_then_remove(src, entry.kind, &target)
                .map_err(|e| SubsetError::move_failed(src, &target, e))?;
            Ok(target)
        }
        Err(e) => Err(SubsetError::move_failed(src, &target, e)),
    }
}

#[cfg(unix)]
fn is_cross_device(e: &io::Error) -> bool {
    e.raw_os_error() == Some(libc::EXDEV)
}

#[cfg(windows)]
fn is_cross_device(e: &io::Error) -> bool {
    // ERROR_NOT_SAME_DEVICE
    e.raw_os_error() == Some(17)
}

#[cfg(not(any(unix, windows)))]
fn is_cross_device(_e: &io::Error) -> bool {
    false
}

/// Copy `src`, an entry of the given `kind`, to `target` then remove `src`.
///
/// `target` must not exist. If the copy fails, whatever was written to
/// `target` is removed again and `src` is left as it was.
pub(crate) fn copy_then_remove(src: &Path, kind: PathType, target: &Path) -> io::Result<()> {
    let copied = match kind {
        PathType::NotFound => {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} vanished before it could be moved", src.display()),
            ))
        }
        PathType::Symlink => copy_symlink(src, target),
        PathType::Directory => copy_tree(src, target),
        PathType::File => atomic_copy_file(src, target).map(|_| ()),
        PathType::Other => Err(io::Error::new(
            io::ErrorKind::Unsupported,
            format!("cannot copy special file {}", src.display()),
        )),
    };

    if let Err(e) = copied {
        match PathType::of_entry(target) {
            PathType::Directory => {
                let _ = fs::remove_dir_all(target);
            }
            PathType::NotFound => {}
            _ => {
                let _ = fs::remove_file(target);
            }
        }
        return Err(e);
    }

    if kind == PathType::Directory {
        fs::remove_dir_all(src)
    } else {
        fs::remove_file(src)
    }
}
