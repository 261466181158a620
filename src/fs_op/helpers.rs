use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use fs_extra::file::{copy as fs_extra_copy, CopyOptions};
use tracing::debug;

use crate::fs_op::error::SubsetError;
use crate::fs_op::stat::{self, PathType};

/// Target path for an entry named `name` once moved into `dest_dir`.
pub fn resolve_target(dest_dir: &Path, name: &OsStr) -> PathBuf {
    dest_dir.join(name)
}

/// Make sure `dest` is a usable destination directory.
///
/// Missing directories (and their parents) are created; the return value
/// tells whether anything was created. A symlink to a directory is accepted.
/// Anything else already occupying `dest`, or an empty path, is
/// `InvalidDestination`.
pub fn ensure_destination_dir(dest: &Path) -> Result<bool, SubsetError> {
    // `create_dir_all("")` succeeds and joins onto "" land in the cwd.
    if dest.as_os_str().is_empty() {
        return Err(SubsetError::InvalidDestination {
            path: dest.to_path_buf(),
            source: Some(io::Error::new(io::ErrorKind::InvalidInput, "empty path")),
        });
    }
    match PathType::of(dest) {
        PathType::Directory => return Ok(false),
        PathType::NotFound if !stat::entry_exists(dest) => {}
        _ => {
            return Err(SubsetError::InvalidDestination {
                path: dest.to_path_buf(),
                source: None,
            })
        }
    }
    fs::create_dir_all(dest).map_err(|e| SubsetError::destination_io(dest, e))?;
    debug!("created destination {}", dest.display());
    Ok(true)
}

/// Build a temp file name next to `dst` that no other copy in this process
/// (or a concurrent process) will pick.
fn temp_sibling(dir: &Path) -> PathBuf {
    static NEXT_COPY_ID: AtomicU64 = AtomicU64::new(0);
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos())
        .unwrap_or_default();
    let seq = NEXT_COPY_ID.fetch_add(1, Ordering::Relaxed);
    dir.join(format!(
        ".tmp_subset_copy.{:x}.{:x}.{:x}",
        std::process::id(),
        nanos,
        seq
    ))
}

/// Copy a single file atomically: copy into a temp file in the destination
/// directory then rename into place. The temp file is removed on failure.
pub fn atomic_copy_file(src: &Path, dst: &Path) -> io::Result<u64> {
    let dir = dst.parent().unwrap_or_else(|| Path::new("."));
    let tmp = temp_sibling(dir);

    let mut options = CopyOptions::new();
    options.overwrite = false;
    options.buffer_size = 64 * 1024;
    let copied = match fs_extra_copy(src, &tmp, &options) {
        Ok(n) => n,
        Err(e) => {
            let _ = fs::remove_file(&tmp);
            return Err(io::Error::other(e));
        }
    };

    if let Err(e) = crate::fs_op::metadata::preserve_all_metadata(src, &tmp) {
        let _ = fs::remove_file(&tmp);
        return Err(e);
    }
    match fs::rename(&tmp, dst) {
        Ok(()) => Ok(copied),
        Err(e) => {
            let _ = fs::remove_file(&tmp);
            Err(e)
        }
    }
}
