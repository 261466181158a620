//! Preserve file metadata (permissions, timestamps, xattrs) when an entry has
//! to be copied instead of renamed.
//!
//! Permissions and timestamps of a single file are considered core and their
//! failures are propagated. Ownership and extended attributes are Unix-only
//! and best-effort, since they often need elevated privileges.

use std::fs::{self, Permissions};
use std::io;
use std::path::Path;

use filetime::{set_file_times, FileTime};
use walkdir::WalkDir;

#[cfg(unix)]
mod unix_extra {
    use super::*;
    use nix::unistd::{chown, Gid, Uid};
    use std::os::unix::fs::MetadataExt;

    pub(crate) fn copy_unix_extras(src: &Path, dst: &Path) {
        if let Ok(meta) = fs::metadata(src) {
            let _ = chown(
                dst,
                Some(Uid::from_raw(meta.uid())),
                Some(Gid::from_raw(meta.gid())),
            );
        }

        if let Ok(names) = xattr::list(src) {
            for name in names {
                if let Ok(Some(val)) = xattr::get(src, &name) {
                    let _ = xattr::set(dst, &name, &val);
                }
            }
        }
    }
}

pub(crate) fn copy_permissions(src: &Path, dst: &Path) -> io::Result<()> {
    let perms: Permissions = fs::metadata(src)?.permissions();
    fs::set_permissions(dst, perms)
}

fn copy_times(src: &Path, dst: &Path) -> io::Result<()> {
    let meta = fs::metadata(src)?;
    let m_ft = FileTime::from_system_time(meta.modified()?);
    let a_ft = FileTime::from_system_time(meta.accessed()?);
    set_file_times(dst, a_ft, m_ft)
}

/// Preserve metadata from `src` to `dst`.
///
/// For a file, permission and timestamp errors are returned. For a directory
/// the tree is walked and metadata applied to each corresponding path under
/// `dst`; missing targets and individual failures are skipped.
pub(crate) fn preserve_all_metadata(src: &Path, dst: &Path) -> io::Result<()> {
    if !src.exists() || !dst.exists() {
        return Ok(());
    }

    if src.is_file() {
        copy_permissions(src, dst)?;
        copy_times(src, dst)?;
        #[cfg(unix)]
        unix_extra::copy_unix_extras(src, dst);
        return Ok(());
    }

    // Children before parents, so writing into a directory does not bump
    // its mtime after it was restored.
    for entry in WalkDir::new(src)
        .follow_links(false)
        .contents_first(true)
        .into_iter()
        .filter_map(Result::ok)
    {
        if entry.file_type().is_symlink() {
            continue;
        }
        let rel = match entry.path().strip_prefix(src) {
            Ok(r) => r,
            Err(_) => continue,
        };
        let target = dst.join(rel);
        if !target.exists() {
            continue;
        }
        let _ = copy_permissions(entry.path(), &target);
        let _ = copy_times(entry.path(), &target);
        #[cfg(unix)]
        unix_extra::copy_unix_extras(entry.path(), &target);
    }
    Ok(())
}
