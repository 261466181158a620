use std::fs;
use std::io;
use std::path::Path;

use walkdir::WalkDir;

use crate::fs_op::helpers::atomic_copy_file;
use crate::fs_op::metadata::preserve_all_metadata;

/// Re-create the symlink `src` at `dst`, pointing at the same target.
#[cfg(unix)]
pub(crate) fn copy_symlink(src: &Path, dst: &Path) -> io::Result<()> {
    let target = fs::read_link(src)?;
    std::os::unix::fs::symlink(target, dst)
}

#[cfg(not(unix))]
pub(crate) fn copy_symlink(src: &Path, _dst: &Path) -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        format!("cannot copy symlink {}", src.display()),
    ))
}

/// Recursively copy the directory `src` to a new directory `dst`.
///
/// Regular files go through `atomic_copy_file`; symlinks inside the tree are
/// re-created rather than followed. Special files (FIFOs, sockets, devices)
/// cannot be copied and abort the copy. Metadata of the tree is restored
/// once all content is in place.
pub(crate) fn copy_tree(src: &Path, dst: &Path) -> io::Result<()> {
    fs::create_dir(dst)?;

    for entry in WalkDir::new(src).min_depth(1).follow_links(false) {
        let entry = entry.map_err(io::Error::other)?;
        let from = entry.path();
        let rel = from.strip_prefix(src).map_err(io::Error::other)?;
        let to = dst.join(rel);
        let ft = entry.file_type();

        if ft.is_dir() {
            fs::create_dir_all(&to)?;
        } else if ft.is_symlink() {
            copy_symlink(from, &to)?;
        } else if ft.is_file() {
            atomic_copy_file(from, &to)?;
        } else {
            return Err(io::Error::new(
                io::ErrorKind::Unsupported,
                format!("cannot copy special file {}", from.display()),
            ));
        }
    }

    preserve_all_metadata(src, dst)
}
