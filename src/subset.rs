//! Select a random subset of a directory's entries and move it elsewhere.
//!
//! The run is strictly sequential: list the source, draw the sample, prepare
//! the destination, check for name collisions, then move entry by entry. The
//! first error stops the run; entries already moved are not put back.

use std::path::{Path, PathBuf};

use rand::Rng;
use tracing::{debug, info};

use crate::fs_op::error::SubsetError;
use crate::fs_op::helpers::{ensure_destination_dir, resolve_target};
use crate::fs_op::listing::{list_entries, Entry};
use crate::fs_op::mv::move_entry;
use crate::fs_op::stat;
use crate::sample::select_subset;

/// What to move, and where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubsetRequest {
    pub source: PathBuf,
    pub destination: PathBuf,
    /// Signed so a negative size can be reported as `InvalidSampleSize`.
    pub count: i64,
}

impl SubsetRequest {
    pub fn new(source: impl Into<PathBuf>, destination: impl Into<PathBuf>, count: i64) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            count,
        }
    }
}

/// Outcome of a successful run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubsetReport {
    /// Number of entries the source held before the run.
    pub source_entries: usize,
    /// New locations of the moved entries, in the order they were moved.
    pub moved: Vec<PathBuf>,
    /// Whether the destination directory had to be created.
    pub created_destination: bool,
}

/// Fail with `DestinationCollision` if any selected name is already taken at
/// `dest_dir`. Runs before the first move so a collision leaves the source
/// untouched.
pub fn check_collisions(selection: &[Entry], dest_dir: &Path) -> Result<(), SubsetError> {
    for entry in selection {
        let target = resolve_target(dest_dir, &entry.name);
        if stat::entry_exists(&target) {
            return Err(SubsetError::DestinationCollision { path: target });
        }
    }
    Ok(())
}

/// Move `request.count` randomly chosen entries of `request.source` into
/// `request.destination`.
///
/// `rng` drives the selection; pass a seeded generator for a reproducible
/// choice. Size and source errors are reported before the destination is
/// touched.
pub fn move_random_subset<R>(request: &SubsetRequest, rng: &mut R) -> Result<SubsetReport, SubsetError>
where
    R: Rng + ?Sized,
{
    let entries = list_entries(&request.source)?;
    let selection = select_subset(&entries, request.count, rng)?;
    debug!(
        "selected {} of {} entries from {}",
        selection.len(),
        entries.len(),
        request.source.display()
    );

    let created_destination = ensure_destination_dir(&request.destination)?;
    check_collisions(&selection, &request.destination)?;

    let mut moved = Vec::with_capacity(selection.len());
    for entry in &selection {
        let target = move_entry(entry, &request.destination)?;
        debug!("moved {} -> {}", entry.path.display(), target.display());
        moved.push(target);
    }

    info!(
        "moved {} of {} entries from {} to {}",
        moved.len(),
        entries.len(),
        request.source.display(),
        request.destination.display()
    );
    Ok(SubsetReport {
        source_entries: entries.len(),
        moved,
        created_destination,
    })
}
