use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors produced while selecting and relocating a subset of entries.
///
/// Every variant is fatal for a run: nothing is retried and entries that were
/// already moved stay where they are.
#[derive(Error, Debug)]
pub enum SubsetError {
    /// Wrong argument count or a subset size that is not a base-10 integer.
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    /// Requested size is negative or larger than the source population.
    #[error("invalid sample size {requested}: source holds {available} entries")]
    InvalidSampleSize { requested: i64, available: usize },

    /// Source is missing, is not a directory, or could not be read.
    #[error("source directory not found: `{path}`{}", cause(.source, ""))]
    SourceNotFound {
        path: PathBuf,
        #[source]
        source: Option<io::Error>,
    },

    #[error("permission denied: `{path}`")]
    PermissionDenied {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Destination exists but is not a directory, or could not be created.
    #[error("invalid destination `{path}`{}", cause(.source, ": not a directory"))]
    InvalidDestination {
        path: PathBuf,
        #[source]
        source: Option<io::Error>,
    },

    /// An entry with the same name already exists at the destination.
    #[error("destination already contains `{path}`")]
    DestinationCollision { path: PathBuf },

    /// Contextual error that includes source and destination paths.
    #[error("failed to move `{src}` to `{dst}`: {source}")]
    MoveFailed {
        src: PathBuf,
        dst: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// `": <io error>"` when an io cause is present, `fallback` otherwise.
fn cause(source: &Option<io::Error>, fallback: &str) -> String {
    match source {
        Some(e) => format!(": {e}"),
        None => fallback.to_string(),
    }
}

impl SubsetError {
    /// Process exit code for this error. Usage errors share clap's code.
    pub fn exit_code(&self) -> u8 {
        match self {
            SubsetError::InvalidArguments(_) => 2,
            _ => 1,
        }
    }

    /// Classify an io error raised while reading the source directory.
    pub(crate) fn source_io(path: &Path, e: io::Error) -> Self {
        match e.kind() {
            io::ErrorKind::PermissionDenied => SubsetError::PermissionDenied {
                path: path.to_path_buf(),
                source: e,
            },
            _ => SubsetError::SourceNotFound {
                path: path.to_path_buf(),
                source: Some(e),
            },
        }
    }

    /// Classify an io error raised while preparing the destination directory.
    pub(crate) fn destination_io(path: &Path, e: io::Error) -> Self {
        match e.kind() {
            io::ErrorKind::PermissionDenied => SubsetError::PermissionDenied {
                path: path.to_path_buf(),
                source: e,
            },
            _ => SubsetError::InvalidDestination {
                path: path.to_path_buf(),
                source: Some(e),
            },
        }
    }

    pub(crate) fn move_failed(src: &Path, dst: &Path, e: io::Error) -> Self {
        SubsetError::MoveFailed {
            src: src.to_path_buf(),
            dst: dst.to_path_buf(),
            source: e,
        }
    }
}

impl From<clap::Error> for SubsetError {
    fn from(e: clap::Error) -> Self {
        let rendered = e.to_string();
        let msg = rendered.trim_start_matches("error: ").trim_end();
        SubsetError::InvalidArguments(msg.to_string())
    }
}
