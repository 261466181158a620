//! Filesystem primitives used to relocate sampled entries.
//!
//! `listing` reads the source population, `helpers` prepares the
//! destination, and `mv` performs the per-entry move with its cross-device
//! copy fallback (`copy` + `metadata`).

pub mod copy;
pub mod error;
pub mod helpers;
pub mod listing;
pub mod metadata;
pub mod mv;
pub mod stat;
