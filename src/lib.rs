//! Randomly pick a fixed number of entries from one directory and move them
//! into another.
//!
//! The binary is a thin wrapper over [`move_random_subset`]; library callers
//! supply their own `rand::Rng`, which makes the selection reproducible with
//! a seeded generator.

pub mod cli;
pub mod fs_op;
pub mod sample;
pub mod subset;

pub use crate::fs_op::error::SubsetError;
pub use crate::fs_op::listing::Entry;
pub use crate::sample::select_subset;
pub use crate::subset::{move_random_subset, SubsetReport, SubsetRequest};
