//! Compaction policies
//!
//! Two alternative strategies over the same disk model:
//! - [`GreedyCompactor`] fills the earliest gap with the tail of the last
//!   file, splitting files across destinations as needed.
//! - [`WholeFileCompactor`] moves each file at most once, whole, into the
//!   first gap that can hold it entirely.
//!
//! Policies are pure: they take a disk by reference and return a new,
//! canonically sorted disk. Every run ends with a defensive verification
//! pass; a failure there is a bug in the policy and aborts the run.

pub mod greedy;
pub mod whole_file;

pub use greedy::GreedyCompactor;
pub use whole_file::WholeFileCompactor;

use crate::disk::Disk;
use crate::error::{DefragError, Result};
use std::collections::BTreeSet;

/// A compaction strategy over a disk layout
pub trait Compactor {
    /// Relocate file content toward the low end of the address space
    fn compact(&self, disk: &Disk) -> Result<Disk>;
}

/// Policy selector for callers that pick a strategy at runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    /// Variable-size, rightmost-fragment-first (files may split)
    Greedy,
    /// First-fit, at most one move per file, never split
    WholeFile,
}

impl Policy {
    pub fn compact(&self, disk: &Disk) -> Result<Disk> {
        match self {
            Policy::Greedy => GreedyCompactor.compact(disk),
            Policy::WholeFile => WholeFileCompactor.compact(disk),
        }
    }
}

/// Post-compaction checks shared by both policies: canonical ordering,
/// structural verification, and id permanence against the input.
fn finalize(input: &Disk, mut output: Disk) -> Result<Disk> {
    output.sort_canonical();
    output.verify()?;

    let before: BTreeSet<u64> = input.files.iter().map(|f| f.id).collect();
    let after: BTreeSet<u64> = output.files.iter().map(|f| f.id).collect();
    if before != after {
        return Err(DefragError::InvariantViolation(
            "file id set changed during compaction".to_string(),
        ));
    }
    Ok(output)
}
