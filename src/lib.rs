//! # Defrag - Extent-Based Block Compaction Engine
//!
//! `defrag-rs` relocates file content toward the low end of a linear
//! address space and reports a positional checksum over the result. A disk
//! image arrives as a run-length digit string (alternating file and gap
//! lengths), is decoded into file extents plus a free list, compacted under
//! one of two placement policies, then checksummed.
//!
//! - [`compact::GreedyCompactor`] — fill the earliest gap with the tail of
//!   the last file, splitting files across destinations as needed.
//! - [`compact::WholeFileCompactor`] — first fit, each file moves at most
//!   once and never splits.
//!
//! ## Quick Start
//!
//! ```rust
//! use defrag::{Compactor, Disk, GreedyCompactor, WholeFileCompactor};
//!
//! # fn main() -> defrag::Result<()> {
//! let disk = Disk::parse("2333133121414131402")?;
//!
//! let compacted = GreedyCompactor.compact(&disk)?;
//! assert_eq!(compacted.checksum(), 1928);
//!
//! let compacted = WholeFileCompactor.compact(&disk)?;
//! assert_eq!(compacted.checksum(), 2858);
//! # Ok(())
//! # }
//! ```
//!
//! The engine is a single-threaded batch transform: each
//! parse-compact-checksum run owns its data outright, so independent inputs
//! can be processed in parallel with no coordination.

pub mod compact;
pub mod disk;
pub mod error;
pub mod extent;
pub mod layout;

pub use compact::{Compactor, GreedyCompactor, Policy, WholeFileCompactor};
pub use disk::{Disk, FileExtent, FreeList};
pub use error::{DefragError, Result};
pub use extent::Extent;
