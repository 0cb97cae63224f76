//! Whole-file compaction: first fit, at most one move per file
//!
//! Files are visited from highest id (rightmost) to lowest. Each moves at
//! most once, whole, into the lowest-addressed gap that both precedes it
//! and can hold it entirely; otherwise it stays where it is. The vacated
//! extent goes back into the free list, claimable only by smaller-id files
//! visited later in the same pass.

use super::{finalize, Compactor};
use crate::disk::{Disk, FileExtent};
use crate::error::Result;
use tracing::debug;

/// First-fit relocation without splitting
pub struct WholeFileCompactor;

impl Compactor for WholeFileCompactor {
    fn compact(&self, disk: &Disk) -> Result<Disk> {
        let mut free = disk.free.clone();
        let mut placed = Vec::with_capacity(disk.files.len());
        let mut moves = 0usize;

        let mut files = disk.files.clone();
        files.sort_by_key(|f| f.id);

        for file in files.into_iter().rev() {
            // First fit, strictly left of the file. The list is sorted by
            // begin, so the scan can stop at the file's own position.
            let mut dest = None;
            for (idx, gap) in free.iter().enumerate() {
                if gap.begin >= file.extent.begin {
                    break;
                }
                if gap.len() >= file.extent.len() {
                    dest = Some((idx, *gap));
                    break;
                }
            }

            match dest {
                Some((idx, gap)) => {
                    let _ = free.remove(idx);
                    let (front, back) = gap.split(file.extent.len());
                    placed.push(FileExtent::new(file.id, front));
                    if !back.is_empty() {
                        free.insert_sorted(back);
                    }
                    free.insert_sorted(file.extent);
                    moves += 1;
                }
                None => placed.push(file),
            }
        }

        debug!(
            moves,
            files = disk.files.len(),
            "whole-file compaction complete"
        );

        finalize(disk, Disk::new(placed, free, disk.total_len))
    }
}
