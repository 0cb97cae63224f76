//! Greedy compaction: earliest gap, rightmost fragment first
//!
//! Equivalent in effect to moving blocks one at a time from the end of the
//! disk into the first free cell, but performed a whole extent per step.
//! Files may end up split across several destinations sharing one id.

use super::{finalize, Compactor};
use crate::disk::{Disk, FileExtent, FreeList};
use crate::error::Result;
use crate::extent::Extent;
use tracing::debug;

/// Variable-size compaction toward the earliest gap
pub struct GreedyCompactor;

impl Compactor for GreedyCompactor {
    fn compact(&self, disk: &Disk) -> Result<Disk> {
        let mut free = disk.free.clone();
        // Working stack: last (highest-address) file on top
        let mut stack = disk.files.clone();
        let mut placed = Vec::with_capacity(stack.len());
        let mut moves = 0usize;

        loop {
            let (Some(&gap), Some(&last)) = (free.front(), stack.last()) else {
                break;
            };

            // Once the earliest gap is at or past the last file, every
            // remaining gap is too: retire the file in place.
            if gap.begin >= last.extent.begin {
                placed.push(last);
                stack.pop();
                continue;
            }

            let want = last.extent.len();
            if gap.len() >= want {
                // Whole file fits: take the front of the gap, return the
                // unconsumed tail as the new earliest gap.
                let _ = free.pop_front();
                let (dest, back) = gap.split(want);
                placed.push(FileExtent::new(last.id, dest));
                if !back.is_empty() {
                    free.push_front(back);
                }
                stack.pop();
            } else {
                // Gap smaller than the file: relocate the file's tail into
                // the whole gap and keep the shortened head on the stack.
                let _ = free.pop_front();
                placed.push(FileExtent::new(last.id, gap));
                let kept = want - gap.len();
                if let Some(top) = stack.last_mut() {
                    top.extent = Extent::new(last.extent.begin, last.extent.begin + kept);
                }
            }
            moves += 1;
        }

        // Gaps exhausted with files still on the stack: they stay in place.
        while let Some(file) = stack.pop() {
            placed.push(file);
        }

        debug!(moves, files = disk.files.len(), "greedy compaction complete");

        let mut compacted = Disk::new(placed, FreeList::new(), disk.total_len);
        compacted.sort_canonical();
        // The working queue does not track vacated space; recover the free
        // list as the complement of the final placement.
        compacted.rebuild_free();
        finalize(disk, compacted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_layout() {
        let disk = Disk::parse("2333133121414131402").unwrap();
        let compacted = GreedyCompactor.compact(&disk).unwrap();
        assert_eq!(
            compacted.render().unwrap(),
            "0099811188827773336446555566.............."
        );
        assert_eq!(compacted.checksum(), 1928);
    }

    #[test]
    fn test_already_compact_is_noop() {
        let disk = Disk::parse("90909").unwrap();
        let compacted = GreedyCompactor.compact(&disk).unwrap();
        assert_eq!(compacted.files, disk.files);
        assert!(compacted.free.is_empty());
        assert_eq!(compacted.checksum(), disk.checksum());
    }

    #[test]
    fn test_file_splits_across_gaps() {
        // 0.11 -> 011. : the gap holds one unit, so file 1's tail moves
        // into it and the head stays put, leaving two fragments of id 1.
        let disk = Disk::parse("112").unwrap();
        let compacted = GreedyCompactor.compact(&disk).unwrap();
        assert_eq!(compacted.render().unwrap(), "011.");
        assert_eq!(compacted.fragment_count(1), 2);
    }

    #[test]
    fn test_single_file() {
        // .0 -> 0.
        let disk = Disk::new(
            vec![FileExtent::new(0, Extent::new(1, 2))],
            FreeList::from_iter([Extent::new(0, 1)]),
            2,
        );
        let compacted = GreedyCompactor.compact(&disk).unwrap();
        assert_eq!(compacted.render().unwrap(), "0.");
    }

    #[test]
    fn test_conservation() {
        let disk = Disk::parse("2333133121414131402").unwrap();
        let compacted = GreedyCompactor.compact(&disk).unwrap();
        assert_eq!(compacted.occupied_len(), disk.occupied_len());
        assert_eq!(
            compacted.occupied_len() + compacted.free_len(),
            disk.total_len
        );
        compacted.verify().unwrap();
    }
}
