//! Disk layout model
//!
//! A [`Disk`] is a linear address space partitioned into file extents and
//! free extents with no gaps and no overlaps. It is built once by the layout
//! parser, transformed by exactly one compaction policy, then queried for
//! its checksum. The [`FreeList`] keeps the unoccupied extents ordered by
//! ascending `begin`; adjacent free extents are deliberately never merged
//! (neither policy needs coalescing, and merging would perturb first-fit
//! candidate order).

use crate::error::{DefragError, Result};
use crate::extent::Extent;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// An occupied extent tagged with its owning file id
///
/// Ids are assigned in parse order and are permanent. After greedy
/// compaction a single file may be fragmented into several `FileExtent`
/// records sharing one id; the checksum treats them as one logical file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileExtent {
    /// File id, assigned left-to-right at parse time
    pub id: u64,
    /// The addresses this fragment occupies
    pub extent: Extent,
}

impl FileExtent {
    pub fn new(id: u64, extent: Extent) -> Self {
        FileExtent { id, extent }
    }
}

/// Free extents ordered by ascending `begin`
///
/// Supports the two access patterns the compaction policies need: queue
/// operations on the earliest gap (greedy) and an ordered scan with sorted
/// re-insertion (whole-file first fit). Extents stored here are never empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreeList {
    extents: VecDeque<Extent>,
}

impl FreeList {
    pub fn new() -> Self {
        FreeList::default()
    }

    pub fn len(&self) -> usize {
        self.extents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extents.is_empty()
    }

    /// Total number of free addresses
    pub fn total_len(&self) -> u64 {
        self.extents.iter().map(Extent::len).sum()
    }

    /// Earliest gap, if any
    pub fn front(&self) -> Option<&Extent> {
        self.extents.front()
    }

    pub fn pop_front(&mut self) -> Option<Extent> {
        self.extents.pop_front()
    }

    /// Push a gap that precedes every stored gap
    ///
    /// Used by the greedy policy to return the unconsumed tail of a split
    /// gap. The tail came from the previous front, so ordering is preserved.
    pub fn push_front(&mut self, extent: Extent) {
        debug_assert!(!extent.is_empty());
        debug_assert!(self
            .extents
            .front()
            .map_or(true, |next| extent.end <= next.begin));
        self.extents.push_front(extent);
    }

    /// Append a gap known to lie past every stored gap (parser scan order)
    pub fn push_back(&mut self, extent: Extent) {
        debug_assert!(!extent.is_empty());
        debug_assert!(self
            .extents
            .back()
            .map_or(true, |prev| prev.end <= extent.begin));
        self.extents.push_back(extent);
    }

    /// Insert a gap at its sorted position
    pub fn insert_sorted(&mut self, extent: Extent) {
        debug_assert!(!extent.is_empty());
        let idx = self
            .extents
            .partition_point(|e| e.begin < extent.begin);
        self.extents.insert(idx, extent);
    }

    /// Remove and return the gap at `idx`
    pub fn remove(&mut self, idx: usize) -> Option<Extent> {
        self.extents.remove(idx)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Extent> {
        self.extents.iter()
    }
}

impl FromIterator<Extent> for FreeList {
    fn from_iter<I: IntoIterator<Item = Extent>>(iter: I) -> Self {
        let mut list = FreeList::new();
        for extent in iter {
            list.insert_sorted(extent);
        }
        list
    }
}

/// A complete disk layout: file extents plus free extents covering
/// `[0, total_len)` exactly
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Disk {
    /// Occupied extents, ascending by `begin` in canonical form
    pub files: Vec<FileExtent>,
    /// Unoccupied extents, ascending by `begin`
    pub free: FreeList,
    /// Length of the full address space
    pub total_len: u64,
}

impl Disk {
    pub fn new(files: Vec<FileExtent>, free: FreeList, total_len: u64) -> Self {
        Disk {
            files,
            free,
            total_len,
        }
    }

    /// Number of occupied addresses
    pub fn occupied_len(&self) -> u64 {
        self.files.iter().map(|f| f.extent.len()).sum()
    }

    /// Number of free addresses
    pub fn free_len(&self) -> u64 {
        self.free.total_len()
    }

    /// Number of extents a file currently occupies (fragmentation indicator)
    pub fn fragment_count(&self, id: u64) -> usize {
        self.files.iter().filter(|f| f.id == id).count()
    }

    /// Positional weighted checksum: `Σ id × address` over occupied addresses
    ///
    /// Computed per extent with the arithmetic series over `[begin, end)`,
    /// identical to summing address by address.
    pub fn checksum(&self) -> u64 {
        self.files
            .iter()
            .filter(|f| !f.extent.is_empty())
            .map(|f| {
                let e = f.extent;
                // One of (len, begin+end-1) is always even
                f.id * (e.begin + e.end - 1) * e.len() / 2
            })
            .sum()
    }

    /// Sort file records by `begin` into the canonical presentation order
    pub fn sort_canonical(&mut self) {
        self.files.sort_by_key(|f| f.extent.begin);
    }

    /// Recompute the free list as the complement of the file extents
    ///
    /// Requires `files` to be sorted and non-overlapping. Used by the greedy
    /// policy, whose working queue does not track the space files vacate.
    pub(crate) fn rebuild_free(&mut self) {
        debug_assert!(self
            .files
            .windows(2)
            .all(|w| w[0].extent.end <= w[1].extent.begin));
        let mut free = FreeList::new();
        let mut cursor = 0;
        for f in &self.files {
            if f.extent.begin > cursor {
                free.push_back(Extent::new(cursor, f.extent.begin));
            }
            cursor = f.extent.end;
        }
        if cursor < self.total_len {
            free.push_back(Extent::new(cursor, self.total_len));
        }
        self.free = free;
    }

    /// Defensive structural check: conservation of total length, and no
    /// overlap among file extents or between files and gaps
    ///
    /// A failure here signals a bug in a compaction policy, not bad input,
    /// and must abort the run.
    pub fn verify(&self) -> Result<()> {
        let covered = self.occupied_len() + self.free_len();
        if covered != self.total_len {
            return Err(DefragError::InvariantViolation(format!(
                "covered {covered} addresses, expected {}",
                self.total_len
            )));
        }

        let mut extents: Vec<Extent> = self
            .files
            .iter()
            .map(|f| f.extent)
            .chain(self.free.iter().copied())
            .collect();
        extents.sort_by_key(|e| e.begin);

        // File and free extents together must tile [0, total_len) exactly
        let mut cursor = 0;
        for e in &extents {
            if e.begin != cursor {
                return Err(DefragError::InvariantViolation(format!(
                    "extent [{}, {}) does not tile: expected begin {cursor}",
                    e.begin, e.end
                )));
            }
            cursor = e.end;
        }
        if cursor != self.total_len {
            return Err(DefragError::InvariantViolation(format!(
                "layout ends at {cursor}, expected {}",
                self.total_len
            )));
        }
        Ok(())
    }

    /// Render small layouts as the conventional debug string, one character
    /// per address: the file id modulo 10, or `.` for a free address
    ///
    /// Returns `None` for disks too large to be useful as a debug line.
    pub fn render(&self) -> Option<String> {
        const RENDER_CAP: u64 = 256;
        if self.total_len > RENDER_CAP {
            return None;
        }
        let mut cells = vec!['.'; self.total_len as usize];
        for f in &self.files {
            let digit = char::from_digit((f.id % 10) as u32, 10)?;
            for i in f.extent.begin..f.extent.end {
                cells[i as usize] = digit;
            }
        }
        Some(cells.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_file_disk() -> Disk {
        // 00..111
        Disk::new(
            vec![
                FileExtent::new(0, Extent::new(0, 2)),
                FileExtent::new(1, Extent::new(4, 7)),
            ],
            FreeList::from_iter([Extent::new(2, 4)]),
            7,
        )
    }

    #[test]
    fn test_freelist_ordering() {
        let mut free = FreeList::new();
        free.insert_sorted(Extent::new(10, 12));
        free.insert_sorted(Extent::new(0, 3));
        free.insert_sorted(Extent::new(5, 6));

        let begins: Vec<u64> = free.iter().map(|e| e.begin).collect();
        assert_eq!(begins, vec![0, 5, 10]);
        assert_eq!(free.total_len(), 6);
    }

    #[test]
    fn test_freelist_queue_ops() {
        let mut free = FreeList::from_iter([Extent::new(4, 8), Extent::new(10, 11)]);
        let front = free.pop_front().unwrap();
        assert_eq!(front, Extent::new(4, 8));

        let (taken, rest) = front.split(2);
        assert_eq!(taken.len(), 2);
        free.push_front(rest);
        assert_eq!(free.front(), Some(&Extent::new(6, 8)));
    }

    #[test]
    fn test_checksum_closed_form() {
        let disk = two_file_disk();
        // 0*(0+1) + 1*(4+5+6)
        assert_eq!(disk.checksum(), 15);
    }

    #[test]
    fn test_checksum_order_independent() {
        let mut disk = two_file_disk();
        disk.files.reverse();
        assert_eq!(disk.checksum(), 15);
    }

    #[test]
    fn test_verify_conservation() {
        let disk = two_file_disk();
        assert!(disk.verify().is_ok());

        let mut broken = disk.clone();
        broken.total_len = 9;
        assert!(matches!(
            broken.verify(),
            Err(DefragError::InvariantViolation(_))
        ));
    }

    #[test]
    fn test_verify_overlap() {
        let mut disk = two_file_disk();
        disk.files[1] = FileExtent::new(1, Extent::new(1, 4));
        assert!(matches!(
            disk.verify(),
            Err(DefragError::InvariantViolation(_))
        ));
    }

    #[test]
    fn test_render() {
        assert_eq!(two_file_disk().render().unwrap(), "00..111");
    }
}
