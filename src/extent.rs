//! Half-open address ranges
//!
//! An extent is the unit of bookkeeping for the whole engine: files occupy
//! extents, gaps are extents, and compaction is nothing but splitting and
//! relocating them. Extents are immutable values; every operation returns a
//! new extent.

use serde::{Deserialize, Serialize};

/// A contiguous half-open address range `[begin, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extent {
    /// First address covered by the extent
    pub begin: u64,
    /// One past the last address covered
    pub end: u64,
}

impl Extent {
    /// Create an extent. `begin` must not exceed `end`.
    pub fn new(begin: u64, end: u64) -> Self {
        debug_assert!(begin <= end, "extent [{begin}, {end}) is inverted");
        Extent { begin, end }
    }

    /// Number of addresses covered
    pub fn len(&self) -> u64 {
        self.end - self.begin
    }

    /// True for the degenerate `[n, n)` extent
    pub fn is_empty(&self) -> bool {
        self.begin == self.end
    }

    /// Check if this extent covers an address
    pub fn contains(&self, addr: u64) -> bool {
        addr >= self.begin && addr < self.end
    }

    /// Check if two extents share at least one address
    pub fn overlaps(&self, other: &Extent) -> bool {
        self.begin < other.end && other.begin < self.end
    }

    /// Check if this extent directly borders another
    pub fn is_adjacent(&self, other: &Extent) -> bool {
        self.end == other.begin || other.end == self.begin
    }

    /// Split after `count` addresses into `([begin, begin+count), [begin+count, end))`
    ///
    /// Either side may come back empty when `count` is 0 or the full length.
    pub fn split(&self, count: u64) -> (Extent, Extent) {
        debug_assert!(count <= self.len(), "split point {count} past extent length");
        let mid = self.begin + count;
        (Extent::new(self.begin, mid), Extent::new(mid, self.end))
    }

    /// Translate the extent left by `by` addresses
    pub fn shift_left(&self, by: u64) -> Extent {
        debug_assert!(by <= self.begin, "shift would move extent below zero");
        Extent::new(self.begin - by, self.end - by)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_len_and_empty() {
        assert_eq!(Extent::new(10, 30).len(), 20);
        assert!(Extent::new(7, 7).is_empty());
        assert!(!Extent::new(7, 8).is_empty());
    }

    #[test]
    fn test_contains() {
        let extent = Extent::new(10, 30);
        assert!(!extent.contains(9));
        assert!(extent.contains(10));
        assert!(extent.contains(29));
        assert!(!extent.contains(30));
    }

    #[test]
    fn test_overlaps() {
        let e = Extent::new(10, 20);
        assert!(e.overlaps(&Extent::new(15, 25)));
        assert!(e.overlaps(&Extent::new(10, 11)));
        assert!(!e.overlaps(&Extent::new(20, 30)));
        assert!(!e.overlaps(&Extent::new(0, 10)));
        // Empty extents overlap nothing
        assert!(!e.overlaps(&Extent::new(15, 15)));
    }

    #[test]
    fn test_adjacency() {
        let e1 = Extent::new(10, 20);
        let e2 = Extent::new(20, 30);
        let e3 = Extent::new(30, 40);
        assert!(e1.is_adjacent(&e2));
        assert!(e2.is_adjacent(&e1));
        assert!(!e1.is_adjacent(&e3));
    }

    #[test]
    fn test_split() {
        let (front, back) = Extent::new(10, 30).split(5);
        assert_eq!(front, Extent::new(10, 15));
        assert_eq!(back, Extent::new(15, 30));

        let (front, back) = Extent::new(10, 30).split(20);
        assert_eq!(front, Extent::new(10, 30));
        assert!(back.is_empty());

        let (front, back) = Extent::new(10, 30).split(0);
        assert!(front.is_empty());
        assert_eq!(back, Extent::new(10, 30));
    }

    #[test]
    fn test_shift_left() {
        assert_eq!(Extent::new(10, 30).shift_left(4), Extent::new(6, 26));
    }
}
