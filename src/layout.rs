//! Run-length layout parser
//!
//! Decodes the alternating run-length digit string into a [`Disk`]:
//! even-indexed digits are file lengths, odd-indexed digits are gap lengths.
//! A zero-length run is skipped entirely and never consumes a file id.

use crate::disk::{Disk, FileExtent, FreeList};
use crate::error::{DefragError, Result};
use crate::extent::Extent;

impl Disk {
    /// Parse one line of run-length digits into a disk layout
    ///
    /// Trailing whitespace is trimmed first. Fails with
    /// [`DefragError::EmptyInput`] on a blank line and
    /// [`DefragError::MalformedInput`] on the first non-digit character.
    pub fn parse(line: &str) -> Result<Disk> {
        let line = line.trim_end();
        if line.is_empty() {
            return Err(DefragError::EmptyInput);
        }

        let mut files = Vec::new();
        let mut free = FreeList::new();
        let mut position = 0u64;
        let mut next_id = 0u64;
        let mut is_file = true;

        for (offset, ch) in line.char_indices() {
            let run = ch
                .to_digit(10)
                .ok_or(DefragError::MalformedInput { offset, found: ch })?
                as u64;

            if run != 0 {
                let extent = Extent::new(position, position + run);
                position += run;
                if is_file {
                    files.push(FileExtent::new(next_id, extent));
                    next_id += 1;
                } else {
                    free.push_back(extent);
                }
            }
            is_file = !is_file;
        }

        Ok(Disk::new(files, free, position))
    }
}
