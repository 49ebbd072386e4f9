use std::ops::RangeInclusive;

use crate::error::{Result, SweError};

/// Global, 1-based, inclusive index range owned by a tile along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexRange {
    pub start: usize,
    pub end: usize,
}

impl IndexRange {
    pub fn len(&self) -> usize {
        self.end + 1 - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end < self.start
    }

    pub fn iter(&self) -> RangeInclusive<usize> {
        self.start..=self.end
    }

    /// Position of a global index inside this range, counting from 1.
    pub fn to_local(&self, global_idx: usize) -> usize {
        global_idx - self.start + 1
    }
}

/// Range of `axis_length` cells owned by tile `tile_idx` (1-based) of `num_tiles`.
///
/// The first `axis_length % num_tiles` tiles get one extra cell.
pub fn tile_range(
    axis: &'static str,
    axis_length: usize,
    tile_idx: usize,
    num_tiles: usize,
) -> Result<IndexRange> {
    if num_tiles == 0 || num_tiles > axis_length || tile_idx == 0 || tile_idx > num_tiles {
        return Err(SweError::InvalidPartition {
            axis,
            length: axis_length,
            tiles: num_tiles,
        });
    }

    let base = axis_length / num_tiles;
    let remainder = axis_length % num_tiles;

    let preceding = tile_idx - 1;
    let start = 1 + preceding * base + preceding.min(remainder);
    let len = base + usize::from(preceding < remainder);

    Ok(IndexRange {
        start,
        end: start + len - 1,
    })
}
