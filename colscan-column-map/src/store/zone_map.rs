//! Block-to-rows index for the zone-mapped column.
//!
//! A block's min/max summary lives on the block itself; this index records
//! which rows each block of the zone-mapped column holds, so a block the
//! summary rules out can be dropped from the row selection as one range.

use std::ops::Range;

use colscan_storage::{BlockId, RowId};
use rustc_hash::FxHashMap;

/// Inclusive row-id range covered by one block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RowSpan {
    pub first: RowId,
    pub last: RowId,
}

impl RowSpan {
    #[inline]
    pub fn at(row: RowId) -> Self {
        Self {
            first: row,
            last: row,
        }
    }

    #[inline]
    fn extend_to(&mut self, row: RowId) {
        self.first = self.first.min(row);
        self.last = self.last.max(row);
    }

    #[inline]
    fn shifted(self, offset: RowId) -> Self {
        Self {
            first: self.first + offset,
            last: self.last + offset,
        }
    }

    /// The same rows as a half-open range.
    #[inline]
    pub fn as_range(&self) -> Range<RowId> {
        self.first..self.last + 1
    }
}

#[derive(Clone, Debug, Default)]
pub struct ZoneMapIndex {
    spans: FxHashMap<BlockId, RowSpan>,
}

impl ZoneMapIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Extend `block`'s span to cover `row`, creating `[row, row]` on first
    /// write.
    pub fn record(&mut self, block: BlockId, row: RowId) {
        self.spans
            .entry(block)
            .and_modify(|span| span.extend_to(row))
            .or_insert_with(|| RowSpan::at(row));
    }

    /// Fold `other` in with its rows shifted by `offset`.
    ///
    /// Partitions index rows locally while loading; this moves them to their
    /// final storage-order position.
    pub fn absorb(&mut self, other: ZoneMapIndex, offset: RowId) {
        for (block, span) in other.spans {
            self.spans.insert(block, span.shifted(offset));
        }
    }

    pub fn get(&self, block: BlockId) -> Option<RowSpan> {
        self.spans.get(&block).copied()
    }

    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (BlockId, RowSpan)> + '_ {
        self.spans.iter().map(|(id, span)| (*id, *span))
    }
}
