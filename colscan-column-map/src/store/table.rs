use std::ops::Range;

use colscan_result::{Error, Result};
use colscan_storage::{Block, Disk, RowId, Value};

use super::selection::RowSelection;
use super::zone_map::ZoneMapIndex;

/// Row-id range owned by one partition, in storage order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PartitionSpan {
    pub key: String,
    pub rows: Range<RowId>,
}

/// Everything ingestion produced. Immutable once built and shared by every
/// [`ColumnStore`](super::ColumnStore) cloned from the same load.
///
/// Row ids are positions in storage order: ingestion order when unpartitioned,
/// otherwise partition first-seen order, then block, then position in block.
#[derive(Debug)]
pub struct LoadedTable {
    pub(crate) disk: Disk,
    pub(crate) headers: Vec<String>,
    pub(crate) partition_column: Option<String>,
    pub(crate) zone_map_column: Option<String>,
    pub(crate) zone_map: ZoneMapIndex,
    pub(crate) partitions: Vec<PartitionSpan>,
    pub(crate) row_count: u64,
    pub(crate) skipped_rows: u64,
}

impl LoadedTable {
    pub fn disk(&self) -> &Disk {
        &self.disk
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn partition_column(&self) -> Option<&str> {
        self.partition_column.as_deref()
    }

    /// `None` also when the configured column was missing from the header.
    pub fn zone_map_column(&self) -> Option<&str> {
        self.zone_map_column.as_deref()
    }

    pub fn zone_map(&self) -> &ZoneMapIndex {
        &self.zone_map
    }

    /// Partitions in storage order. Empty when unpartitioned.
    pub fn partitions(&self) -> &[PartitionSpan] {
        &self.partitions
    }

    pub fn row_count(&self) -> u64 {
        self.row_count
    }

    /// Data lines dropped for having the wrong number of fields.
    pub fn skipped_rows(&self) -> u64 {
        self.skipped_rows
    }

    pub fn column_index(&self, column: &str) -> Result<usize> {
        self.headers
            .iter()
            .position(|h| h == column)
            .ok_or_else(|| Error::column_not_found(column))
    }

    #[inline]
    pub fn is_partition_column(&self, column: &str) -> bool {
        self.partition_column.as_deref() == Some(column)
    }

    #[inline]
    pub fn is_zone_map_column(&self, column: &str) -> bool {
        self.zone_map_column.as_deref() == Some(column)
    }

    /// `column`'s blocks in storage order, each with the row id of its first
    /// value.
    pub fn blocks(&self, column: &str) -> Result<Vec<(RowId, &Block)>> {
        self.column_index(column)?;
        let mut out = Vec::new();
        if self.partition_column.is_some() {
            for span in &self.partitions {
                let chain = self
                    .disk
                    .get(&span.key)
                    .and_then(|unit| unit.blocks_for(column))
                    .unwrap_or_default();
                push_chain(&mut out, span.rows.start, chain);
            }
        } else {
            let chain = self
                .disk
                .get(column)
                .and_then(|unit| unit.blocks_for(column))
                .unwrap_or_default();
            push_chain(&mut out, 0, chain);
        }
        Ok(out)
    }

    /// Call `visit` with each row of `rows` and its `column` value, ascending.
    ///
    /// Selected rows and block ranges are merged in step, so a block with no
    /// selected row costs one comparison and its values are never read.
    pub fn visit_selected(
        &self,
        column: &str,
        rows: &RowSelection,
        mut visit: impl FnMut(RowId, &Value),
    ) -> Result<()> {
        let blocks = self.blocks(column)?;
        let mut pending = rows.iter().peekable();
        for (start, block) in blocks {
            let end = start + block.len() as RowId;
            while let Some(&row) = pending.peek() {
                if row >= end {
                    break;
                }
                pending.next();
                if row >= start {
                    visit(row, &block.values()[(row - start) as usize]);
                }
            }
            if pending.peek().is_none() {
                break;
            }
        }
        Ok(())
    }
}

fn push_chain<'a>(out: &mut Vec<(RowId, &'a Block)>, mut start: RowId, chain: &'a [Block]) {
    for block in chain {
        out.push((start, block));
        start += block.len() as RowId;
    }
}
