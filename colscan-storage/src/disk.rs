//! In-memory storage backend.
//!
//! [`Disk`] maps a string key to a [`StorageUnit`]. Unpartitioned tables key
//! block chains by column name; partitioned tables key one [`Partition`] by
//! each partition-key value. The disk itself does not know which layout is in
//! use. Keys iterate in first-insertion order so that storage order, and thus
//! row numbering, is deterministic.

use colscan_result::{Error, Result};
use rustc_hash::FxHashMap;

use crate::block::Block;
use crate::partition::Partition;
use crate::types::BlockId;

#[derive(Clone, Debug)]
pub enum StorageUnit {
    /// One column's full block chain.
    Columns(Vec<Block>),
    /// Every column's rows for one partition-key value.
    Partitioned(Partition),
}

impl StorageUnit {
    /// Block chain holding `column`'s values inside this unit.
    ///
    /// A `Columns` unit is the chain of whatever column it is keyed by; callers
    /// resolve the key before asking.
    pub fn blocks_for(&self, column: &str) -> Option<&[Block]> {
        match self {
            StorageUnit::Columns(chain) => Some(chain.as_slice()),
            StorageUnit::Partitioned(partition) => partition.get(column),
        }
    }

    pub fn as_partition(&self) -> Option<&Partition> {
        match self {
            StorageUnit::Partitioned(partition) => Some(partition),
            StorageUnit::Columns(_) => None,
        }
    }

    pub fn row_count(&self) -> usize {
        match self {
            StorageUnit::Columns(chain) => chain.iter().map(Block::len).sum(),
            StorageUnit::Partitioned(partition) => partition.row_count(),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct Disk {
    units: FxHashMap<String, StorageUnit>,
    order: Vec<String>,
    next_block_id: BlockId,
}

impl Disk {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a fresh block id. Ids are never reused.
    pub fn alloc_block_id(&mut self) -> BlockId {
        let id = self.next_block_id;
        self.next_block_id += 1;
        id
    }

    /// Open an empty block with a freshly allocated id.
    pub fn open_block(&mut self, capacity_bytes: usize, zone_map: bool) -> Block {
        let id = self.alloc_block_id();
        Block::with_capacity(id, capacity_bytes, zone_map)
    }

    /// Append a block to the chain stored under `key`.
    pub fn add_block(&mut self, key: &str, block: Block) -> Result<()> {
        if !self.units.contains_key(key) {
            self.order.push(key.to_string());
            self.units
                .insert(key.to_string(), StorageUnit::Columns(Vec::new()));
        }
        match self.units.get_mut(key) {
            Some(StorageUnit::Columns(chain)) => {
                chain.push(block);
                Ok(())
            }
            Some(StorageUnit::Partitioned(_)) => Err(Error::Internal(format!(
                "disk key '{key}' holds a partition, cannot append a block"
            ))),
            None => Err(Error::NotFound),
        }
    }

    /// Store `partition` under `key`. Each key holds at most one partition.
    pub fn add_partition(&mut self, key: &str, partition: Partition) -> Result<()> {
        if self.units.contains_key(key) {
            return Err(Error::Internal(format!(
                "disk key '{key}' is already populated"
            )));
        }
        tracing::trace!(
            target: "colscan::storage",
            key,
            rows = partition.row_count(),
            "storing partition"
        );
        self.order.push(key.to_string());
        self.units
            .insert(key.to_string(), StorageUnit::Partitioned(partition));
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&StorageUnit> {
        self.units.get(key)
    }

    /// All entries in first-insertion order.
    pub fn get_all(&self) -> impl Iterator<Item = (&str, &StorageUnit)> {
        self.order
            .iter()
            .filter_map(|key| self.units.get(key).map(|unit| (key.as_str(), unit)))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Number of blocks allocated so far.
    pub fn allocated_blocks(&self) -> u64 {
        self.next_block_id
    }
}
