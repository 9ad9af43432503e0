use rustc_hash::FxHashMap;

use crate::block::Block;

/// All columns' block chains for the rows sharing one partition-key value.
///
/// Every chain describes the same rows in the same order, so the row count of
/// any one column is the row count of the partition.
#[derive(Clone, Debug, Default)]
pub struct Partition {
    chains: FxHashMap<String, Vec<Block>>,
}

impl Partition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `block` to the chain of `column`.
    pub fn add(&mut self, column: impl Into<String>, block: Block) {
        self.chains.entry(column.into()).or_default().push(block);
    }

    pub fn get(&self, column: &str) -> Option<&[Block]> {
        self.chains.get(column).map(Vec::as_slice)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.chains.keys().map(String::as_str)
    }

    pub fn block_chains(&self) -> &FxHashMap<String, Vec<Block>> {
        &self.chains
    }

    pub fn row_count(&self) -> usize {
        self.chains
            .values()
            .next()
            .map(|chain| chain.iter().map(Block::len).sum())
            .unwrap_or(0)
    }
}
