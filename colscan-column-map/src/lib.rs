//! Column-oriented table storage with pruned predicate filtering.
//!
//! [`ColumnStore::load`] ingests a delimited file into blocks, optionally
//! partitioned by one column and zone-mapped on another. The loaded table is
//! shared behind an `Arc`; each store owns a [`RowSelection`] that filters
//! narrow and [`ColumnStore::get_column_values`] projects.

pub mod date;
pub mod store;

pub use colscan_storage::{RangeOp, RowId, Value};
pub use store::{
    ColumnStore, LoadedTable, PartitionSpan, RowSelection, RowSpan, StoreConfig, ZoneMapIndex,
};
