//! The column store: ingestion, the shared loaded table, and filtering.

mod config;
pub use config::StoreConfig;

pub mod core;
pub use self::core::ColumnStore;

mod filter;
mod ingest;

pub mod selection;
pub use selection::RowSelection;

pub mod table;
pub use table::{LoadedTable, PartitionSpan};

pub mod zone_map;
pub use zone_map::{RowSpan, ZoneMapIndex};
