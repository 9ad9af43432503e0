//! colscan: column-oriented scans over delimited resale price data.
//!
//! This crate is the entrypoint of the workspace. It re-exports the store,
//! scan and statistics types from the `colscan-*` crates and hosts the
//! [`runner`] that the `colscan` binary drives.
//!
//! # Quick Start
//!
//! ```rust
//! use colscan::{ColumnStore, FilterPlan, ScanConfig, StoreConfig, preprocess, shared_scan};
//!
//! let csv = "month,town,floor_area_sqm,resale_price\n2021-02,TAMPINES,90,450000\n";
//! let config = StoreConfig::default().with_partition_column("town");
//! let store = ColumnStore::load_from_reader(csv.as_bytes(), &config).unwrap();
//!
//! let params = preprocess("U2237721K").unwrap();
//! let plan = FilterPlan::for_query(&params, &ScanConfig::default(), Some("town"));
//! let outcome = shared_scan(&store, &plan).unwrap();
//! assert!(!outcome.is_no_result());
//! ```
//!
//! # Architecture
//!
//! - **Storage** (`colscan-storage`): values, blocks with zone bounds, partitions and the disk map.
//! - **Column store** (`colscan-column-map`): ingestion, row selections and pruned filters.
//! - **Scan** (`colscan-scan`): query preprocessing, filter ordering, shared and normal scans.
//! - **Statistics** (`colscan-aggregate`): the four price statistics.
//! - **CSV** (`colscan-csv`): line splitting for ingestion and the report writer.

pub mod runner;

pub use colscan_aggregate::{CategoryValue, StatCategory, Statistics};
pub use colscan_column_map::{ColumnStore, RangeOp, RowSelection, StoreConfig, Value};
pub use colscan_result::{Error, Result};
pub use colscan_scan::{
    DEFAULT_DATA_PATH, FilterPlan, QueryCatalog, QueryParams, ScanConfig, ScanMode, ScanOutcome,
    normal_scan, preprocess, run_scan, shared_scan, write_report,
};

pub mod storage {
    //! Block, partition and disk primitives underneath the column store.

    pub use colscan_storage::{Block, Disk, Partition, StorageUnit, ZoneBounds};
}

pub mod csv {
    //! Options for reading sources and writing reports.

    pub use colscan_csv::{CsvReadOptions, CsvWriteOptions};
}
