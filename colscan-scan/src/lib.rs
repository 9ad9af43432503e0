//! Query preprocessing, filter planning and scan execution.
//!
//! An identifier is turned into [`QueryParams`], the query into an ordered
//! [`FilterPlan`], and the plan is run against a loaded
//! [`ColumnStore`](colscan_column_map::ColumnStore) either once for all
//! statistics ([`shared_scan`]) or once per statistic ([`normal_scan`]).

pub mod config;
pub mod execute;
pub mod plan;
pub mod query;
pub mod report;

pub use config::{DEFAULT_AREA_THRESHOLD, DEFAULT_DATA_PATH, ScanConfig};
pub use execute::{ScanMode, ScanOutcome, normal_scan, run_scan, shared_scan};
pub use plan::{FilterPlan, ScanFilter};
pub use query::{QueryCatalog, QueryParams, preprocess};
pub use report::{NO_RESULT, report_file_name, report_rows, write_report};
