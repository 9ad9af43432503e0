//! End-to-end query run: load, preprocess, scan, report.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use colscan_column_map::{ColumnStore, StoreConfig};
use colscan_result::Result;
use colscan_scan::{
    DEFAULT_DATA_PATH, FilterPlan, QueryCatalog, QueryParams, ScanConfig, ScanMode, ScanOutcome,
    run_scan, write_report,
};

/// Everything one run needs.
#[derive(Clone, Debug)]
pub struct RunOptions {
    pub identifier: String,
    pub data_path: PathBuf,
    pub output_dir: PathBuf,
    pub mode: ScanMode,
    pub store: StoreConfig,
    pub scan: ScanConfig,
    pub catalog: QueryCatalog,
}

impl RunOptions {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            output_dir: PathBuf::from("."),
            mode: ScanMode::default(),
            store: StoreConfig::default(),
            scan: ScanConfig::default(),
            catalog: QueryCatalog::default(),
        }
    }
}

/// What a run produced.
#[derive(Clone, Debug)]
pub struct RunSummary {
    pub params: QueryParams,
    pub plan: FilterPlan,
    pub rows_loaded: u64,
    pub outcome: ScanOutcome,
    pub report_path: PathBuf,
    pub elapsed: Duration,
}

pub fn run(options: &RunOptions) -> Result<RunSummary> {
    let started = Instant::now();

    let params = options.catalog.preprocess(&options.identifier)?;
    let store = ColumnStore::load(&options.data_path, &options.store)?;
    let plan = FilterPlan::for_query(&params, &options.scan, store.table().partition_column());
    tracing::debug!(target: "colscan::runner", query = %params, plan = %plan, "planned query");

    let outcome = run_scan(options.mode, &store, &plan)?;
    let report_path = write_report(&options.output_dir, &options.identifier, &params, &outcome)?;

    Ok(RunSummary {
        params,
        plan,
        rows_loaded: store.total_rows(),
        outcome,
        report_path,
        elapsed: started.elapsed(),
    })
}
